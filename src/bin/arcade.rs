//! Single-player arcade variant: wide field, constant pipe speed, screen
//! edges clamp the bird instead of killing it, and the first pipe hit
//! ends the run. Held keys are accepted; no start gate, no pause.

use anyhow::Result;
use clap::Parser;
use crossterm::{cursor, execute, terminal};
use flappy_duel::audio::Audio;
use flappy_duel::config::SessionConfig;
use flappy_duel::game::{GameSession, Lifecycle};
use flappy_duel::input::{self, Command, InputEvent};
use flappy_duel::ui::Renderer;
use std::io::{self, stdout};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "arcade", about = "Classic single-player flappy run")]
struct Args {
    /// Seed the pipe stream for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Disable sound.
    #[arg(long)]
    mute: bool,
}

fn cleanup(out: &mut io::Stdout) -> io::Result<()> {
    execute!(
        out,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let audio = if args.mute { None } else { Audio::open() };

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;

    let result = run(&args, audio.as_ref(), &mut out);
    cleanup(&mut out)?;
    match result? {
        Some(score) => println!("game over — score {score}"),
        None => {}
    }
    Ok(())
}

/// Returns the final score when the run ended in a crash, `None` on quit.
fn run(args: &Args, audio: Option<&Audio>, out: &mut io::Stdout) -> Result<Option<u32>> {
    let config = SessionConfig::arcade();
    let mut session = match args.seed {
        Some(seed) => GameSession::seeded(config, false, seed),
        None => GameSession::solo(config),
    };
    let (cols, rows) = terminal::size()?;
    let mut renderer = Renderer::new(cols, rows, &session.config);
    let frame_dur = session.config.frame_duration();

    loop {
        let frame_start = Instant::now();

        let mut jump = false;
        // Repeats allowed: holding Space keeps flapping in this variant.
        for event in input::poll_events(session.lifecycle, false)? {
            match event {
                InputEvent::Command(Command::Quit) => return Ok(None),
                InputEvent::Command(Command::Jump) => jump = true,
                InputEvent::Resized(c, r) => renderer.resize(c, r),
                _ => {}
            }
        }

        let score_before = session.score;
        session.tick(jump, None);

        if let Some(audio) = audio {
            if jump {
                audio.flap();
            }
            if session.score > score_before {
                audio.score();
            }
        }

        renderer.draw(&session, out)?;

        if session.lifecycle == Lifecycle::Ended {
            if let Some(audio) = audio {
                audio.death();
            }
            // Leave the game-over frame up briefly before exiting.
            std::thread::sleep(Duration::from_millis(1500));
            return Ok(Some(session.score));
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
