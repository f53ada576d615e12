//! Gameplay recorder: play the single-bird variant while every simulated
//! frame is captured as a feature row plus the jump label, then append
//! the run to a CSV for the offline training pipeline. The bird is
//! immortal here — a session only ends when the player quits.

use anyhow::Result;
use clap::Parser;
use crossterm::{cursor, execute, terminal};
use flappy_duel::config::SessionConfig;
use flappy_duel::game::GameSession;
use flappy_duel::input::{self, Command, InputEvent};
use flappy_duel::recorder::Recorder;
use flappy_duel::ui::Renderer;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "record", about = "Record human gameplay for model training")]
struct Args {
    /// Destination CSV; rows are appended if the file already has data.
    #[arg(long, default_value = "training_data.csv")]
    out: PathBuf,

    /// Seed the pipe stream for reproducible sessions.
    #[arg(long)]
    seed: Option<u64>,
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

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;

    let result = run(&args, &mut out);
    cleanup(&mut out)?;

    let recorder = result?;
    if recorder.is_empty() {
        println!("nothing recorded");
    } else {
        let rows = recorder.save(&args.out)?;
        println!("saved {rows} rows to {}", args.out.display());
    }
    Ok(())
}

fn run(args: &Args, out: &mut io::Stdout) -> Result<Recorder> {
    let config = SessionConfig::recording();
    let mut session = match args.seed {
        Some(seed) => GameSession::seeded(config, false, seed),
        None => GameSession::solo(config),
    };
    let (cols, rows) = terminal::size()?;
    let mut renderer = Renderer::new(cols, rows, &session.config);
    let frame_dur = session.config.frame_duration();
    let mut recorder = Recorder::new();

    loop {
        let frame_start = Instant::now();

        let mut jump = false;
        for event in input::poll_events(session.lifecycle, true)? {
            match event {
                InputEvent::Command(Command::Quit) => return Ok(recorder),
                InputEvent::Command(Command::Jump) => jump = true,
                InputEvent::Resized(c, r) => renderer.resize(c, r),
                _ => {}
            }
        }

        session.tick(jump, None);
        // Capture post-physics state with this frame's action label, the
        // same order the training pipeline expects.
        recorder.capture(session.player_features(), jump);

        renderer.draw(&session, out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
