//! Human vs. AI duel: two birds share one pipe stream; first crash ends
//! the round. The AI plays from a trained classifier when model and
//! scaler files load, and from the gap-center heuristic otherwise.

use anyhow::Result;
use clap::Parser;
use crossterm::{cursor, execute, terminal};
use flappy_duel::audio::Audio;
use flappy_duel::config::{Difficulty, SessionConfig};
use flappy_duel::game::{GameSession, Lifecycle};
use flappy_duel::input::{self, Command, InputEvent};
use flappy_duel::model::{MlpClassifier, StandardScaler};
use flappy_duel::policy::DecisionPolicy;
use flappy_duel::ui::Renderer;
use log::{info, warn};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "flappy-duel", about = "Race an AI bird through the pipes")]
struct Args {
    /// AI difficulty (model threshold / heuristic margin).
    #[arg(long, value_enum, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,

    /// Force the heuristic AI, ignoring any model/scaler files.
    #[arg(long)]
    no_model: bool,

    /// Trained classifier weights (JSON).
    #[arg(long, default_value = "model.json")]
    model: PathBuf,

    /// Fitted feature scaler (JSON).
    #[arg(long, default_value = "scaler.json")]
    scaler: PathBuf,

    /// Restart automatically two seconds after a round ends.
    #[arg(long)]
    auto_reset: bool,

    /// Seed the pipe stream for reproducible rounds.
    #[arg(long)]
    seed: Option<u64>,

    /// Disable sound.
    #[arg(long)]
    mute: bool,
}

/// Pick the AI backend once, before the terminal takes over. A missing or
/// unreadable collaborator downgrades to the heuristic for the whole
/// session; it is never re-probed mid-game.
fn load_policy(args: &Args) -> DecisionPolicy {
    if args.no_model {
        info!("--no-model given; using heuristic AI");
        return DecisionPolicy::heuristic(args.difficulty);
    }
    let scaler = match StandardScaler::load(&args.scaler) {
        Ok(scaler) => scaler,
        Err(err) => {
            warn!("scaler unavailable ({err:#}); falling back to heuristic AI");
            return DecisionPolicy::heuristic(args.difficulty);
        }
    };
    let classifier = match MlpClassifier::load(&args.model) {
        Ok(model) => model,
        Err(err) => {
            warn!("model unavailable ({err:#}); falling back to heuristic AI");
            return DecisionPolicy::heuristic(args.difficulty);
        }
    };
    info!("model and scaler loaded; AI is model-backed");
    DecisionPolicy::with_model(Box::new(scaler), Box::new(classifier), args.difficulty)
}

fn new_session(args: &Args) -> GameSession {
    let config = SessionConfig::duel();
    match args.seed {
        Some(seed) => GameSession::seeded(config, true, seed),
        None => GameSession::duel(config),
    }
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
    let policy = load_policy(&args);
    let audio = if args.mute { None } else { Audio::open() };

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;

    let result = run(&args, &policy, audio.as_ref(), &mut out);
    cleanup(&mut out)?;
    result
}

fn run(
    args: &Args,
    policy: &DecisionPolicy,
    audio: Option<&Audio>,
    out: &mut io::Stdout,
) -> Result<()> {
    let mut session = new_session(args);
    let (cols, rows) = terminal::size()?;
    let mut renderer = Renderer::new(cols, rows, &session.config);
    let frame_dur = session.config.frame_duration();

    loop {
        let frame_start = Instant::now();

        let mut jump = false;
        for event in input::poll_events(session.lifecycle, true)? {
            match event {
                InputEvent::Command(Command::Quit) => return Ok(()),
                InputEvent::Command(Command::Start) => session.start(),
                InputEvent::Command(Command::TogglePause) => session.toggle_pause(),
                InputEvent::Command(Command::Restart) => session = new_session(args),
                InputEvent::Command(Command::Jump) => jump = true,
                InputEvent::Resized(c, r) => renderer.resize(c, r),
            }
        }

        let score_before = session.score;
        let was_running = session.is_running();
        session.tick(jump, Some(policy));

        if let Some(audio) = audio {
            if jump && was_running {
                audio.flap();
            }
            if session.score > score_before {
                audio.score();
            }
            if was_running && session.lifecycle == Lifecycle::Ended {
                audio.death();
            }
        }

        if args.auto_reset
            && session.lifecycle == Lifecycle::Ended
            && session
                .ended_at
                .is_some_and(|t| t.elapsed() > Duration::from_secs(2))
        {
            session = new_session(args);
        }

        renderer.draw(&session, out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
