//! Abstract input commands and their terminal key bindings. The
//! simulation only ever sees [`Command`] values; which physical key maps
//! to which command (and how Space is interpreted across lifecycle
//! states) lives here.

use crate::game::Lifecycle;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::io;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Jump,
    Start,
    TogglePause,
    Restart,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Command(Command),
    Resized(u16, u16),
}

/// Drain every pending terminal event without blocking and translate
/// them. Space is context sensitive: it starts a gated session, restarts
/// an ended one, and jumps otherwise. With `edge_only` set, only key
/// press edges count (held-key repeats are dropped); the arcade variant
/// passes `false` and accepts repeats.
pub fn poll_events(lifecycle: Lifecycle, edge_only: bool) -> io::Result<Vec<InputEvent>> {
    let mut events = Vec::new();
    while event::poll(Duration::ZERO)? {
        match event::read()? {
            Event::Key(key) => {
                let accepted = key.kind == KeyEventKind::Press
                    || (!edge_only && key.kind == KeyEventKind::Repeat);
                if !accepted {
                    continue;
                }
                if let Some(command) = translate(key.code, lifecycle) {
                    events.push(InputEvent::Command(command));
                }
            }
            Event::Resize(cols, rows) => events.push(InputEvent::Resized(cols, rows)),
            _ => {}
        }
    }
    Ok(events)
}

fn translate(code: KeyCode, lifecycle: Lifecycle) -> Option<Command> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => Some(match lifecycle {
            Lifecycle::NotStarted => Command::Start,
            Lifecycle::Ended => Command::Restart,
            _ => Command::Jump,
        }),
        KeyCode::Char('p') => Some(Command::TogglePause),
        KeyCode::Char('r') => Some(Command::Restart),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_is_context_sensitive() {
        assert_eq!(
            translate(KeyCode::Char(' '), Lifecycle::NotStarted),
            Some(Command::Start)
        );
        assert_eq!(
            translate(KeyCode::Char(' '), Lifecycle::Running),
            Some(Command::Jump)
        );
        assert_eq!(
            translate(KeyCode::Char(' '), Lifecycle::Paused),
            Some(Command::Jump)
        );
        assert_eq!(
            translate(KeyCode::Char(' '), Lifecycle::Ended),
            Some(Command::Restart)
        );
    }

    #[test]
    fn control_keys_ignore_lifecycle() {
        for lifecycle in [
            Lifecycle::NotStarted,
            Lifecycle::Running,
            Lifecycle::Paused,
            Lifecycle::Ended,
        ] {
            assert_eq!(translate(KeyCode::Char('q'), lifecycle), Some(Command::Quit));
            assert_eq!(translate(KeyCode::Esc, lifecycle), Some(Command::Quit));
            assert_eq!(
                translate(KeyCode::Char('r'), lifecycle),
                Some(Command::Restart)
            );
            assert_eq!(
                translate(KeyCode::Char('p'), lifecycle),
                Some(Command::TogglePause)
            );
        }
        assert_eq!(translate(KeyCode::Char('x'), Lifecycle::Running), None);
    }
}
