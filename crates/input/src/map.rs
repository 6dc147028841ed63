//! Key and mouse mapping from terminal events to player commands.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// What the player asked for.
///
/// Cursor movement and the help overlay are front-end concerns; everything
/// else turns into a [`crate::types::GameAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    MoveCursor { dx: i8, dy: i8 },
    /// Tap the tile under the cursor
    Tap,
    Shuffle,
    NewLevel,
    Reset,
    ToggleHelp,
}

/// Map keyboard input to commands.
pub fn handle_key_event(key: KeyEvent) -> Option<InputCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some(InputCommand::MoveCursor { dx: -1, dy: 0 })
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => {
            Some(InputCommand::MoveCursor { dx: 1, dy: 0 })
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            Some(InputCommand::MoveCursor { dx: 0, dy: -1 })
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            Some(InputCommand::MoveCursor { dx: 0, dy: 1 })
        }

        // Actions
        KeyCode::Enter | KeyCode::Char(' ') => Some(InputCommand::Tap),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(InputCommand::Shuffle),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(InputCommand::NewLevel),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(InputCommand::Reset),
        KeyCode::Char('?') | KeyCode::F(1) => Some(InputCommand::ToggleHelp),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Screen cell of a left click, `(column, row)`.
///
/// Only button presses count; drags and releases are ignored.
pub fn handle_mouse_event(event: MouseEvent) -> Option<(u16, u16)> {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some((event.column, event.row)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_cursor_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(InputCommand::MoveCursor { dx: -1, dy: 0 })
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('j'))),
            Some(InputCommand::MoveCursor { dx: 0, dy: 1 })
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('K'))),
            Some(InputCommand::MoveCursor { dx: 0, dy: -1 })
        );
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Enter)),
            Some(InputCommand::Tap)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(InputCommand::Tap)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('s'))),
            Some(InputCommand::Shuffle)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('n'))),
            Some(InputCommand::NewLevel)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('R'))),
            Some(InputCommand::Reset)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('?'))),
            Some(InputCommand::ToggleHelp)
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_release_ignored() {
        let mut key = KeyEvent::from(KeyCode::Enter);
        key.kind = KeyEventKind::Release;
        assert_eq!(handle_key_event(key), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
    }

    #[test]
    fn test_left_click_only() {
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(handle_mouse_event(click), Some((7, 3)));

        let right = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Right),
            ..click
        };
        assert_eq!(handle_mouse_event(right), None);
        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            ..click
        };
        assert_eq!(handle_mouse_event(moved), None);
    }
}
