//! Semantic application events: crossterm key events mapped to the small
//! vocabulary the typeahead understands, so widgets never touch crossterm.
//!
//! The search box always has focus, so every printable character types
//! itself. Only the keys below carry special meaning.
//!
//! | Key(s)          | Event           |
//! |-----------------|-----------------|
//! | `Ctrl+c`        | `Quit`          |
//! | `↑`             | `Up`            |
//! | `↓`             | `Down`          |
//! | `←` / `→`       | `Left` / `Right`|
//! | `Enter`         | `Enter`         |
//! | `Esc`           | `Escape`        |
//! | `Backspace`     | `Backspace`     |
//! | printable char  | `Char(c)`       |
//! | terminal resize | `Resize(w, h)`  |

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    /// Move the active result up.
    Up,
    /// Move the active result down.
    Down,
    /// Move the text cursor left.
    Left,
    /// Move the text cursor right.
    Right,
    /// Follow the active result.
    Enter,
    /// Clear the input, or quit when it is already empty.
    Escape,
    Char(char),
    Backspace,
    Resize(u16, u16),
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`].
///
/// Returns `None` for mouse events, key releases and unbound keys.
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) if key.kind != KeyEventKind::Release => map_key(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Up => Some(AppEvent::Up),
        Down => Some(AppEvent::Down),
        Left => Some(AppEvent::Left),
        Right => Some(AppEvent::Right),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
