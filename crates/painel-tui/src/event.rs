//! Semantic application events: crossterm input mapped to a small vocabulary
//! so widgets and the app shell never inspect crossterm types.
//!
//! | Key(s)                  | Event            |
//! |-------------------------|------------------|
//! | `q`, `Ctrl+c`           | `Quit`           |
//! | `Tab`                   | `FocusNext`      |
//! | `Shift+Tab`             | `FocusPrev`      |
//! | `↑` / `k`               | `Nav(Up)`        |
//! | `↓` / `j`               | `Nav(Down)`      |
//! | `g` / `Home`            | `Nav(First)`     |
//! | `G` / `End`             | `Nav(Last)`      |
//! | `Enter`, `→`, `l`       | `Enter`          |
//! | `Esc`, `←`, `h`         | `Escape`         |
//! | other printable char    | `Char(c)`        |
//! | terminal resize         | `Resize(w, h)`   |

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    /// Move focus to the next pane (topics → posts → chart).
    FocusNext,
    FocusPrev,
    /// Move the cursor of the focused list.
    Nav(Direction),
    /// Drill into the selection (moves focus one pane right).
    Enter,
    /// Close the help popup or step back one pane.
    Escape,
    Char(char),
    Resize(u16, u16),
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`]. `None` for mouse
/// events and unbound keys.
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('q') if key.modifiers == Mod::NONE => Some(AppEvent::Quit),
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),
        BackTab => Some(AppEvent::FocusPrev),

        Up | Char('k') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Up)),
        Down | Char('j') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Down)),
        Home | Char('g') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::First)),
        // Uppercase G: terminals disagree on whether SHIFT is reported.
        End | Char('G') => Some(AppEvent::Nav(Direction::Last)),

        Enter | Right | Char('l') if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),
        Left | Char('h') if key.modifiers == Mod::NONE => Some(AppEvent::Escape),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
