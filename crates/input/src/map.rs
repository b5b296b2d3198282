//! Key mapping from terminal events to field edits.

use crate::types::EditAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to field edits.
///
/// Printable characters map to [`EditAction::Insert`] even when they are not
/// digits; filtering is the formatter's job. Characters typed with Ctrl or Alt
/// held are shortcuts, not text.
pub fn handle_key_event(key: KeyEvent) -> Option<EditAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        // Shortcuts
        KeyCode::Char('a') | KeyCode::Char('A') if ctrl => Some(EditAction::SelectAll),
        KeyCode::Char('u') | KeyCode::Char('U') if ctrl => Some(EditAction::Clear),
        KeyCode::Char(_) if ctrl || alt => None,

        // Text
        KeyCode::Char(c) if is_printable(c) => Some(EditAction::Insert(c)),
        KeyCode::Backspace => Some(EditAction::Backspace),
        KeyCode::Delete => Some(EditAction::Delete),

        // Caret
        KeyCode::Left if shift => Some(EditAction::SelectLeft),
        KeyCode::Right if shift => Some(EditAction::SelectRight),
        KeyCode::Left => Some(EditAction::MoveLeft),
        KeyCode::Right => Some(EditAction::MoveRight),
        KeyCode::Home | KeyCode::Up => Some(EditAction::Home),
        KeyCode::End | KeyCode::Down => Some(EditAction::End),

        _ => None,
    }
}

/// Check if key should quit the application.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn is_printable(c: char) -> bool {
    (' '..='~').contains(&c)
}
