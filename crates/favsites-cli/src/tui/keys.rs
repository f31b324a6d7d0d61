//! Key dispatch
//!
//! Maps key presses onto `App` state changes. Everything except the form
//! submit happens here synchronously; the submit awaits a preview lookup
//! and a redraw, so it is handed back to the event loop as `KeyAction::Submit`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use favsites_core::Store;

use super::app::{App, Confirmation, Focus};

/// What the event loop still has to do after a key was dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Nothing further
    Done,
    /// Submit the form
    Submit,
}

/// Route a key press to whichever layer is on top
///
/// A notice swallows the key that dismisses it, then help does the same.
/// While a delete is pending only the confirmation keys do anything.
pub fn handle_key(app: &mut App, store: &mut Store, key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Done;
    }

    if app.has_notice() {
        app.clear_notice();
        return KeyAction::Done;
    }

    if app.show_help {
        app.show_help = false;
        return KeyAction::Done;
    }

    if let Confirmation::Pending(_) = app.confirmation {
        handle_confirmation(app, store, key.code);
        return KeyAction::Done;
    }

    match app.focus {
        Focus::Name | Focus::Link => handle_form(app, key.code, key.modifiers),
        Focus::Grid => {
            handle_grid(app, store, key.code, key.modifiers);
            KeyAction::Done
        }
    }
}

/// Keys while the delete confirmation modal is open
fn handle_confirmation(app: &mut App, store: &mut Store, code: KeyCode) {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(store),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

/// Keys while a form input has focus
fn handle_form(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Esc => {
            app.cancel_edit();
            app.focus = Focus::Grid;
        }
        KeyCode::Tab => {
            let next = app.focus.next();
            app.focus_input(next);
        }
        KeyCode::BackTab => {
            let prev = app.focus.prev();
            app.focus_input(prev);
        }
        KeyCode::Enter if app.focus == Focus::Name => {
            app.focus_input(Focus::Link);
        }
        KeyCode::Enter => return KeyAction::Submit,
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
    KeyAction::Done
}

/// Keys while the card grid has focus
fn handle_grid(app: &mut App, store: &mut Store, code: KeyCode, modifiers: KeyModifiers) {
    // Clear status message on navigation keys
    if matches!(
        code,
        KeyCode::Char('h' | 'j' | 'k' | 'l') | KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right
    ) {
        app.status_message = None;
    }

    match code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        KeyCode::Char('h') | KeyCode::Left => app.move_left(),
        KeyCode::Char('l') | KeyCode::Right => app.move_right(store),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(store),

        KeyCode::Char('n') | KeyCode::Char(']') | KeyCode::PageDown => app.next_page(store),
        KeyCode::Char('p') | KeyCode::Char('[') | KeyCode::PageUp => app.prev_page(),

        KeyCode::Enter | KeyCode::Char('o') => app.open_current(store),

        KeyCode::Char('e') => {
            if let Some(bookmark) = app.current_bookmark(store).cloned() {
                app.begin_edit(&bookmark);
            }
        }

        KeyCode::Char('d') => {
            if let Some(bookmark) = app.current_bookmark(store) {
                let id = bookmark.id;
                app.request_delete(id);
            }
        }

        KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Tab => app.focus_input(Focus::Name),
        KeyCode::BackTab => app.focus_input(Focus::Link),

        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}
