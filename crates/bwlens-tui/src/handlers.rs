//! Keyboard event handling.

use crate::app::{App, AppState, InputMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle a key event. Returns true if the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::PathEntry => handle_path_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+C to quit
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.state = AppState::Quit;
        return true;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quit;
            return true;
        }
        KeyCode::Char('o') => app.start_path_entry(),
        KeyCode::Char('m') => app.toggle_mask(),
        KeyCode::Char('n') => app.sort_by_name(),
        KeyCode::Char('u') => app.sort_by_username(),
        KeyCode::Char('p') => app.sort_by_password(),
        KeyCode::Char('d') => app.sort_by_revision_date(),
        KeyCode::Char('r') => app.reverse(),
        KeyCode::Char('c') => app.highlight_reused_passwords(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Esc => app.error_message = None,
        _ => {}
    }
    false
}

fn handle_path_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.cancel_path_entry(),
        KeyCode::Enter => app.confirm_path_entry(),
        KeyCode::Char(c) => app.path_input.push(c),
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        _ => {}
    }
    false
}
