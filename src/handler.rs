use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};

/// Handle a key event, dispatching on the current mode.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Goto => handle_goto_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),

        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.expand_selected(),
        KeyCode::Left | KeyCode::Char('h') => app.collapse_selected(),
        KeyCode::Char('.') => app.toggle_hidden(),

        KeyCode::Char('r') => app.reload_selected(),
        KeyCode::Char('g') => app.open_goto(),
        KeyCode::Char('p') => app.toggle_preview(),

        KeyCode::Char('J') => app.preview_scroll_down(),
        KeyCode::Char('K') => app.preview_scroll_up(),

        _ => {}
    }
}

fn handle_goto_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_goto(),
        KeyCode::Enter => app.submit_goto(),
        KeyCode::Tab => app.goto_accept_suggestion(),

        // Right at the end of the input accepts the suggestion, like the
        // editor this mimics; elsewhere it just moves the cursor.
        KeyCode::Right if app.goto.cursor_at_end() => app.goto_accept_suggestion(),
        KeyCode::Right => app.goto.move_right(),
        KeyCode::Left => app.goto.move_left(),
        KeyCode::Home => app.goto.cursor_home(),
        KeyCode::End => app.goto.cursor_end(),

        KeyCode::Backspace => app.goto_backspace(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char(c) => app.goto_insert_char(c),

        _ => {}
    }
}
