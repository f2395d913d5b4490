use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;

use crate::app::{App, InputMode};
use crate::tui::AppEvent;
use crate::view::ViewState;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent, tx: &UnboundedSender<AppEvent>) {
    match event {
        AppEvent::Key(key) => handle_key(app, key, tx),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::ChatReply { pending, result } => app.on_chat_reply(pending, result),
    }
}

fn handle_key(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Any key dismisses the last notice
    app.status = None;

    if app.show_api_key_input {
        handle_api_key_input(app, key, tx);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_chat_editing(app, key, tx),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Screen switching
        KeyCode::Char('1') => app.set_view(ViewState::Home),
        KeyCode::Char('2') => app.set_view(ViewState::Shop),
        KeyCode::Char('3') => app.set_view(ViewState::About),

        // Overlays
        KeyCode::Char('c') => app.toggle_cart(),
        KeyCode::Char('t') => {
            if app.views.is_chat_open() {
                app.close_chat();
            } else {
                app.open_chat_input();
            }
        }
        KeyCode::Char('i') if app.views.is_chat_open() => app.open_chat_input(),

        KeyCode::Esc => {
            if app.views.is_cart_open() {
                app.views.close_cart();
            } else if app.views.is_chat_open() {
                app.close_chat();
            }
        }

        // The cart drawer takes list keys while it is open
        _ if app.views.is_cart_open() => handle_cart_keys(app, key),

        KeyCode::Char('j') | KeyCode::Down if app.views.view() == ViewState::Shop => app.shop_nav_down(),
        KeyCode::Char('k') | KeyCode::Up if app.views.view() == ViewState::Shop => app.shop_nav_up(),
        KeyCode::Enter | KeyCode::Char('a') if app.views.view() == ViewState::Shop => {
            app.add_selected_to_cart();
        }
        // "Shop Collections" / "Taste the Purity" calls to action
        KeyCode::Enter => app.set_view(ViewState::Shop),

        // Transcript scrolling when the chat panel is open
        KeyCode::Char('j') | KeyCode::Down if app.views.is_chat_open() => {
            app.chat_scroll = app.chat_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up if app.views.is_chat_open() => {
            app.chat_scroll = app.chat_scroll.saturating_sub(1);
        }

        _ => {}
    }
}

fn handle_cart_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.cart_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cart_nav_up(),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => app.adjust_selected_line(1),
        KeyCode::Char('-') | KeyCode::Left => app.adjust_selected_line(-1),
        KeyCode::Char('x') | KeyCode::Delete => app.remove_selected_line(),
        KeyCode::Enter => app.checkout(),
        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.submit_chat(tx);
        }
        KeyCode::Backspace => {
            if app.chat_cursor > 0 {
                app.chat_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.chat_input.chars().count();
            if app.chat_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.chat_cursor = app.chat_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.chat_input.chars().count();
            app.chat_cursor = (app.chat_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.chat_cursor = 0;
        }
        KeyCode::End => {
            app.chat_cursor = app.chat_input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
            app.chat_input.insert(byte_pos, c);
            app.chat_cursor += 1;
        }
        _ => {}
    }
}

fn handle_api_key_input(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    match key.code {
        KeyCode::Esc => app.cancel_api_key_input(),
        KeyCode::Enter => app.submit_api_key(tx),
        KeyCode::Backspace => {
            if app.api_key_input_cursor > 0 {
                app.api_key_input_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.api_key_input, app.api_key_input_cursor);
                app.api_key_input.remove(byte_pos);
            }
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.api_key_input, app.api_key_input_cursor);
            app.api_key_input.insert(byte_pos, c);
            app.api_key_input_cursor += 1;
        }
        KeyCode::Left => {
            app.api_key_input_cursor = app.api_key_input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.api_key_input.chars().count();
            app.api_key_input_cursor = (app.api_key_input_cursor + 1).min(char_count);
        }
        _ => {}
    }
}
