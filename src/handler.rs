use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick().await,
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl-C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.panel_open {
        handle_panel_key(app, key);
    } else {
        handle_launcher_key(app, key);
    }
}

fn handle_launcher_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('o') => app.panel_open = true,
        _ => {}
    }
}

fn handle_panel_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Closing the panel keeps the transcript; only quitting ends the session
        KeyCode::Esc => app.panel_open = false,

        // Transcript scrolling works even while a reply is pending
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::PageUp => app.scroll_page_up(),
        KeyCode::PageDown => app.scroll_page_down(),

        // Everything below edits or submits the input, which is inert while
        // a send is in flight
        _ if app.awaiting_reply() => {}

        KeyCode::Enter => app.submit_input(),
        KeyCode::Backspace => {
            if app.input_cursor > 0 {
                app.input_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.input_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.input_cursor = app.input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.input_cursor = (app.input_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.input_cursor = 0;
        }
        KeyCode::End => {
            app.input_cursor = app.input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
            app.input.insert(byte_pos, c);
            app.input_cursor += 1;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeClient;
    use std::sync::Arc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn char_to_byte_index_handles_multibyte() {
        let s = "prix mètre carré";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 6), 6);
        // 'è' is two bytes; char 7 starts one byte later than its char index
        assert_eq!(char_to_byte_index(s, 7), 8);
        assert_eq!(char_to_byte_index(s, 100), s.len());
    }

    #[tokio::test]
    async fn typing_inserts_at_the_cursor() {
        let mut app = App::new(Arc::new(FakeClient::connected("ok")));
        app.panel_open = true;

        for c in "hose".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        handle_key(&mut app, press(KeyCode::Left));
        handle_key(&mut app, press(KeyCode::Left));
        handle_key(&mut app, press(KeyCode::Char('u')));

        assert_eq!(app.input, "house");
        assert_eq!(app.input_cursor, 3);
    }

    #[tokio::test]
    async fn escape_closes_the_panel_and_keeps_the_input() {
        let mut app = App::new(Arc::new(FakeClient::connected("ok")));
        app.panel_open = true;
        app.input = "draft".to_string();

        handle_key(&mut app, press(KeyCode::Esc));

        assert!(!app.panel_open);
        assert_eq!(app.input, "draft");
    }

    #[tokio::test]
    async fn launcher_enter_opens_the_panel() {
        let mut app = App::new(Arc::new(FakeClient::connected("ok")));
        assert!(!app.panel_open);
        handle_key(&mut app, press(KeyCode::Enter));
        assert!(app.panel_open);
    }

    #[tokio::test]
    async fn ctrl_c_quits_from_any_state() {
        let mut app = App::new(Arc::new(FakeClient::connected("ok")));
        app.panel_open = true;
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}
