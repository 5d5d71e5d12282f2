//! Translation of terminal events into app actions and input edits.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tui_textarea::Input as TAInput;

use crate::core::app::{App, AppAction};

/// Rows kept visible when paging through the transcript.
const PAGE_OVERLAP: u16 = 2;

pub fn handle_event(app: &mut App, event: Event, term_height: u16) -> Vec<AppAction> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            handle_key(app, &key, term_height).into_iter().collect()
        }
        Event::Paste(text) => {
            app.ui.apply_textarea_edit(|ta| {
                ta.insert_str(text.replace("\r\n", "\n").replace('\r', "\n"));
            });
            Vec::new()
        }
        Event::Resize(width, _) => vec![AppAction::Resize { width }],
        _ => Vec::new(),
    }
}

/// Returns the action a key maps to. Keys without one are handed to the
/// input box.
pub fn handle_key(app: &mut App, key: &KeyEvent, term_height: u16) -> Option<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let menu_open = app.layout.menu_open();
    let page = term_height.saturating_sub(PAGE_OVERLAP).max(1);

    match key.code {
        KeyCode::Char('c') if ctrl => Some(AppAction::Quit),
        KeyCode::Char('d') if ctrl => Some(AppAction::RequestDownload),
        KeyCode::Char('t') if ctrl => Some(AppAction::ToggleTheme),
        KeyCode::Char('o') if ctrl => Some(AppAction::ToggleMenu),
        KeyCode::Char('l') if ctrl => Some(AppAction::ToggleLogging),
        KeyCode::Esc if menu_open => Some(AppAction::ToggleMenu),
        KeyCode::Esc => Some(AppAction::CancelTurn),
        KeyCode::Up if menu_open => Some(AppAction::MenuMoveUp),
        KeyCode::Down if menu_open => Some(AppAction::MenuMoveDown),
        KeyCode::Enter if menu_open => Some(AppAction::MenuActivate),
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
        {
            app.ui.apply_textarea_edit(|ta| ta.insert_newline());
            None
        }
        KeyCode::Enter => Some(AppAction::SubmitInput),
        KeyCode::PageUp => Some(AppAction::ScrollUp { lines: page }),
        KeyCode::PageDown => Some(AppAction::ScrollDown { lines: page }),
        _ => {
            app.ui.apply_textarea_edit(|ta| {
                ta.input(TAInput::from(*key));
            });
            None
        }
    }
}
