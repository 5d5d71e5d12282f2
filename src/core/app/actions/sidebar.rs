use super::{App, AppAction, AppCommand};
use crate::core::menu::{MenuAction, HELP_TEXT};

pub(super) fn handle_sidebar_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::ToggleTheme => toggle_theme(app),
        AppAction::ToggleMenu => {
            app.layout.toggle_menu();
            if app.layout.menu_open() {
                app.ui.menu_selection = 0;
            }
        }
        AppAction::MenuMoveUp => {
            let count = app.menu_items().len();
            app.ui.menu_selection = (app.ui.menu_selection + count - 1) % count;
        }
        AppAction::MenuMoveDown => {
            let count = app.menu_items().len();
            app.ui.menu_selection = (app.ui.menu_selection + 1) % count;
        }
        AppAction::MenuActivate => activate_menu_item(app),
        AppAction::ToggleLogging => match app.logging.toggle_logging() {
            Ok(message) => app.notifier().info(message),
            Err(err) => app.notifier().error(err.to_string()),
        },
        _ => {}
    }
    None
}

fn activate_menu_item(app: &mut App) {
    let Some(item) = app.menu_items().get(app.ui.menu_selection).cloned() else {
        return;
    };
    app.layout.set_menu_open(false);

    match item.action {
        MenuAction::ToggleTheme => toggle_theme(app),
        MenuAction::Settings => {
            let summary = app.settings_summary();
            app.notifier().info(summary);
        }
        MenuAction::Help => app.notifier().info(HELP_TEXT),
    }
}

fn toggle_theme(app: &mut App) {
    let result = app.theme.toggle();
    let theme = app.current_theme();
    app.ui.configure_textarea(&theme);

    match result {
        Ok(mode) => app.notifier().info(format!("Switched to {mode} theme")),
        Err(err) => app.notifier().error(format!(
            "Switched to {} theme, but it could not be saved: {err}",
            app.theme_mode()
        )),
    }
}
