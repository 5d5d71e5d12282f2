//! The sidebar's Options menu.

use crate::core::theme::ThemeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ToggleTheme,
    Settings,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub icon: &'static str,
    pub action: MenuAction,
}

/// Entries in display order. The theme entry shows the icon of the theme it
/// switches to.
pub fn options_menu(theme: ThemeMode) -> Vec<MenuItem> {
    vec![
        MenuItem {
            label: "Toggle theme",
            icon: match theme {
                ThemeMode::Light => "☾",
                ThemeMode::Dark => "☀",
            },
            action: MenuAction::ToggleTheme,
        },
        MenuItem {
            label: "Settings",
            icon: "⚙",
            action: MenuAction::Settings,
        },
        MenuItem {
            label: "Help",
            icon: "?",
            action: MenuAction::Help,
        },
    ]
}

pub const HELP_TEXT: &str = "Enter send · Alt+Enter newline · Esc stop reply · Ctrl+D download project · \
Ctrl+T theme · Ctrl+O menu · PgUp/PgDn scroll · Ctrl+L pause log · Ctrl+C quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_lists_theme_settings_help() {
        let items = options_menu(ThemeMode::Light);
        let actions: Vec<MenuAction> = items.iter().map(|item| item.action).collect();
        assert_eq!(
            actions,
            vec![MenuAction::ToggleTheme, MenuAction::Settings, MenuAction::Help]
        );
    }

    #[test]
    fn theme_icon_tracks_current_theme() {
        assert_eq!(options_menu(ThemeMode::Light)[0].icon, "☾");
        assert_eq!(options_menu(ThemeMode::Dark)[0].icon, "☀");
    }
}
