use ratatui::style::{Color, Modifier, Style};

use crate::core::theme::ThemeMode;

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Transcript
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_prefix_style: Style,
    pub assistant_text_style: Style,
    pub placeholder_style: Style,

    // Chrome
    pub title_style: Style,
    pub border_style: Style,
    pub activity_indicator_style: Style,
    pub info_notice_style: Style,
    pub error_notice_style: Style,

    // Sidebar
    pub menu_item_style: Style,
    pub menu_selected_style: Style,
    pub download_panel_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_cursor_style: Style,
    pub input_cursor_line_style: Style,
    pub input_placeholder_style: Style,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            background_color: Color::Rgb(0x1e, 0x1f, 0x24),

            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_prefix_style: Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::White),
            placeholder_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            title_style: Style::default().fg(Color::Gray),
            border_style: Style::default().fg(Color::DarkGray),
            activity_indicator_style: Style::default().fg(Color::LightGreen),
            info_notice_style: Style::default().fg(Color::Gray),
            error_notice_style: Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),

            menu_item_style: Style::default().fg(Color::Gray),
            menu_selected_style: Style::default()
                .fg(Color::Black)
                .bg(Color::LightGreen),
            download_panel_style: Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),

            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            input_cursor_line_style: Style::default(),
            input_placeholder_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::Rgb(0xfa, 0xfa, 0xf7),

            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_prefix_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::Black),
            placeholder_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),

            title_style: Style::default().fg(Color::DarkGray),
            border_style: Style::default().fg(Color::Gray),
            activity_indicator_style: Style::default().fg(Color::Green),
            info_notice_style: Style::default().fg(Color::DarkGray),
            error_notice_style: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),

            menu_item_style: Style::default().fg(Color::DarkGray),
            menu_selected_style: Style::default().fg(Color::White).bg(Color::Green),
            download_panel_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),

            input_text_style: Style::default().fg(Color::Black),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            input_cursor_line_style: Style::default(),
            input_placeholder_style: Style::default().fg(Color::Gray),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_map_to_distinct_backgrounds() {
        let light = Theme::for_mode(ThemeMode::Light);
        let dark = Theme::for_mode(ThemeMode::Dark);
        assert_ne!(light.background_color, dark.background_color);
        assert_eq!(
            light.background_color,
            Theme::light().background_color
        );
    }
}
