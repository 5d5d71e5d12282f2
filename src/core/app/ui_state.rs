use std::collections::VecDeque;
use std::time::Instant;

use tui_textarea::TextArea;

use crate::core::constants::NOTICE_HISTORY;
use crate::core::notifications::Notice;
use crate::ui::theme::Theme;

const INPUT_PLACEHOLDER: &str = "Describe the project you want doki to build…";

/// Presentation state that is not part of the chat itself: the input box,
/// recent notices, scroll position and menu cursor.
pub struct UiState {
    textarea: TextArea<'static>,
    notices: VecDeque<Notice>,
    /// Lines scrolled up from the newest message; 0 follows the tail.
    pub scroll_offset: u16,
    pub menu_selection: usize,
    pub pulse_start: Instant,
    pub exit_requested: bool,
}

impl UiState {
    pub fn new(theme: &Theme) -> Self {
        let mut ui = Self {
            textarea: TextArea::default(),
            notices: VecDeque::with_capacity(NOTICE_HISTORY),
            scroll_offset: 0,
            menu_selection: 0,
            pulse_start: Instant::now(),
            exit_requested: false,
        };
        ui.configure_textarea(theme);
        ui
    }

    pub fn configure_textarea(&mut self, theme: &Theme) {
        let textarea_style = theme
            .input_text_style
            .patch(ratatui::style::Style::default().bg(theme.background_color));
        self.textarea.set_style(textarea_style);
        self.textarea.set_cursor_style(theme.input_cursor_style);
        self.textarea
            .set_cursor_line_style(theme.input_cursor_line_style);
        self.textarea.set_placeholder_text(INPUT_PLACEHOLDER);
        self.textarea
            .set_placeholder_style(theme.input_placeholder_style);
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn input_line_count(&self) -> usize {
        self.textarea.lines().len()
    }

    pub fn set_input_text(&mut self, text: &str) {
        self.apply_textarea_edit(|ta| {
            ta.select_all();
            ta.cut();
            ta.insert_str(text);
        });
    }

    pub fn clear_input(&mut self) {
        self.set_input_text("");
    }

    pub fn apply_textarea_edit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TextArea<'static>),
    {
        f(&mut self.textarea);
    }

    pub fn push_notice(&mut self, notice: Notice) {
        if self.notices.len() == NOTICE_HISTORY {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.back()
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn begin_activity(&mut self) {
        self.pulse_start = Instant::now();
    }
}
