use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::app::App;
use crate::core::message::{Message, Sender};
use crate::core::notifications::NoticeKind;
use crate::ui::theme::Theme;

const SIDEBAR_WIDTH: u16 = 30;
const MAX_INPUT_LINES: u16 = 6;
const USER_PREFIX: &str = "You: ";
const ASSISTANT_PREFIX: &str = "doki: ";
const HAMBURGER: &str = "☰";

pub fn ui(f: &mut Frame, app: &App) {
    let theme = app.current_theme();
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        area,
    );

    let sidebar_docked = app.layout.sidebar_visible() && !app.layout.is_narrow();
    let (main_area, sidebar_area) = if sidebar_docked {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)])
            .split(area);
        (columns[0], Some(columns[1]))
    } else {
        (area, None)
    };

    let input_lines = (app.ui.input_line_count() as u16).clamp(1, MAX_INPUT_LINES);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(input_lines + 2), // +2 for borders
        ])
        .split(main_area);

    render_title(f, app, &theme, rows[0]);
    render_transcript(f, app, &theme, rows[1]);
    render_status(f, app, &theme, rows[2]);
    render_input(f, app, &theme, rows[3]);

    if let Some(sidebar) = sidebar_area {
        render_sidebar(f, app, &theme, sidebar);
    } else if app.layout.menu_open() {
        // Narrow terminals show the sidebar as an overlay above the input.
        let overlay = Rect {
            height: main_area.height.saturating_sub(rows[3].height),
            ..main_area
        };
        f.render_widget(Clear, overlay);
        f.render_widget(
            Block::default().style(Style::default().bg(theme.background_color)),
            overlay,
        );
        render_sidebar(f, app, &theme, overlay);
    }
}

fn render_title(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut spans = Vec::new();
    if app.layout.is_narrow() {
        spans.push(Span::styled(format!("{HAMBURGER} "), theme.title_style));
    }
    spans.push(Span::styled(
        format!(
            "doki v{} • {} • Log: {}",
            env!("CARGO_PKG_VERSION"),
            app.base_url,
            app.logging.get_status_string()
        ),
        theme.title_style,
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_transcript(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut lines = build_transcript_lines(app.messages(), app.is_pending(), theme, area.width);
    let (start, end) = visible_window(lines.len(), area.height, app.ui.scroll_offset);
    lines.truncate(end);
    lines.drain(..start);

    f.render_widget(Paragraph::new(lines), area);
}

/// Range of transcript lines to show for a viewport of `height` rows,
/// `scroll_offset` lines up from the tail.
fn visible_window(total: usize, height: u16, scroll_offset: u16) -> (usize, usize) {
    let height = usize::from(height);
    let max_offset = total.saturating_sub(height);
    let end = total - usize::from(scroll_offset).min(max_offset);
    (end.saturating_sub(height), end)
}

/// Transcript lines already wrapped to `width`, one blank line between
/// messages.
pub fn build_transcript_lines(
    messages: &[Message],
    pending: bool,
    theme: &Theme,
    width: u16,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let last_index = messages.len().saturating_sub(1);

    for (index, message) in messages.iter().enumerate() {
        let (prefix, prefix_style, text_style) = match message.sender {
            Sender::User => (USER_PREFIX, theme.user_prefix_style, theme.user_text_style),
            Sender::Ai => (
                ASSISTANT_PREFIX,
                theme.assistant_prefix_style,
                theme.assistant_text_style,
            ),
        };

        let (text, text_style) = if message.is_placeholder() {
            let waiting = pending && index == last_index;
            let text = if waiting { "…" } else { "(no reply)" };
            (text.to_string(), theme.placeholder_style)
        } else {
            (message.text.clone(), text_style)
        };

        let body_width = (width as usize).saturating_sub(prefix.width()).max(1);
        let indent = " ".repeat(prefix.width());
        let mut first = true;
        for source_line in text.split('\n') {
            for segment in wrap_text(source_line, body_width) {
                let lead = if first {
                    Span::styled(prefix.to_string(), prefix_style)
                } else {
                    Span::raw(indent.clone())
                };
                first = false;
                lines.push(Line::from(vec![lead, Span::styled(segment, text_style)]));
            }
        }
        lines.push(Line::default());
    }
    lines
}

/// Greedy word wrap by display width. Words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split(' ') {
        let word_width = word.width();
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };

        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width = needed;
            continue;
        }

        if !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }
    rows.push(current);
    rows
}

fn activity_symbol(app: &App) -> &'static str {
    // Two pulses per second.
    let elapsed = app.ui.pulse_start.elapsed().as_millis() as f32 / 1000.0;
    let phase = (elapsed * 2.0) % 2.0;
    let intensity = if phase < 1.0 { phase } else { 2.0 - phase };
    if intensity < 0.33 {
        "○"
    } else if intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}

fn render_status(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let line = if app.is_pending() {
        Line::from(vec![
            Span::styled(
                format!("{} ", activity_symbol(app)),
                theme.activity_indicator_style,
            ),
            Span::styled("doki is working… (Esc to stop)", theme.info_notice_style),
        ])
    } else if let Some(notice) = app.ui.latest_notice() {
        let style = match notice.kind {
            NoticeKind::Info => theme.info_notice_style,
            NoticeKind::Error => theme.error_notice_style,
        };
        Line::from(Span::styled(notice.text.clone(), style))
    } else {
        Line::from(Span::styled(
            "Ctrl+O menu • Ctrl+C quit",
            theme.info_notice_style,
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_input(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style)
        .title(Span::styled(
            "Message (Enter to send, Alt+Enter for new line)",
            theme.title_style,
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(app.ui.textarea(), inner);
}

fn render_sidebar(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut lines = Vec::new();
    for (index, item) in app.menu_items().iter().enumerate() {
        let selected = app.layout.menu_open() && index == app.ui.menu_selection;
        let style = if selected {
            theme.menu_selected_style
        } else {
            theme.menu_item_style
        };
        lines.push(Line::from(Span::styled(
            format!(" {} {} ", item.icon, item.label),
            style,
        )));
    }

    if let Some(details) = app.download_details() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Your project is ready!",
            theme.download_panel_style,
        )));
        lines.push(Line::from(Span::styled(
            details.file_name(),
            theme.assistant_text_style,
        )));
        lines.push(Line::from(Span::styled(
            "Ctrl+D to download",
            theme.info_notice_style,
        )));
    }

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(theme.border_style)
        .title(Span::styled("Options", theme.title_style));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
