use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

/// Text shown in the status bar.
pub fn status_line(model: &Model) -> String {
    let filename = model.file_name();
    let dirty_indicator = if model.buffer.is_dirty() {
        " [modified]"
    } else {
        ""
    };
    let cursor = model.buffer.cursor();
    let expansion = if model.expander.is_enabled() {
        "on"
    } else {
        "off"
    };
    let watch_indicator = if model.watch_enabled {
        " [watching]"
    } else {
        ""
    };
    let last = model
        .expander
        .last_expansion()
        .map_or_else(String::new, |applied| {
            format!("  {} -> {}", applied.abbreviation, applied.expansion_text)
        });

    format!(
        " {filename}{dirty_indicator}  Ln {}, Col {}  expand:{expansion}{watch_indicator}{last}  ^S save  ^E toggle  ^Q quit",
        cursor.line + 1,
        cursor.col + 1,
    )
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let style = if model.expander.is_enabled() {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    } else {
        Style::default().bg(Color::Magenta).fg(Color::White)
    };
    frame.render_widget(Paragraph::new(status_line(model)).style(style), area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
