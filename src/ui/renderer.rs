use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::core::message::Message;
use crate::core::models::display_name;
use crate::core::store::ConversationState;
use crate::ui::view::ChatView;

const USER_INDENT: &str = "    ";
const HINTS: &str = "Enter send • Tab/Shift+Tab model • PgUp/PgDn scroll • Ctrl+L clear • Esc quit";

pub fn ui(f: &mut Frame, state: &ConversationState, view: &ChatView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0], state);
    render_transcript(f, chunks[1], state, view);
    render_status(f, chunks[2], view);
    render_input(f, chunks[3], state, view);
}

fn render_header(f: &mut Frame, area: Rect, state: &ConversationState) {
    let model = display_name(&state.model);
    let mut spans = vec![
        Span::styled("AI Chat", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" • Model: "),
        Span::styled(model.to_string(), Style::default().fg(Color::Cyan)),
    ];
    if model != state.model {
        spans.push(Span::styled(
            format!(" ({})", state.model),
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_transcript(f: &mut Frame, area: Rect, state: &ConversationState, view: &ChatView) {
    let lines = build_transcript_lines(state, area.width as usize);

    let max_offset = lines.len().saturating_sub(area.height as usize);
    let offset = max_offset.saturating_sub(view.scroll_from_bottom as usize);
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);

    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
}

fn render_status(f: &mut Frame, area: Rect, view: &ChatView) {
    let line = match &view.status {
        Some(status) => Line::from(Span::styled(status.clone(), Style::default().fg(Color::Red))),
        None => Line::from(Span::styled(HINTS, Style::default().fg(Color::DarkGray))),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_input(f: &mut Frame, area: Rect, state: &ConversationState, view: &ChatView) {
    let (title, style) = if state.is_loading {
        ("Waiting for reply...", Style::default().fg(Color::DarkGray))
    } else {
        ("Type your message...", Style::default().fg(Color::Cyan))
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(style);
    let inner = block.inner(area);

    // Keep the end of long input (and the cursor) in view.
    let text_width = view.input.display_width();
    let visible = (inner.width as usize).saturating_sub(1);
    let h_scroll = u16::try_from(text_width.saturating_sub(visible)).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(view.input.as_str())
        .style(style)
        .block(block)
        .scroll((0, h_scroll));
    f.render_widget(paragraph, area);

    if !state.is_loading && inner.width > 0 && inner.height > 0 {
        let column = u16::try_from(text_width.min(visible)).unwrap_or(0);
        f.set_cursor_position(Position::new(inner.x + column, inner.y));
    }
}

/// Transcript rows for a terminal `width` columns wide, pre-wrapped so the
/// row count matches what is drawn.
pub fn build_transcript_lines(state: &ConversationState, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if state.messages.is_empty() && !state.is_loading {
        lines.push(Line::from(Span::styled(
            "Start a conversation by typing below.",
            Style::default().fg(Color::DarkGray),
        )));
        return lines;
    }

    for (index, message) in state.messages.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        push_message_lines(&mut lines, message, width);
    }

    if state.is_loading {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            "Thinking...",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn push_message_lines(lines: &mut Vec<Line<'static>>, message: &Message, width: usize) {
    if message.is_user() {
        let style = Style::default().fg(Color::Cyan);
        lines.push(Line::from(Span::styled(
            format!("{USER_INDENT}You"),
            style.add_modifier(Modifier::BOLD),
        )));
        let body_width = width.saturating_sub(USER_INDENT.len());
        for row in wrap_text(&message.content, body_width) {
            lines.push(Line::from(Span::styled(format!("{USER_INDENT}{row}"), style)));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "Assistant",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        let body_width = width.saturating_sub(USER_INDENT.len());
        for row in wrap_text(&message.content, body_width) {
            lines.push(Line::from(row));
        }
    }
}

/// Greedy word wrap by display width. Words wider than a row are split at
/// grapheme boundaries; hard line breaks are kept.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let text = text.replace('\t', "    ");
    let mut rows = Vec::new();

    for raw_line in text.split('\n') {
        let raw_line = raw_line.trim_end_matches('\r');
        let mut row = String::new();
        let mut row_width = 0;

        for word in raw_line.split_word_bounds() {
            let word_width = word.width();
            if row_width > 0 && row_width + word_width > width {
                rows.push(row.trim_end().to_string());
                row.clear();
                row_width = 0;
                if word.trim().is_empty() {
                    continue;
                }
            }

            if word_width > width {
                for grapheme in word.graphemes(true) {
                    let grapheme_width = grapheme.width();
                    if row_width > 0 && row_width + grapheme_width > width {
                        rows.push(std::mem::take(&mut row));
                        row_width = 0;
                    }
                    row.push_str(grapheme);
                    row_width += grapheme_width;
                }
            } else {
                row.push_str(word);
                row_width += word_width;
            }
        }

        rows.push(row.trim_end().to_string());
    }

    rows
}
