use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::conversation::Connectivity;
use crate::message::Sender;

pub fn render(app: &mut App, frame: &mut Frame) {
    if app.panel_open {
        render_panel(app, frame);
    } else {
        render_launcher(frame);
    }
}

/// Closed state: the floating toggle, reduced to a centered launcher hint.
fn render_launcher(frame: &mut Frame) {
    let area = frame.area();
    let [_, middle, _] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .areas(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "EstateForge Assistant",
        Style::default().fg(Color::Magenta).bold(),
    )))
    .alignment(Alignment::Center);

    let hint = Paragraph::new("press Enter to chat, q to quit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));

    let [title_area, hint_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(middle);
    frame.render_widget(title, title_area);
    frame.render_widget(hint, hint_area);
}

fn render_panel(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let banner_height = if app.conversation.connectivity() == Connectivity::Disconnected {
        1
    } else {
        0
    };

    let [header_area, banner_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(banner_height),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    if banner_height > 0 {
        render_banner(frame, banner_area);
    }
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            " EstateForge Assistant ",
            Style::default().fg(Color::White).bold(),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Magenta));
    frame.render_widget(header, area);
}

fn render_banner(frame: &mut Frame, area: Rect) {
    let banner = Paragraph::new(" API connection issue. Responses may be limited.")
        .style(Style::default().bg(Color::Red).fg(Color::White));
    frame.render_widget(banner, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Chat ");

    let mut lines: Vec<Line> = Vec::new();

    for msg in app.conversation.messages() {
        let (label, label_style) = match msg.sender {
            Sender::User => (
                "You:",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Sender::Assistant => (
                "Assistant:",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        };

        lines.push(Line::from(Span::styled(label, label_style)));
        for line in msg.text.lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::from(Span::styled(
            msg.clock_time(),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::default());
    }

    if app.awaiting_reply() {
        lines.push(Line::from(Span::styled(
            "Assistant:",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let border_color = if app.awaiting_reply() {
        Color::DarkGray
    } else {
        Color::Cyan
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.input_cursor;

    // Keep the cursor inside the visible slice when the input overflows
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let input = if app.input.is_empty() && !app.awaiting_reply() {
        Paragraph::new("Type your message...")
            .style(Style::default().fg(Color::DarkGray))
            .block(input_block)
    } else {
        let visible_text: String = app
            .input
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();

        Paragraph::new(visible_text)
            .style(Style::default().fg(Color::Cyan))
            .block(input_block)
    };

    frame.render_widget(input, area);

    // Hide the cursor while the input is inert
    if !app.awaiting_reply() {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = if app.awaiting_reply() {
        vec![
            Span::styled(" Up/Down ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" close ", label_style),
            Span::styled("  waiting for reply... ", Style::default().fg(Color::DarkGray)),
        ]
    } else {
        vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Up/Down ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" close ", label_style),
            Span::styled(" Ctrl-C ", key_style),
            Span::styled(" quit ", label_style),
        ]
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}
