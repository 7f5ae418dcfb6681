use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use super::quiz::format_time_left;
use crate::app::App;

const RULES: [&str; 3] = [
    "one point per correct answer",
    "questions come in a new order every run",
    "the quiz ends when the clock reaches 00:00",
];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let [_, card, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(13),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, card, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(60),
        Constraint::Fill(1),
    ])
    .areas(card);

    let mut lines = vec![
        Line::from(Span::styled("TIMED QUIZ", Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                app.total_questions().to_string(),
                Style::default().fg(Color::White).bold(),
            ),
            Span::styled(" questions in ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format_time_left(app.time_limit_secs()),
                Style::default().fg(Color::Yellow).bold(),
            ),
        ]),
        Line::from(""),
    ];
    lines.extend(
        RULES
            .iter()
            .map(|rule| Line::from(Span::styled(*rule, Style::default().fg(Color::Gray)))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("enter", Style::default().fg(Color::Green).bold()),
        Span::styled(" start  ·  ", Style::default().fg(Color::DarkGray)),
        Span::styled("q", Style::default().fg(Color::Red).bold()),
        Span::styled(" quit", Style::default().fg(Color::DarkGray)),
    ]));

    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::Cyan)
            .padding(Padding::vertical(1)),
    );
    frame.render_widget(widget, card);
}
