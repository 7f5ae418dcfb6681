use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::models::AnsweredRecord;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(result) = app.result() else {
        return;
    };
    let percentage = score_percentage(result.score, result.total);
    let (verdict, color) = grade(percentage);

    let [summary_area, breakdown_area, controls_area] = Layout::vertical([
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .areas(area);

    let high_score_line = if result.new_high_score {
        Span::styled("new high score!", Style::default().fg(Color::Magenta).bold())
    } else {
        Span::styled(
            format!("high score {}", result.high_score),
            Style::default().fg(Color::DarkGray),
        )
    };

    let summary = vec![
        Line::from(Span::styled("RESULTS", Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{} / {}", result.score, result.total),
                Style::default().fg(color).bold(),
            ),
            Span::styled(format!("  {percentage:.0}%  "), Style::default().fg(Color::Gray)),
            Span::styled(verdict, Style::default().fg(color)),
        ]),
        Line::from(high_score_line),
    ];
    let widget = Paragraph::new(summary).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray)
            .padding(Padding::top(1)),
    );
    frame.render_widget(widget, summary_area);

    render_question_breakdown(frame, breakdown_area, app.records(), app.result_scroll());
    render_controls(frame, controls_area);
}

fn score_percentage(score: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(score) / f64::from(total) * 100.0
}

fn grade(percentage: f64) -> (&'static str, Color) {
    match percentage.round() as u32 {
        100.. => ("perfect", Color::Green),
        80..=99 => ("great", Color::Green),
        60..=79 => ("good", Color::Cyan),
        40..=59 => ("fair", Color::Yellow),
        _ => ("keep practicing", Color::Red),
    }
}

fn render_question_breakdown(
    frame: &mut Frame,
    area: Rect,
    records: &[AnsweredRecord],
    scroll: usize,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(records.len() * 2);

    for (index, record) in records.iter().enumerate() {
        let (symbol, color) = if record.is_correct {
            ("+", Color::Green)
        } else {
            ("-", Color::Red)
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
            Span::styled(
                format!("{:2}. ", index + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(truncate_question(&record.question), Style::default().fg(Color::Gray)),
        ]));

        let mut detail = vec![
            Span::raw("       "),
            Span::styled(format!("you: {}", record.user_answer), Style::default().fg(color)),
        ];
        if !record.is_correct {
            detail.push(Span::styled(
                format!("   answer: {}", record.correct_answer),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(detail));
    }

    if records.is_empty() {
        lines.push(Line::from(Span::styled(
            " No questions answered before time ran out.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll(((scroll * 2) as u16, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    match text.char_indices().nth(QUESTION_PREVIEW_LENGTH) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled("j/k", Style::default().fg(Color::Gray)),
        Span::raw(" scroll  ·  "),
        Span::styled("r", Style::default().fg(Color::Green)),
        Span::raw(" play again  ·  "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" quit"),
    ]);
    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Center).fg(Color::DarkGray),
        area,
    );
}
