use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::Question;

const OPTION_LABELS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
const LOW_TIME_SECS: u32 = 10;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(question) = app.current_question() else {
        return;
    };

    let border_color = match app.feedback() {
        Some(true) => Color::Green,
        Some(false) => Color::Red,
        None => Color::DarkGray,
    };
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(border_color);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(inner);

    render_status(frame, chunks[0], app, question);
    render_question_text(frame, chunks[1], &question.text);

    if question.is_free_text() {
        render_text_input(frame, chunks[2], app.text_input());
    } else {
        render_options(frame, chunks[2], app, question);
    }

    render_notice(frame, chunks[3], app);
    render_controls(frame, chunks[4], question);
}

/// `MM:SS`.
pub fn format_time_left(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn render_status(frame: &mut Frame, area: Rect, app: &App, question: &Question) {
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let time_color = if app.seconds_left() <= LOW_TIME_SECS {
        Color::Red
    } else {
        Color::Yellow
    };
    let timer = Line::from(vec![
        Span::styled(format_time_left(app.seconds_left()), Style::default().fg(time_color).bold()),
        Span::styled(format!("  {}", question.kind_label()), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(timer), halves[0]);

    let progress = format!(
        "{}/{}",
        app.current_question_number(),
        app.total_questions()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, halves[1]);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, app: &App, question: &Question) {
    let choices = question.choices();
    let (checked_box, empty_box) = if question.is_multi_select() {
        ("[x]", "[ ]")
    } else {
        ("(*)", "( )")
    };

    let mut lines: Vec<Line> = Vec::with_capacity(choices.len() * 2);
    for (index, option) in choices.iter().enumerate() {
        let under_cursor = index == app.cursor();
        let style = if under_cursor {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if under_cursor { ">" } else { " " };
        let mark = if app.is_marked(index) { checked_box } else { empty_box };
        let label = OPTION_LABELS.get(index).copied().unwrap_or(' ');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{} ", mark), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(*option, style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_text_input(frame: &mut Frame, area: Rect, input: &str) {
    let rows = Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).split(area);
    let content = if input.is_empty() {
        Span::styled("Enter a number", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(input, Style::default().fg(Color::Cyan).bold())
    };

    let widget = Paragraph::new(Line::from(content)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, rows[0]);
}

fn render_notice(frame: &mut Frame, area: Rect, app: &App) {
    let line = match (app.feedback(), app.notice()) {
        (Some(true), _) => Line::from("Correct!".fg(Color::Green).bold()),
        (Some(false), _) => Line::from("Incorrect".fg(Color::Red).bold()),
        (None, Some(notice)) => Line::from(notice.fg(Color::Yellow)),
        (None, None) => Line::default(),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_controls(frame: &mut Frame, area: Rect, question: &Question) {
    let text = if question.is_free_text() {
        "type your answer  ·  enter submit  ·  esc quit"
    } else if question.is_multi_select() {
        "j/k navigate  ·  space toggle  ·  enter submit  ·  q quit"
    } else {
        "j/k navigate  ·  space select  ·  enter submit  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
