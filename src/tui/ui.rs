use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs},
    Frame,
};

use crate::app::{App, Tab};
use crate::models::QuizRecord;
use crate::tui::InputMode;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Active tab
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.tab {
        Tab::Generate => render_generate_tab(frame, app, chunks[1]),
        Tab::History => render_history_tab(frame, app, chunks[1]),
    }
    render_status(frame, app, chunks[2]);

    if app.details_open {
        render_details(frame, app);
    }

    // Render help popup if active
    if app.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" AI Wiki Quiz Generator ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let tabs = Tabs::new(vec![" Generate Quiz ", " History "])
        .block(block)
        .select(app.tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_generate_tab(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // URL input
            Constraint::Length(1), // Progress or error
            Constraint::Min(0),    // Quiz
        ])
        .split(area);

    let editing = app.mode() == InputMode::UrlInput;
    let border = if editing { Color::Yellow } else { Color::DarkGray };
    let input_block = Block::default()
        .title(" Wikipedia URL ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let input = if app.url_input.is_empty() && !editing {
        Paragraph::new("Enter Wikipedia article URL").style(Style::default().fg(Color::DarkGray))
    } else {
        let cursor = if editing { "_" } else { "" };
        Paragraph::new(format!("{}{cursor}", app.url_input)).style(Style::default().fg(Color::White))
    };
    frame.render_widget(input.block(input_block), chunks[0]);

    let message = if app.is_generating() {
        Line::from(Span::styled(
            format!(" {} Generating… processing the article", app.spinner()),
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(error) = &app.error {
        Line::from(Span::styled(format!(" {error}"), Style::default().fg(Color::Red)))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(message), chunks[1]);

    let Some(quiz) = &app.quiz else {
        return;
    };

    let block = Block::default()
        .title(" Quiz ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let width = block.inner(chunks[2]).width;

    let paragraph = Paragraph::new(quiz_lines(quiz, width))
        .block(block)
        .scroll((app.quiz_scroll, 0));
    frame.render_widget(paragraph, chunks[2]);
}

fn render_history_tab(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Error
            Constraint::Min(0),    // Table
        ])
        .split(area);

    if let Some(error) = &app.history_error {
        let line = Span::styled(format!(" {error}"), Style::default().fg(Color::Red));
        frame.render_widget(Paragraph::new(Line::from(line)), chunks[0]);
    }

    let block = Block::default()
        .title(" History ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    if app.history.is_empty() {
        let text = if app.is_loading_history() {
            format!("{} Loading history...", app.spinner())
        } else {
            "No quizzes yet.".to_string()
        };
        let paragraph = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, chunks[1]);
        return;
    }

    let header = Row::new(vec!["ID", "Title", "URL", "Generated"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .history
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(entry.id.to_string()),
                Cell::from(entry.title.clone()),
                Cell::from(entry.url.clone()).style(Style::default().fg(Color::Blue)),
                Cell::from(entry.date_generated.label()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(35),
        Constraint::Percentage(40),
        Constraint::Length(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(table, chunks[1], &mut state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let keys = match (app.mode(), app.tab) {
        (InputMode::UrlInput, _) => "Enter:generate  Esc:stop editing  Tab:history  Ctrl-C:quit",
        (InputMode::Details, _) => "j/k:scroll  o:open article  Esc:close",
        (_, Tab::Generate) => "i:edit URL  j/k:scroll  o:open article  Tab:history  ?:help  q:quit",
        (_, Tab::History) => "j/k:nav  Enter:details  o:open  r:reload  Tab:generate  ?:help  q:quit",
    };

    let text = format!("{keys}  | {}", app.service_url());
    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_details(frame: &mut Frame, app: &App) {
    let area = centered_rect(80, 80, frame.area());

    let block = Block::default()
        .title(" Quiz Details ")
        .title_bottom(" Esc:close ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let width = block.inner(area).width;

    let lines = match &app.details {
        Some(quiz) => quiz_lines(quiz, width),
        None => vec![Line::from("No quiz data.")],
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.details_scroll, 0));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// Lays out a quiz as pre-wrapped lines, highlighting the correct option.
pub fn quiz_lines(quiz: &QuizRecord, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(20));
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        quiz.title.clone(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));

    if !quiz.summary.is_empty() {
        push_wrapped(&mut lines, &quiz.summary, textwrap::Options::new(width), Style::default());
    }

    if !quiz.key_entities.is_empty() {
        let text = format!("Entities: {}", quiz.key_entities.join(", "));
        push_wrapped(&mut lines, &text, textwrap::Options::new(width), Style::default().fg(Color::Blue));
    }

    if !quiz.related_topics.is_empty() {
        let text = format!("Related: {}", quiz.related_topics.join(", "));
        push_wrapped(&mut lines, &text, textwrap::Options::new(width), Style::default().fg(Color::Green));
    }

    if quiz.questions.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "No questions returned.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (idx, question) in quiz.questions.iter().enumerate() {
        lines.push(Line::default());

        let heading = format!("Q{}. {}", idx + 1, question.question);
        push_wrapped(
            &mut lines,
            &heading,
            textwrap::Options::new(width).subsequent_indent("    "),
            Style::default().add_modifier(Modifier::BOLD),
        );

        for option in &question.options {
            let (marker, style) = if question.is_correct(option) {
                (
                    "  ✓ ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  • ", Style::default())
            };
            let options = textwrap::Options::new(width)
                .initial_indent(marker)
                .subsequent_indent("    ");
            push_wrapped(&mut lines, option, options, style);
        }

        lines.push(Line::from(vec![
            Span::styled("  Answer: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(question.correct_answer.clone()),
        ]));

        if !question.explanation.is_empty() {
            let options = textwrap::Options::new(width)
                .initial_indent("  ")
                .subsequent_indent("  ");
            push_wrapped(
                &mut lines,
                &question.explanation,
                options,
                Style::default().fg(Color::DarkGray),
            );
        }
    }

    lines
}

fn push_wrapped(
    lines: &mut Vec<Line<'static>>,
    text: &str,
    options: textwrap::Options<'_>,
    style: Style,
) {
    for wrapped in textwrap::wrap(text, options) {
        lines.push(Line::from(Span::styled(wrapped.into_owned(), style)));
    }
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        "",
        " Generate tab:",
        "   i / Enter  Edit the article URL",
        "   Enter      Generate (while editing)",
        "   Esc        Stop editing",
        "   j / k      Scroll the quiz",
        "   o          Open the article in browser",
        "",
        " History tab:",
        "   j / k      Move down / up",
        "   Enter      Show quiz details",
        "   o          Open the article in browser",
        "   r          Reload history",
        "",
        " General:",
        "   Tab / 1 / 2  Switch tabs",
        "   ?            Toggle this help",
        "   q            Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
