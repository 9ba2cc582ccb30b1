use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Difficulty, Screen, RESTART_OPTIONS};
use crate::metrics::{self, Metrics, PROGRESS_BAR_WIDTH};
use crate::session::Outcome;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

const BANNER: [&str; 6] = [
    r" _                          _           _     ",
    r"| |_ _   _ _ __   ___    __| | __ _ ___| |__  ",
    r"| __| | | | '_ \ / _ \  / _` |/ _` / __| '_ \ ",
    r"| |_| |_| | |_) |  __/ | (_| | (_| \__ \ | | |",
    r" \__|\__, | .__/ \___|  \__,_|\__,_|___/_| |_|",
    r"     |___/|_|                                 ",
];

fn selected_style() -> Style {
    Style::default().bg(Color::White).fg(Color::Black)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.screen {
            Screen::MainMenu { selected } => render_main_menu(self, *selected, area, buf),
            Screen::UsernameEntry { buffer } => render_username_entry(buffer, area, buf),
            Screen::Running => render_running(self, area, buf),
            Screen::Finished { selected } => render_finished(self, *selected, area, buf),
        }
    }
}

fn render_main_menu(app: &App, selected: usize, area: Rect, buf: &mut Buffer) {
    let dim_bold = Style::default()
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::DIM);

    let mut lines: Vec<Line> = BANNER
        .iter()
        .map(|row| Line::from(Span::styled(*row, dim_bold)))
        .collect();

    lines.push(Line::default());
    lines.push(Line::from("Select Difficulty:"));
    lines.push(Line::default());

    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        let label = format!("{}. {}", i + 1, difficulty.menu_label());
        let style = if i == selected {
            selected_style()
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(label, style)));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "--- Scoreboard (Top 10) ---",
        Style::default().add_modifier(Modifier::BOLD),
    )));

    if app.scores.is_empty() {
        lines.push(Line::from(Span::styled(
            "No scores yet. Play a test!",
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    } else {
        for (i, score) in app.scores.iter().enumerate() {
            lines.push(Line::from(format!(
                "{}. {} - Score: {:.2} (WPM: {:.2}, Accuracy: {:.2}%)",
                i + 1,
                score.username,
                score.calculated_score,
                score.wpm,
                score.accuracy,
            )));
        }
    }

    paragraph(lines).render(margins(area), buf);
}

fn render_username_entry(buffer: &str, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(vec![
            Span::raw("Enter your username (default: Guest): "),
            Span::styled(
                buffer.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "Enter to confirm, Esc to quit",
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        )),
    ];

    paragraph(lines).render(margins(area), buf);
}

fn render_running(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let correct_style = Style::default().patch(bold).fg(Color::Green);
    let incorrect_style = Style::default().patch(bold).fg(Color::Red);
    let untyped_style = Style::default().patch(bold).add_modifier(Modifier::DIM);
    let cursor_style = selected_style();

    let session = &app.session;
    let target = session.target();

    // Four mutually exclusive per-char states; the cursor wins at its index.
    let spans: Vec<Span> = target
        .iter()
        .enumerate()
        .map(|(idx, &expected)| {
            if idx == session.cursor() {
                Span::styled(expected.to_string(), cursor_style)
            } else {
                match session.outcome_at(idx) {
                    Some(Outcome::Correct) => Span::styled(expected.to_string(), correct_style),
                    Some(Outcome::Incorrect) => Span::styled(
                        match session.typed()[idx] {
                            ' ' => "·".to_owned(),
                            c => c.to_string(),
                        },
                        incorrect_style,
                    ),
                    None => Span::styled(expected.to_string(), untyped_style),
                }
            }
        })
        .collect();

    let inner = margins(area);
    let target_text: String = target.iter().collect();
    let max_chars_per_line = inner.width.max(1);
    let prompt_lines =
        ((target_text.width() as f64 / max_chars_per_line as f64).ceil() as u16).max(1);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(prompt_lines),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: false })
        .render(chunks[0], buf);

    let live = Metrics::of(session);
    let stats = format!(
        "WPM: {:.2} | Accuracy: {:.2}% | Errors: {}",
        live.wpm,
        live.accuracy,
        session.errors(),
    );
    Paragraph::new(Span::styled(stats, bold)).render(chunks[2], buf);

    Paragraph::new(progress_bar(live.progress)).render(chunks[3], buf);
}

fn render_finished(app: &App, selected: usize, area: Rect, buf: &mut Buffer) {
    let result = app.last_result;

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "Your Score: WPM: {:.2}, Accuracy: {:.2}%",
                result.wpm, result.accuracy,
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from("What would you like to do?"),
        Line::default(),
    ];

    for (i, option) in RESTART_OPTIONS.iter().enumerate() {
        let label = format!("{}. {}", i + 1, option);
        let style = if i == selected {
            selected_style()
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(label, style)));
    }

    paragraph(lines).render(margins(area), buf);
}

/// Fixed-width `[###---]` bar, filled cells floored from the progress
/// fraction.
fn progress_bar(progress: f64) -> String {
    let filled = metrics::filled_cells(progress, PROGRESS_BAR_WIDTH);
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
    )
}

fn paragraph(lines: Vec<Line<'static>>) -> Paragraph<'static> {
    Paragraph::new(lines)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
}

fn margins(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(1)])
        .split(area);
    chunks[0]
}
