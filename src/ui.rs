pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use pitchr::{score::Tone, session::PitchState, util::format_clock};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

const TIPS: [(&str, &str); 3] = [
    ("Speak Clearly", "Find a quiet space and speak at a normal pace"),
    (
        "Include Key Details",
        "Mention your role, experience, skills, and goals",
    ),
    ("Stay Focused", "Keep it concise and relevant to your audience"),
];

pub fn draw(app: &App, f: &mut Frame) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // body
            Constraint::Length(1), // notice
            Constraint::Length(1), // legend
        ])
        .split(area);

    screen::current_screen(app.coach.session().state()).render(app, f, chunks[0]);

    if let Some(notice) = app.notices.current() {
        let line = Line::from(vec![
            Span::styled(
                format!("{}: ", notice.title),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                notice.description,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]);
        f.render_widget(Paragraph::new(line).alignment(Alignment::Center), chunks[1]);
    }

    let legend = match app.coach.session().state() {
        PitchState::Idle => "(space) record / (esc)ape",
        PitchState::Recording => "(s)top / (n)ew / (esc)ape",
        PitchState::Processing => "(r)etry / (n)ew / (esc)ape",
        PitchState::Results => "(n)ew pitch / (↑↓) scroll / (esc)ape",
    };
    f.render_widget(
        Paragraph::new(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        chunks[2],
    );
}

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Positive => Color::Green,
        Tone::Caution => Color::Yellow,
        Tone::Critical => Color::Red,
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Vertically centre `height` lines inside `area`.
fn centered(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let top = (area.height - height) / 2;
    Rect {
        x: area.x,
        y: area.y + top,
        width: area.width,
        height,
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Elevator Pitch Trainer",
            bold().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            "\"Sell yourself in 60 seconds.\"",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from("Press space and deliver your elevator pitch. Aim for 30-60 seconds."),
        Line::from(Span::styled(
            "Ensure your microphone is working and you're in a quiet space",
            dim(),
        )),
        Line::from(""),
    ];
    for (idx, (title, detail)) in TIPS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{}. {title}  ", idx + 1), bold()),
            Span::styled(*detail, dim()),
        ]));
    }

    let height = lines.len() as u16;
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        centered(area, height),
    );
}

fn render_recording(app: &App, f: &mut Frame, area: Rect) {
    let elapsed = app
        .coach
        .session()
        .recording_elapsed()
        .map(|d| d.as_secs())
        .unwrap_or_default();

    let lines = vec![
        Line::from(Span::styled(
            "● Recording...",
            bold().fg(Color::Red),
        )),
        Line::from(Span::styled(format_clock(elapsed), bold())),
        Line::from(""),
        Line::from(Span::styled(
            "Speak clearly and deliver your elevator pitch now",
            dim(),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered(area, 4),
    );
}

fn render_processing(app: &App, f: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled("Analyzing Your Pitch...", bold())),
        Line::from(Span::styled(
            "Transcribing your recording and scoring clarity, structure, and confidence",
            dim(),
        )),
    ];
    if let Some(err) = app.coach.last_error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            err.user_message(),
            bold().fg(Color::Red),
        )));
    }

    let height = lines.len() as u16;
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        centered(area, height),
    );
}

fn render_results(app: &App, f: &mut Frame, area: Rect) {
    let session = app.coach.session();
    let (Some(results), schema) = (session.results(), session.schema()) else {
        return;
    };

    let heading = |text: &str| Line::from(Span::styled(text.to_string(), bold().fg(Color::Cyan)));
    let mut lines: Vec<Line> = vec![];

    lines.push(heading("Your Transcript"));
    lines.push(Line::from(results.transcript.clone()));
    lines.push(Line::from(""));

    lines.push(heading("Scores"));
    let mut score_spans = vec![];
    for metric in &schema.headline {
        let Some(score) = results.scores.get(&metric.key) else {
            continue;
        };
        let status = score.status();
        let color = tone_color(status.tone());
        score_spans.push(Span::styled(format!("{} ", metric.label), bold()));
        score_spans.push(Span::styled(format!("{score} "), bold().fg(color)));
        score_spans.push(Span::styled(format!("[{status}]   "), Style::default().fg(color)));
    }
    lines.push(Line::from(score_spans));

    let catalog = &results.feedback;
    if !catalog.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Detailed Feedback"));
        for category in catalog.all_categories() {
            let Some(rollup) = catalog.category_status(category) else {
                continue;
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{category} "), bold()),
                Span::styled(
                    format!("({})", rollup.label()),
                    Style::default().fg(tone_color(rollup.tone())),
                ),
            ]));
            for item in catalog.items_by_category(category) {
                let color = tone_color(item.status().tone());
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!("{} {} ", item.subcategory(), item.score()), bold()),
                    Span::styled(
                        format!("{}  ", item.status().label()),
                        Style::default().fg(color),
                    ),
                    Span::styled(item.feedback().to_string(), dim()),
                ]));
            }
        }

        let improvements = catalog.improvements();
        if !improvements.is_empty() {
            lines.push(Line::from(""));
            lines.push(heading("Improvement Suggestions"));
            for tip in improvements {
                lines.push(Line::from(format!("  • {tip}")));
            }
        }
    }

    if !results.rewrites.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Enhanced Versions"));
        for (idx, rewrite) in results.rewrites.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("{}. {}", idx + 1, rewrite.title),
                bold(),
            )));
            lines.push(Line::from(rewrite.content.clone()));
        }
    }

    let title = format!(
        " Your Pitch Analysis ({}) ",
        format_clock(results.recorded_for.as_secs())
    );
    f.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false })
            .scroll((app.scroll, 0)),
        area,
    );
}
