pub mod font;

use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::Screen,
    setup::{Field, SetupForm},
    timer::{Phase, RunState, TimerView},
};

const BLUE: Color = Color::Indexed(33);
const YELLOW: Color = Color::Indexed(220);
const SUBTLE: Color = Color::Indexed(241);

const FIELD_WIDTH: u16 = 40;
// title + gap, label + boxed input per field, gap + help
const SETUP_HEIGHT: u16 = 2 + 4 * Field::ALL.len() as u16 + 2;

const SETUP_HELP: &str = "[TAB] Switch  •  [ENTER] Start  •  [q] Quit";
const TIMER_HELP: &str = "[SPACE] Pause  •  [s] Skip  •  [↑/↓] +/- 1m  •  [q] Quit";

impl Widget for &Screen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self {
            Screen::Setup(form) => render_setup(form, area, buf),
            Screen::Running(session) => render_timer(&session.view(), area, buf),
        }
    }
}

/// `MM:SS`, rounding partial seconds up so a running phase never shows 00:00
pub fn format_clock(remaining: Duration) -> String {
    let mut secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs += 1;
    }
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_setup(form: &SetupForm, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let subtle_style = Style::default().fg(SUBTLE);

    let form_area = centered_rect(area, FIELD_WIDTH, SETUP_HEIGHT);

    let mut constraints = vec![Constraint::Length(2)];
    for _ in Field::ALL {
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(2));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(form_area);

    Paragraph::new(Span::styled("POMODORO SETUP", bold_style.fg(BLUE)))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    for (i, field) in Field::ALL.iter().enumerate() {
        let focused = form.focused() == *field;
        let accent = if focused { BLUE } else { SUBTLE };

        Paragraph::new(Span::styled(field.label(), subtle_style)).render(chunks[1 + i * 2], buf);

        let value = form.value(*field);
        let mut spans = vec![Span::styled("> ", Style::default().fg(accent))];
        if value.is_empty() {
            spans.push(Span::styled(
                field.placeholder(),
                subtle_style.add_modifier(Modifier::DIM),
            ));
        } else {
            spans.push(Span::raw(value));
        }
        if focused {
            spans.push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
        }

        Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(accent)),
            )
            .render(chunks[2 + i * 2], buf);
    }

    Paragraph::new(vec![Line::default(), Line::styled(SETUP_HELP, subtle_style)])
        .alignment(Alignment::Center)
        .render(chunks[chunks.len() - 1], buf);
}

fn render_timer(view: &TimerView, area: Rect, buf: &mut Buffer) {
    let (accent, title) = match view.phase {
        Phase::Work => (
            BLUE,
            format!("WORK SESSION {}/{}", view.session_index, view.session_total),
        ),
        Phase::Break => (YELLOW, "BREAK TIME".to_string()),
    };
    let accent_style = Style::default().fg(accent);
    let subtle_style = Style::default().fg(SUBTLE);

    let clock = format_clock(view.remaining);
    let big = font::render_big(&clock);
    let big_width = big.first().map(|row| row.width()).unwrap_or(0);

    let mut lines = vec![
        Line::styled(title, accent_style.add_modifier(Modifier::BOLD)),
        Line::default(),
    ];
    if big_width <= area.width as usize {
        lines.extend(big.into_iter().map(|row| Line::styled(row, accent_style)));
    } else {
        // too narrow for the block font
        lines.push(Line::styled(clock, accent_style.add_modifier(Modifier::BOLD)));
    }

    let status = match view.run_state {
        RunState::Running => "RUNNING",
        RunState::Paused => "PAUSED",
    };
    lines.extend([
        Line::default(),
        Line::styled(status, subtle_style),
        Line::default(),
        Line::default(),
        Line::styled(TIMER_HELP, subtle_style),
    ]);

    let height = lines.len() as u16;
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(centered_rect(area, area.width, height), buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionPlan;
    use crate::timer::TimerSession;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(screen: &Screen, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(screen, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    fn running(work_secs: u64, total: u32) -> TimerSession {
        let plan = SessionPlan::new(
            Duration::from_secs(work_secs),
            Duration::from_secs(300),
            total,
        );
        TimerSession::start(plan).0
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(Duration::from_secs(1500)), "25:00");
        assert_eq!(format_clock(Duration::from_secs(61)), "01:01");
        assert_eq!(format_clock(Duration::ZERO), "00:00");
        assert_eq!(format_clock(Duration::from_millis(500)), "00:01");
        assert_eq!(format_clock(Duration::from_secs(120 * 60)), "120:00");
    }

    #[test]
    fn setup_screen_shows_fields() {
        let content = draw(&Screen::Setup(SetupForm::new()), 80, 24);
        assert!(content.contains("POMODORO SETUP"));
        assert!(content.contains("Work Duration:"));
        assert!(content.contains("Work (e.g. 25, 30s)"));
        assert!(content.contains("Sessions (e.g. 4)"));
        assert!(content.contains("[ENTER] Start"));
    }

    #[test]
    fn setup_screen_shows_typed_value() {
        let mut form = SetupForm::new();
        "45m".chars().for_each(|c| form.push_char(c));
        let content = draw(&Screen::Setup(form), 80, 24);
        assert!(content.contains("> 45m"));
        assert!(!content.contains("Work (e.g. 25, 30s)"));
    }

    #[test]
    fn work_screen_uses_block_digits() {
        let content = draw(&Screen::Running(running(1500, 4)), 80, 24);
        assert!(content.contains("WORK SESSION 1/4"));
        assert!(content.contains("RUNNING"));
        assert!(content.contains("██████"));
        assert!(content.contains("[s] Skip"));
    }

    #[test]
    fn narrow_terminal_falls_back_to_plain_clock() {
        let content = draw(&Screen::Running(running(1500, 4)), 20, 24);
        assert!(content.contains("25:00"));
        assert!(!content.contains("██████"));
    }

    #[test]
    fn break_and_pause_are_shown() {
        let mut session = running(1500, 2);
        session.on_skip();
        session.on_toggle_pause();
        let content = draw(&Screen::Running(session), 80, 24);
        assert!(content.contains("BREAK TIME"));
        assert!(content.contains("PAUSED"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        draw(&Screen::Setup(SetupForm::new()), 5, 3);
        draw(&Screen::Running(running(1500, 2)), 3, 2);
    }
}
