use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::scores::{HighScores, MAX_ENTRIES};

const BANNER: &str = r#"
 ███████╗████████╗ █████╗ ██████╗ ███████╗████████╗██████╗ ██╗██╗  ██╗███████╗
 ██╔════╝╚══██╔══╝██╔══██╗██╔══██╗██╔════╝╚══██╔══╝██╔══██╗██║██║ ██╔╝██╔════╝
 ███████╗   ██║   ███████║██████╔╝███████╗   ██║   ██████╔╝██║█████╔╝ █████╗
 ╚════██║   ██║   ██╔══██║██╔══██╗╚════██║   ██║   ██╔══██╗██║██╔═██╗ ██╔══╝
 ███████║   ██║   ██║  ██║██║  ██║███████║   ██║   ██║  ██║██║██║  ██╗███████╗
 ╚══════╝   ╚═╝   ╚═╝  ╚═╝╚═╝  ╚═╝╚══════╝   ╚═╝   ╚═╝  ╚═╝╚═╝╚═╝  ╚═╝╚══════╝"#;

const KEY_COLOR: Color = Color::Rgb(80, 200, 255);
const TEXT_COLOR: Color = Color::Rgb(140, 140, 140);
const GOLD: Color = Color::Rgb(255, 220, 80);
const DIM: Color = Color::Rgb(80, 80, 100);

fn control(key: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<16}", key), Style::default().fg(KEY_COLOR)),
        Span::styled(what, Style::default().fg(TEXT_COLOR)),
    ])
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(GOLD).add_modifier(Modifier::BOLD)))
}

pub fn render_title(frame: &mut Frame, area: Rect, best: u32) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),  // Banner
            Constraint::Length(2),  // Tagline
            Constraint::Min(10),    // Controls
            Constraint::Length(1),  // Footer
        ])
        .split(area);

    let banner_lines: Vec<Line> = BANNER
        .lines()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::Rgb(90, 170, 255)))))
        .collect();
    frame.render_widget(Paragraph::new(banner_lines).alignment(Alignment::Center), chunks[0]);

    let tagline = Paragraph::new(Line::from(vec![
        Span::styled("Hold the line against the swarm.  ", Style::default().fg(Color::Rgb(180, 180, 200))),
        Span::styled(format!("Best: {}", best), Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(tagline, chunks[1]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    let menu = Paragraph::new(vec![
        Line::from(""),
        heading("  \u{25b6} Menu"),
        control("Enter / Space", "Launch"),
        control("H", "High scores"),
        control("Esc", "Back to this screen"),
        control("q / Ctrl+C", "Quit"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" Menu ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(menu, cols[0]);

    let flight = Paragraph::new(vec![
        Line::from(""),
        heading("  \u{2708} Flight"),
        control("\u{2190} \u{2191} \u{2192} \u{2193} / WASD", "Steer"),
        control("Space", "Fire"),
        control("B", "Bomb"),
        control("L / X", "Chain lightning"),
        control("P", "Pause"),
        control("R", "Restart"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
            .title(" Controls ")
            .title_style(Style::default().fg(KEY_COLOR).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(flight, cols[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  \u{1f980} ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(concat!("v", env!("CARGO_PKG_VERSION")), Style::default().fg(DIM)),
        Span::styled("  \u{2502}  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("H", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
        Span::styled(" High Scores", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[3]);
}

pub fn render_high_scores(frame: &mut Frame, area: Rect, high_scores: &HighScores, highlight: Option<usize>) {
    let w = 40u16.min(area.width);
    let h = (MAX_ENTRIES as u16 + 6).min(area.height);
    let table_area = Rect::new(
        area.x + area.width.saturating_sub(w) / 2,
        area.y + area.height.saturating_sub(h) / 2,
        w,
        h,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 200, 80)))
        .title(" \u{1f3c6} High Scores ")
        .title_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(table_area);
    frame.render_widget(block, table_area);

    let medal_colors = [
        Color::Rgb(255, 215, 0),   // Gold
        Color::Rgb(192, 192, 192), // Silver
        Color::Rgb(205, 127, 50),  // Bronze
    ];

    let mut lines: Vec<Line> = vec![Line::from("")];
    if high_scores.entries().is_empty() {
        lines.push(Line::from(Span::styled("    No scores yet", Style::default().fg(Color::Rgb(60, 60, 80)))));
    }
    for (i, entry) in high_scores.entries().iter().enumerate() {
        let rank = i + 1;
        let score_color = medal_colors.get(i).copied().unwrap_or(Color::Rgb(200, 200, 220));
        let marker = if highlight == Some(rank) { "\u{25b6}" } else { " " };
        let name_style = if highlight == Some(rank) {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Rgb(200, 200, 220))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {} {:>2}. ", marker, rank), Style::default().fg(GOLD)),
            Span::styled(format!("{:<9}", entry.name), name_style),
            Span::styled(
                format!("{:>10}", entry.score),
                Style::default().fg(score_color).add_modifier(Modifier::BOLD),
            ),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", Style::default().fg(DIM)),
        Span::styled("Esc", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
        Span::styled(" to go back", Style::default().fg(DIM)),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}
