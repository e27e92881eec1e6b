pub mod title;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Screen};
use crate::game::Game;
use crate::scores::NAME_LEN;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    match app.screen {
        Screen::Title => title::render_title(frame, area, app.high_scores.best()),
        Screen::Playing => app.game.render(frame, area),
        Screen::HighScores => title::render_high_scores(frame, area, &app.high_scores, app.last_rank),
    }

    // Name entry overlay (renders on top of everything)
    if app.entering_name {
        render_name_entry(frame, area, &app.name_buffer, app.name_score);
    }
}

fn render_name_entry(frame: &mut Frame, area: Rect, name_buffer: &str, score: u32) {
    let overlay_w = 44u16.min(area.width.saturating_sub(4));
    let overlay_h = 11u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    // Clear background
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 220, 80)))
        .title(" \u{1f3c6} NEW HIGH SCORE! ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    // Typed characters followed by underscores for the free slots
    let typed_len = name_buffer.chars().count();
    let display_name = format!("{}{}", name_buffer, "_".repeat(NAME_LEN.saturating_sub(typed_len)));

    let lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            format!("  Score: {}", score),
            Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Enter your name:",
            Style::default().fg(Color::Rgb(180, 180, 200)),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("    [ ", Style::default().fg(Color::Rgb(100, 100, 130))),
            Span::styled(display_name, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            Span::styled(" ]", Style::default().fg(Color::Rgb(100, 100, 130))),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Enter", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
            Span::styled(" confirm  ", Style::default().fg(Color::Rgb(100, 100, 130))),
            Span::styled("Esc", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
            Span::styled(" skip", Style::default().fg(Color::Rgb(100, 100, 130))),
        ]),
    ];

    let p = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::assets::Sprites;
    use crate::game::{GameSettings, Shooter};
    use crate::scores::HighScores;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 32)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_each_screen_renders() {
        let dir = tempfile::tempdir().unwrap();
        let mut scores = HighScores::load_from(dir.path().join("ui.scores"));
        scores.submit("ZED", 4321);
        let game = Shooter::new(Sprites::load().unwrap(), GameSettings::default());
        let mut app = App::new(game, scores);

        assert!(screen_text(&mut app).contains("Best: 4321"));

        app.on_key(KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE));
        let text = screen_text(&mut app);
        assert!(text.contains("ZED"));
        assert!(text.contains("4321"));

        app.on_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(screen_text(&mut app).contains("Score: 0"));
    }

    #[test]
    fn test_name_entry_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let game = Shooter::new(Sprites::load().unwrap(), GameSettings::default());
        let mut app = App::new(game, HighScores::load_from(dir.path().join("ui.scores")));
        app.entering_name = true;
        app.name_score = 900;
        app.name_buffer = "KIT".to_string();
        let text = screen_text(&mut app);
        assert!(text.contains("NEW HIGH SCORE"));
        assert!(text.contains("KIT______"));
    }
}
