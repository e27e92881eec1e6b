use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::game::{Game, Shooter};
use crate::scores::{HighScores, NAME_LEN};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Title,
    Playing,
    HighScores,
}

pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub game: Shooter,
    pub high_scores: HighScores,
    /// Rank of the most recent submission, highlighted on the score table.
    pub last_rank: Option<usize>,
    // Name entry state
    pub entering_name: bool,
    pub name_buffer: String,
    pub name_score: u32,
    submitted: bool,
}

impl App {
    pub fn new(mut game: Shooter, high_scores: HighScores) -> Self {
        game.set_high_score(high_scores.best());
        Self {
            should_quit: false,
            screen: Screen::Title,
            game,
            high_scores,
            last_rank: None,
            entering_name: false,
            name_buffer: String::new(),
            name_score: 0,
            submitted: false,
        }
    }

    pub fn on_tick(&mut self) {
        // Don't update the game while entering a name
        if self.entering_name || self.screen != Screen::Playing {
            return;
        }
        self.game.update();
        self.check_submit_score();
    }

    fn check_submit_score(&mut self) {
        if !self.game.is_game_over() {
            self.submitted = false;
            return;
        }
        if self.submitted {
            return;
        }
        self.submitted = true;
        let score = self.game.get_score();
        if self.high_scores.qualifies(score) {
            self.entering_name = true;
            self.name_buffer.clear();
            self.name_score = score;
        }
    }

    fn start_game(&mut self) {
        if self.game.is_game_over() {
            self.game.reset();
        }
        self.screen = Screen::Playing;
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // If entering a name, intercept all input
        if self.entering_name {
            self.handle_name_input(key);
            return;
        }

        match self.screen {
            Screen::Title => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
                KeyCode::Enter | KeyCode::Char(' ') => self.start_game(),
                KeyCode::Char('h') | KeyCode::Char('H') => self.screen = Screen::HighScores,
                _ => {}
            },
            Screen::HighScores => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('h') | KeyCode::Char('H') => {
                    self.screen = Screen::Title
                }
                _ => {}
            },
            Screen::Playing => {
                if key.code == KeyCode::Esc {
                    self.screen = Screen::Title;
                    return;
                }
                // Restarting from the game-over screen happens inside the game
                self.game.handle_input(key);
            }
        }
    }

    fn handle_name_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.finish_name_entry(),
            KeyCode::Backspace => {
                self.name_buffer.pop();
            }
            // Skip keeps the run with a placeholder name
            KeyCode::Esc => {
                self.name_buffer.clear();
                self.finish_name_entry();
            }
            KeyCode::Char(c) => {
                if self.name_buffer.chars().count() < NAME_LEN && (c == ' ' || c.is_ascii_graphic()) {
                    self.name_buffer.push(c.to_ascii_uppercase());
                }
            }
            _ => {}
        }
    }

    fn finish_name_entry(&mut self) {
        let typed = self.name_buffer.trim();
        let name = if typed.is_empty() {
            "???".to_string()
        } else {
            typed.to_string()
        };
        self.last_rank = self.high_scores.submit(&name, self.name_score);
        info!(name = %name, score = self.name_score, rank = ?self.last_rank, "high score submitted");
        self.game.set_high_score(self.high_scores.best());
        self.entering_name = false;
        self.name_buffer.clear();
        self.screen = Screen::HighScores;
    }
}
