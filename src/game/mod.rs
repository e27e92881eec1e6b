pub mod assets;
pub mod bomb;
pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod explosion;
pub mod geometry;
pub mod gun;
pub mod image;
pub mod lightning;
pub mod movement;
pub mod player;
pub mod powerup;
pub mod render;
pub mod shooter;
pub mod starfield;
pub mod wave;

use crossterm::event::KeyEvent;
use ratatui::prelude::*;

pub use shooter::{GameSettings, Shooter};

/// A playable screen driven by the app's tick and key events.
pub trait Game {
    fn update(&mut self);
    fn handle_input(&mut self, key: KeyEvent);
    fn render(&mut self, frame: &mut Frame, area: Rect);
    fn reset(&mut self);
    fn get_score(&self) -> u32;
    fn is_game_over(&self) -> bool;
}
