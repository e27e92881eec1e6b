use rand::Rng;

use crate::game::geometry::{Rect, Vec2};
use crate::game::image::{Image, Rgba};

/// Scroll speed and brightness of each parallax layer, far to near.
const LAYERS: [(f32, u8); 3] = [(0.3, 70), (0.7, 130), (1.4, 210)];
const STARS_PER_LAYER: usize = 24;

#[derive(Clone, Debug)]
struct Star {
    pos: Vec2,
    layer: usize,
}

#[derive(Clone, Debug)]
pub struct Starfield {
    stars: Vec<Star>,
    field: Rect,
}

impl Starfield {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, field: Rect) -> Self {
        let stars = (0..LAYERS.len())
            .flat_map(|layer| (0..STARS_PER_LAYER).map(move |_| layer))
            .map(|layer| Star {
                pos: Vec2::new(
                    rng.gen_range(field.x..field.right()),
                    rng.gen_range(field.y..field.bottom()),
                ),
                layer,
            })
            .collect();
        Self { stars, field }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for star in &mut self.stars {
            star.pos.y += LAYERS[star.layer].0;
            if star.pos.y >= self.field.bottom() {
                star.pos.y -= self.field.h;
                star.pos.x = rng.gen_range(self.field.x..self.field.right());
            }
        }
    }

    pub fn draw(&self, fb: &mut Image) {
        for star in &self.stars {
            let v = LAYERS[star.layer].1;
            fb.blend(
                star.pos.x.floor() as i32,
                star.pos.y.floor() as i32,
                Rgba::new(v, v, v.saturating_add(30), v),
            );
        }
    }
}
