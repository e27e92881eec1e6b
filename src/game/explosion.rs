use std::f32::consts::TAU;

use rand::Rng;

use crate::game::bullet::Body;
use crate::game::geometry::Vec2;
use crate::game::image::{Image, Rgba};

const DRAG: f32 = 0.92;
const HOT: Rgba = Rgba::opaque(255, 250, 210);
const WARM: Rgba = Rgba::opaque(255, 150, 40);
const COOL: Rgba = Rgba::opaque(170, 30, 20);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blast {
    Small,
    Large,
}

impl Blast {
    fn particles(&self) -> usize {
        match self {
            Blast::Small => 14,
            Blast::Large => 40,
        }
    }

    fn speed_scale(&self) -> f32 {
        match self {
            Blast::Small => 1.0,
            Blast::Large => 1.6,
        }
    }
}

#[derive(Clone, Debug)]
struct Particle {
    body: Body,
    life: u32,
    max_life: u32,
}

impl Particle {
    fn color(&self) -> Rgba {
        let t = 1.0 - self.life as f32 / self.max_life as f32;
        let c = if t < 0.5 {
            HOT.lerp(WARM, t * 2.0)
        } else {
            WARM.lerp(COOL, (t - 0.5) * 2.0)
        };
        c.with_alpha((255.0 * (1.0 - t * 0.7)) as u8)
    }
}

#[derive(Clone, Debug)]
pub struct Explosion {
    particles: Vec<Particle>,
}

impl Explosion {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, center: Vec2, blast: Blast) -> Self {
        let particles = (0..blast.particles())
            .map(|_| {
                let dir = Vec2::from_angle(rng.gen_range(0.0..TAU));
                let speed = rng.gen_range(0.4f32..2.2) * blast.speed_scale();
                let life = rng.gen_range(20..=40);
                Particle {
                    body: Body::new(center, dir * speed),
                    life,
                    max_life: life,
                }
            })
            .collect();
        Self { particles }
    }

    /// Debris carries on with the wreck's momentum.
    pub fn drifting(mut self, velocity: Vec2) -> Self {
        for p in &mut self.particles {
            p.body.vel += velocity;
        }
        self
    }

    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.body.integrate();
            p.body.vel = p.body.vel * DRAG;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn is_finished(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn draw(&self, fb: &mut Image) {
        for p in &self.particles {
            let x = p.body.pos.x.floor() as i32;
            let y = p.body.pos.y.floor() as i32;
            let c = p.color();
            fb.blend(x, y, c);
            if p.life * 2 > p.max_life {
                fb.blend(x + 1, y, c.with_alpha(c.a / 2));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_particle_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(Explosion::new(&mut rng, Vec2::ZERO, Blast::Small).particles.len(), 14);
        assert_eq!(Explosion::new(&mut rng, Vec2::ZERO, Blast::Large).particles.len(), 40);
    }

    #[test]
    fn test_burns_out() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut ex = Explosion::new(&mut rng, Vec2::new(50.0, 50.0), Blast::Large);
        for _ in 0..39 {
            ex.update();
        }
        assert!(ex.particles.iter().all(|p| p.life <= 1));
        ex.update();
        assert!(ex.is_finished());
    }

    #[test]
    fn test_particles_spread_and_slow() {
        let mut rng = StdRng::seed_from_u64(8);
        let center = Vec2::new(50.0, 50.0);
        let mut ex = Explosion::new(&mut rng, center, Blast::Small);
        let before: Vec<f32> = ex.particles.iter().map(|p| p.body.vel.length()).collect();
        ex.update();
        for (p, v0) in ex.particles.iter().zip(before) {
            assert!(p.body.pos.distance(center) > 0.0);
            assert!(p.body.vel.length() < v0);
        }
    }

    #[test]
    fn test_drift_shifts_whole_cloud() {
        let still = Explosion::new(&mut StdRng::seed_from_u64(4), Vec2::ZERO, Blast::Small);
        let moving = Explosion::new(&mut StdRng::seed_from_u64(4), Vec2::ZERO, Blast::Small)
            .drifting(Vec2::new(0.0, 1.5));
        for (a, b) in still.particles.iter().zip(&moving.particles) {
            assert_eq!(b.body.vel, a.body.vel + Vec2::new(0.0, 1.5));
        }
    }

    #[test]
    fn test_color_fades() {
        let young = Particle { body: Body::new(Vec2::ZERO, Vec2::ZERO), life: 30, max_life: 30 };
        let old = Particle { body: Body::new(Vec2::ZERO, Vec2::ZERO), life: 1, max_life: 30 };
        assert_eq!(young.color(), HOT);
        assert!(old.color().a < young.color().a);
        assert!(old.color().g < 60);
    }

    #[test]
    fn test_draw_marks_framebuffer() {
        let mut rng = StdRng::seed_from_u64(9);
        let ex = Explosion::new(&mut rng, Vec2::new(10.5, 10.5), Blast::Small);
        let mut fb = Image::new(20, 20);
        ex.draw(&mut fb);
        assert!(fb.alpha_at(10, 10) > 0);
    }
}
