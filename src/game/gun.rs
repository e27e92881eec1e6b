use std::f32::consts::{FRAC_PI_2, TAU};

use rand::Rng;

use crate::game::bullet::{Bullet, Owner};
use crate::game::geometry::Vec2;

/// Heading for shots that travel down-screen.
pub const DOWN: f32 = FRAC_PI_2;
/// Heading for shots that travel up-screen.
pub const UP: f32 = -FRAC_PI_2;

/// The bullet-spawning behaviour a gun triggers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shot {
    Straight { speed: f32 },
    /// Two bullets side by side, `spacing` apart.
    Twin { spacing: f32, speed: f32 },
    Aimed { speed: f32 },
    Spread { count: u32, arc: f32, speed: f32 },
    Ring { count: u32, speed: f32 },
}

impl Shot {
    /// Spawn one volley. `heading` orients straight, twin and spread shots,
    /// `phase` rotates rings so consecutive volleys interleave.
    pub fn fire(&self, origin: Vec2, target: Vec2, heading: f32, phase: f32, owner: Owner) -> Vec<Bullet> {
        let make = |pos: Vec2, vel: Vec2| match owner {
            Owner::Player => Bullet::player(pos, vel),
            Owner::Enemy => Bullet::enemy(pos, vel),
        };
        match *self {
            Shot::Straight { speed } => vec![make(origin, Vec2::from_angle(heading) * speed)],
            Shot::Twin { spacing, speed } => {
                let dir = Vec2::from_angle(heading);
                let side = dir.perp() * (spacing / 2.0);
                vec![make(origin + side, dir * speed), make(origin - side, dir * speed)]
            }
            Shot::Aimed { speed } => {
                let mut dir = (target - origin).normalized();
                if dir == Vec2::ZERO {
                    dir = Vec2::from_angle(heading);
                }
                vec![make(origin, dir * speed)]
            }
            Shot::Spread { count, arc, speed } => {
                if count == 0 {
                    return Vec::new();
                }
                if count == 1 {
                    return vec![make(origin, Vec2::from_angle(heading) * speed)];
                }
                let step = arc / (count - 1) as f32;
                (0..count)
                    .map(|i| {
                        let angle = heading - arc / 2.0 + step * i as f32;
                        make(origin, Vec2::from_angle(angle) * speed)
                    })
                    .collect()
            }
            Shot::Ring { count, speed } => {
                if count == 0 {
                    return Vec::new();
                }
                let step = TAU / count as f32;
                (0..count)
                    .map(|i| make(origin, Vec2::from_angle(phase + step * i as f32) * speed))
                    .collect()
            }
        }
    }

    pub fn scaled(self, factor: f32) -> Shot {
        match self {
            Shot::Straight { speed } => Shot::Straight { speed: speed * factor },
            Shot::Twin { spacing, speed } => Shot::Twin { spacing, speed: speed * factor },
            Shot::Aimed { speed } => Shot::Aimed { speed: speed * factor },
            Shot::Spread { count, arc, speed } => Shot::Spread { count, arc, speed: speed * factor },
            Shot::Ring { count, speed } => Shot::Ring { count, speed: speed * factor },
        }
    }
}

/// Gates a `Shot`: every `rate` ticks roll `probability`, and on success fire
/// `repeat` times, `repeat_gap` ticks apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GunPattern {
    pub rate: u32,
    pub repeat: u32,
    pub repeat_gap: u32,
    pub probability: f32,
    pub shot: Shot,
}

impl GunPattern {
    /// Harder waves fire faster bullets more often.
    pub fn scaled(self, difficulty: f32) -> GunPattern {
        GunPattern {
            probability: (self.probability * difficulty).clamp(0.0, 1.0),
            shot: self.shot.scaled(difficulty),
            ..self
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Gun {
    pub pattern: GunPattern,
    pub heading: f32,
    pub owner: Owner,
    cooldown: u32,
    shots_left: u32,
    gap_timer: u32,
    volleys: u32,
}

impl Gun {
    pub fn new(pattern: GunPattern, heading: f32, owner: Owner) -> Self {
        Self {
            pattern,
            heading,
            owner,
            cooldown: pattern.rate.max(1),
            shots_left: 0,
            gap_timer: 0,
            volleys: 0,
        }
    }

    pub fn enemy(pattern: GunPattern) -> Self {
        Self::new(pattern, DOWN, Owner::Enemy)
    }

    /// Advance one tick and return whatever the gun spawned.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, origin: Vec2, target: Vec2) -> Vec<Bullet> {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.cooldown == 0 {
            self.cooldown = self.pattern.rate.max(1);
            let p = self.pattern.probability.clamp(0.0, 1.0) as f64;
            if self.shots_left == 0 && rng.gen_bool(p) {
                self.shots_left = self.pattern.repeat.max(1);
                self.gap_timer = 1;
            }
        }

        if self.shots_left == 0 {
            return Vec::new();
        }
        self.gap_timer = self.gap_timer.saturating_sub(1);
        if self.gap_timer > 0 {
            return Vec::new();
        }
        self.shots_left -= 1;
        self.gap_timer = self.pattern.repeat_gap.max(1);
        let phase = self.volleys as f32 * 0.35;
        if self.shots_left == 0 {
            self.volleys = self.volleys.wrapping_add(1);
        }
        self.pattern
            .shot
            .fire(origin, target, self.heading, phase, self.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pattern(rate: u32, repeat: u32, gap: u32, probability: f32) -> GunPattern {
        GunPattern {
            rate,
            repeat,
            repeat_gap: gap,
            probability,
            shot: Shot::Straight { speed: 1.0 },
        }
    }

    fn fire_ticks(gun: &mut Gun, ticks: u32) -> Vec<u32> {
        let mut rng = StdRng::seed_from_u64(9);
        (1..=ticks)
            .filter(|_| !gun.tick(&mut rng, Vec2::ZERO, Vec2::new(0.0, 10.0)).is_empty())
            .collect()
    }

    #[test]
    fn test_rate_gates_volleys() {
        let mut gun = Gun::enemy(pattern(10, 1, 0, 1.0));
        assert_eq!(fire_ticks(&mut gun, 35), vec![10, 20, 30]);
    }

    #[test]
    fn test_repeat_spaces_shots() {
        let mut gun = Gun::enemy(pattern(20, 3, 4, 1.0));
        assert_eq!(fire_ticks(&mut gun, 30), vec![20, 24, 28]);
    }

    #[test]
    fn test_zero_probability_never_fires() {
        let mut gun = Gun::enemy(pattern(2, 3, 1, 0.0));
        assert!(fire_ticks(&mut gun, 200).is_empty());
    }

    #[test]
    fn test_zero_rate_treated_as_every_tick() {
        let mut gun = Gun::enemy(pattern(0, 1, 0, 1.0));
        assert_eq!(fire_ticks(&mut gun, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_probability_is_clamped() {
        let mut gun = Gun::enemy(pattern(5, 1, 0, 7.5));
        assert_eq!(fire_ticks(&mut gun, 10), vec![5, 10]);
    }

    #[test]
    fn test_spread_fans_around_heading() {
        let shot = Shot::Spread { count: 3, arc: 1.0, speed: 2.0 };
        let bullets = shot.fire(Vec2::ZERO, Vec2::ZERO, DOWN, 0.0, Owner::Enemy);
        assert_eq!(bullets.len(), 3);
        let mid = bullets[1].body.vel;
        assert!(mid.x.abs() < 1e-5 && (mid.y - 2.0).abs() < 1e-5);
        assert!(bullets[0].body.vel.x > 0.0 && bullets[2].body.vel.x < 0.0);
    }

    #[test]
    fn test_aimed_points_at_target() {
        let shot = Shot::Aimed { speed: 3.0 };
        let b = &shot.fire(Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0), DOWN, 0.0, Owner::Enemy)[0];
        assert!((b.body.vel.x - 1.8).abs() < 1e-5);
        assert!((b.body.vel.y - 2.4).abs() < 1e-5);
        // target on top of the gun falls back to the heading
        let b = &shot.fire(Vec2::ZERO, Vec2::ZERO, UP, 0.0, Owner::Player)[0];
        assert!(b.body.vel.y < 0.0);
        assert_eq!(b.owner, Owner::Player);
    }

    #[test]
    fn test_ring_is_evenly_spaced() {
        let shot = Shot::Ring { count: 4, speed: 1.0 };
        let bullets = shot.fire(Vec2::ZERO, Vec2::ZERO, DOWN, 0.0, Owner::Enemy);
        let sum = bullets.iter().fold(Vec2::ZERO, |acc, b| acc + b.body.vel);
        assert!(sum.length() < 1e-5);
        assert!(Shot::Ring { count: 0, speed: 1.0 }.fire(Vec2::ZERO, Vec2::ZERO, DOWN, 0.0, Owner::Enemy).is_empty());
    }

    #[test]
    fn test_twin_fires_side_by_side() {
        let shot = Shot::Twin { spacing: 4.0, speed: 2.0 };
        let bullets = shot.fire(Vec2::new(10.0, 10.0), Vec2::ZERO, UP, 0.0, Owner::Player);
        assert_eq!(bullets.len(), 2);
        assert!((bullets[0].body.pos.x - bullets[1].body.pos.x).abs() > 3.9);
        assert_eq!(bullets[0].body.vel, bullets[1].body.vel);
    }

    #[test]
    fn test_scaled_pattern() {
        let p = pattern(10, 1, 0, 0.6).scaled(2.0);
        assert_eq!(p.probability, 1.0);
        assert_eq!(p.shot, Shot::Straight { speed: 2.0 });
    }
}
