use rand::Rng;

use crate::game::assets::SpriteId;
use crate::game::bullet::Bullet;
use crate::game::geometry::{Rect, Vec2};
use crate::game::gun::{Gun, GunPattern, Shot};
use crate::game::movement::Movement;

const HIT_FLASH_TICKS: u32 = 4;
/// Enemies that never make it on screen are dropped after this many ticks.
const MAX_OFFSCREEN_AGE: f32 = 600.0;
const DESPAWN_MARGIN: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Scout,   // fast diver, aimed shots
    Weaver,  // sine path, twin shots
    Spinner, // orbits, ring bursts
    Gunship, // slow, heavy spread
}

impl EnemyKind {
    pub fn sprite(&self) -> SpriteId {
        match self {
            EnemyKind::Scout => SpriteId::Scout,
            EnemyKind::Weaver => SpriteId::Weaver,
            EnemyKind::Spinner => SpriteId::Spinner,
            EnemyKind::Gunship => SpriteId::Gunship,
        }
    }

    pub fn hp(&self) -> u32 {
        match self {
            EnemyKind::Scout => 1,
            EnemyKind::Weaver => 2,
            EnemyKind::Spinner => 3,
            EnemyKind::Gunship => 10,
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            EnemyKind::Scout => 50,
            EnemyKind::Weaver => 80,
            EnemyKind::Spinner => 120,
            EnemyKind::Gunship => 400,
        }
    }

    /// Default trajectory, `lean` adds sideways drift per tick.
    pub fn movement(&self, lean: f32) -> Movement {
        match self {
            EnemyKind::Scout => Movement::Linear {
                velocity: Vec2::new(lean, 1.1),
            },
            EnemyKind::Weaver => Movement::Sine {
                velocity: Vec2::new(lean * 0.5, 0.7),
                amplitude: 18.0,
                period: 90.0,
            },
            EnemyKind::Spinner => Movement::Circular {
                velocity: Vec2::new(lean * 0.3, 0.45),
                radius: 14.0,
                period: 120.0,
            },
            EnemyKind::Gunship => Movement::Linear {
                velocity: Vec2::new(0.0, 0.25),
            },
        }
    }

    pub fn gun_pattern(&self) -> GunPattern {
        match self {
            EnemyKind::Scout => GunPattern {
                rate: 70,
                repeat: 1,
                repeat_gap: 0,
                probability: 0.5,
                shot: Shot::Aimed { speed: 1.4 },
            },
            EnemyKind::Weaver => GunPattern {
                rate: 60,
                repeat: 2,
                repeat_gap: 8,
                probability: 0.6,
                shot: Shot::Twin { spacing: 4.0, speed: 1.3 },
            },
            EnemyKind::Spinner => GunPattern {
                rate: 90,
                repeat: 1,
                repeat_gap: 0,
                probability: 0.7,
                shot: Shot::Ring { count: 8, speed: 1.0 },
            },
            EnemyKind::Gunship => GunPattern {
                rate: 80,
                repeat: 3,
                repeat_gap: 10,
                probability: 0.9,
                shot: Shot::Spread { count: 5, arc: 1.2, speed: 1.2 },
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Scout => "scout",
            EnemyKind::Weaver => "weaver",
            EnemyKind::Spinner => "spinner",
            EnemyKind::Gunship => "gunship",
        }
    }
}

/// A destroyed enemy as seen by scoring and effects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wreck {
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Per-tick motion at the moment of death.
    pub velocity: Vec2,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub hp: u32,
    pub flash: u32,
    pub alive: bool,
    /// Id of the last bomb blast that damaged this enemy.
    pub last_blast: Option<u32>,
    base: Vec2,
    movement: Movement,
    age: f32,
    entered: bool,
    gun: Gun,
}

impl Enemy {
    pub fn new(kind: EnemyKind, base: Vec2, movement: Movement, difficulty: f32) -> Self {
        Self {
            kind,
            pos: movement.position(base, 0.0),
            hp: kind.hp(),
            flash: 0,
            alive: true,
            last_blast: None,
            base,
            movement,
            age: 0.0,
            entered: false,
            gun: Gun::enemy(kind.gun_pattern().scaled(difficulty)),
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.movement.velocity_at(self.age)
    }

    pub fn wreck(&self) -> Wreck {
        Wreck {
            kind: self.kind,
            pos: self.pos,
            velocity: self.velocity(),
        }
    }

    /// Move along the pattern, fire when on screen, and mark for removal
    /// once the enemy has left the field.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, target: Vec2, field: &Rect) -> Vec<Bullet> {
        self.age += 1.0;
        self.pos = self.movement.position(self.base, self.age);
        self.flash = self.flash.saturating_sub(1);

        let on_screen = field.contains(self.pos);
        if on_screen {
            self.entered = true;
        }
        let outside = !field.grow(DESPAWN_MARGIN).contains(self.pos);
        if outside && (self.entered || self.age > MAX_OFFSCREEN_AGE) {
            self.alive = false;
            return Vec::new();
        }

        let volley = self.gun.tick(rng, self.pos, target);
        if on_screen {
            volley
        } else {
            Vec::new()
        }
    }

    /// Apply damage, returns true if this hit destroyed the enemy.
    pub fn damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount);
        self.flash = HIT_FLASH_TICKS;
        if self.hp == 0 {
            self.alive = false;
            return true;
        }
        false
    }
}
