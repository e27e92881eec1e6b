use crate::game::bullet::{Body, Bullet, Owner};
use crate::game::geometry::{Rect, Vec2};
use crate::game::gun::{Shot, UP};

const SPEED: f32 = 2.2;
const FRICTION: f32 = 0.78;
const EDGE_PAD: f32 = 5.0;
const FIRE_LATCH_TICKS: u32 = 10;
const FIRE_COOLDOWN: u32 = 6;
const BULLET_SPEED: f32 = 4.0;
const RESPAWN_INVULNERABLE: u32 = 90;
const SHIELD_BREAK_GRACE: u32 = 30;

pub const MAX_WEAPON_LEVEL: u8 = 3;
pub const MAX_BOMBS: u32 = 5;
pub const MAX_LIGHTNING: u32 = 9;
pub const START_BOMBS: u32 = 2;
pub const START_LIGHTNING: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    Ignored,
    Absorbed,
    LostLife,
    Destroyed,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub lives: u32,
    pub weapon_level: u8,
    pub bombs: u32,
    pub lightning: u32,
    pub invulnerable: u32,
    pub shield: u32,
    spawn: Vec2,
    fire_latch: u32,
    fire_cooldown: u32,
}

impl Player {
    pub fn new(spawn: Vec2, lives: u32) -> Self {
        Self {
            body: Body::new(spawn, Vec2::ZERO),
            lives,
            weapon_level: 1,
            bombs: START_BOMBS,
            lightning: START_LIGHTNING,
            invulnerable: RESPAWN_INVULNERABLE,
            shield: 0,
            spawn,
            fire_latch: 0,
            fire_cooldown: 0,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// Collisions only count outside the post-respawn grace period. A
    /// shield still counts as hittable, it soaks up the hit.
    pub fn is_hittable(&self) -> bool {
        self.is_alive() && self.invulnerable == 0
    }

    /// Key press impulse; only the axes named in `dir` change.
    pub fn thrust(&mut self, dir: Vec2) {
        if dir.x != 0.0 {
            self.body.vel.x = dir.x.signum() * SPEED;
        }
        if dir.y != 0.0 {
            self.body.vel.y = dir.y.signum() * SPEED;
        }
    }

    /// Terminals only report presses and repeats, so a press holds the
    /// trigger for a short window.
    pub fn pull_trigger(&mut self) {
        self.fire_latch = FIRE_LATCH_TICKS;
    }

    pub fn update(&mut self, field: &Rect) {
        self.body.integrate();
        self.body.vel = self.body.vel * FRICTION;
        if self.body.vel.length() < 0.05 {
            self.body.vel = Vec2::ZERO;
        }
        self.body.pos.x = self.body.pos.x.clamp(field.x + EDGE_PAD, field.right() - EDGE_PAD);
        self.body.pos.y = self.body.pos.y.clamp(field.y + EDGE_PAD, field.bottom() - EDGE_PAD);

        self.invulnerable = self.invulnerable.saturating_sub(1);
        self.shield = self.shield.saturating_sub(1);
        self.fire_latch = self.fire_latch.saturating_sub(1);
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
    }

    pub fn shot(&self) -> Shot {
        match self.weapon_level {
            0 | 1 => Shot::Straight { speed: BULLET_SPEED },
            2 => Shot::Twin { spacing: 4.0, speed: BULLET_SPEED },
            _ => Shot::Spread { count: 3, arc: 0.35, speed: BULLET_SPEED },
        }
    }

    pub fn fire(&mut self) -> Vec<Bullet> {
        if !self.is_alive() || self.fire_latch == 0 || self.fire_cooldown > 0 {
            return Vec::new();
        }
        self.fire_cooldown = FIRE_COOLDOWN;
        let muzzle = self.body.pos + Vec2::new(0.0, -4.0);
        self.shot().fire(muzzle, muzzle, UP, 0.0, Owner::Player)
    }

    pub fn hit(&mut self) -> HitOutcome {
        if !self.is_alive() || self.invulnerable > 0 {
            return HitOutcome::Ignored;
        }
        if self.shield > 0 {
            self.shield = 0;
            self.invulnerable = SHIELD_BREAK_GRACE;
            return HitOutcome::Absorbed;
        }
        self.lives -= 1;
        if self.lives == 0 {
            self.fire_latch = 0;
            return HitOutcome::Destroyed;
        }
        self.weapon_level = self.weapon_level.saturating_sub(1).max(1);
        self.body = Body::new(self.spawn, Vec2::ZERO);
        self.invulnerable = RESPAWN_INVULNERABLE;
        HitOutcome::LostLife
    }

    /// Blink while invulnerable after a respawn.
    pub fn visible(&self, tick: u64) -> bool {
        self.is_alive() && (self.invulnerable == 0 || (tick / 4) % 2 == 0)
    }
}
