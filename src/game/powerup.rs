use rand::Rng;

use crate::game::assets::SpriteId;
use crate::game::geometry::{Rect, Vec2};
use crate::game::movement::Movement;
use crate::game::player::{Player, MAX_BOMBS, MAX_LIGHTNING, MAX_WEAPON_LEVEL};

const FALL_SPEED: f32 = 0.6;
const WOBBLE_AMPLITUDE: f32 = 4.0;
const WOBBLE_PERIOD: f32 = 50.0;
const SHIELD_TICKS: u32 = 300;
const LIGHTNING_PER_PICKUP: u32 = 3;
const MAXED_WEAPON_BONUS: u32 = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerupKind {
    Weapon,
    Bomb,
    Lightning,
    Shield,
}

impl PowerupKind {
    const WEIGHTED: [(PowerupKind, u32); 4] = [
        (PowerupKind::Weapon, 3),
        (PowerupKind::Bomb, 2),
        (PowerupKind::Lightning, 2),
        (PowerupKind::Shield, 1),
    ];

    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> PowerupKind {
        let total: u32 = Self::WEIGHTED.iter().map(|(_, w)| w).sum();
        let mut pick = rng.gen_range(0..total);
        for (kind, weight) in Self::WEIGHTED {
            if pick < weight {
                return kind;
            }
            pick -= weight;
        }
        PowerupKind::Weapon
    }

    pub fn sprite(&self) -> SpriteId {
        match self {
            PowerupKind::Weapon => SpriteId::PowerupWeapon,
            PowerupKind::Bomb => SpriteId::PowerupBomb,
            PowerupKind::Lightning => SpriteId::PowerupLightning,
            PowerupKind::Shield => SpriteId::PowerupShield,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PowerupKind::Weapon => "weapon",
            PowerupKind::Bomb => "bomb",
            PowerupKind::Lightning => "lightning",
            PowerupKind::Shield => "shield",
        }
    }

    /// Grant the pickup to the player. Returns bonus points.
    pub fn apply(&self, player: &mut Player) -> u32 {
        match self {
            PowerupKind::Weapon => {
                if player.weapon_level >= MAX_WEAPON_LEVEL {
                    return MAXED_WEAPON_BONUS;
                }
                player.weapon_level += 1;
            }
            PowerupKind::Bomb => player.bombs = (player.bombs + 1).min(MAX_BOMBS),
            PowerupKind::Lightning => {
                player.lightning = (player.lightning + LIGHTNING_PER_PICKUP).min(MAX_LIGHTNING)
            }
            PowerupKind::Shield => player.shield = SHIELD_TICKS,
        }
        0
    }
}

#[derive(Clone, Debug)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub alive: bool,
    base: Vec2,
    age: f32,
}

impl Powerup {
    pub fn new(kind: PowerupKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            alive: true,
            base: pos,
            age: 0.0,
        }
    }

    fn movement() -> Movement {
        Movement::Sine {
            velocity: Vec2::new(0.0, FALL_SPEED),
            amplitude: WOBBLE_AMPLITUDE,
            period: WOBBLE_PERIOD,
        }
    }

    pub fn update(&mut self, field: &Rect) {
        self.age += 1.0;
        self.pos = Self::movement().position(self.base, self.age);
        if self.pos.y > field.bottom() + 4.0 {
            self.alive = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn player() -> Player {
        Player::new(Vec2::new(80.0, 140.0), 3)
    }

    #[test]
    fn test_weapon_caps_then_scores() {
        let mut p = player();
        assert_eq!(PowerupKind::Weapon.apply(&mut p), 0);
        assert_eq!(PowerupKind::Weapon.apply(&mut p), 0);
        assert_eq!(p.weapon_level, MAX_WEAPON_LEVEL);
        assert_eq!(PowerupKind::Weapon.apply(&mut p), MAXED_WEAPON_BONUS);
        assert_eq!(p.weapon_level, MAX_WEAPON_LEVEL);
    }

    #[test]
    fn test_bomb_and_lightning_caps() {
        let mut p = player();
        for _ in 0..10 {
            PowerupKind::Bomb.apply(&mut p);
            PowerupKind::Lightning.apply(&mut p);
        }
        assert_eq!(p.bombs, MAX_BOMBS);
        assert_eq!(p.lightning, MAX_LIGHTNING);
    }

    #[test]
    fn test_shield_sets_timer() {
        let mut p = player();
        PowerupKind::Shield.apply(&mut p);
        assert_eq!(p.shield, SHIELD_TICKS);
    }

    #[test]
    fn test_roll_follows_weights() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0u32; 4];
        for _ in 0..8000 {
            let idx = match PowerupKind::roll(&mut rng) {
                PowerupKind::Weapon => 0,
                PowerupKind::Bomb => 1,
                PowerupKind::Lightning => 2,
                PowerupKind::Shield => 3,
            };
            counts[idx] += 1;
        }
        // expected 3000 / 2000 / 2000 / 1000
        assert!(counts[0] > 2700 && counts[0] < 3300);
        assert!(counts[3] > 800 && counts[3] < 1200);
    }

    #[test]
    fn test_falls_and_expires() {
        let field = Rect::new(0.0, 0.0, 160.0, 160.0);
        let mut pu = Powerup::new(PowerupKind::Bomb, Vec2::new(80.0, 150.0));
        pu.update(&field);
        assert!(pu.pos.y > 150.0);
        for _ in 0..30 {
            pu.update(&field);
        }
        assert!(!pu.alive);
    }
}
