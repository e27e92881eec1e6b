use crate::game::bullet::{Body, Bullet, Owner};
use crate::game::enemy::{Enemy, Wreck};
use crate::game::geometry::Vec2;
use crate::game::image::{Image, Rgba};

const SPEED: f32 = 2.5;
const FUSE_TICKS: u32 = 24;
const GROWTH: f32 = 3.0;
pub const MAX_RADIUS: f32 = 36.0;
pub const DAMAGE: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Flying { fuse: u32 },
    Blasting { radius: f32 },
    Done,
}

/// A bomb flies up from the ship, then becomes an expanding blast that
/// wipes enemy bullets and hits every enemy it reaches once.
#[derive(Clone, Debug)]
pub struct Bomb {
    pub id: u32,
    pub body: Body,
    state: State,
}

#[derive(Debug, Default, PartialEq)]
pub struct BlastReport {
    pub killed: Vec<Wreck>,
    pub bullets_cleared: usize,
}

impl Bomb {
    pub fn launch(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            body: Body::new(pos, Vec2::new(0.0, -SPEED)),
            state: State::Flying { fuse: FUSE_TICKS },
        }
    }

    pub fn is_flying(&self) -> bool {
        matches!(self.state, State::Flying { .. })
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Current blast radius, `None` unless the bomb has gone off.
    pub fn blast_radius(&self) -> Option<f32> {
        match self.state {
            State::Blasting { radius } => Some(radius),
            _ => None,
        }
    }

    /// Switch to blasting. Returns false if it had already detonated.
    pub fn detonate(&mut self) -> bool {
        if !self.is_flying() {
            return false;
        }
        self.state = State::Blasting { radius: 0.0 };
        true
    }

    /// Returns true on the tick the fuse runs out.
    pub fn update(&mut self) -> bool {
        match &mut self.state {
            State::Flying { fuse } => {
                self.body.integrate();
                *fuse = fuse.saturating_sub(1);
                if *fuse == 0 {
                    return self.detonate();
                }
            }
            State::Blasting { radius } => {
                *radius += GROWTH;
                if *radius > MAX_RADIUS {
                    self.state = State::Done;
                }
            }
            State::Done => {}
        }
        false
    }

    pub fn apply_blast(&self, enemies: &mut [Enemy], bullets: &mut [Bullet]) -> BlastReport {
        let mut report = BlastReport::default();
        let Some(radius) = self.blast_radius() else {
            return report;
        };
        let center = self.body.pos;

        for bullet in bullets.iter_mut() {
            if bullet.alive && bullet.owner == Owner::Enemy && bullet.body.pos.distance(center) <= radius {
                bullet.alive = false;
                report.bullets_cleared += 1;
            }
        }
        for enemy in enemies.iter_mut() {
            if !enemy.alive || enemy.last_blast == Some(self.id) {
                continue;
            }
            if enemy.pos.distance(center) <= radius {
                enemy.last_blast = Some(self.id);
                if enemy.damage(DAMAGE) {
                    report.killed.push(enemy.wreck());
                }
            }
        }
        report
    }

    pub fn draw(&self, fb: &mut Image, sprite: &Image) {
        match self.state {
            State::Flying { .. } => {
                let size = sprite.size();
                fb.draw(sprite, self.body.pos.x - size.x / 2.0, self.body.pos.y - size.y / 2.0);
            }
            State::Blasting { radius } => {
                let fade = 1.0 - radius / MAX_RADIUS;
                let inner = Rgba::new(255, 200, 120, (90.0 * fade) as u8 + 20);
                fb.fill_circle(self.body.pos, radius, inner);
                fb.ring(self.body.pos, radius, Rgba::opaque(255, 240, 200));
            }
            State::Done => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::enemy::EnemyKind;
    use crate::game::movement::Movement;

    fn parked(kind: EnemyKind, pos: Vec2) -> Enemy {
        Enemy::new(kind, pos, Movement::Linear { velocity: Vec2::ZERO }, 1.0)
    }

    #[test]
    fn test_fuse_detonates() {
        let mut bomb = Bomb::launch(1, Vec2::new(80.0, 140.0));
        for _ in 0..FUSE_TICKS - 1 {
            assert!(!bomb.update());
        }
        assert!(bomb.update());
        assert!((bomb.body.pos.y - (140.0 - SPEED * FUSE_TICKS as f32)).abs() < 1e-3);
        assert_eq!(bomb.blast_radius(), Some(0.0));
        assert!(!bomb.detonate(), "cannot detonate twice");
    }

    #[test]
    fn test_blast_grows_then_ends() {
        let mut bomb = Bomb::launch(1, Vec2::ZERO);
        bomb.detonate();
        let mut ticks = 0;
        while !bomb.is_done() {
            bomb.update();
            ticks += 1;
            assert!(bomb.blast_radius().map_or(true, |r| r <= MAX_RADIUS));
        }
        assert_eq!(ticks, (MAX_RADIUS / GROWTH) as usize + 1);
    }

    #[test]
    fn test_blast_hits_each_enemy_once() {
        let mut bomb = Bomb::launch(7, Vec2::new(50.0, 50.0));
        bomb.detonate();
        let mut enemies = vec![
            parked(EnemyKind::Gunship, Vec2::new(60.0, 50.0)),
            parked(EnemyKind::Scout, Vec2::new(50.0, 55.0)),
            parked(EnemyKind::Weaver, Vec2::new(150.0, 150.0)),
        ];
        let mut bullets = vec![
            Bullet::enemy(Vec2::new(52.0, 50.0), Vec2::ZERO),
            Bullet::player(Vec2::new(50.0, 51.0), Vec2::ZERO),
        ];
        for _ in 0..6 {
            bomb.update();
            let report = bomb.apply_blast(&mut enemies, &mut bullets);
            for wreck in &report.killed {
                assert_eq!(wreck.kind, EnemyKind::Scout);
            }
        }
        assert_eq!(enemies[0].hp, EnemyKind::Gunship.hp() - DAMAGE);
        assert!(!enemies[1].alive);
        assert!(enemies[2].alive);
        assert!(!bullets[0].alive);
        assert!(bullets[1].alive, "player bullets survive the blast");
    }

    #[test]
    fn test_no_effect_while_flying() {
        let bomb = Bomb::launch(1, Vec2::new(50.0, 50.0));
        let mut enemies = vec![parked(EnemyKind::Scout, Vec2::new(50.0, 50.0))];
        let report = bomb.apply_blast(&mut enemies, &mut []);
        assert_eq!(report, BlastReport::default());
        assert!(enemies[0].alive);
    }
}
