use rand::Rng;

use crate::game::enemy::{Enemy, Wreck};
use crate::game::geometry::Vec2;
use crate::game::image::{Image, Rgba};

pub const RANGE: f32 = 70.0;
pub const CHAIN_RANGE: f32 = 45.0;
pub const MAX_TARGETS: usize = 4;
pub const DAMAGE: u32 = 3;
pub const COOLDOWN: u32 = 20;
const VISIBLE_TICKS: u32 = 10;
const PIECES_PER_SEGMENT: usize = 6;
const JITTER: f32 = 4.0;

const CORE: Rgba = Rgba::opaque(235, 245, 255);
const GLOW: Rgba = Rgba::new(90, 170, 255, 150);

/// Indices of the enemies a bolt from `origin` would strike, in order.
pub fn find_chain(origin: Vec2, enemies: &[Enemy]) -> Vec<usize> {
    let mut chain: Vec<usize> = Vec::new();
    let mut from = origin;
    let mut reach = RANGE;
    while chain.len() < MAX_TARGETS {
        let next = enemies
            .iter()
            .enumerate()
            .filter(|(i, e)| e.alive && !chain.contains(i))
            .map(|(i, e)| (i, e.pos.distance(from)))
            .filter(|(_, d)| *d <= reach)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let Some((idx, _)) = next else { break };
        chain.push(idx);
        from = enemies[idx].pos;
        reach = CHAIN_RANGE;
    }
    chain
}

#[derive(Clone, Debug)]
pub struct Bolt {
    anchors: Vec<Vec2>,
    path: Vec<Vec2>,
    ttl: u32,
}

#[derive(Debug)]
pub struct Strike {
    pub bolt: Bolt,
    pub hits: usize,
    pub killed: Vec<Wreck>,
}

impl Bolt {
    /// Strike the chain from `origin`. `None` when nothing is in range, in
    /// which case no enemy is touched.
    pub fn strike<R: Rng + ?Sized>(origin: Vec2, enemies: &mut [Enemy], rng: &mut R) -> Option<Strike> {
        let chain = find_chain(origin, enemies);
        if chain.is_empty() {
            return None;
        }
        let mut anchors = vec![origin];
        let mut killed = Vec::new();
        for &idx in &chain {
            let enemy = &mut enemies[idx];
            anchors.push(enemy.pos);
            if enemy.damage(DAMAGE) {
                killed.push(enemy.wreck());
            }
        }
        let mut bolt = Bolt {
            anchors,
            path: Vec::new(),
            ttl: VISIBLE_TICKS,
        };
        bolt.rejitter(rng);
        Some(Strike {
            bolt,
            hits: chain.len(),
            killed,
        })
    }

    fn rejitter<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.path.clear();
        let Some(&first) = self.anchors.first() else { return };
        self.path.push(first);
        for pair in self.anchors.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let side = (b - a).normalized().perp();
            for piece in 1..PIECES_PER_SEGMENT {
                let t = piece as f32 / PIECES_PER_SEGMENT as f32;
                let offset = rng.gen_range(-JITTER..=JITTER);
                self.path.push(a + (b - a) * t + side * offset);
            }
            self.path.push(b);
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.ttl = self.ttl.saturating_sub(1);
        if self.ttl > 0 {
            self.rejitter(rng);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.ttl == 0
    }

    pub fn draw(&self, fb: &mut Image) {
        for seg in self.path.windows(2) {
            let nudge = Vec2::new(1.0, 0.0);
            fb.draw_line(seg[0] + nudge, seg[1] + nudge, GLOW);
            fb.draw_line(seg[0], seg[1], CORE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::enemy::EnemyKind;
    use crate::game::movement::Movement;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn parked(kind: EnemyKind, x: f32, y: f32) -> Enemy {
        Enemy::new(kind, Vec2::new(x, y), Movement::Linear { velocity: Vec2::ZERO }, 1.0)
    }

    #[test]
    fn test_chain_order_and_range() {
        let origin = Vec2::new(80.0, 150.0);
        let enemies = vec![
            parked(EnemyKind::Scout, 80.0, 60.0),   // 90 away, only reachable by chaining
            parked(EnemyKind::Scout, 80.0, 100.0),  // nearest, 50 away
            parked(EnemyKind::Scout, 10.0, 10.0),   // out of every range
        ];
        assert_eq!(find_chain(origin, &enemies), vec![1, 0]);
    }

    #[test]
    fn test_chain_caps_targets() {
        let enemies: Vec<Enemy> = (0..8)
            .map(|i| parked(EnemyKind::Scout, 80.0, 140.0 - i as f32 * 10.0))
            .collect();
        let chain = find_chain(Vec2::new(80.0, 150.0), &enemies);
        assert_eq!(chain, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_nothing_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut enemies = vec![parked(EnemyKind::Scout, 0.0, 0.0)];
        assert!(Bolt::strike(Vec2::new(150.0, 150.0), &mut enemies, &mut rng).is_none());
        assert_eq!(enemies[0].hp, EnemyKind::Scout.hp());
    }

    #[test]
    fn test_strike_damages_and_reports_kills() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut enemies = vec![
            parked(EnemyKind::Gunship, 80.0, 120.0),
            parked(EnemyKind::Weaver, 90.0, 100.0),
        ];
        let strike = Bolt::strike(Vec2::new(80.0, 150.0), &mut enemies, &mut rng).unwrap();
        assert_eq!(strike.hits, 2);
        assert_eq!(enemies[0].hp, EnemyKind::Gunship.hp() - DAMAGE);
        assert_eq!(strike.killed.len(), 1);
        assert_eq!(strike.killed[0].kind, EnemyKind::Weaver);
        assert_eq!(strike.killed[0].pos, Vec2::new(90.0, 100.0));
        // origin + 2 segments of PIECES_PER_SEGMENT pieces
        assert_eq!(strike.bolt.path.len(), 1 + 2 * PIECES_PER_SEGMENT);
        assert_eq!(strike.bolt.path[0], Vec2::new(80.0, 150.0));
        assert_eq!(*strike.bolt.path.last().unwrap(), Vec2::new(90.0, 100.0));
    }

    #[test]
    fn test_bolt_fades_and_jitters() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut enemies = vec![parked(EnemyKind::Spinner, 80.0, 100.0)];
        let mut bolt = Bolt::strike(Vec2::new(80.0, 150.0), &mut enemies, &mut rng).unwrap().bolt;
        for p in &bolt.path {
            assert!((p.x - 80.0).abs() <= JITTER + 1e-4);
        }
        let before = bolt.path.to_vec();
        bolt.update(&mut rng);
        assert_ne!(before, bolt.path);
        for _ in 0..VISIBLE_TICKS {
            bolt.update(&mut rng);
        }
        assert!(bolt.is_finished());
    }
}
