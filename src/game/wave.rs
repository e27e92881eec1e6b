use std::f32::consts::PI;

use crate::game::enemy::{Enemy, EnemyKind};
use crate::game::geometry::Vec2;

const FORMATION_SPACING: f32 = 14.0;
/// Spawned groups start this far above the top edge.
const SPAWN_HEIGHT: f32 = 12.0;
const INTERMISSION_TICKS: u32 = 60;
const FIRST_WAVE_DELAY: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Formation {
    Line,
    Vee,
    Column,
    Arc,
}

impl Formation {
    /// Offset of each member relative to the group anchor. Negative `y` is
    /// further up, i.e. enters later.
    pub fn offsets(self, count: usize, spacing: f32) -> impl Iterator<Item = Vec2> {
        let mid = (count.max(1) - 1) as f32 / 2.0;
        (0..count).map(move |i| {
            let d = i as f32 - mid;
            match self {
                Formation::Line => Vec2::new(d * spacing, 0.0),
                Formation::Vee => Vec2::new(d * spacing, -d.abs() * spacing * 0.6),
                Formation::Column => Vec2::new(0.0, -(i as f32) * spacing),
                Formation::Arc => {
                    let t = if count > 1 { i as f32 / (count - 1) as f32 } else { 0.5 };
                    let angle = PI * (0.15 + 0.7 * t);
                    let radius = spacing * (count as f32).max(2.0) / 2.0;
                    Vec2::new(-angle.cos() * radius, -angle.sin() * radius * 0.5)
                }
            }
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveSpec {
    pub kind: EnemyKind,
    pub count: usize,
    pub formation: Formation,
    /// Horizontal anchor as a fraction of field width.
    pub entry_x: f32,
    pub lean: f32,
    /// Ticks after the wave starts before this group appears.
    pub delay: u32,
}

impl WaveSpec {
    pub fn spawn(&self, difficulty: f32, field_width: f32) -> impl Iterator<Item = Enemy> + '_ {
        let anchor = Vec2::new(self.entry_x * field_width, -SPAWN_HEIGHT);
        let movement = self.kind.movement(self.lean);
        self.formation
            .offsets(self.count, FORMATION_SPACING)
            .map(move |offset| Enemy::new(self.kind, anchor + offset, movement, difficulty))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Wave {
    pub number: u32,
    pub difficulty: f32,
    pub groups: Vec<WaveSpec>,
}

fn group(kind: EnemyKind, count: usize, formation: Formation, entry_x: f32, lean: f32, delay: u32) -> WaveSpec {
    WaveSpec {
        kind,
        count,
        formation,
        entry_x,
        lean,
        delay,
    }
}

impl Wave {
    /// Deterministic wave layout: four templates in rotation, bigger groups
    /// as the number climbs, and a gunship every fifth wave.
    pub fn for_number(number: u32) -> Wave {
        use EnemyKind::*;
        use Formation::*;

        let n = number.max(1);
        let grow = |base: usize, per: u32, cap: usize| (base + (n / per) as usize).min(cap);

        let mut groups = match (n - 1) % 4 {
            0 => vec![
                group(Scout, grow(3, 2, 9), Vee, 0.5, 0.0, 0),
                group(Scout, grow(2, 2, 7), Line, 0.3, 0.25, 120),
            ],
            1 => vec![
                group(Weaver, grow(3, 3, 6), Column, 0.25, 0.2, 0),
                group(Weaver, grow(3, 3, 6), Column, 0.75, -0.2, 60),
            ],
            2 => vec![
                group(Spinner, grow(2, 4, 4), Line, 0.5, 0.0, 0),
                group(Scout, grow(4, 2, 9), Arc, 0.5, 0.0, 150),
            ],
            _ => vec![
                group(Weaver, grow(3, 3, 6), Line, 0.5, 0.0, 0),
                group(Spinner, grow(1, 4, 3), Column, 0.2, 0.3, 100),
                group(Scout, grow(3, 2, 8), Vee, 0.8, -0.3, 160),
            ],
        };
        if n % 5 == 0 {
            groups.push(group(Gunship, 1, Line, 0.5, 0.0, 200));
        }

        Wave {
            number: n,
            difficulty: 1.0 + 0.1 * (n - 1) as f32,
            groups,
        }
    }

    pub fn enemy_count(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum WaveEvent {
    Started(u32),
    /// A group is due, carrying the difficulty of the wave that released it.
    Spawn { spec: WaveSpec, difficulty: f32 },
    Cleared { number: u32, bonus: u32 },
}

#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Intermission { remaining: u32 },
    Active { elapsed: u32, next_group: usize },
}

/// Hands out a wave's groups on schedule and moves to the next wave once
/// the field is clear.
#[derive(Clone, Debug)]
pub struct WaveDirector {
    wave: Wave,
    phase: Phase,
}

impl WaveDirector {
    pub fn new(first_wave: u32) -> Self {
        Self {
            wave: Wave::for_number(first_wave),
            phase: Phase::Intermission {
                remaining: FIRST_WAVE_DELAY,
            },
        }
    }

    pub fn wave(&self) -> &Wave {
        &self.wave
    }

    pub fn in_intermission(&self) -> bool {
        matches!(self.phase, Phase::Intermission { .. })
    }

    fn queue_empty(&self) -> bool {
        match self.phase {
            Phase::Active { next_group, .. } => next_group >= self.wave.groups.len(),
            Phase::Intermission { .. } => false,
        }
    }

    pub fn tick(&mut self, enemies_alive: usize) -> Vec<WaveEvent> {
        let mut events = Vec::new();
        match &mut self.phase {
            Phase::Intermission { remaining } => {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    self.phase = Phase::Active {
                        elapsed: 0,
                        next_group: 0,
                    };
                    events.push(WaveEvent::Started(self.wave.number));
                    self.release_due(&mut events);
                }
            }
            Phase::Active { elapsed, .. } => {
                *elapsed += 1;
                // A group released this tick is not yet counted in `enemies_alive`.
                let released = self.release_due(&mut events);
                if released == 0 && self.queue_empty() && enemies_alive == 0 {
                    let number = self.wave.number;
                    events.push(WaveEvent::Cleared {
                        number,
                        bonus: 100 * number,
                    });
                    self.wave = Wave::for_number(number + 1);
                    self.phase = Phase::Intermission {
                        remaining: INTERMISSION_TICKS,
                    };
                }
            }
        }
        events
    }

    /// Push a `Spawn` for every group whose delay has passed. Returns how
    /// many were released.
    fn release_due(&mut self, events: &mut Vec<WaveEvent>) -> usize {
        let Phase::Active { elapsed, next_group } = &mut self.phase else {
            return 0;
        };
        let mut released = 0;
        while let Some(spec) = self.wave.groups.get(*next_group) {
            if spec.delay > *elapsed {
                break;
            }
            events.push(WaveEvent::Spawn {
                spec: *spec,
                difficulty: self.wave.difficulty,
            });
            *next_group += 1;
            released += 1;
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_lazy_and_counted() {
        for formation in [Formation::Line, Formation::Vee, Formation::Column, Formation::Arc] {
            assert_eq!(formation.offsets(5, 10.0).count(), 5);
            assert_eq!(formation.offsets(0, 10.0).count(), 0);
        }
    }

    #[test]
    fn test_line_is_centred() {
        let xs: Vec<f32> = Formation::Line.offsets(3, 10.0).map(|o| o.x).collect();
        assert_eq!(xs, vec![-10.0, 0.0, 10.0]);
    }

    #[test]
    fn test_vee_leader_in_front() {
        let offsets: Vec<Vec2> = Formation::Vee.offsets(5, 10.0).collect();
        assert_eq!(offsets[2], Vec2::new(0.0, 0.0));
        assert!(offsets[0].y < 0.0 && offsets[4].y < 0.0);
        assert_eq!(offsets[1].y, offsets[3].y);
    }

    #[test]
    fn test_wave_templates_cycle_and_grow() {
        let w1 = Wave::for_number(1);
        let w9 = Wave::for_number(9);
        assert_eq!(w1.groups[0].kind, EnemyKind::Scout);
        assert_eq!(w9.groups[0].kind, EnemyKind::Scout);
        assert!(w9.enemy_count() > w1.enemy_count());
        assert!((w9.difficulty - 1.8).abs() < 1e-5);
        assert_eq!(Wave::for_number(0), w1);
    }

    #[test]
    fn test_gunship_every_fifth_wave() {
        let has_gunship = |n| Wave::for_number(n).groups.iter().any(|g| g.kind == EnemyKind::Gunship);
        assert!(!has_gunship(4));
        assert!(has_gunship(5));
        assert!(has_gunship(10));
        assert!(!has_gunship(11));
    }

    #[test]
    fn test_spawn_places_group_above_field() {
        let spec = group(EnemyKind::Scout, 3, Formation::Line, 0.5, 0.0, 0);
        let enemies: Vec<Enemy> = spec.spawn(1.0, 160.0).collect();
        assert_eq!(enemies.len(), 3);
        assert!(enemies.iter().all(|e| e.pos.y < 0.0));
        assert_eq!(enemies[1].pos.x, 80.0);
    }

    #[test]
    fn test_director_schedule() {
        let mut director = WaveDirector::new(1);
        let mut spawned = 0;
        let mut started = None;
        for _ in 0..FIRST_WAVE_DELAY {
            for event in director.tick(1) {
                match event {
                    WaveEvent::Started(n) => started = Some(n),
                    WaveEvent::Spawn { .. } => spawned += 1,
                    WaveEvent::Cleared { .. } => panic!("nothing to clear yet"),
                }
            }
        }
        assert_eq!(started, Some(1));
        assert_eq!(spawned, 1, "only the zero-delay group is released at start");

        // second group waits for its delay even if the field is empty
        for _ in 0..119 {
            assert!(director.tick(0).is_empty());
        }
        let events = director.tick(0);
        assert_eq!(events.len(), 1, "the release tick never clears the wave");
        assert!(matches!(events[0], WaveEvent::Spawn { spec, difficulty } if spec.delay == 120 && difficulty == 1.0));
        assert!(!director.in_intermission());
    }

    #[test]
    fn test_last_group_must_be_destroyed_before_clear() {
        let mut director = WaveDirector::new(1);
        for _ in 0..FIRST_WAVE_DELAY + 120 {
            director.tick(0);
        }
        // the last group is now on the field
        for _ in 0..50 {
            assert!(director.tick(2).is_empty());
        }
        assert_eq!(director.wave().number, 1);
        assert_eq!(
            director.tick(0),
            vec![WaveEvent::Cleared { number: 1, bonus: 100 }]
        );
        assert_eq!(director.wave().number, 2);
    }

    #[test]
    fn test_director_clears_and_advances() {
        let mut director = WaveDirector::new(1);
        let mut cleared = None;
        for _ in 0..1000 {
            for event in director.tick(0) {
                if let WaveEvent::Cleared { number, bonus } = event {
                    cleared = Some((number, bonus));
                }
            }
            if cleared.is_some() {
                break;
            }
        }
        assert_eq!(cleared, Some((1, 100)));
        assert!(director.in_intermission());
        assert_eq!(director.wave().number, 2);
    }
}
