use std::f32::consts::TAU;

use crate::game::geometry::Vec2;

/// Closed-form trajectories. `position` depends only on the spawn point and
/// the entity's age, so enemies never accumulate integration error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Movement {
    Linear {
        velocity: Vec2,
    },
    /// Drifts along `velocity` while swinging side to side across it.
    Sine {
        velocity: Vec2,
        amplitude: f32,
        period: f32,
    },
    /// Orbits a centre that itself drifts along `velocity`.
    Circular {
        velocity: Vec2,
        radius: f32,
        period: f32,
    },
}

impl Movement {
    pub fn velocity(&self) -> Vec2 {
        match *self {
            Movement::Linear { velocity }
            | Movement::Sine { velocity, .. }
            | Movement::Circular { velocity, .. } => velocity,
        }
    }

    pub fn position(&self, base: Vec2, t: f32) -> Vec2 {
        let drift = base + self.velocity() * t;
        match *self {
            Movement::Linear { .. } => drift,
            Movement::Sine {
                velocity,
                amplitude,
                period,
            } => {
                if period <= 0.0 {
                    return drift;
                }
                let phase = (TAU * t / period).sin();
                drift + velocity.normalized().perp() * (amplitude * phase)
            }
            Movement::Circular { radius, period, .. } => {
                if period <= 0.0 {
                    return drift + Vec2::new(radius, 0.0);
                }
                drift + Vec2::from_angle(TAU * t / period) * radius
            }
        }
    }

    /// Per-tick displacement around `t`.
    pub fn velocity_at(&self, t: f32) -> Vec2 {
        self.position(Vec2::ZERO, t + 1.0) - self.position(Vec2::ZERO, t)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn test_linear() {
        let m = Movement::Linear { velocity: Vec2::new(1.0, 2.0) };
        assert!(close(m.position(Vec2::new(10.0, 0.0), 3.0), Vec2::new(13.0, 6.0)));
        assert!(close(m.velocity_at(7.0), Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_sine_swings_across_direction_of_travel() {
        let m = Movement::Sine {
            velocity: Vec2::new(0.0, 1.0),
            amplitude: 5.0,
            period: 40.0,
        };
        let base = Vec2::new(50.0, 0.0);
        assert!(close(m.position(base, 0.0), base));
        // quarter period: full swing along perp((0,1)) = (-1,0)
        assert!(close(m.position(base, 10.0), Vec2::new(45.0, 10.0)));
        assert!(close(m.position(base, 20.0), Vec2::new(50.0, 20.0)));
        assert!(close(m.position(base, 30.0), Vec2::new(55.0, 30.0)));
    }

    #[test]
    fn test_circular_orbits() {
        let m = Movement::Circular {
            velocity: Vec2::ZERO,
            radius: 10.0,
            period: 100.0,
        };
        assert!(close(m.position(Vec2::ZERO, 0.0), Vec2::new(10.0, 0.0)));
        assert!(close(m.position(Vec2::ZERO, 25.0), Vec2::new(0.0, 10.0)));
        assert!(close(m.position(Vec2::ZERO, 100.0), Vec2::new(10.0, 0.0)));
        for t in 0..100 {
            let d = m.position(Vec2::ZERO, t as f32).length();
            assert!((d - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_zero_period_does_not_oscillate() {
        let m = Movement::Sine {
            velocity: Vec2::new(0.0, 1.0),
            amplitude: 5.0,
            period: 0.0,
        };
        assert!(close(m.position(Vec2::ZERO, 13.0), Vec2::new(0.0, 13.0)));
        let c = Movement::Circular { velocity: Vec2::ZERO, radius: 3.0, period: -1.0 };
        assert!(close(c.position(Vec2::ZERO, 5.0), Vec2::new(3.0, 0.0)));
    }
}
