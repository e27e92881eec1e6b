use crate::game::assets::SpriteId;
use crate::game::geometry::{Rect, Vec2};

/// Anything that moves by plain Euler integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub body: Body,
    pub owner: Owner,
    pub damage: u32,
    pub sprite: SpriteId,
    pub alive: bool,
}

/// Bullets further than this outside the field are culled.
pub const CULL_MARGIN: f32 = 8.0;

impl Bullet {
    pub fn player(pos: Vec2, vel: Vec2) -> Self {
        Self {
            body: Body::new(pos, vel),
            owner: Owner::Player,
            damage: 1,
            sprite: SpriteId::PlayerBullet,
            alive: true,
        }
    }

    pub fn enemy(pos: Vec2, vel: Vec2) -> Self {
        Self {
            body: Body::new(pos, vel),
            owner: Owner::Enemy,
            damage: 1,
            sprite: SpriteId::EnemyBullet,
            alive: true,
        }
    }

    pub fn update(&mut self, field: &Rect) {
        self.body.integrate();
        if !field.grow(CULL_MARGIN).contains(self.body.pos) {
            self.alive = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate() {
        let mut b = Body::new(Vec2::new(1.0, 1.0), Vec2::new(0.5, -2.0));
        b.integrate();
        b.integrate();
        assert_eq!(b.pos, Vec2::new(2.0, -3.0));
    }

    #[test]
    fn test_bullet_culled_outside_margin() {
        let field = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut b = Bullet::player(Vec2::new(50.0, 2.0), Vec2::new(0.0, -4.0));
        b.update(&field);
        assert!(b.alive, "still inside the margin at y = -2");
        b.update(&field);
        b.update(&field);
        assert!(!b.alive);
    }
}
