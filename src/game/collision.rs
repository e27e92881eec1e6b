//! Pixel-level collision by sampling image alpha inside the overlap of two
//! bounding boxes. Entity positions are sprite centres.

use rand::Rng;

use crate::game::geometry::{Rect, Vec2};
use crate::game::image::Image;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionParams {
    pub samples: usize,
    pub threshold: u8,
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            samples: 10,
            threshold: 128,
        }
    }
}

pub fn bounds(img: &Image, center: Vec2) -> Rect {
    let size = img.size();
    Rect::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
}

fn solid_at(img: &Image, origin: Vec2, p: Vec2, threshold: u8) -> bool {
    let lx = (p.x - origin.x).floor() as i32;
    let ly = (p.y - origin.y).floor() as i32;
    img.alpha_at(lx, ly) > threshold
}

/// True when the world-space `point` lands on an opaque pixel of `img`.
pub fn point_hits(img: &Image, center: Vec2, point: Vec2, threshold: u8) -> bool {
    let b = bounds(img, center);
    b.contains(point) && solid_at(img, Vec2::new(b.x, b.y), point, threshold)
}

/// Small overlaps are checked pixel by pixel, larger ones at `samples`
/// random points, so a hit can be missed on a sliver of contact.
pub fn collides<R: Rng + ?Sized>(
    a: &Image,
    a_center: Vec2,
    b: &Image,
    b_center: Vec2,
    params: CollisionParams,
    rng: &mut R,
) -> bool {
    let ra = bounds(a, a_center);
    let rb = bounds(b, b_center);
    let Some(overlap) = ra.intersection(&rb) else {
        return false;
    };
    let a_origin = Vec2::new(ra.x, ra.y);
    let b_origin = Vec2::new(rb.x, rb.y);
    let hit = |p: Vec2| {
        solid_at(a, a_origin, p, params.threshold) && solid_at(b, b_origin, p, params.threshold)
    };

    let x0 = overlap.x.floor() as i32;
    let y0 = overlap.y.floor() as i32;
    let x1 = overlap.right().ceil() as i32;
    let y1 = overlap.bottom().ceil() as i32;
    let cells = ((x1 - x0) * (y1 - y0)) as usize;

    if cells <= params.samples.max(1) {
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(
                    (x as f32 + 0.5).clamp(overlap.x, overlap.right() - f32::EPSILON),
                    (y as f32 + 0.5).clamp(overlap.y, overlap.bottom() - f32::EPSILON),
                );
                if hit(p) {
                    return true;
                }
            }
        }
        return false;
    }

    (0..params.samples).any(|_| {
        let p = Vec2::new(
            rng.gen_range(overlap.x..overlap.right()),
            rng.gen_range(overlap.y..overlap.bottom()),
        );
        hit(p)
    })
}
