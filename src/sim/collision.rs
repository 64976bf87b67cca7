//! Collision detection and response between balls
//!
//! Overlap is a plain circle-circle test. The response is an impulse-based
//! elastic bounce: separate the circles along the minimum translation
//! distance (MTD), then exchange momentum along the collision normal.

use glam::Vec2;

use super::body::{Body, Playfield};

/// Coefficient of restitution for ball-ball bounces (perfectly elastic)
pub const RESTITUTION: f32 = 1.0;

/// True iff the centres are closer than the sum of the radii
///
/// Touching circles (distance == r1 + r2) do not overlap. Callers gate on
/// `enabled` themselves.
#[inline]
pub fn overlaps(a: &Body, b: &Body) -> bool {
    let reach = a.radius + b.radius;
    a.pos.distance_squared(b.pos) < reach * reach
}

/// Resolve an overlap between two massive balls
///
/// Pushes both apart until tangent (split by inverse mass), clamps them back
/// into the playfield, and applies an elastic impulse unless they are already
/// separating. Coincident centres are pushed apart along +x.
pub fn bounce_balls(
    a: &mut Body,
    a_mass: f32,
    b: &mut Body,
    b_mass: f32,
    field: &Playfield,
) {
    let reach = a.radius + b.radius;

    let mut delta = a.pos - b.pos;
    let mut dist = delta.length();
    if dist == 0.0 {
        dist = reach - 1.0;
        delta = Vec2::new(reach, 0.0);
    }

    // Minimum translation distance to push the balls apart
    let mtd = delta * ((reach - dist) / dist);

    let im1 = 1.0 / a_mass;
    let im2 = 1.0 / b_mass;
    let im_sum = im1 + im2;

    a.pos += mtd * (im1 / im_sum);
    b.pos -= mtd * (im2 / im_sum);
    a.clamp_to(field);
    b.clamp_to(field);

    // Tangent circles need no MTD but still have a normal
    let normal = delta / delta.length();

    let vn = (a.vel - b.vel).dot(normal);
    if vn > 0.0 {
        // Already moving apart
        return;
    }

    let i = (-(1.0 + RESTITUTION) * vn) / im_sum;
    let impulse = normal * i;

    a.vel += impulse * im1;
    b.vel -= impulse * im2;
}
