//! Circle bodies and the playfield they live in

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::PLACEMENT_ATTEMPTS;
use crate::error::SimError;

/// Rectangle [0, width] x [0, height] that every body is kept inside
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Result<Self, SimError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SimError::InvalidPlayfield { width, height });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether a circle of this radius fits at all
    pub fn fits(&self, radius: f32) -> bool {
        2.0 * radius <= self.width && 2.0 * radius <= self.height
    }

    /// Clamp a circle centre so the whole circle stays inside
    #[inline]
    pub fn clamp_center(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(radius, self.width - radius),
            pos.y.clamp(radius, self.height - radius),
        )
    }

    /// Whether the whole circle is inside
    pub fn contains(&self, body: &Body) -> bool {
        let r = body.radius;
        body.pos.x >= r
            && body.pos.x <= self.width - r
            && body.pos.y >= r
            && body.pos.y <= self.height - r
    }

    /// Uniformly random centre for a circle of this radius
    pub fn random_center<R: Rng + ?Sized>(&self, radius: f32, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.random_range(radius..=self.width - radius),
            rng.random_range(radius..=self.height - radius),
        )
    }

    /// Random centre at least `min_distance` away from `point`
    ///
    /// Gives up after a bounded number of tries (tiny playfields) and keeps the
    /// last candidate.
    pub fn random_center_far_from<R: Rng + ?Sized>(
        &self,
        radius: f32,
        point: Vec2,
        min_distance: f32,
        rng: &mut R,
    ) -> Vec2 {
        let mut candidate = self.random_center(radius, rng);
        for _ in 1..PLACEMENT_ATTEMPTS {
            if candidate.distance(point) >= min_distance {
                return candidate;
            }
            candidate = self.random_center(radius, rng);
        }
        if candidate.distance(point) < min_distance {
            log::warn!(
                "No spot {} away from ({:.0}, {:.0}) after {} tries",
                min_distance,
                point.x,
                point.y,
                PLACEMENT_ATTEMPTS
            );
        }
        candidate
    }
}

/// A circle with a velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Centre
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub radius: f32,
}

impl Body {
    /// Build a body, rejecting bad radii and non-finite positions
    pub fn new(pos: Vec2, radius: f32) -> Result<Self, SimError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SimError::InvalidRadius { radius });
        }
        if !pos.is_finite() {
            return Err(SimError::NonFinitePosition { x: pos.x, y: pos.y });
        }
        Ok(Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        })
    }

    /// Build a body and clamp it into the playfield
    pub fn inside(field: &Playfield, pos: Vec2, radius: f32) -> Result<Self, SimError> {
        let mut body = Self::new(pos, radius)?;
        if !field.fits(radius) {
            return Err(SimError::BodyTooLarge {
                radius,
                width: field.width,
                height: field.height,
            });
        }
        body.clamp_to(field);
        Ok(body)
    }

    #[inline]
    pub fn clamp_to(&mut self, field: &Playfield) {
        self.pos = field.clamp_center(self.pos, self.radius);
    }

    /// Move by `vel * dt` scaled by `factor`
    #[inline]
    pub fn integrate(&mut self, dt: f32, factor: f32) {
        self.pos += self.vel * factor * dt;
    }

    /// Move by velocity, reflect off the walls, then clamp
    pub fn integrate_bouncing(&mut self, field: &Playfield, dt: f32, factor: f32) {
        self.integrate(dt, factor);

        let r = self.radius;
        if self.pos.x - r < 0.0 {
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x + r > field.width {
            self.vel.x = -self.vel.x.abs();
        }
        if self.pos.y - r < 0.0 {
            self.vel.y = self.vel.y.abs();
        } else if self.pos.y + r > field.height {
            self.vel.y = -self.vel.y.abs();
        }

        self.clamp_to(field);
    }

    /// Circle-circle overlap test (see [`super::collision::overlaps`])
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        super::collision::overlaps(self, other)
    }
}
