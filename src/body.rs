use crate::error::{Error, Result};

use ultraviolet::Vec2;

use std::collections::VecDeque;

/// What a body is. Only black holes absorb and merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Planet,
    Star,
    BlackHole,
}

/// Whether a body follows the physics or is pinned in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Motion {
    #[default]
    Free,
    Anchored,
}

/// Recent positions of a body, oldest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trail {
    points: VecDeque<Vec2>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a position, dropping the oldest ones beyond `capacity`.
    pub fn push(&mut self, point: Vec2, capacity: usize) {
        self.points.push_back(point);
        while self.points.len() > capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }

    pub fn last(&self) -> Option<Vec2> {
        self.points.back().copied()
    }
}

impl FromIterator<Vec2> for Trail {
    fn from_iter<I: IntoIterator<Item = Vec2>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Visual state of a black hole.
///
/// Purely presentational, but persisted by snapshots so it has to evolve
/// the same way every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pulse {
    pub absorbing: bool,
    pub animation_time: f32,
    /// Set once the black hole took part in a merge. Never cleared.
    pub explosion_triggered: bool,
}

impl Pulse {
    /// Restarts the absorbing pulse.
    pub fn mark_absorbing(&mut self) {
        self.absorbing = true;
        self.animation_time = 0.0;
    }

    /// Advances the pulse by one frame.
    pub fn advance(&mut self, step: f32, threshold: f32) {
        if !self.absorbing {
            return;
        }
        self.animation_time += step;
        if self.animation_time > threshold {
            self.absorbing = false;
        }
    }
}

/// Represents a celestial body in the sandbox: a planet, a star or a black hole.
///
/// The kind is fixed at construction, and the motion state only changes
/// through [`Body::anchor`] and [`Body::release`].
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    kind: BodyKind,
    /// Position vector.
    pub pos: Vec2,
    /// Velocity vector, in world units per tick.
    pub vel: Vec2,
    /// Mass of the body. Only drives gravity.
    pub mass: f32,
    /// Radius of the body. Drives hit-testing, contact and absorption range.
    pub radius: f32,
    /// Presentation colour, opaque to the engine.
    pub color: String,
    motion: Motion,
    pub trail: Trail,
    pub pulse: Pulse,
}

impl Body {
    /// Creates a free body. Fails unless mass and radius are positive and finite.
    pub fn new(
        kind: BodyKind,
        pos: Vec2,
        vel: Vec2,
        mass: f32,
        radius: f32,
        color: impl Into<String>,
    ) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0 && radius.is_finite() && radius > 0.0) {
            return Err(Error::InvalidSpawnParameters { mass, radius });
        }

        Ok(Self {
            kind,
            pos,
            vel,
            mass,
            radius,
            color: color.into(),
            motion: Motion::Free,
            trail: Trail::new(),
            pulse: Pulse::default(),
        })
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn is_black_hole(&self) -> bool {
        self.kind == BodyKind::BlackHole
    }

    pub fn is_anchored(&self) -> bool {
        self.motion == Motion::Anchored
    }

    /// True if `point` lies within the body's radius.
    pub fn contains(&self, point: Vec2) -> bool {
        (point - self.pos).mag() <= self.radius
    }

    /// Accumulates an acceleration into the velocity. No-op when anchored.
    pub fn apply_force(&mut self, acc: Vec2) {
        if self.is_anchored() {
            return;
        }
        self.vel += acc;
    }

    /// Moves the body by its velocity for one tick and records the new
    /// position in the trail when `trail_capacity` is given.
    /// Anchored bodies stay put; black holes never leave a trail.
    pub fn advance(&mut self, trail_capacity: Option<usize>) {
        if self.is_anchored() {
            return;
        }
        self.pos += self.vel;

        if let Some(capacity) = trail_capacity {
            if !self.is_black_hole() {
                self.trail.push(self.pos, capacity);
            }
        }
    }

    /// Enlarges the body. Negative amounts are ignored so radii never shrink.
    pub fn grow(&mut self, amount: f32) {
        self.radius += amount.max(0.0);
    }

    /// Pins the body: zero velocity, frozen position.
    pub fn anchor(&mut self) {
        self.motion = Motion::Anchored;
        self.vel = Vec2::zero();
    }

    /// Releases a pinned body with a fresh velocity.
    pub fn release(&mut self, vel: Vec2) {
        self.motion = Motion::Free;
        self.vel = vel;
    }

    /// Marks a black hole as currently absorbing.
    pub fn mark_absorbing(&mut self) {
        self.pulse.mark_absorbing();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet(pos: Vec2, vel: Vec2) -> Body {
        Body::new(BodyKind::Planet, pos, vel, 1e4, 5.0, "red").unwrap()
    }

    #[test]
    fn rejects_non_positive_parameters() {
        for (mass, radius) in [(0.0, 1.0), (1.0, 0.0), (-1.0, 1.0), (f32::NAN, 1.0), (1.0, f32::INFINITY)] {
            let err = Body::new(BodyKind::Planet, Vec2::zero(), Vec2::zero(), mass, radius, "red");
            assert!(matches!(err, Err(Error::InvalidSpawnParameters { .. })));
        }
    }

    #[test]
    fn advance_applies_velocity_and_records_trail() {
        let mut body = planet(Vec2::new(1.0, 1.0), Vec2::new(2.0, -1.0));
        body.advance(Some(50));
        assert_eq!(body.pos, Vec2::new(3.0, 0.0));
        assert_eq!(body.trail.last(), Some(Vec2::new(3.0, 0.0)));

        body.advance(None);
        assert_eq!(body.pos, Vec2::new(5.0, -1.0));
        assert_eq!(body.trail.len(), 1);
    }

    #[test]
    fn trail_drops_oldest_first() {
        let mut body = planet(Vec2::zero(), Vec2::new(1.0, 0.0));
        for _ in 0..60 {
            body.advance(Some(50));
        }
        assert_eq!(body.trail.len(), 50);
        assert_eq!(body.trail.iter().next().copied(), Some(Vec2::new(11.0, 0.0)));
        assert_eq!(body.trail.last(), Some(Vec2::new(60.0, 0.0)));
    }

    #[test]
    fn black_holes_leave_no_trail() {
        let mut hole =
            Body::new(BodyKind::BlackHole, Vec2::zero(), Vec2::new(1.0, 0.0), 1e8, 60.0, "black").unwrap();
        hole.advance(Some(50));
        assert!(hole.trail.is_empty());
        assert_eq!(hole.pos, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn anchored_body_ignores_forces_and_stays_put() {
        let mut body = planet(Vec2::new(4.0, 4.0), Vec2::new(1.0, 1.0));
        body.anchor();
        assert_eq!(body.vel, Vec2::zero());

        body.apply_force(Vec2::new(3.0, 3.0));
        body.advance(Some(50));
        assert_eq!(body.vel, Vec2::zero());
        assert_eq!(body.pos, Vec2::new(4.0, 4.0));
        assert!(body.trail.is_empty());

        body.release(Vec2::new(0.5, -0.5));
        body.advance(None);
        assert_eq!(body.pos, Vec2::new(4.5, 3.5));
    }

    #[test]
    fn motion_changes_only_through_anchor_and_release() {
        let mut body = planet(Vec2::zero(), Vec2::new(2.0, 0.0));
        assert_eq!(body.kind(), BodyKind::Planet);
        assert_eq!(body.motion(), Motion::Free);

        body.anchor();
        assert_eq!(body.motion(), Motion::Anchored);
        assert_eq!(body.vel, Vec2::zero());

        body.release(Vec2::new(0.0, 1.0));
        assert_eq!(body.motion(), Motion::Free);
        assert_eq!(body.vel, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn pulse_clears_after_threshold() {
        let mut pulse = Pulse::default();
        pulse.advance(0.2, 10.0);
        assert_eq!(pulse.animation_time, 0.0);

        pulse.mark_absorbing();
        let mut frames = 0;
        while pulse.absorbing {
            pulse.advance(0.2, 10.0);
            frames += 1;
        }
        assert!(pulse.animation_time > 10.0);
        assert!((50..=52).contains(&frames));

        pulse.mark_absorbing();
        assert_eq!(pulse.animation_time, 0.0);
    }

    #[test]
    fn grow_never_shrinks() {
        let mut body = planet(Vec2::zero(), Vec2::zero());
        body.grow(-3.0);
        assert_eq!(body.radius, 5.0);
        body.grow(2.0);
        assert_eq!(body.radius, 7.0);
    }

    #[test]
    fn contains_includes_the_rim() {
        let body = planet(Vec2::zero(), Vec2::zero());
        assert!(body.contains(Vec2::new(5.0, 0.0)));
        assert!(!body.contains(Vec2::new(5.1, 0.0)));
    }
}
