use crate::{
    body::{Body, BodyKind},
    config::SimulationConfig,
    error::Result,
    utils,
};

use ultraviolet::Vec2;

/// Location of an object inside a [`Universe`].
///
/// This is a list index, not a stable handle: absorption, merges, `clear`
/// and loads reorder or shrink the lists, so an id is only meaningful until
/// the universe is next stepped or replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectId {
    Body(usize),
    BlackHole(usize),
}

/// The whole simulated population.
///
/// Planets and stars live in `bodies`, black holes in `black_holes`; an
/// object is routed by its kind on insertion so the two never overlap.
/// Both keep insertion order, which the integrator and the merge sweep
/// rely on for reproducible frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Universe {
    bodies: Vec<Body>,
    black_holes: Vec<Body>,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object to the population matching its kind.
    pub fn insert(&mut self, body: Body) -> ObjectId {
        if body.is_black_hole() {
            self.black_holes.push(body);
            ObjectId::BlackHole(self.black_holes.len() - 1)
        } else {
            self.bodies.push(body);
            ObjectId::Body(self.bodies.len() - 1)
        }
    }

    /// Planets and stars, in insertion order.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    /// Black holes, in insertion order.
    pub fn black_holes(&self) -> &[Body] {
        &self.black_holes
    }

    pub fn black_holes_mut(&mut self) -> &mut [Body] {
        &mut self.black_holes
    }

    pub(crate) fn populations_mut(&mut self) -> (&mut Vec<Body>, &mut Vec<Body>) {
        (&mut self.bodies, &mut self.black_holes)
    }

    pub fn get(&self, id: ObjectId) -> Option<&Body> {
        match id {
            ObjectId::Body(i) => self.bodies.get(i),
            ObjectId::BlackHole(i) => self.black_holes.get(i),
        }
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Body> {
        match id {
            ObjectId::Body(i) => self.bodies.get_mut(i),
            ObjectId::BlackHole(i) => self.black_holes.get_mut(i),
        }
    }

    /// Total number of objects, black holes included.
    pub fn len(&self) -> usize {
        self.bodies.len() + self.black_holes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty() && self.black_holes.is_empty()
    }

    /// Empties both populations.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.black_holes.clear();
    }

    /// First object whose disc contains `point`, scanning bodies then black
    /// holes in insertion order.
    pub fn hit_test(&self, point: Vec2) -> Option<ObjectId> {
        if let Some(i) = self.bodies.iter().position(|b| b.contains(point)) {
            return Some(ObjectId::Body(i));
        }
        self.black_holes
            .iter()
            .position(|b| b.contains(point))
            .map(ObjectId::BlackHole)
    }

    /// Adds a planet at a random spot in the world with a random radius,
    /// colour and drift.
    pub fn spawn_planet(&mut self, config: &SimulationConfig, rng: &mut fastrand::Rng) -> Result<ObjectId> {
        let pos = Vec2::new(rng.f32() * config.world_width, rng.f32() * config.world_height);
        let radius = rng.f32() * config.planet_radius_span + config.planet_radius_min;
        let mass = radius * config.planet_density;
        let color = utils::random_hsl_color(rng);
        let vel = utils::random_velocity(rng, 1.0);

        let body = Body::new(BodyKind::Planet, pos, vel, mass, radius, color)?;
        log::debug!("spawned planet at ({:.1}, {:.1}) r={radius:.2}", pos.x, pos.y);
        Ok(self.insert(body))
    }

    /// Adds a heavy yellow star at the centre of the world.
    pub fn spawn_star(&mut self, config: &SimulationConfig, rng: &mut fastrand::Rng) -> Result<ObjectId> {
        let pos = Vec2::new(config.world_width, config.world_height) * 0.5;
        let radius = config.star_radius;
        let mass = radius * config.star_density;
        let vel = utils::random_velocity(rng, 1.0);

        let body = Body::new(BodyKind::Star, pos, vel, mass, radius, "yellow")?;
        log::debug!("spawned star at ({:.1}, {:.1})", pos.x, pos.y);
        Ok(self.insert(body))
    }

    /// Adds a black hole at `pos`.
    pub fn spawn_black_hole(
        &mut self,
        pos: Vec2,
        config: &SimulationConfig,
        rng: &mut fastrand::Rng,
    ) -> Result<ObjectId> {
        let vel = utils::random_velocity(rng, 1.0);
        let body = Body::new(
            BodyKind::BlackHole,
            pos,
            vel,
            config.black_hole_mass,
            config.black_hole_radius,
            "black",
        )?;
        log::debug!("spawned black hole at ({:.1}, {:.1})", pos.x, pos.y);
        Ok(self.insert(body))
    }
}
