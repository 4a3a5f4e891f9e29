//! Per-tick force pass.
//!
//! Every object (bodies first, then black holes, each in insertion order) is
//! processed in turn: it sums the pull of every partner into its velocity,
//! absorbs what it can if it is a black hole, then moves. Objects are updated
//! one after the other, so later objects already see the new positions of
//! earlier ones.
//!
//! Absorbed bodies are only marked during the pass and removed afterwards,
//! so no body is skipped or visited twice.

use crate::{
    body::Body,
    config::SimulationConfig,
    universe::{ObjectId, Universe},
    utils,
};

/// Switches read by the force pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassOptions {
    pub gravity: bool,
    pub trails: bool,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            gravity: true,
            trails: false,
        }
    }
}

/// What happened during one force pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Bodies swallowed by black holes.
    pub absorbed: usize,
    /// Black holes grown by touching another black hole.
    pub near_field: usize,
}

/// Runs one force pass over the whole universe.
pub fn integrate(universe: &mut Universe, config: &SimulationConfig, options: PassOptions) -> PassReport {
    let (bodies, black_holes) = universe.populations_mut();
    let mut absorbed = vec![false; bodies.len()];
    let mut report = PassReport::default();

    for i in 0..bodies.len() {
        if absorbed[i] {
            continue;
        }
        step_object(bodies, black_holes, &mut absorbed, ObjectId::Body(i), config, options, &mut report);
    }
    for i in 0..black_holes.len() {
        step_object(bodies, black_holes, &mut absorbed, ObjectId::BlackHole(i), config, options, &mut report);
    }

    if report.absorbed > 0 {
        let mut index = 0;
        bodies.retain(|_| {
            let keep = !absorbed[index];
            index += 1;
            keep
        });
    }

    report
}

fn step_object(
    bodies: &mut [Body],
    black_holes: &mut [Body],
    absorbed: &mut [bool],
    id: ObjectId,
    config: &SimulationConfig,
    options: PassOptions,
    report: &mut PassReport,
) {
    let this = match id {
        ObjectId::Body(i) => &bodies[i],
        ObjectId::BlackHole(i) => &black_holes[i],
    };
    let pos = this.pos;
    let mass = this.mass;
    let is_black_hole = this.is_black_hole();
    let pulled = options.gravity && !this.is_anchored();

    // Radius may grow mid-loop; later partners see the larger radius.
    let mut radius = this.radius;
    let mut vel = this.vel;
    let mut swallowed = 0;
    let g = config.gravitational_constant;

    for (j, other) in bodies.iter().enumerate() {
        if absorbed[j] || id == ObjectId::Body(j) {
            continue;
        }

        let d = utils::distance(pos, other.pos);

        // Contact suppresses the force and its singularity at d -> 0.
        if pulled && d > radius + other.radius {
            vel += utils::gravitational_acceleration(g, pos, other.pos, mass, other.mass, d);
        }

        if is_black_hole && d < radius * config.absorb_radius_ratio {
            absorbed[j] = true;
            radius += config.absorb_growth;
            swallowed += 1;
            log::debug!(
                "black hole at ({:.1}, {:.1}) absorbed body at ({:.1}, {:.1})",
                pos.x,
                pos.y,
                other.pos.x,
                other.pos.y
            );
        }
    }

    let mut touched = Vec::new();
    for (j, other) in black_holes.iter().enumerate() {
        if id == ObjectId::BlackHole(j) {
            continue;
        }

        let d = utils::distance(pos, other.pos);

        if pulled && d > radius + other.radius {
            vel += utils::gravitational_acceleration(g, pos, other.pos, mass, other.mass, d);
        }

        if is_black_hole && options.gravity && config.near_field_growth.is_some() && d < radius + other.radius {
            touched.push(j);
        }
    }

    let this = match id {
        ObjectId::Body(i) => &mut bodies[i],
        ObjectId::BlackHole(i) => &mut black_holes[i],
    };
    if pulled {
        this.vel = vel;
    }
    if swallowed > 0 {
        this.grow(radius - this.radius);
        this.mark_absorbing();
        report.absorbed += swallowed;
    }
    this.advance(options.trails.then_some(config.trail_length));

    if let Some(growth) = config.near_field_growth {
        for j in touched {
            black_holes[j].grow(growth);
            black_holes[j].mark_absorbing();
            report.near_field += 1;
        }
    }
}
