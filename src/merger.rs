//! Black hole merge sweep.
//!
//! Runs once per frame after the force pass, whether or not the simulation is
//! running and whether or not gravity is on. Each black hole merges with at
//! most one later partner per sweep.

use crate::{body::Body, config::SimulationConfig, universe::Universe, utils};

use ultraviolet::Vec2;

/// One resolved merge.
#[derive(Clone, Debug, PartialEq)]
pub struct Merge {
    /// Index of the surviving black hole after the sweep.
    pub survivor: usize,
    /// The black hole that was swallowed, as it was when removed.
    pub swallowed: Body,
    /// Centre of the blast, midway between the two black holes.
    pub midpoint: Vec2,
}

/// Merges every pair of overlapping black holes and blasts bodies away from
/// each merge.
///
/// For a black hole `i`, the first later black hole `j` whose disc overlaps
/// it is merged: both grow, both are flagged as exploded, every free body is
/// kicked away from their midpoint and `j` is removed. The sweep then moves on
/// to `i + 1` over the shortened list.
pub fn merge_black_holes(universe: &mut Universe, config: &SimulationConfig) -> Vec<Merge> {
    let (bodies, black_holes) = universe.populations_mut();
    let mut merges = Vec::new();

    let mut i = 0;
    while i < black_holes.len() {
        for j in (i + 1)..black_holes.len() {
            let (a, b) = (&black_holes[i], &black_holes[j]);
            if utils::distance(a.pos, b.pos) >= a.radius + b.radius {
                continue;
            }

            let midpoint = (a.pos + b.pos) * 0.5;
            for hole in [i, j] {
                black_holes[hole].grow(config.merge_growth);
                black_holes[hole].pulse.explosion_triggered = true;
            }

            blast(bodies, midpoint, config.blast_impulse);

            let swallowed = black_holes.remove(j);
            log::debug!(
                "black holes merged at ({:.1}, {:.1}), survivor radius {:.1}",
                midpoint.x,
                midpoint.y,
                black_holes[i].radius
            );
            merges.push(Merge {
                survivor: i,
                swallowed,
                midpoint,
            });
            break;
        }
        i += 1;
    }

    merges
}

/// Kicks every free body directly away from `center`. Anchored bodies hold.
fn blast(bodies: &mut [Body], center: Vec2, impulse: f32) {
    for body in bodies {
        let kick = utils::direction_from(center, body.pos) * impulse;
        body.apply_force(kick);
    }
}
