use crate::{
    anchor::{self, AnchorToggle},
    config::SimulationConfig,
    controls::{PointerAction, PointerMode},
    error::Result,
    integrator::{self, PassOptions},
    merger,
    snapshot::{self, Snapshot},
    universe::{ObjectId, Universe},
};

use ultraviolet::Vec2;

use std::{
    path::Path,
    time::{Duration, Instant},
};

/// What a pointer click ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing was armed, or the arming had lapsed.
    Ignored,
    /// Anchor mode was armed; `None` if the click hit nothing.
    Anchor(Option<AnchorToggle>),
    BlackHolePlaced(ObjectId),
}

/// Counts of what happened during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub absorbed: usize,
    pub near_field: usize,
    pub merges: usize,
}

/// Drives the sandbox one display frame at a time.
///
/// Owns the universe, the run/gravity/trail switches, the pointer arming
/// state and the random source used for spawning and releasing anchors.
#[derive(Debug)]
pub struct Simulation {
    pub config: SimulationConfig,
    /// Current frame count.
    pub frame: usize,
    pub universe: Universe,
    pub running: bool,
    pub gravity_enabled: bool,
    pub trails_enabled: bool,
    pub pointer: PointerMode,
    rng: fastrand::Rng,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// An empty, paused sandbox with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self::with_universe(Universe::new(), config)
    }

    pub fn with_universe(universe: Universe, config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        Self {
            config,
            frame: 0,
            universe,
            running: false,
            gravity_enabled: true,
            trails_enabled: false,
            pointer: PointerMode::Idle,
            rng,
        }
    }

    /// Advances the sandbox by one frame.
    ///
    /// The force pass only runs while the simulation is running. Black hole
    /// pulses and the merge sweep run every frame regardless.
    pub fn step(&mut self) -> FrameReport {
        let mut report = FrameReport::default();

        if self.running {
            let options = PassOptions {
                gravity: self.gravity_enabled,
                trails: self.trails_enabled,
            };
            let pass = integrator::integrate(&mut self.universe, &self.config, options);
            report.absorbed = pass.absorbed;
            report.near_field = pass.near_field;
        }

        for hole in self.universe.black_holes_mut() {
            hole.pulse.advance(self.config.pulse_step, self.config.pulse_threshold);
        }

        report.merges = merger::merge_black_holes(&mut self.universe, &self.config).len();

        self.frame += 1;
        log::trace!(
            "frame {}: {} bodies, {} black holes, {report:?}",
            self.frame,
            self.universe.bodies().len(),
            self.universe.black_holes().len()
        );
        report
    }

    /// Flips run/pause and returns the new state.
    pub fn toggle_running(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    pub fn toggle_gravity(&mut self) -> bool {
        self.gravity_enabled = !self.gravity_enabled;
        self.gravity_enabled
    }

    pub fn toggle_trails(&mut self) -> bool {
        self.trails_enabled = !self.trails_enabled;
        self.trails_enabled
    }

    /// Empties the universe. Switches and the frame counter are kept.
    pub fn clear(&mut self) {
        self.universe.clear();
        log::info!("universe cleared");
    }

    pub fn add_planet(&mut self) -> Result<ObjectId> {
        self.universe.spawn_planet(&self.config, &mut self.rng)
    }

    pub fn add_star(&mut self) -> Result<ObjectId> {
        self.universe.spawn_star(&self.config, &mut self.rng)
    }

    /// Places a black hole at `pos` right away.
    pub fn add_black_hole(&mut self, pos: Vec2) -> Result<ObjectId> {
        self.universe.spawn_black_hole(pos, &self.config, &mut self.rng)
    }

    /// The next click places a black hole.
    pub fn arm_black_hole(&mut self, now: Instant) {
        self.pointer.arm_black_hole(now);
    }

    /// The next click pins or releases the object under the pointer.
    pub fn arm_anchor(&mut self, now: Instant) {
        self.pointer.arm_anchor(now);
    }

    /// Whether a click at `now` would still be consumed.
    pub fn is_armed(&self, now: Instant) -> bool {
        self.pointer.pending(now, self.arming_timeout()).is_some()
    }

    /// Handles a pointer click at world position `point`.
    pub fn click(&mut self, point: Vec2, now: Instant) -> Result<ClickOutcome> {
        let outcome = match self.pointer.take(now, self.arming_timeout()) {
            None => ClickOutcome::Ignored,
            Some(PointerAction::ToggleAnchor) => ClickOutcome::Anchor(self.toggle_anchor_at(point)),
            Some(PointerAction::PlaceBlackHole) => ClickOutcome::BlackHolePlaced(self.add_black_hole(point)?),
        };
        Ok(outcome)
    }

    /// Pins or releases the first object under `point`.
    pub fn toggle_anchor_at(&mut self, point: Vec2) -> Option<AnchorToggle> {
        anchor::toggle_anchor_at(&mut self.universe, point, self.config.release_speed, &mut self.rng)
    }

    pub fn save(&self) -> Snapshot {
        snapshot::serialize(&self.universe)
    }

    /// Replaces the universe with the snapshot's. On error nothing changes.
    pub fn load(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.universe = snapshot::deserialize(snapshot, self.config.trail_length)?;
        log::info!("universe restored with {} objects", self.universe.len());
        Ok(())
    }

    pub fn save_json(&self) -> Result<String> {
        snapshot::to_json(&self.universe)
    }

    pub fn load_json(&mut self, json: &str) -> Result<()> {
        self.universe = snapshot::from_json(json, self.config.trail_length)?;
        log::info!("universe restored with {} objects", self.universe.len());
        Ok(())
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        snapshot::save_to_file(&self.universe, path)
    }

    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.universe = snapshot::load_from_file(path, self.config.trail_length)?;
        Ok(())
    }

    fn arming_timeout(&self) -> Duration {
        Duration::try_from_secs_f32(self.config.arming_timeout_secs).unwrap_or(Duration::ZERO)
    }
}
