use crate::error::{Error, Result};

use serde::{Deserialize, Serialize};

use std::path::Path;

/// Tunable constants of the sandbox.
///
/// Defaults reproduce the classic browser sandbox: a scaled gravitational
/// constant so motion is visible at one step per display refresh, 50-point
/// trails and a 5 second pointer arming window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Scaled gravitational constant (not SI).
    pub gravitational_constant: f32,
    /// Maximum number of positions kept in a trail.
    pub trail_length: usize,
    /// Pulse animation increment per frame while a black hole is absorbing.
    pub pulse_step: f32,
    /// The absorbing flag clears once the pulse animation exceeds this.
    pub pulse_threshold: f32,
    /// A body closer than `radius * absorb_radius_ratio` to a black hole is absorbed.
    pub absorb_radius_ratio: f32,
    /// Radius gained by a black hole per absorbed body.
    pub absorb_growth: f32,
    /// Radius gained by a black hole touched by another black hole during the
    /// force pass. `None` leaves black-hole growth to the merge sweep alone.
    pub near_field_growth: Option<f32>,
    /// Radius gained by both black holes of a merging pair.
    pub merge_growth: f32,
    /// Magnitude of the velocity kick every body receives from a merge.
    pub blast_impulse: f32,
    /// Released bodies get a random velocity in `[-release_speed, release_speed]` per axis.
    pub release_speed: f32,
    pub world_width: f32,
    pub world_height: f32,
    pub planet_radius_min: f32,
    pub planet_radius_span: f32,
    /// Planet mass per unit of radius.
    pub planet_density: f32,
    pub star_radius: f32,
    /// Star mass per unit of radius.
    pub star_density: f32,
    pub black_hole_radius: f32,
    pub black_hole_mass: f32,
    /// Seconds before an unconsumed pointer arming expires.
    pub arming_timeout_secs: f32,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: Self::DEFAULT_G,
            trail_length: Self::DEFAULT_TRAIL_LENGTH,
            pulse_step: 0.2,
            pulse_threshold: 10.0,
            absorb_radius_ratio: 0.5,
            absorb_growth: 1.0,
            near_field_growth: None,
            merge_growth: 10.0,
            blast_impulse: 50.0,
            release_speed: 1.0,
            world_width: 1280.0,
            world_height: 720.0,
            planet_radius_min: 5.0,
            planet_radius_span: 10.0,
            planet_density: 1e4,
            star_radius: 30.0,
            star_density: 1e6,
            black_hole_radius: 60.0,
            black_hole_mass: 1e8,
            arming_timeout_secs: 5.0,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub const DEFAULT_G: f32 = 6.6743e-4;
    pub const DEFAULT_TRAIL_LENGTH: usize = 50;

    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Checks that every physical constant is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("gravitational_constant", self.gravitational_constant),
            ("pulse_step", self.pulse_step),
            ("absorb_radius_ratio", self.absorb_radius_ratio),
            ("planet_radius_min", self.planet_radius_min),
            ("planet_density", self.planet_density),
            ("star_radius", self.star_radius),
            ("star_density", self.star_density),
            ("black_hole_radius", self.black_hole_radius),
            ("black_hole_mass", self.black_hole_mass),
            ("world_width", self.world_width),
            ("world_height", self.world_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }

        // Growth rules may be zero but never shrink a black hole.
        let non_negative = [
            ("pulse_threshold", self.pulse_threshold),
            ("absorb_growth", self.absorb_growth),
            ("near_field_growth", self.near_field_growth.unwrap_or(0.0)),
            ("merge_growth", self.merge_growth),
            ("blast_impulse", self.blast_impulse),
            ("release_speed", self.release_speed),
            ("planet_radius_span", self.planet_radius_span),
            ("arming_timeout_secs", self.arming_timeout_secs),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must not be negative, got {value}")));
            }
        }

        if self.trail_length == 0 {
            return Err(Error::InvalidConfig("trail_length must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = SimulationConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.trail_length, 50);
        assert_eq!(config.near_field_growth, None);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config =
            SimulationConfig::from_json_str(r#"{ "seed": 7, "near_field_growth": 2.0 }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.near_field_growth, Some(2.0));
        assert_eq!(config.black_hole_radius, 60.0);
    }

    #[test]
    fn rejects_non_positive_constants() {
        let err = SimulationConfig::from_json_str(r#"{ "black_hole_mass": 0.0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = SimulationConfig::from_json_str(r#"{ "merge_growth": -1.0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            SimulationConfig::from_json_str("not json"),
            Err(Error::InvalidConfig(_))
        ));
    }
}
