//! Saved universes.
//!
//! A snapshot is a flat, versioned JSON document with two ordered lists,
//! `objects` (planets and stars) and `blackHoles`. Keys are camelCase, as in
//! the browser sandbox save files. Transient visual state (the absorbing
//! pulse) is saved as well so a restored universe carries on exactly where
//! it left off.

use crate::{
    body::{Body, BodyKind, Pulse, Trail},
    error::{Error, Result},
    universe::Universe,
};

use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

use std::path::Path;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Version assumed for documents without a `version` key, as written by the
/// browser sandbox. They share the version 1 layout.
pub const LEGACY_VERSION: u32 = 0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default = "legacy_version")]
    pub version: u32,
    pub objects: Vec<BodyRecord>,
    pub black_holes: Vec<BlackHoleRecord>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    #[default]
    Planet,
    Star,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyRecord {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub mass: f32,
    pub color: String,
    pub vx: f32,
    pub vy: f32,
    pub anchored: bool,
    pub trail: Vec<TrailPoint>,
    pub is_black_hole: bool,
    pub is_absorbing: bool,
    pub animation_time: f32,
    #[serde(default)]
    pub kind: RecordKind,
}

/// A saved black hole. Velocity, anchoring and the explosion flag are
/// optional so that records written without them still load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackHoleRecord {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub mass: f32,
    pub is_black_hole: bool,
    pub is_absorbing: bool,
    pub animation_time: f32,
    #[serde(default)]
    pub vx: f32,
    #[serde(default)]
    pub vy: f32,
    #[serde(default)]
    pub anchored: bool,
    #[serde(default)]
    pub explosion_triggered: bool,
    #[serde(default = "black")]
    pub color: String,
}

fn legacy_version() -> u32 {
    LEGACY_VERSION
}

fn black() -> String {
    "black".to_owned()
}

/// Captures the whole universe.
pub fn serialize(universe: &Universe) -> Snapshot {
    Snapshot {
        version: SNAPSHOT_VERSION,
        objects: universe.bodies().iter().map(BodyRecord::from).collect(),
        black_holes: universe.black_holes().iter().map(BlackHoleRecord::from).collect(),
    }
}

/// Rebuilds a universe from a snapshot.
///
/// Every record is checked before anything is built, so a failure never
/// yields a half-restored universe. Trails longer than `trail_capacity`
/// are rejected.
pub fn deserialize(snapshot: &Snapshot, trail_capacity: usize) -> Result<Universe> {
    if !matches!(snapshot.version, LEGACY_VERSION | SNAPSHOT_VERSION) {
        return Err(Error::malformed(format!(
            "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
            snapshot.version
        )));
    }

    let mut universe = Universe::new();
    for (i, record) in snapshot.objects.iter().enumerate() {
        let body = record
            .to_body(trail_capacity)
            .map_err(|reason| Error::malformed(format!("objects[{i}]: {reason}")))?;
        universe.insert(body);
    }
    for (i, record) in snapshot.black_holes.iter().enumerate() {
        let body = record
            .to_body()
            .map_err(|reason| Error::malformed(format!("blackHoles[{i}]: {reason}")))?;
        universe.insert(body);
    }
    Ok(universe)
}

pub fn to_json(universe: &Universe) -> Result<String> {
    Ok(serde_json::to_string(&serialize(universe))?)
}

pub fn from_json(json: &str, trail_capacity: usize) -> Result<Universe> {
    let snapshot: Snapshot =
        serde_json::from_str(json).map_err(|e| Error::malformed(e.to_string()))?;
    deserialize(&snapshot, trail_capacity)
}

pub fn save_to_file(universe: &Universe, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, to_json(universe)?)?;
    log::info!("saved {} objects to {}", universe.len(), path.display());
    Ok(())
}

pub fn load_from_file(path: impl AsRef<Path>, trail_capacity: usize) -> Result<Universe> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let universe = from_json(&json, trail_capacity)?;
    log::info!("loaded {} objects from {}", universe.len(), path.display());
    Ok(universe)
}

impl From<&Body> for BodyRecord {
    fn from(body: &Body) -> Self {
        Self {
            x: body.pos.x,
            y: body.pos.y,
            radius: body.radius,
            mass: body.mass,
            color: body.color.clone(),
            vx: saved_velocity(body).x,
            vy: saved_velocity(body).y,
            anchored: body.is_anchored(),
            trail: body.trail.iter().map(|p| TrailPoint { x: p.x, y: p.y }).collect(),
            is_black_hole: false,
            is_absorbing: body.pulse.absorbing,
            animation_time: body.pulse.animation_time,
            kind: match body.kind() {
                BodyKind::Star => RecordKind::Star,
                _ => RecordKind::Planet,
            },
        }
    }
}

impl From<&Body> for BlackHoleRecord {
    fn from(body: &Body) -> Self {
        Self {
            x: body.pos.x,
            y: body.pos.y,
            radius: body.radius,
            mass: body.mass,
            is_black_hole: true,
            is_absorbing: body.pulse.absorbing,
            animation_time: body.pulse.animation_time,
            vx: saved_velocity(body).x,
            vy: saved_velocity(body).y,
            anchored: body.is_anchored(),
            explosion_triggered: body.pulse.explosion_triggered,
            color: body.color.clone(),
        }
    }
}

/// Anchored bodies never move, so their velocity is saved as zero.
fn saved_velocity(body: &Body) -> Vec2 {
    if body.is_anchored() { Vec2::zero() } else { body.vel }
}

impl BodyRecord {
    fn to_body(&self, trail_capacity: usize) -> std::result::Result<Body, String> {
        if self.is_black_hole {
            return Err("black hole listed among objects".into());
        }
        if self.trail.len() > trail_capacity {
            return Err(format!("trail of {} points exceeds {trail_capacity}", self.trail.len()));
        }
        if self.trail.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err("non-finite trail point".into());
        }

        let kind = match self.kind {
            RecordKind::Planet => BodyKind::Planet,
            RecordKind::Star => BodyKind::Star,
        };
        let mut body = restore(
            kind,
            [self.x, self.y, self.vx, self.vy],
            self.mass,
            self.radius,
            &self.color,
            self.anchored,
        )?;
        body.trail = self.trail.iter().map(|p| Vec2::new(p.x, p.y)).collect::<Trail>();
        body.pulse = pulse(self.is_absorbing, self.animation_time, false)?;
        Ok(body)
    }
}

impl BlackHoleRecord {
    fn to_body(&self) -> std::result::Result<Body, String> {
        if !self.is_black_hole {
            return Err("ordinary body listed among black holes".into());
        }

        let mut body = restore(
            BodyKind::BlackHole,
            [self.x, self.y, self.vx, self.vy],
            self.mass,
            self.radius,
            &self.color,
            self.anchored,
        )?;
        body.pulse = pulse(self.is_absorbing, self.animation_time, self.explosion_triggered)?;
        Ok(body)
    }
}

fn restore(
    kind: BodyKind,
    [x, y, vx, vy]: [f32; 4],
    mass: f32,
    radius: f32,
    color: &str,
    anchored: bool,
) -> std::result::Result<Body, String> {
    if [x, y, vx, vy].iter().any(|v| !v.is_finite()) {
        return Err("non-finite position or velocity".into());
    }
    if anchored && (vx != 0.0 || vy != 0.0) {
        return Err("anchored body with non-zero velocity".into());
    }

    let mut body = Body::new(kind, Vec2::new(x, y), Vec2::new(vx, vy), mass, radius, color)
        .map_err(|e| e.to_string())?;
    if anchored {
        body.anchor();
    }
    Ok(body)
}

fn pulse(absorbing: bool, animation_time: f32, explosion_triggered: bool) -> std::result::Result<Pulse, String> {
    if !(animation_time.is_finite() && animation_time >= 0.0) {
        return Err(format!("animation time {animation_time} out of range"));
    }
    Ok(Pulse {
        absorbing,
        animation_time,
        explosion_triggered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Universe {
        let mut universe = Universe::new();

        let mut planet =
            Body::new(BodyKind::Planet, Vec2::new(1.5, -2.25), Vec2::new(0.1, 0.2), 7e4, 7.0, "hsl(120.0, 80%, 60%)")
                .unwrap();
        planet.trail.push(Vec2::new(1.0, -2.0), 50);
        planet.trail.push(Vec2::new(1.5, -2.25), 50);
        universe.insert(planet);

        let mut star = Body::new(BodyKind::Star, Vec2::new(640.0, 360.0), Vec2::zero(), 3e7, 30.0, "yellow").unwrap();
        star.anchor();
        universe.insert(star);

        let mut hole =
            Body::new(BodyKind::BlackHole, Vec2::new(10.0, 10.0), Vec2::new(-0.5, 0.25), 1e8, 71.0, "black").unwrap();
        hole.mark_absorbing();
        hole.pulse.animation_time = 3.4;
        hole.pulse.explosion_triggered = true;
        universe.insert(hole);

        universe
    }

    #[test]
    fn json_round_trip_is_exact() {
        let universe = sample();
        let json = to_json(&universe).unwrap();
        let restored = from_json(&json, 50).unwrap();
        assert_eq!(restored, universe);
    }

    #[test]
    fn uses_camel_case_keys() {
        let json = to_json(&sample()).unwrap();
        for key in ["\"blackHoles\"", "\"isBlackHole\"", "\"isAbsorbing\"", "\"animationTime\"", "\"version\":1"] {
            assert!(json.contains(key), "missing {key} in {json}");
        }
    }

    #[test]
    fn accepts_reduced_black_hole_records() {
        let json = r#"{
            "version": 1,
            "objects": [],
            "blackHoles": [
                { "x": 5, "y": 6, "radius": 60, "mass": 1e8, "isBlackHole": true,
                  "isAbsorbing": false, "animationTime": 0 }
            ]
        }"#;
        let universe = from_json(json, 50).unwrap();
        let hole = &universe.black_holes()[0];
        assert_eq!(hole.pos, Vec2::new(5.0, 6.0));
        assert_eq!(hole.vel, Vec2::zero());
        assert_eq!(hole.color, "black");
        assert!(!hole.is_anchored());
    }

    #[test]
    fn rejects_malformed_input() {
        let cases = [
            "not json",
            r#"{ "objects": [] }"#,
            r#"{ "version": 2, "objects": [], "blackHoles": [] }"#,
            r#"{ "version": 1, "objects": [{ "x": 1 }], "blackHoles": [] }"#,
            r#"{ "version": 1, "objects": [], "blackHoles": [{ "x": 0, "y": 0, "radius": -1, "mass": 1,
                 "isBlackHole": true, "isAbsorbing": false, "animationTime": 0 }] }"#,
            r#"{ "version": 1, "objects": [], "blackHoles": [{ "x": 0, "y": 0, "radius": 1, "mass": 1,
                 "isBlackHole": false, "isAbsorbing": false, "animationTime": 0 }] }"#,
            r#"{ "version": 1, "objects": [{ "x": 0, "y": 0, "radius": 1, "mass": 1, "color": "red",
                 "vx": 1, "vy": 0, "anchored": true, "trail": [], "isBlackHole": false,
                 "isAbsorbing": false, "animationTime": 0 }], "blackHoles": [] }"#,
            r#"{ "version": 1, "objects": [{ "x": 0, "y": 0, "radius": 1, "mass": 1, "color": "red",
                 "vx": 0, "vy": 0, "anchored": false, "trail": [], "isBlackHole": false,
                 "isAbsorbing": false, "animationTime": -1 }], "blackHoles": [] }"#,
        ];
        for json in cases {
            assert!(
                matches!(from_json(json, 50), Err(Error::MalformedSnapshot(_))),
                "accepted {json}"
            );
        }
    }

    #[test]
    fn loads_browser_save_files_without_version() {
        let json = r#"{"objects":[{"x":100,"y":200,"radius":8,"mass":80000,"color":"hsl(200.5, 80%, 60%)",
            "vx":0.5,"vy":-0.25,"anchored":false,"trail":[{"x":99.5,"y":200.25},{"x":100,"y":200}],
            "isBlackHole":false,"isAbsorbing":false,"animationTime":0},
            {"x":640,"y":360,"radius":30,"mass":30000000,"color":"yellow","vx":0,"vy":0,"anchored":true,
            "trail":[],"isBlackHole":false,"isAbsorbing":false,"animationTime":0}],
            "blackHoles":[{"x":5,"y":6,"radius":60,"mass":1e8,"isBlackHole":true,"isAbsorbing":false,"animationTime":0}]}"#;

        let universe = from_json(json, 50).unwrap();
        assert_eq!(universe.bodies().len(), 2);
        assert_eq!(universe.bodies()[0].trail.len(), 2);
        assert_eq!(universe.bodies()[0].vel, Vec2::new(0.5, -0.25));
        assert!(universe.bodies()[1].is_anchored());
        assert_eq!(universe.black_holes()[0].pos, Vec2::new(5.0, 6.0));

        // Re-saving upgrades to the current version.
        assert_eq!(serialize(&universe).version, SNAPSHOT_VERSION);
    }

    #[test]
    fn anchored_bodies_save_with_zero_velocity() {
        let mut universe = sample();
        universe.bodies_mut()[1].vel = Vec2::new(3.0, 4.0);

        let snapshot = serialize(&universe);
        assert_eq!((snapshot.objects[1].vx, snapshot.objects[1].vy), (0.0, 0.0));
        let restored = deserialize(&snapshot, 50).unwrap();
        assert!(restored.bodies()[1].is_anchored());
    }

    #[test]
    fn rejects_oversized_trails() {
        let mut snapshot = serialize(&sample());
        snapshot.objects[0].trail = vec![TrailPoint { x: 0.0, y: 0.0 }; 51];
        assert!(matches!(deserialize(&snapshot, 50), Err(Error::MalformedSnapshot(_))));
    }
}
