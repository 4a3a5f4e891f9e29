use crate::{
    body::Body,
    config::SimulationConfig,
    simulation::{ClickOutcome, Simulation},
};
use ultraviolet::Vec2;

use std::{
    ffi::{CStr, CString, c_char},
    time::Instant,
};

/// Flat copy of one object for hosts drawing the universe.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyView {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub mass: f32,
    pub animation_time: f32,
    pub trail_len: u32,
    pub is_black_hole: bool,
    pub is_absorbing: bool,
    pub anchored: bool,
}

impl From<&Body> for BodyView {
    fn from(body: &Body) -> Self {
        Self {
            x: body.pos.x,
            y: body.pos.y,
            vx: body.vel.x,
            vy: body.vel.y,
            radius: body.radius,
            mass: body.mass,
            animation_time: body.pulse.animation_time,
            trail_len: body.trail.len() as u32,
            is_black_hole: body.is_black_hole(),
            is_absorbing: body.pulse.absorbing,
            anchored: body.is_anchored(),
        }
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn Sandbox_Create() -> *mut Simulation {
    Box::into_raw(Box::new(Simulation::new()))
}

#[unsafe(no_mangle)]
pub extern "C" fn Sandbox_CreateSeeded(seed: u64) -> *mut Simulation {
    let config = SimulationConfig {
        seed: Some(seed),
        ..SimulationConfig::default()
    };
    Box::into_raw(Box::new(Simulation::with_config(config)))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Destroy(handle: *mut Simulation) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)) };
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Step(handle: *mut Simulation) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.step();
    }
}

/// Returns 0 on success, -1 on failure or a null handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_AddPlanet(handle: *mut Simulation) -> i32 {
    match unsafe { handle.as_mut() } {
        Some(sim) => status(sim.add_planet().is_ok()),
        None => -1,
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_AddStar(handle: *mut Simulation) -> i32 {
    match unsafe { handle.as_mut() } {
        Some(sim) => status(sim.add_star().is_ok()),
        None => -1,
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_ArmBlackHole(handle: *mut Simulation) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.arm_black_hole(Instant::now());
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_ArmAnchor(handle: *mut Simulation) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.arm_anchor(Instant::now());
    }
}

/// Feeds a click at world position (x, y).
/// Returns 1 if the click was consumed, 0 if ignored, -1 on failure.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Click(handle: *mut Simulation, x: f32, y: f32) -> i32 {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return -1;
    };
    match sim.click(Vec2::new(x, y), Instant::now()) {
        Ok(ClickOutcome::Ignored) => 0,
        Ok(_) => 1,
        Err(e) => {
            log::warn!("click failed: {e}");
            -1
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_ToggleRunning(handle: *mut Simulation) -> bool {
    unsafe { handle.as_mut() }.is_some_and(|sim| sim.toggle_running())
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_ToggleGravity(handle: *mut Simulation) -> bool {
    unsafe { handle.as_mut() }.is_some_and(|sim| sim.toggle_gravity())
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_ToggleTrails(handle: *mut Simulation) -> bool {
    unsafe { handle.as_mut() }.is_some_and(|sim| sim.toggle_trails())
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Clear(handle: *mut Simulation) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.clear();
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_GetBodyCount(handle: *const Simulation) -> usize {
    unsafe { handle.as_ref() }.map_or(0, |sim| sim.universe.bodies().len())
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_GetBlackHoleCount(handle: *const Simulation) -> usize {
    unsafe { handle.as_ref() }.map_or(0, |sim| sim.universe.black_holes().len())
}

/// Copies body `index` into `out`. Returns false if either pointer is null
/// or the index is out of range.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_GetBody(handle: *const Simulation, index: usize, out: *mut BodyView) -> bool {
    let sim = unsafe { handle.as_ref() };
    let out = unsafe { out.as_mut() };
    match (sim.and_then(|sim| sim.universe.bodies().get(index)), out) {
        (Some(body), Some(out)) => {
            *out = BodyView::from(body);
            true
        }
        _ => false,
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_GetBlackHole(
    handle: *const Simulation,
    index: usize,
    out: *mut BodyView,
) -> bool {
    let sim = unsafe { handle.as_ref() };
    let out = unsafe { out.as_mut() };
    match (sim.and_then(|sim| sim.universe.black_holes().get(index)), out) {
        (Some(body), Some(out)) => {
            *out = BodyView::from(body);
            true
        }
        _ => false,
    }
}

/// Serializes the universe to a JSON string owned by the caller; release it
/// with `Sandbox_FreeString`. Returns null on failure.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Save(handle: *const Simulation) -> *mut c_char {
    let Some(sim) = (unsafe { handle.as_ref() }) else {
        return std::ptr::null_mut();
    };
    match sim.save_json().map(CString::new) {
        Ok(Ok(json)) => json.into_raw(),
        Ok(Err(e)) => {
            log::warn!("save failed: {e}");
            std::ptr::null_mut()
        }
        Err(e) => {
            log::warn!("save failed: {e}");
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_FreeString(json: *mut c_char) {
    if !json.is_null() {
        unsafe { drop(CString::from_raw(json)) };
    }
}

/// Replaces the universe with the one in a NUL-terminated JSON snapshot.
/// Returns 0 on success and -1 otherwise; on failure nothing changes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Load(handle: *mut Simulation, json: *const c_char) -> i32 {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return -1;
    };
    if json.is_null() {
        return -1;
    }
    let Ok(json) = unsafe { CStr::from_ptr(json) }.to_str() else {
        log::warn!("load failed: snapshot is not valid UTF-8");
        return -1;
    };
    match sim.load_json(json) {
        Ok(()) => 0,
        Err(e) => {
            log::warn!("load failed: {e}");
            -1
        }
    }
}

fn status(ok: bool) -> i32 {
    if ok { 0 } else { -1 }
}
