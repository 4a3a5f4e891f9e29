use ultraviolet::Vec2;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).mag()
}

/// Newtonian acceleration felt by a body of mass `m1` at `from`, pulled by a
/// body of mass `m2` at `to`, given their separation `d` (`d > 0`).
/// F = G * m1 * m2 / d^2, applied along the unit vector towards `to`.
#[inline]
pub fn gravitational_acceleration(g: f32, from: Vec2, to: Vec2, m1: f32, m2: f32, d: f32) -> Vec2 {
    let force = (g * m1 * m2) / (d * d);
    (to - from) * (force / (d * m1))
}

/// Unit vector pointing from `origin` to `target`.
/// Coincident points fall back to +x, like `atan2(0, 0)`.
pub fn direction_from(origin: Vec2, target: Vec2) -> Vec2 {
    let d = target - origin;
    let mag = d.mag();
    if mag > 0.0 { d / mag } else { Vec2::unit_x() }
}

/// Random velocity uniform in `[-speed, speed]` on both axes.
pub fn random_velocity(rng: &mut fastrand::Rng, speed: f32) -> Vec2 {
    Vec2::new(
        (rng.f32() * 2.0 - 1.0) * speed,
        (rng.f32() * 2.0 - 1.0) * speed,
    )
}

/// Random saturated colour as a CSS `hsl()` string.
pub fn random_hsl_color(rng: &mut fastrand::Rng) -> String {
    format!("hsl({:.1}, 80%, 60%)", rng.f32() * 360.0)
}
