use glam::Vec3;

/// Evaluates the cubic Bézier curve defined by the four points at t in [0, 1].
pub fn cubic_pos(p: &[Vec3], t: f32) -> Vec3 {
    let u = 1.0 - t;
    p[0] * (u * u * u) + p[1] * (3.0 * u * u * t) + p[2] * (3.0 * u * t * t) + p[3] * (t * t * t)
}

/// The first derivative of [`cubic_pos`]. Not normalized.
pub fn cubic_velocity(p: &[Vec3], t: f32) -> Vec3 {
    let u = 1.0 - t;
    (p[1] - p[0]) * (3.0 * u * u) + (p[2] - p[1]) * (6.0 * u * t) + (p[3] - p[2]) * (3.0 * t * t)
}
