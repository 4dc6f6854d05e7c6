//! Contains utils for math as traits that are implemented for different math
//! types.

mod dir;
mod loc;
mod vec;

pub use dir::DirXZ;
pub use loc::Loc;
pub use vec::VecUtils;

/// Tolerance used when comparing positions that are expected to coincide.
pub const EPSILON: f32 = 1e-4;

/// Returns true if the two positions are equal up to [`EPSILON`] in each coordinate.
pub fn approx_eq(a: glam::Vec3, b: glam::Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}
