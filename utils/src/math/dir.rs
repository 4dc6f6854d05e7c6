use std::ops::{Deref, Mul, Neg};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_DIR;

use super::vec::VecUtils;

/// Represents a direction in the xz plane that is always guaranteed to be normalized.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirXZ(Vec3);

impl Default for DirXZ {
    fn default() -> Self {
        Self(DEFAULT_DIR)
    }
}

impl From<Vec3> for DirXZ {
    fn from(mut value: Vec3) -> Self {
        value.y = 0.0;
        let vec = value.normalize_or(DEFAULT_DIR);
        Self(vec)
    }
}

impl From<DirXZ> for Vec3 {
    fn from(value: DirXZ) -> Self {
        value.0
    }
}

impl Deref for DirXZ {
    type Target = Vec3;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DirXZ {
    pub fn new() -> Self {
        Self::default()
    }

    /// The direction obtained by rotating [`DEFAULT_DIR`] by the given angle in radians about the
    /// up axis.
    pub fn from_yaw(yaw: f32) -> Self {
        (Quat::from_rotation_y(yaw) * DEFAULT_DIR).into()
    }

    /// The angle in radians about the up axis that rotates [`DEFAULT_DIR`] onto self.
    pub fn yaw(self) -> f32 {
        (-self.0.z).atan2(self.0.x)
    }

    pub fn flip(self, flip: bool) -> Self {
        Self(self.0.flip(flip))
    }

    pub fn left_hand(self) -> Self {
        Self(self.0.left_hand())
    }

    pub fn right_hand(self) -> Self {
        Self(self.0.right_hand())
    }
}

impl Mul<f32> for DirXZ {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Self::Output {
        self.0 * rhs
    }
}

impl Neg for DirXZ {
    type Output = DirXZ;

    fn neg(self) -> DirXZ {
        self.flip(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn ignores_height_and_normalizes() {
        let dir: DirXZ = Vec3::new(3.0, 7.0, 4.0).into();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert_eq!(dir.y, 0.0);
    }

    #[test]
    fn zero_vector_falls_back_to_default() {
        let dir: DirXZ = Vec3::Y.into();
        assert_eq!(dir, DirXZ::default());
    }

    #[test]
    fn yaw_round_trip() {
        let dir = DirXZ::from_yaw(FRAC_PI_2);
        assert!(dir.abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!((dir.yaw() - FRAC_PI_2).abs() < 1e-6);
        assert!((-dir).abs_diff_eq(Vec3::Z, 1e-6));
    }
}
