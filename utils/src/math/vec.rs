use glam::Vec3;

/// Defines utility functions intended for vector types
pub trait VecUtils {
    /// Rotates self 90 degrees about the up axis, such that +x becomes +z.
    fn right_hand(self) -> Self;

    /// Rotates self -90 degrees about the up axis, such that +x becomes -z.
    fn left_hand(self) -> Self;

    fn flip(self, flip: bool) -> Self;

    /// Returns self with the y coordinate replaced.
    fn with_height(self, y: f32) -> Self;
}

impl VecUtils for Vec3 {
    fn right_hand(self) -> Self {
        Self::new(-self.z, self.y, self.x)
    }

    fn left_hand(self) -> Self {
        Self::new(self.z, self.y, -self.x)
    }

    fn flip(self, flip: bool) -> Self {
        if flip {
            self * -1.
        } else {
            self
        }
    }

    fn with_height(self, y: f32) -> Self {
        Self::new(self.x, y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hands_are_opposite() {
        let v = Vec3::new(1.0, 0.5, 0.0);
        assert_eq!(v.right_hand(), Vec3::new(0.0, 0.5, 1.0));
        assert_eq!(v.left_hand(), Vec3::new(0.0, 0.5, -1.0));
        assert_eq!(v.flip(true), Vec3::new(-1.0, -0.5, 0.0));
    }
}
