use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::dir::DirXZ;

/// Represents a position in xyz and a direction in xz. Used as the placement of entities that are
/// defined in a local frame: local +x is mapped onto `dir` and the local origin onto `pos`.
#[derive(Copy, Clone, Default, Debug, Serialize, Deserialize, PartialEq)]
pub struct Loc {
    pub pos: Vec3,
    pub dir: DirXZ,
}

impl Loc {
    pub fn new(pos: Vec3, dir: DirXZ) -> Self {
        Self { pos, dir }
    }

    pub fn at(pos: Vec3) -> Self {
        Self {
            pos,
            dir: DirXZ::default(),
        }
    }

    fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.dir.yaw())
    }

    /// Rotates a local direction into world space.
    pub fn rotate(&self, local: Vec3) -> Vec3 {
        self.rotation() * local
    }

    /// Transforms a local position into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.pos + self.rotate(local)
    }
}
