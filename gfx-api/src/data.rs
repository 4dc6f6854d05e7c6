use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A triangle mesh. Every vertex has a position, a normal and a uv, and every three indices form
/// one triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn empty() -> MeshData {
        MeshData::default()
    }

    /// Returns the number of vertices and the number of triangles.
    pub fn size(&self) -> (usize, usize) {
        (self.vertices.len(), self.indices.len() / 3)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|v| Vec3::from(*v))
    }

    pub fn position(&self, index: u32) -> Vec3 {
        Vec3::from(self.vertices[index as usize])
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// The unnormalized normal of a triangle given by its winding. Its length is twice the area.
    pub fn face_normal(&self, triangle: [u32; 3]) -> Vec3 {
        let [a, b, c] = triangle.map(|i| self.position(i));
        (b - a).cross(c - a)
    }

    /// Reverses the winding of every triangle.
    pub fn flip_winding(&mut self) {
        self.indices.reverse();
    }

    /// Recomputes the normal of every vertex as the area weighted average of the normals of the
    /// triangles it is part of, as given by their winding. Unused vertices get an up normal.
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        let faces: Vec<([u32; 3], Vec3)> = self
            .triangles()
            .map(|t| (t, self.face_normal(t)))
            .collect();
        for (triangle, normal) in faces {
            for i in triangle {
                normals[i as usize] += normal;
            }
        }
        self.normals = normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y).into())
            .collect();
    }

    /// Appends another mesh to this one, offsetting its indices.
    pub fn append(&mut self, mut other: MeshData) {
        let offset = self.vertices.len() as u32;
        self.vertices.append(&mut other.vertices);
        self.normals.append(&mut other.normals);
        self.uvs.append(&mut other.uvs);
        self.indices
            .extend(other.indices.into_iter().map(|i| i + offset));
    }
}

/// The named parts of a generated road or intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubMesh {
    /// The drivable surface.
    Top,
    LeftWall,
    RightWall,
    /// The cap closing the road at its positive end.
    FrontCap,
    /// The cap closing the road at its negative end.
    BackCap,
    Underside,
    LeftSidewalk,
    RightSidewalk,
    Reservation,
    ReservationSides,
    /// The sloped sides of an intersection.
    Sides,
    SidewalkPath,
    SidewalkSides,
}

impl SubMesh {
    pub fn name(self) -> &'static str {
        use SubMesh::*;
        match self {
            Top => "Top",
            LeftWall => "Left Wall",
            RightWall => "Right Wall",
            FrontCap => "Front Cap",
            BackCap => "Back Cap",
            Underside => "Underside",
            LeftSidewalk => "Left Sidewalk",
            RightSidewalk => "Right Sidewalk",
            Reservation => "Central Reservation",
            ReservationSides => "Central Reservation Sides",
            Sides => "Sides",
            SidewalkPath => "Sidewalk Path",
            SidewalkSides => "Sidewalk Sides",
        }
    }
}

/// All the sub-meshes generated for one entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers(BTreeMap<SubMesh, MeshData>);

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: SubMesh, mesh: MeshData) {
        self.0.insert(kind, mesh);
    }

    pub fn get(&self, kind: SubMesh) -> Option<&MeshData> {
        self.0.get(&kind)
    }

    pub fn contains(&self, kind: SubMesh) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = SubMesh> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubMesh, &MeshData)> + '_ {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// Returns the summed number of vertices and triangles of all sub-meshes.
    pub fn size(&self) -> (usize, usize) {
        self.0.values().fold((0, 0), |(v, t), mesh| {
            let (mv, mt) = mesh.size();
            (v + mv, t + mt)
        })
    }

    /// Merges all sub-meshes into one mesh, e.g. for use as a collider.
    pub fn combined(&self) -> MeshData {
        let mut result = MeshData::empty();
        for mesh in self.0.values() {
            result.append(mesh.clone());
        }
        result
    }
}
