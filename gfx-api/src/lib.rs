//! This crate defines the mesh data that is handed to whatever renders or collides with the
//! generated roads. It is renderer agnostic: positions, normals, uvs and triangle indices, grouped
//! into named sub-meshes such that each group can be given its own material.

mod data;

pub use data::{MeshBuffers, MeshData, SubMesh};
