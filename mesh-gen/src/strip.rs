//! Builders that triangulate rails and polygons. Every builder recomputes the normals of the mesh
//! it returns from the final winding.
use gfx_api::MeshData;
use glam::Vec3;

use crate::rails::RailPair;

/// Builds a quad strip between the left and right points of consecutive rail pairs. The u
/// coordinate is 0 on the left points and 1 on the right points, v counts the pairs. Without
/// flipping, a strip whose left points lie on the left hand side of its direction when viewed
/// from above faces up.
pub fn build_strip(rails: &[RailPair], flip: bool) -> MeshData {
    let mut mesh = MeshData::empty();
    for (i, pair) in rails.iter().enumerate() {
        mesh.vertices.push(pair.left.into());
        mesh.vertices.push(pair.right.into());
        mesh.uvs.push([0.0, i as f32]);
        mesh.uvs.push([1.0, i as f32]);
    }
    for i in 0..rails.len().saturating_sub(1) {
        let x = (i * 2) as u32;
        mesh.indices.extend([x, x + 2, x + 1, x + 1, x + 2, x + 3]);
    }
    finish(mesh, flip)
}

/// Triangulates a polygon as a fan around the given center, which becomes vertex 0. The last edge
/// wraps back to the first polygon vertex. The center has uv (0, 0) and the rim has v = 1, with u
/// rising to 1 halfway around the rim and falling back again.
pub fn build_fan(polygon: &[Vec3], center: Vec3, flip: bool) -> MeshData {
    let n = polygon.len();
    let mut mesh = MeshData::empty();
    mesh.vertices.push(center.into());
    mesh.uvs.push([0.0, 0.0]);
    for (k, p) in polygon.iter().enumerate() {
        mesh.vertices.push((*p).into());
        let u = 1.0 - (2.0 * k as f32 / n as f32 - 1.0).abs();
        mesh.uvs.push([u, 1.0]);
    }
    if n >= 2 {
        let n = n as u32;
        for i in 1..n {
            mesh.indices.extend([0, i, i + 1]);
        }
        mesh.indices.extend([0, n, 1]);
    }
    finish(mesh, flip)
}

/// Builds a single quad from its four corners as seen from the side it faces.
pub fn build_quad(
    top_left: Vec3,
    top_right: Vec3,
    bottom_left: Vec3,
    bottom_right: Vec3,
    flip: bool,
) -> MeshData {
    let mesh = MeshData {
        vertices: [top_left, top_right, bottom_left, bottom_right]
            .map(Into::into)
            .to_vec(),
        normals: vec![],
        uvs: vec![[1.0, 1.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]],
        indices: vec![0, 1, 2, 2, 1, 3],
    };
    finish(mesh, flip)
}

fn finish(mut mesh: MeshData, flip: bool) -> MeshData {
    if flip {
        mesh.flip_winding();
    }
    mesh.recompute_normals();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec3> {
        vec![
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(-1.0, 0.0, 1.0),
        ]
    }

    fn flat_rails(n: usize) -> Vec<RailPair> {
        (0..n)
            .map(|i| {
                let x = i as f32;
                RailPair::new(Vec3::new(x, 0.0, 1.0), Vec3::new(x, 0.0, -1.0))
            })
            .collect()
    }

    #[test]
    fn strip_faces_up_unless_flipped() {
        let mesh = build_strip(&flat_rails(5), false);
        assert_eq!(mesh.size(), (10, 8));
        assert!(mesh.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
        assert_eq!(mesh.uvs[3], [1.0, 1.0]);

        let mesh = build_strip(&flat_rails(5), true);
        assert!(mesh.normals.iter().all(|n| *n == [0.0, -1.0, 0.0]));
    }

    #[test]
    fn single_pair_gives_no_triangles() {
        let mesh = build_strip(&flat_rails(1), false);
        assert_eq!(mesh.size(), (2, 0));
    }

    #[test]
    fn fan_wraps_around() {
        let mesh = build_fan(&square(), Vec3::ZERO, false);
        assert_eq!(mesh.size(), (5, 4));
        assert_eq!(&mesh.indices[9..], &[0, 4, 1]);
        assert!(mesh.triangles().all(|t| mesh.face_normal(t).y > 0.0));
        assert_eq!(mesh.uvs[0], [0.0, 0.0]);
        assert_eq!(mesh.uvs[3], [1.0, 1.0]);

        let mesh = build_fan(&square(), Vec3::ZERO, true);
        assert!(mesh.triangles().all(|t| mesh.face_normal(t).y < 0.0));
    }

    #[test]
    fn quad_faces_its_viewer() {
        let mesh = build_quad(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, -1.0, 1.0),
            Vec3::new(0.0, -1.0, -1.0),
            false,
        );
        assert_eq!(mesh.size(), (4, 2));
        assert!(mesh.triangles().all(|t| mesh.face_normal(t).x < 0.0));
    }
}
