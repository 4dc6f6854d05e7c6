//! Geometry of intersections. Layouts are computed in a local frame centred on the intersection,
//! with local +x along the direction of its [`Loc`], and transformed into world space afterwards.
use std::f32::consts::{PI, TAU};

use gfx_api::{MeshBuffers, MeshData, SubMesh};
use glam::{Quat, Vec3};
use utils::consts::{SIDEWALK_EDGE_DROP, UP};
use utils::math::{DirXZ, Loc, VecUtils};
use world_api::{IntersectionKind, IntersectionParams, Polarity, SnapPoint};

use crate::rails::RailPair;
use crate::strip::{build_fan, build_strip};

/// A connector of an intersection in its local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub pos: Vec3,
    pub forward: DirXZ,
}

/// The local shape of an intersection's top surface and the position of its connectors.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionLayout {
    /// Corners of the top surface, ordered such that a fan around the origin faces up.
    pub polygon: Vec<Vec3>,
    pub slots: Vec<Slot>,
    /// Indices of the polygon edges without a slot. Edge `i` runs from corner `i` to `i + 1`.
    pub closed_edges: Vec<usize>,
}

/// Lays out a square intersection with the given width. Slots are added in the order left,
/// forward, right, back, so an arity of 2 has slots facing -x and +z.
pub fn fixed_layout(arity: usize, width: f32) -> IntersectionLayout {
    let h = width / 2.0;
    let polygon = vec![
        Vec3::new(h, 0.0, h),
        Vec3::new(h, 0.0, -h),
        Vec3::new(-h, 0.0, -h),
        Vec3::new(-h, 0.0, h),
    ];
    // (direction, edge of the polygon it sits on)
    let sides = [
        (Vec3::NEG_X, 2),
        (Vec3::Z, 3),
        (Vec3::X, 0),
        (Vec3::NEG_Z, 1),
    ];
    let arity = arity.clamp(2, 4);
    let slots = sides[..arity]
        .iter()
        .map(|(dir, _)| Slot {
            pos: *dir * h,
            forward: (*dir).into(),
        })
        .collect();
    let closed_edges = sides[arity..].iter().map(|(_, edge)| *edge).collect();
    IntersectionLayout {
        polygon,
        slots,
        closed_edges,
    }
}

/// Walks a regular polygon with `arity` edges of length `width`, starting at the origin along +x
/// and turning by a full turn divided by the arity after every edge. Returns the corners and the
/// centre of the polygon.
pub fn dynamic_polygon(arity: usize, width: f32) -> (Vec<Vec3>, Vec3) {
    let turn = Quat::from_rotation_y(TAU / arity as f32);
    let mut edge = Vec3::X * width;
    let mut corner = Vec3::ZERO;
    let mut polygon = Vec::with_capacity(arity);
    for _ in 0..arity {
        polygon.push(corner);
        corner += edge;
        edge = turn * edge;
    }

    let apothem = width / (2.0 * (PI / arity as f32).tan());
    let center = Vec3::X * (width / 2.0) + Vec3::X.left_hand() * apothem;
    (polygon, center)
}

/// Lays out a regular polygon intersection moved such that its centre lies at the origin. Every
/// edge has a slot at its midpoint facing away from the centre.
pub fn dynamic_layout(arity: usize, width: f32) -> IntersectionLayout {
    let (polygon, center) = dynamic_polygon(arity, width);
    let polygon: Vec<Vec3> = polygon.into_iter().map(|p| p - center).collect();
    let slots = (0..polygon.len())
        .map(|i| {
            let mid = (polygon[i] + polygon[(i + 1) % polygon.len()]) / 2.0;
            Slot {
                pos: mid,
                forward: mid.into(),
            }
        })
        .collect();
    IntersectionLayout {
        polygon,
        slots,
        closed_edges: vec![],
    }
}

pub fn layout(kind: IntersectionKind, width: f32) -> IntersectionLayout {
    match kind {
        IntersectionKind::Fixed(arity) => fixed_layout(arity, width),
        IntersectionKind::Dynamic(arity) => dynamic_layout(arity, width),
    }
}

/// The world space snap points of an intersection, indexed by slot.
pub fn snap_points(
    kind: IntersectionKind,
    params: &IntersectionParams,
    loc: Loc,
) -> Vec<SnapPoint> {
    let params = params.clamped(kind);
    layout(kind, params.width)
        .slots
        .into_iter()
        .map(|slot| {
            SnapPoint::new(
                loc.transform_point(slot.pos),
                loc.rotate(*slot.forward).into(),
                Polarity::Bipolar,
                params.width,
            )
        })
        .collect()
}

/// Generates the sub-meshes of an intersection in world space. The parameters are clamped
/// before use.
///
/// The base polygon below the top is the top polygon scaled up and lowered by the side depth. A
/// fixed base has edges the width plus the slope width long, a dynamic base pushes every corner
/// out from the centre by the slope width times its distance. Sides and underside are only
/// generated when the side depth is positive.
pub fn generate_intersection_mesh(
    kind: IntersectionKind,
    params: &IntersectionParams,
    loc: Loc,
) -> MeshBuffers {
    let params = params.clamped(kind);
    let layout = layout(kind, params.width);
    let mut buffers = MeshBuffers::new();
    buffers.insert(SubMesh::Top, build_fan(&layout.polygon, Vec3::ZERO, false));

    if params.side_depth > 0.0 {
        let scale = match kind {
            IntersectionKind::Fixed(_) => (params.width + params.slope_width) / params.width,
            IntersectionKind::Dynamic(_) => 1.0 + params.slope_width,
        };
        let down = UP * params.side_depth;
        let base: Vec<Vec3> = layout.polygon.iter().map(|p| *p * scale - down).collect();
        let mut ring: Vec<RailPair> = base
            .iter()
            .zip(&layout.polygon)
            .map(|(b, t)| RailPair::new(*b, *t))
            .collect();
        if let Some(first) = ring.first().copied() {
            ring.push(first);
        }
        buffers.insert(SubMesh::Sides, build_strip(&ring, false));
        buffers.insert(SubMesh::Underside, build_fan(&base, -down, true));
    }

    if params.sidewalk_width > 0.0 && !layout.closed_edges.is_empty() {
        let (path, sides) = sidewalk_ring(&layout, &params);
        buffers.insert(SubMesh::SidewalkPath, path);
        if params.sidewalk_height != 0.0 {
            buffers.insert(SubMesh::SidewalkSides, sides);
        }
    }

    let buffers = place(buffers, loc);
    let (vertices, triangles) = buffers.size();
    log::trace!("generated intersection mesh with {vertices} vertices and {triangles} triangles");
    buffers
}

/// Builds the sidewalk along every closed edge, together with its curb and outer side.
fn sidewalk_ring(
    layout: &IntersectionLayout,
    params: &IntersectionParams,
) -> (MeshData, MeshData) {
    let lift = UP * params.sidewalk_height;
    let edge_top = UP * (params.sidewalk_height - SIDEWALK_EDGE_DROP);
    let mut path = MeshData::empty();
    let mut sides = MeshData::empty();
    let n = layout.polygon.len();
    for &edge in &layout.closed_edges {
        let a = layout.polygon[edge];
        let b = layout.polygon[(edge + 1) % n];
        let out = DirXZ::from((a + b) / 2.0) * params.sidewalk_width;
        let pairs = |bottom: Vec3, top: Vec3, shift: Vec3| {
            [
                RailPair::new(a + bottom, a + shift + top),
                RailPair::new(b + bottom, b + shift + top),
            ]
        };

        path.append(build_strip(&pairs(lift, edge_top, out), true));
        sides.append(build_strip(
            &[
                RailPair::new(a, a + lift),
                RailPair::new(b, b + lift),
            ],
            true,
        ));
        sides.append(build_strip(&pairs(out, edge_top, out), false));
    }
    (path, sides)
}

/// Moves local geometry into world space.
fn place(buffers: MeshBuffers, loc: Loc) -> MeshBuffers {
    let mut placed = MeshBuffers::new();
    for (kind, mesh) in buffers.iter() {
        let mut mesh = mesh.clone();
        for v in mesh.vertices.iter_mut() {
            *v = loc.transform_point(Vec3::from(*v)).into();
        }
        mesh.recompute_normals();
        placed.insert(kind, mesh);
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use utils::math::approx_eq;

    #[test]
    fn four_way_fixed_layout() {
        let points = snap_points(
            IntersectionKind::Fixed(4),
            &IntersectionParams {
                width: 4.0,
                ..Default::default()
            },
            Loc::default(),
        );
        let expected = [
            Vec3::new(-2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -2.0),
        ];
        assert_eq!(points.len(), 4);
        for (point, pos) in points.iter().zip(expected) {
            assert!(approx_eq(point.pos, pos));
            assert!(approx_eq(*point.forward, pos / 2.0));
            assert_eq!(point.polarity, Polarity::Bipolar);
        }
    }

    #[test]
    fn two_way_layout_closes_the_other_sides() {
        let layout = fixed_layout(2, 2.0);
        assert_eq!(layout.slots.len(), 2);
        assert!(approx_eq(layout.slots[0].pos, Vec3::new(-1.0, 0.0, 0.0)));
        assert!(approx_eq(*layout.slots[1].forward, Vec3::Z));
        assert_eq!(layout.closed_edges, vec![0, 1]);
        assert_eq!(fixed_layout(3, 2.0).closed_edges, vec![1]);
        assert!(fixed_layout(4, 2.0).closed_edges.is_empty());
    }

    #[test]
    fn snap_points_follow_the_placement() {
        let loc = Loc::new(Vec3::new(10.0, 1.0, 0.0), Vec3::Z.into());
        let points = snap_points(
            IntersectionKind::Fixed(2),
            &IntersectionParams {
                width: 4.0,
                ..Default::default()
            },
            loc,
        );
        assert!(approx_eq(points[0].pos, Vec3::new(10.0, 1.0, -2.0)));
        assert!(approx_eq(*points[0].forward, Vec3::NEG_Z));
        assert!(approx_eq(points[1].pos, Vec3::new(8.0, 1.0, 0.0)));
    }

    #[test]
    fn dynamic_square_matches_its_walk() {
        let (polygon, center) = dynamic_polygon(4, 2.0);
        let expected = [
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, -2.0),
            Vec3::new(0.0, 0.0, -2.0),
        ];
        for (p, e) in polygon.iter().zip(expected) {
            assert!(approx_eq(*p, e));
        }
        assert!(approx_eq(center, Vec3::new(1.0, 0.0, -1.0)));
    }

    #[test]
    fn dynamic_center_is_equidistant() {
        for arity in 3..9 {
            let (polygon, center) = dynamic_polygon(arity, 1.5);
            let radius = polygon[0].distance(center);
            assert!(polygon
                .iter()
                .all(|p| (p.distance(center) - radius).abs() < 1e-4));

            let layout = dynamic_layout(arity, 1.5);
            assert_eq!(layout.slots.len(), arity);
            let apothem = 1.5 / (2.0 * (PI / arity as f32).tan());
            for slot in &layout.slots {
                assert!((slot.pos.length() - apothem).abs() < 1e-4);
                assert!(slot.forward.dot(slot.pos) > 0.0);
            }
        }
    }

    #[test]
    fn fixed_mesh_is_closed_and_faces_out() {
        let params = IntersectionParams {
            width: 4.0,
            side_depth: 0.5,
            slope_width: 1.0,
            ..Default::default()
        };
        let mesh = generate_intersection_mesh(IntersectionKind::Fixed(4), &params, Loc::default());
        let top = mesh.get(SubMesh::Top).unwrap();
        assert_eq!(top.size(), (5, 4));
        assert!(top.triangles().all(|t| top.face_normal(t).y > 0.0));

        let underside = mesh.get(SubMesh::Underside).unwrap();
        assert!(underside.triangles().all(|t| underside.face_normal(t).y < 0.0));

        let sides = mesh.get(SubMesh::Sides).unwrap();
        assert_eq!(sides.size(), (10, 8));
        for t in sides.triangles() {
            let center = t.iter().map(|i| sides.position(*i)).sum::<Vec3>() / 3.0;
            assert!(sides.face_normal(t).with_height(0.0).dot(center) > 0.0);
        }
        assert!(!mesh.contains(SubMesh::SidewalkPath));
    }

    #[test]
    fn dynamic_mesh_is_placed() {
        let params = IntersectionParams {
            width: 2.0,
            side_depth: 0.0,
            ..Default::default()
        };
        let loc = Loc::at(Vec3::new(5.0, 0.0, 5.0));
        let mesh = generate_intersection_mesh(IntersectionKind::Dynamic(6), &params, loc);
        let top = mesh.get(SubMesh::Top).unwrap();
        assert_eq!(top.size(), (7, 6));
        assert!(approx_eq(top.position(0), loc.pos));
        assert!(top.triangles().all(|t| top.face_normal(t).y > 0.0));
        assert!(!mesh.contains(SubMesh::Sides));
    }

    #[test]
    fn dynamic_base_spreads_with_the_slope() {
        let params = IntersectionParams {
            width: 2.0,
            side_depth: 0.5,
            slope_width: 1.0,
            ..Default::default()
        };
        let mesh = generate_intersection_mesh(IntersectionKind::Dynamic(6), &params, Loc::default());
        let top = mesh.get(SubMesh::Top).unwrap();
        let underside = mesh.get(SubMesh::Underside).unwrap();
        for i in 1..7 {
            let corner = top.position(i);
            let base = underside.position(i);
            assert!((corner.length() - 2.0).abs() < 1e-4);
            assert!(approx_eq(base, corner * 2.0 - Vec3::Y * 0.5));
        }

        let fixed = generate_intersection_mesh(IntersectionKind::Fixed(4), &params, Loc::default());
        let base = fixed.get(SubMesh::Underside).unwrap().position(1);
        assert!(approx_eq(base, Vec3::new(1.5, -0.5, 1.5)));
    }

    #[test]
    fn sidewalks_line_the_closed_sides() {
        let params = IntersectionParams {
            width: 4.0,
            sidewalk_width: 1.0,
            sidewalk_height: 0.2,
            ..Default::default()
        };
        let mesh = generate_intersection_mesh(IntersectionKind::Fixed(2), &params, Loc::default());
        let path = mesh.get(SubMesh::SidewalkPath).unwrap();
        assert_eq!(path.size(), (8, 4));
        assert!(path.triangles().all(|t| path.face_normal(t).y > 0.0));
        let sides = mesh.get(SubMesh::SidewalkSides).unwrap();
        assert_eq!(sides.size().1, 8);

        let flat = IntersectionParams {
            sidewalk_height: 0.0,
            ..params
        };
        let mesh = generate_intersection_mesh(IntersectionKind::Fixed(3), &flat, Loc::default());
        assert!(mesh.contains(SubMesh::SidewalkPath));
        assert!(!mesh.contains(SubMesh::SidewalkSides));
    }
}
