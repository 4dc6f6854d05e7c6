use curves::Spline;
use gfx_api::{MeshBuffers, MeshData, SubMesh};
use glam::Vec3;
use utils::consts::{SIDEWALK_EDGE_DROP, UP};
use world_api::RoadParams;

use crate::rails::{sample_offset_rails, RailContext, RailPair};
use crate::strip::{build_quad, build_strip};

/// Generates all sub-meshes of a road. The parameters are clamped before use.
///
/// The top surface spans the road width. The walls run from the outer edge of the sidewalks down
/// to the base rails, which are widened by the slope width and lowered by the side depth. Caps and
/// the underside close the road when the side depth is positive.
pub fn generate_road_mesh(spline: &Spline, params: &RoadParams, ctx: &RailContext) -> MeshBuffers {
    let params = params.clamped();
    let steps = params.steps_per_curve;
    let rails = |width: f32| sample_offset_rails(spline, width, steps, ctx);

    let road = rails(params.width);
    let outer = rails(params.outer_width());
    let base: Vec<RailPair> = rails(params.width + params.slope_width)
        .into_iter()
        .map(|pair| pair.lowered(params.side_depth))
        .collect();

    let mut buffers = MeshBuffers::new();
    buffers.insert(SubMesh::Top, build_strip(&road, false));

    let left_wall = zip_rails(&base, &outer, |b, o| RailPair::new(b.left, o.left));
    let right_wall = zip_rails(&outer, &base, |o, b| RailPair::new(o.right, b.right));
    buffers.insert(SubMesh::LeftWall, build_strip(&left_wall, false));
    buffers.insert(SubMesh::RightWall, build_strip(&right_wall, false));

    if params.side_depth > 0.0 {
        buffers.insert(SubMesh::Underside, build_strip(&base, true));
        if let (Some(r), Some(o), Some(b)) = (road.first(), outer.first(), base.first()) {
            buffers.insert(SubMesh::FrontCap, end_cap(r, o, b, &params, false));
        }
        if let (Some(r), Some(o), Some(b)) = (road.last(), outer.last(), base.last()) {
            buffers.insert(SubMesh::BackCap, end_cap(r, o, b, &params, true));
        }
    }

    if params.sidewalk_width > 0.0 {
        let (left, right) = sidewalks(&road, &outer, params.sidewalk_height);
        buffers.insert(SubMesh::LeftSidewalk, left);
        buffers.insert(SubMesh::RightSidewalk, right);
    }

    if params.reservation.width > 0.0 {
        let reservation = params.reservation;
        let top: Vec<RailPair> = rails(reservation.width)
            .into_iter()
            .map(|pair| pair.raised(reservation.height))
            .collect();
        let base = rails(reservation.width + 2.0 * reservation.slope);
        let mut sides = build_strip(
            &zip_rails(&base, &top, |b, t| RailPair::new(b.left, t.left)),
            false,
        );
        sides.append(build_strip(
            &zip_rails(&top, &base, |t, b| RailPair::new(t.right, b.right)),
            false,
        ));
        buffers.insert(SubMesh::Reservation, build_strip(&top, false));
        buffers.insert(SubMesh::ReservationSides, sides);
    }

    let (vertices, triangles) = buffers.size();
    log::trace!("generated road mesh with {vertices} vertices and {triangles} triangles");
    buffers
}

/// Closes one end of the road from the outer edge down to the base, and the raised sidewalks
/// above it.
fn end_cap(
    road: &RailPair,
    outer: &RailPair,
    base: &RailPair,
    params: &RoadParams,
    flip: bool,
) -> MeshData {
    let mut cap = build_quad(outer.left, outer.right, base.left, base.right, flip);
    if params.sidewalk_width > 0.0 && params.sidewalk_height != 0.0 {
        let lift = UP * params.sidewalk_height;
        let edge = UP * (params.sidewalk_height - SIDEWALK_EDGE_DROP);
        cap.append(build_quad(
            outer.left + edge,
            road.left + lift,
            outer.left,
            road.left,
            flip,
        ));
        cap.append(build_quad(
            road.right + lift,
            outer.right + edge,
            road.right,
            outer.right,
            flip,
        ));
    }
    cap
}

fn zip_rails(
    a: &[RailPair],
    b: &[RailPair],
    f: impl Fn(&RailPair, &RailPair) -> RailPair,
) -> Vec<RailPair> {
    a.iter().zip(b).map(|(a, b)| f(a, b)).collect()
}

/// Builds the left and right sidewalks. Each consists of the walkable top, the curb facing the
/// road and the outer side. The outer edge of the top is dropped slightly below the top of the
/// outer side.
fn sidewalks(road: &[RailPair], outer: &[RailPair], height: f32) -> (MeshData, MeshData) {
    let lift = UP * height;
    let edge = UP * (height - SIDEWALK_EDGE_DROP);
    let side = |a: &[RailPair],
                b: &[RailPair],
                pick: fn(&RailPair) -> Vec3,
                bottom: Vec3,
                top: Vec3| {
        zip_rails(a, b, |a, b| RailPair::new(pick(a) + bottom, pick(b) + top))
    };
    let left: fn(&RailPair) -> Vec3 = |p| p.left;
    let right: fn(&RailPair) -> Vec3 = |p| p.right;

    let mut left_mesh = build_strip(&side(road, outer, left, lift, edge), true);
    let mut right_mesh = build_strip(&side(road, outer, right, lift, edge), false);
    if height != 0.0 {
        left_mesh.append(build_strip(&side(road, road, left, Vec3::ZERO, lift), true));
        right_mesh.append(build_strip(&side(road, road, right, Vec3::ZERO, lift), false));
        left_mesh.append(build_strip(&side(outer, outer, left, Vec3::ZERO, edge), false));
        right_mesh.append(build_strip(&side(outer, outer, right, Vec3::ZERO, edge), true));
    }
    (left_mesh, right_mesh)
}
