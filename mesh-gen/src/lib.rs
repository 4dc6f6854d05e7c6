//! Procedural geometry for the road network. Roads are generated by sampling rails along their
//! spline and triangulating strips between them, intersections by triangulating their polygon
//! around its centre. Nothing in here knows about connections, the caller passes the pinned ends
//! and terrain that the geometry should respect.
mod intersection;
mod rails;
mod road;
mod strip;

pub use intersection::{
    dynamic_layout, dynamic_polygon, fixed_layout, generate_intersection_mesh, layout, snap_points,
    IntersectionLayout, Slot,
};
pub use rails::{
    centre_waypoints, lane_offset, lane_waypoints, offset_line, sample_offset_rails, EndPins, Pin,
    RailContext, RailPair, TerrainSnap,
};
pub use road::generate_road_mesh;
pub use strip::{build_fan, build_quad, build_strip};
