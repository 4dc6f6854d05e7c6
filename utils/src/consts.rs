use glam::Vec3;

pub const DEFAULT_DIR: Vec3 = Vec3::new(1.0, 0.0, 0.0);
pub const UP: Vec3 = Vec3::Y;

/// Control points of the spline every new road starts out with.
pub const DEFAULT_SPLINE: [Vec3; 4] = [
    Vec3::new(-1.5, 0.0, 0.0),
    Vec3::new(-0.5, 0.0, 0.0),
    Vec3::new(0.5, 0.0, 0.0),
    Vec3::new(1.5, 0.0, 0.0),
];

pub const DEFAULT_ROAD_WIDTH: f32 = 4.0;
pub const DEFAULT_STEPS_PER_CURVE: u32 = 20;
pub const DEFAULT_SIDE_DEPTH: f32 = 0.2;
pub const DEFAULT_INTERSECTION_WIDTH: f32 = 0.5;

pub const MIN_ROAD_WIDTH: f32 = 0.00001;
pub const MIN_INTERSECTION_WIDTH: f32 = 0.01;
pub const MIN_DYNAMIC_WIDTH: f32 = 0.1;
pub const MIN_DYNAMIC_ARITY: usize = 3;

/// The snap tolerance of an endpoint is the width of its road divided by this.
pub const SNAP_DIVISOR: f32 = 3.0;

/// Appended curve segments place their points this many road widths apart.
pub const SEGMENT_SPACING_FACTOR: f32 = 2.0;

/// Roads created by attaching to an endpoint are this many road widths long.
pub const ATTACHED_ROAD_LENGTH_FACTOR: f32 = 6.0;

/// The outer edge of a sidewalk is lowered by this much to avoid z-fighting with the sidewalk
/// sides.
pub const SIDEWALK_EDGE_DROP: f32 = 0.005;
