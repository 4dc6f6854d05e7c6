//! Samples the boundary rails of a road: pairs of points on either side of the spline, taken at a
//! fixed number of steps per curve segment.
use curves::Spline;
use glam::Vec3;
use utils::consts::UP;
use utils::math::{DirXZ, VecUtils};
use world_api::{HeightSampler, NetworkError, NetworkResult, RoadParams};

/// One sample of a cross section. The left point lies on the side that the tangent is rotated to
/// by [`DirXZ::right_hand`], which is +z when the spline runs along +x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RailPair {
    pub left: Vec3,
    pub right: Vec3,
}

impl RailPair {
    pub fn new(left: Vec3, right: Vec3) -> Self {
        Self { left, right }
    }

    pub fn lowered(self, depth: f32) -> Self {
        self.raised(-depth)
    }

    pub fn raised(self, height: f32) -> Self {
        Self {
            left: self.left + UP * height,
            right: self.right + UP * height,
        }
    }
}

/// Fixes one end of the rails to a neighbouring snap point, such that the cross section there
/// matches the neighbour exactly regardless of the sampling resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    pub pos: Vec3,
    /// The direction that the road travels in at the pinned end, from t = 0 towards t = 1.
    pub dir: DirXZ,
}

impl Pin {
    pub fn new(pos: Vec3, dir: DirXZ) -> Self {
        Self { pos, dir }
    }

    fn pair(&self, width: f32) -> RailPair {
        let side = self.dir.right_hand() * (width / 2.0);
        RailPair::new(self.pos + side, self.pos - side)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EndPins {
    pub start: Option<Pin>,
    pub end: Option<Pin>,
}

/// Projects rail points onto the terrain, keeping the given clearance above it.
#[derive(Clone, Copy)]
pub struct TerrainSnap<'a> {
    pub sampler: &'a dyn HeightSampler,
    pub clearance: f32,
}

impl TerrainSnap<'_> {
    fn project(&self, point: Vec3) -> Vec3 {
        point.with_height(self.sampler.ground_height(point.x, point.z) + self.clearance)
    }
}

/// Everything outside of the spline and the cross section parameters that affects the rails.
#[derive(Clone, Copy, Default)]
pub struct RailContext<'a> {
    pub pins: EndPins,
    pub terrain: Option<TerrainSnap<'a>>,
}

impl<'a> RailContext<'a> {
    pub fn new(pins: EndPins, terrain: Option<TerrainSnap<'a>>) -> Self {
        Self { pins, terrain }
    }
}

/// Samples `steps_per_curve * segments + 1` pairs of points offset `width / 2` to either side of
/// the spline. Pinned ends are replaced by the pinned cross section, every other pair is projected
/// onto the terrain if a terrain is given, otherwise the height of the spline is kept.
pub fn sample_offset_rails(
    spline: &Spline,
    width: f32,
    steps_per_curve: u32,
    ctx: &RailContext,
) -> Vec<RailPair> {
    let steps = steps_per_curve.max(1) as usize * spline.segment_count();
    (0..=steps)
        .map(|i| {
            let pin = match i {
                0 => ctx.pins.start,
                i if i == steps => ctx.pins.end,
                _ => None,
            };
            if let Some(pin) = pin {
                return pin.pair(width);
            }

            let t = i as f32 / steps as f32;
            let pos = spline.evaluate(t);
            let dir: DirXZ = spline.tangent(t).into();
            let side = dir.right_hand() * (width / 2.0);
            let pair = RailPair::new(pos + side, pos - side);
            match ctx.terrain {
                Some(terrain) => {
                    RailPair::new(terrain.project(pair.left), terrain.project(pair.right))
                }
                None => pair,
            }
        })
        .collect()
}

/// The lateral offset of the centre of the given lane from the centre of the road, positive
/// towards the left rail.
pub fn lane_offset(params: &RoadParams, lane: u32) -> NetworkResult<f32> {
    if lane >= params.lanes {
        return Err(NetworkError::InvalidLane {
            lane,
            lanes: params.lanes,
        });
    }
    let interval = (params.width - 2.0 * params.margin) / params.lanes as f32;
    Ok(((params.lanes - 1) as f32 / 2.0 - lane as f32) * interval)
}

/// Samples the line running at the given lateral offset from the centre of the road.
pub fn offset_line(
    spline: &Spline,
    offset: f32,
    steps_per_curve: u32,
    ctx: &RailContext,
) -> Vec<Vec3> {
    let rails = sample_offset_rails(spline, 2.0 * offset.abs(), steps_per_curve, ctx);
    rails
        .into_iter()
        .map(|pair| if offset >= 0.0 { pair.left } else { pair.right })
        .collect()
}

pub fn lane_waypoints(
    spline: &Spline,
    params: &RoadParams,
    lane: u32,
    ctx: &RailContext,
) -> NetworkResult<Vec<Vec3>> {
    let offset = lane_offset(params, lane)?;
    Ok(offset_line(spline, offset, params.steps_per_curve, ctx))
}

pub fn centre_waypoints(spline: &Spline, params: &RoadParams, ctx: &RailContext) -> Vec<Vec3> {
    offset_line(spline, 0.0, params.steps_per_curve, ctx)
}
