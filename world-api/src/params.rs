//! This module defines the parameters that shape the cross section of roads and intersections.
//! Parameters are clamped into their valid ranges before any geometry is generated from them.
use serde::{Deserialize, Serialize};
use utils::consts::*;

use crate::{NetworkError, NetworkResult};

/// An optional raised median strip running along the centre of a road.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reservation {
    /// Width of the top of the strip. No reservation is generated when this is zero.
    pub width: f32,
    pub height: f32,
    /// How far the base of the strip extends beyond its top on each side.
    pub slope: f32,
}

/// Settings for projecting road vertices onto the terrain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub snap_to_terrain: bool,
    /// Distance kept between the terrain and the road surface.
    pub clearance: f32,
}

/// The cross section parameters of a road.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadParams {
    pub width: f32,
    /// How far the underside lies below the road surface. No caps or underside are generated
    /// unless this is positive.
    pub side_depth: f32,
    /// How far the base of the side walls extends beyond the road edge, summed over both sides.
    pub slope_width: f32,
    pub sidewalk_width: f32,
    pub sidewalk_height: f32,
    /// Number of samples taken along each curve segment.
    pub steps_per_curve: u32,
    pub lanes: u32,
    /// Space between the road edge and the outermost lane.
    pub margin: f32,
    pub reservation: Reservation,
    pub terrain: TerrainParams,
}

impl Default for RoadParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_ROAD_WIDTH,
            side_depth: DEFAULT_SIDE_DEPTH,
            slope_width: 0.0,
            sidewalk_width: 0.0,
            sidewalk_height: 0.0,
            steps_per_curve: DEFAULT_STEPS_PER_CURVE,
            lanes: 2,
            margin: 0.0,
            reservation: Reservation::default(),
            terrain: TerrainParams::default(),
        }
    }
}

impl RoadParams {
    pub fn with_width(width: f32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    /// Returns a copy of these parameters with every value in its valid range.
    pub fn clamped(self) -> Self {
        let width = self.width.max(MIN_ROAD_WIDTH);
        Self {
            width,
            side_depth: self.side_depth.max(0.0),
            slope_width: self.slope_width.max(0.0),
            sidewalk_width: self.sidewalk_width.max(0.0),
            steps_per_curve: self.steps_per_curve.max(1),
            lanes: self.lanes.max(1),
            margin: self.margin.clamp(0.0, width / 2.0),
            reservation: Reservation {
                width: self.reservation.width.max(0.0),
                slope: self.reservation.slope.max(0.0),
                ..self.reservation
            },
            ..self
        }
    }

    /// Width of the road including its sidewalks.
    pub fn outer_width(&self) -> f32 {
        self.width + self.sidewalk_width * 2.0
    }
}

/// The layout of an intersection's snap points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntersectionKind {
    /// A square intersection with 2, 3 or 4 snap points on its sides.
    Fixed(usize),
    /// A regular polygon with a snap point on every edge.
    Dynamic(usize),
}

impl IntersectionKind {
    /// Creates a fixed intersection kind, rejecting arities other than 2, 3 and 4.
    pub fn fixed(arity: usize) -> NetworkResult<Self> {
        match arity {
            2..=4 => Ok(IntersectionKind::Fixed(arity)),
            _ => Err(NetworkError::InvalidArity(arity)),
        }
    }

    /// Creates a dynamic intersection kind. The arity is raised to the minimum of 3.
    pub fn dynamic(arity: usize) -> Self {
        IntersectionKind::Dynamic(arity.max(MIN_DYNAMIC_ARITY))
    }

    pub fn arity(self) -> usize {
        match self {
            IntersectionKind::Fixed(n) | IntersectionKind::Dynamic(n) => n,
        }
    }

    /// Checks the arity of a kind that did not come from one of the constructors, e.g. one that
    /// was deserialized.
    pub fn validated(self) -> NetworkResult<Self> {
        match self {
            IntersectionKind::Fixed(n) => Self::fixed(n),
            IntersectionKind::Dynamic(n) if n >= MIN_DYNAMIC_ARITY => Ok(self),
            IntersectionKind::Dynamic(n) => Err(NetworkError::InvalidArity(n)),
        }
    }
}

/// The cross section parameters of an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionParams {
    pub width: f32,
    pub side_depth: f32,
    pub slope_width: f32,
    pub sidewalk_width: f32,
    pub sidewalk_height: f32,
}

impl Default for IntersectionParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_INTERSECTION_WIDTH,
            side_depth: DEFAULT_SIDE_DEPTH,
            slope_width: 0.0,
            sidewalk_width: 0.0,
            sidewalk_height: 0.0,
        }
    }
}

impl IntersectionParams {
    /// Takes over the parts of a road's cross section that an intersection shares.
    pub fn from_road(road: &RoadParams) -> Self {
        Self {
            width: road.width,
            side_depth: road.side_depth,
            slope_width: road.slope_width,
            ..Default::default()
        }
    }

    /// Returns a copy of these parameters with every value in its valid range for the given kind.
    pub fn clamped(self, kind: IntersectionKind) -> Self {
        let min_width = match kind {
            IntersectionKind::Fixed(_) => MIN_INTERSECTION_WIDTH,
            IntersectionKind::Dynamic(_) => MIN_DYNAMIC_WIDTH,
        };
        Self {
            width: self.width.max(min_width),
            side_depth: self.side_depth.max(0.0),
            slope_width: self.slope_width.max(0.0),
            sidewalk_width: self.sidewalk_width.max(0.0),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn road_params_are_clamped() {
        let params = RoadParams {
            width: -1.0,
            steps_per_curve: 0,
            lanes: 0,
            margin: 3.0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(params.width, MIN_ROAD_WIDTH);
        assert_eq!(params.steps_per_curve, 1);
        assert_eq!(params.lanes, 1);
        assert_eq!(params.margin, MIN_ROAD_WIDTH / 2.0);

        let params = RoadParams {
            margin: 3.0,
            ..RoadParams::with_width(4.0)
        }
        .clamped();
        assert_eq!(params.margin, 2.0);
        assert_eq!(params.outer_width(), 4.0);
    }

    #[test]
    fn intersection_kinds() {
        assert_eq!(IntersectionKind::fixed(3), Ok(IntersectionKind::Fixed(3)));
        assert_eq!(
            IntersectionKind::fixed(5),
            Err(NetworkError::InvalidArity(5))
        );
        assert_eq!(IntersectionKind::dynamic(1), IntersectionKind::Dynamic(3));
        assert_eq!(IntersectionKind::Dynamic(7).arity(), 7);
        assert!(IntersectionKind::Dynamic(2).validated().is_err());
        assert!(IntersectionKind::Fixed(1).validated().is_err());
    }

    #[test]
    fn intersection_params_are_clamped_per_kind() {
        let params = IntersectionParams {
            width: 0.0,
            side_depth: -1.0,
            ..Default::default()
        };
        let fixed = params.clamped(IntersectionKind::Fixed(4));
        let dynamic = params.clamped(IntersectionKind::Dynamic(5));
        assert_eq!(fixed.width, MIN_INTERSECTION_WIDTH);
        assert_eq!(dynamic.width, MIN_DYNAMIC_WIDTH);
        assert_eq!(dynamic.side_depth, 0.0);
    }
}
