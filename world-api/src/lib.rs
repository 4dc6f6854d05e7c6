//! This crate defines the types that describe the road network, and the api through which other
//! crates are allowed to manipulate it. The world crate implements the api and keeps the network
//! consistent, consumers only see ids, parameters, snap points and generated meshes.
mod params;
mod record;
mod snap;
mod terrain;

pub use params::*;
pub use record::*;
pub use snap::*;
pub use terrain::*;

use curves::{ControlPointMode, CurveError, Spline};
use gfx_api::MeshBuffers;
use glam::Vec3;
use thiserror::Error;
use utils::id::{IntersectionId, RoadId, UniqueId};
use utils::math::Loc;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("no entity {0:?} exists in the network")]
    UnknownEntity(EntityId),
    #[error("no entity with unique id {0} exists in the network")]
    UnknownUniqueId(UniqueId),
    #[error("the unique id {0} is used by more than one entity")]
    DuplicateUniqueId(UniqueId),
    #[error("{port:?} does not exist on {entity:?}")]
    InvalidPort { entity: EntityId, port: Port },
    #[error("lane {lane} does not exist on a road with {lanes} lanes")]
    InvalidLane { lane: u32, lanes: u32 },
    #[error("an intersection can not have {0} snap points")]
    InvalidArity(usize),
    #[error("the connection between {0:?} and {1:?} is not symmetric")]
    AsymmetricConnection(Endpoint, Endpoint),
    #[error("{0:?} and {1:?} have incompatible polarities")]
    IncompatiblePolarity(Endpoint, Endpoint),
    #[error("{0:?} is already connected")]
    PortOccupied(Endpoint),
    #[error("{0:?} can not be connected to itself")]
    SelfConnection(EntityId),
    #[error(transparent)]
    Curve(#[from] CurveError),
}

pub type NetworkResult<T> = std::result::Result<T, NetworkError>;

/// The result of moving a control point of a road.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapOutcome {
    /// The moved point is not an end of the road, so no snapping was attempted.
    NotAnEnd,
    /// No compatible endpoint was within range.
    Unsnapped,
    /// The end of the road was snapped onto the given endpoint.
    Snapped(Endpoint),
}

pub trait NetworkManipulator {
    /// Adds a road with the given spline. The spline is in world space.
    fn add_road(&mut self, spline: Spline, params: RoadParams) -> NetworkResult<RoadId>;

    fn add_intersection(
        &mut self,
        loc: Loc,
        kind: IntersectionKind,
        params: IntersectionParams,
    ) -> NetworkResult<IntersectionId>;

    /// Removes the entity and severs all of its connections.
    fn remove(&mut self, entity: EntityId) -> NetworkResult<()>;

    /// Moves a control point of the road. If the point is one of the ends of the road it is
    /// snapped to a compatible endpoint in range, after which all connections of the road that
    /// drifted out of range are severed.
    fn set_control_point(
        &mut self,
        road: RoadId,
        index: usize,
        pos: Vec3,
    ) -> NetworkResult<SnapOutcome>;

    fn set_control_point_mode(
        &mut self,
        road: RoadId,
        index: usize,
        mode: ControlPointMode,
    ) -> NetworkResult<()>;

    /// Extends the road by one curve segment at the given end.
    fn append_segment(&mut self, road: RoadId, end: RoadEnd) -> NetworkResult<()>;

    /// Removes the curve segment at the given end. Returns false if the road only has one
    /// segment, in which case nothing happens.
    fn remove_segment(&mut self, road: RoadId, end: RoadEnd) -> NetworkResult<bool>;

    fn set_road_params(&mut self, road: RoadId, params: RoadParams) -> NetworkResult<()>;

    fn set_intersection_params(
        &mut self,
        intersection: IntersectionId,
        params: IntersectionParams,
    ) -> NetworkResult<()>;

    /// Places the intersection at a new location, severing connections that end up out of range.
    fn move_intersection(&mut self, intersection: IntersectionId, loc: Loc) -> NetworkResult<()>;

    /// Creates a new road continuing outwards from the given endpoint and connects it.
    fn attach_road(&mut self, from: Endpoint) -> NetworkResult<RoadId>;

    /// Creates a fixed intersection with the given arity at the end of a road and connects it.
    fn attach_intersection(
        &mut self,
        road: RoadId,
        end: RoadEnd,
        arity: usize,
    ) -> NetworkResult<IntersectionId>;

    /// Severs every connection of the entity whose endpoints are further apart than the snap
    /// tolerance. Returns the number of severed connections.
    fn check_for_disconnect(&mut self, entity: EntityId) -> NetworkResult<usize>;

    fn snap_points(&self, entity: EntityId) -> NetworkResult<Vec<SnapPoint>>;

    /// Returns the endpoint that the given endpoint is connected to.
    fn connection(&self, endpoint: Endpoint) -> Option<Endpoint>;

    fn generate_road_mesh(&self, road: RoadId) -> NetworkResult<MeshBuffers>;

    fn generate_intersection_mesh(&self, intersection: IntersectionId)
        -> NetworkResult<MeshBuffers>;

    /// Returns points along the centre of the given lane. Lanes are numbered starting from the
    /// left rail of the road.
    fn lane_waypoints(&self, road: RoadId, lane: u32) -> NetworkResult<Vec<Vec3>>;

    fn centre_waypoints(&self, road: RoadId) -> NetworkResult<Vec<Vec3>>;

    fn unique_id(&self, entity: EntityId) -> NetworkResult<UniqueId>;

    fn find_by_unique_id(&self, unique_id: &UniqueId) -> Option<EntityId>;
}
