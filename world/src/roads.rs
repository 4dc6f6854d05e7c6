//! The entities of the road network and the graph that connects them.
mod graph;
mod intersection;
mod registry;
mod road;

pub use graph::RoadGraph;
pub use intersection::Intersection;
pub use registry::Registry;
pub use road::Road;

use enum_dispatch::enum_dispatch;
use utils::id::UniqueId;
use world_api::{Port, RemoteRef, SnapPoint};

/// The capabilities that the graph needs from anything that can be connected to.
#[enum_dispatch]
pub trait Connectable {
    fn unique_id(&self) -> &UniqueId;

    /// All ports of the entity, in the order of its snap points.
    fn ports(&self) -> Vec<Port>;

    /// The world space snap point at the given port, if the port exists.
    fn snap_point(&self, port: Port) -> Option<SnapPoint>;

    /// The weak reference to the remote side of the connection at the given port.
    fn remote(&self, port: Port) -> Option<&RemoteRef>;

    /// Sets the reference at the given port. Returns false if the port does not exist. Only the
    /// graph calls this, as it has to update both sides of a connection together.
    fn set_remote(&mut self, port: Port, remote: Option<RemoteRef>) -> bool;

    fn snap_points(&self) -> Vec<SnapPoint> {
        self.ports()
            .into_iter()
            .filter_map(|port| self.snap_point(port))
            .collect()
    }
}

#[enum_dispatch(Connectable)]
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Road,
    Intersection,
}

impl Entity {
    pub fn as_road(&self) -> Option<&Road> {
        match self {
            Entity::Road(road) => Some(road),
            Entity::Intersection(_) => None,
        }
    }

    pub fn as_road_mut(&mut self) -> Option<&mut Road> {
        match self {
            Entity::Road(road) => Some(road),
            Entity::Intersection(_) => None,
        }
    }

    pub fn as_intersection(&self) -> Option<&Intersection> {
        match self {
            Entity::Intersection(intersection) => Some(intersection),
            Entity::Road(_) => None,
        }
    }

    pub fn as_intersection_mut(&mut self) -> Option<&mut Intersection> {
        match self {
            Entity::Intersection(intersection) => Some(intersection),
            Entity::Road(_) => None,
        }
    }
}
