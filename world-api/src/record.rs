//! The flat records that the road network is persisted as. Connections are stored as unique ids
//! of the remote entity, such that the network can be rebuilt from the records alone.
use curves::ControlPointMode;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use utils::id::UniqueId;
use utils::math::Loc;

use crate::{IntersectionKind, IntersectionParams, RemoteRef, RoadParams};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadRecord {
    pub unique_id: UniqueId,
    pub params: RoadParams,
    /// World positions of all control points of the road's spline.
    pub control_points: Vec<Vec3>,
    pub modes: Vec<ControlPointMode>,
    #[serde(default)]
    pub positive: Option<RemoteRef>,
    #[serde(default)]
    pub negative: Option<RemoteRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionRecord {
    pub unique_id: UniqueId,
    pub loc: Loc,
    pub kind: IntersectionKind,
    pub params: IntersectionParams,
    /// The connection of every snap point, indexed by slot.
    pub connections: Vec<Option<RemoteRef>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    #[serde(default)]
    pub roads: Vec<RoadRecord>,
    #[serde(default)]
    pub intersections: Vec<IntersectionRecord>,
}
