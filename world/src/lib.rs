//! This crate owns the road network and is the only place where it is mutated. It keeps the
//! entities, the registry of unique ids and the snap graph consistent with each other, and hands
//! out generated meshes and waypoints. Other crates manipulate the network through the
//! [`NetworkManipulator`] implementation of [`World`].
pub mod roads;

mod persist;
pub use persist::PersistError;

use roads::{Connectable, RoadGraph};

use curves::{ControlPointMode, Spline};
use gfx_api::MeshBuffers;
use mesh_gen::{RailContext, TerrainSnap};
use utils::consts::{ATTACHED_ROAD_LENGTH_FACTOR, SEGMENT_SPACING_FACTOR};
use utils::id::{IntersectionId, RoadId, UniqueId};
use utils::math::Loc;
use world_api::{
    EntityId, Endpoint, HeightSampler, IntersectionKind, IntersectionParams, NetworkError,
    NetworkManipulator, NetworkResult, Polarity, RoadEnd, RoadParams, SnapOutcome, SnapPoint,
};

use glam::Vec3;

pub struct World {
    graph: RoadGraph,
    terrain: Option<Box<dyn HeightSampler>>,
    /// Appended curve segments space their points this many road widths apart.
    spacing_factor: f32,
}

impl Default for World {
    fn default() -> Self {
        Self {
            graph: RoadGraph::new(),
            terrain: None,
            spacing_factor: SEGMENT_SPACING_FACTOR,
        }
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    /// Sets the terrain that roads with terrain snapping enabled are projected onto.
    pub fn set_terrain(&mut self, terrain: Box<dyn HeightSampler>) {
        self.terrain = Some(terrain);
    }

    pub fn clear_terrain(&mut self) {
        self.terrain = None;
    }

    pub fn set_spacing_factor(&mut self, factor: f32) {
        self.spacing_factor = factor.max(0.0);
    }

    /// Checks that all connections are symmetric and all entities are registered.
    pub fn validate(&self) -> NetworkResult<()> {
        self.graph.validate()
    }

    fn rail_context(&self, road: RoadId) -> NetworkResult<RailContext<'_>> {
        let params = self.graph.road(road)?.params();
        let terrain = match (&self.terrain, params.terrain.snap_to_terrain) {
            (Some(sampler), true) => Some(TerrainSnap {
                sampler: sampler.as_ref(),
                clearance: params.terrain.clearance,
            }),
            _ => None,
        };
        Ok(RailContext::new(self.graph.end_pins(road)?, terrain))
    }

    fn free(&self, endpoint: Endpoint) -> NetworkResult<()> {
        match self.graph.connection(endpoint) {
            Some(_) => Err(NetworkError::PortOccupied(endpoint)),
            None => Ok(()),
        }
    }
}

impl NetworkManipulator for World {
    fn add_road(&mut self, spline: Spline, params: RoadParams) -> NetworkResult<RoadId> {
        self.graph.insert_road(UniqueId::generate(), spline, params)
    }

    fn add_intersection(
        &mut self,
        loc: Loc,
        kind: IntersectionKind,
        params: IntersectionParams,
    ) -> NetworkResult<IntersectionId> {
        self.graph
            .insert_intersection(UniqueId::generate(), loc, kind, params)
    }

    fn remove(&mut self, entity: EntityId) -> NetworkResult<()> {
        self.graph.remove(entity)
    }

    fn set_control_point(
        &mut self,
        road: RoadId,
        index: usize,
        pos: Vec3,
    ) -> NetworkResult<SnapOutcome> {
        let r = self.graph.road_mut(road)?;
        r.spline_mut().set_control_point(index, pos)?;
        let end = r.end_at(index);

        self.graph.check_for_disconnect(EntityId::Road(road))?;
        match end {
            Some(end) => self.graph.try_snap(road, end),
            None => Ok(SnapOutcome::NotAnEnd),
        }
    }

    fn set_control_point_mode(
        &mut self,
        road: RoadId,
        index: usize,
        mode: ControlPointMode,
    ) -> NetworkResult<()> {
        self.graph
            .road_mut(road)?
            .spline_mut()
            .set_mode(index, mode)?;
        self.graph.check_for_disconnect(EntityId::Road(road))?;
        Ok(())
    }

    fn append_segment(&mut self, road: RoadId, end: RoadEnd) -> NetworkResult<()> {
        let spacing_factor = self.spacing_factor;
        let r = self.graph.road_mut(road)?;
        let spacing = r.params().width * spacing_factor;
        r.spline_mut().append_segment(end.is_positive(), spacing);
        log::debug!("appended a segment at the {end:?} end of road {road}");
        self.graph.check_for_disconnect(EntityId::Road(road))?;
        Ok(())
    }

    fn remove_segment(&mut self, road: RoadId, end: RoadEnd) -> NetworkResult<bool> {
        let removed = self
            .graph
            .road_mut(road)?
            .spline_mut()
            .remove_segment(end.is_positive());
        if removed {
            self.graph.check_for_disconnect(EntityId::Road(road))?;
        }
        Ok(removed)
    }

    fn set_road_params(&mut self, road: RoadId, params: RoadParams) -> NetworkResult<()> {
        self.graph.road_mut(road)?.set_params(params);
        self.graph.check_for_disconnect(EntityId::Road(road))?;
        Ok(())
    }

    fn set_intersection_params(
        &mut self,
        intersection: IntersectionId,
        params: IntersectionParams,
    ) -> NetworkResult<()> {
        self.graph
            .intersection_mut(intersection)?
            .set_params(params);
        self.graph
            .check_for_disconnect(EntityId::Intersection(intersection))?;
        Ok(())
    }

    fn move_intersection(&mut self, intersection: IntersectionId, loc: Loc) -> NetworkResult<()> {
        self.graph.intersection_mut(intersection)?.set_loc(loc);
        self.graph
            .check_for_disconnect(EntityId::Intersection(intersection))?;
        Ok(())
    }

    fn attach_road(&mut self, from: Endpoint) -> NetworkResult<RoadId> {
        let point = self.graph.snap_point(from)?;
        self.free(from)?;
        let params = match from.entity {
            EntityId::Road(id) => *self.graph.road(id)?.params(),
            EntityId::Intersection(id) => {
                let source = self.graph.intersection(id)?.params();
                RoadParams {
                    width: source.width,
                    side_depth: source.side_depth,
                    slope_width: source.slope_width,
                    ..Default::default()
                }
            }
        };

        let far = point.pos + point.forward * (params.width * ATTACHED_ROAD_LENGTH_FACTOR);
        let (spline, end) = match point.polarity {
            Polarity::Positive => (Spline::straight(far, point.pos), RoadEnd::Negative),
            Polarity::Negative | Polarity::Bipolar => {
                (Spline::straight(point.pos, far), RoadEnd::Positive)
            }
        };
        let road = self.graph.insert_road(UniqueId::generate(), spline, params)?;
        self.graph.connect(Endpoint::road(road, end), from)?;
        log::debug!("attached road {road} to {from:?}");
        Ok(road)
    }

    fn attach_intersection(
        &mut self,
        road: RoadId,
        end: RoadEnd,
        arity: usize,
    ) -> NetworkResult<IntersectionId> {
        let kind = IntersectionKind::fixed(arity)?;
        self.free(Endpoint::road(road, end))?;
        let r = self.graph.road(road)?;
        let point = r.end_snap_point(end);
        let params = IntersectionParams::from_road(r.params());

        // Slot 0 faces local -x, so pointing local +x along the road puts it onto the road end.
        let loc = Loc::new(point.pos + point.forward * (params.width / 2.0), point.forward);
        let intersection =
            self.graph
                .insert_intersection(UniqueId::generate(), loc, kind, params)?;
        self.graph
            .snap_to(road, end, Endpoint::slot(intersection, 0))?;
        log::debug!("attached intersection {intersection} to the {end:?} end of road {road}");
        Ok(intersection)
    }

    fn check_for_disconnect(&mut self, entity: EntityId) -> NetworkResult<usize> {
        self.graph.check_for_disconnect(entity)
    }

    fn snap_points(&self, entity: EntityId) -> NetworkResult<Vec<SnapPoint>> {
        self.graph.snap_points(entity)
    }

    fn connection(&self, endpoint: Endpoint) -> Option<Endpoint> {
        self.graph.connection(endpoint)
    }

    fn generate_road_mesh(&self, road: RoadId) -> NetworkResult<MeshBuffers> {
        let r = self.graph.road(road)?;
        let ctx = self.rail_context(road)?;
        Ok(mesh_gen::generate_road_mesh(r.spline(), r.params(), &ctx))
    }

    fn generate_intersection_mesh(
        &self,
        intersection: IntersectionId,
    ) -> NetworkResult<MeshBuffers> {
        let i = self.graph.intersection(intersection)?;
        Ok(mesh_gen::generate_intersection_mesh(
            i.kind(),
            i.params(),
            i.loc(),
        ))
    }

    fn lane_waypoints(&self, road: RoadId, lane: u32) -> NetworkResult<Vec<Vec3>> {
        let r = self.graph.road(road)?;
        let ctx = self.rail_context(road)?;
        mesh_gen::lane_waypoints(r.spline(), r.params(), lane, &ctx)
    }

    fn centre_waypoints(&self, road: RoadId) -> NetworkResult<Vec<Vec3>> {
        let r = self.graph.road(road)?;
        let ctx = self.rail_context(road)?;
        Ok(mesh_gen::centre_waypoints(r.spline(), r.params(), &ctx))
    }

    fn unique_id(&self, entity: EntityId) -> NetworkResult<UniqueId> {
        Ok(self.graph.entity(entity)?.unique_id().clone())
    }

    fn find_by_unique_id(&self, unique_id: &UniqueId) -> Option<EntityId> {
        self.graph.resolve(unique_id)
    }
}
