use std::collections::BTreeMap;

use curves::Spline;
use mesh_gen::{EndPins, Pin};
use utils::id::{IdManager, IntersectionId, RoadId, UniqueId};
use utils::math::Loc;
use world_api::{
    EntityId, Endpoint, IntersectionKind, IntersectionParams, NetworkError, NetworkResult, Port,
    RemoteRef, RoadEnd, RoadParams, SnapOutcome, SnapPoint,
};

use super::{Connectable, Entity, Intersection, Registry, Road};

/// The snap graph. It owns every entity of the network together with the table of connections
/// between their endpoints. Entities only hold weak references to the remote side of their
/// connections, the edge table is authoritative and is always updated together with both sides.
#[derive(Debug, Default)]
pub struct RoadGraph {
    entities: BTreeMap<EntityId, Entity>,
    registry: Registry,
    /// Contains both directions of every connection.
    edges: BTreeMap<Endpoint, Endpoint>,

    road_ids: IdManager<RoadId>,
    intersection_ids: IdManager<IntersectionId>,
}

// #################################################################################################
// Entity access
// #################################################################################################
impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(&self, id: EntityId) -> NetworkResult<&Entity> {
        self.entities.get(&id).ok_or(NetworkError::UnknownEntity(id))
    }

    fn entity_mut(&mut self, id: EntityId) -> NetworkResult<&mut Entity> {
        self.entities
            .get_mut(&id)
            .ok_or(NetworkError::UnknownEntity(id))
    }

    pub fn road(&self, id: RoadId) -> NetworkResult<&Road> {
        let entity = EntityId::Road(id);
        self.entity(entity)?
            .as_road()
            .ok_or(NetworkError::UnknownEntity(entity))
    }

    pub fn road_mut(&mut self, id: RoadId) -> NetworkResult<&mut Road> {
        let entity = EntityId::Road(id);
        self.entity_mut(entity)?
            .as_road_mut()
            .ok_or(NetworkError::UnknownEntity(entity))
    }

    pub fn intersection(&self, id: IntersectionId) -> NetworkResult<&Intersection> {
        let entity = EntityId::Intersection(id);
        self.entity(entity)?
            .as_intersection()
            .ok_or(NetworkError::UnknownEntity(entity))
    }

    pub fn intersection_mut(&mut self, id: IntersectionId) -> NetworkResult<&mut Intersection> {
        let entity = EntityId::Intersection(id);
        self.entity_mut(entity)?
            .as_intersection_mut()
            .ok_or(NetworkError::UnknownEntity(entity))
    }

    pub fn roads(&self) -> impl Iterator<Item = (RoadId, &Road)> + '_ {
        self.entities.iter().filter_map(|(id, entity)| match id {
            EntityId::Road(id) => Some((*id, entity.as_road()?)),
            EntityId::Intersection(_) => None,
        })
    }

    pub fn intersections(&self) -> impl Iterator<Item = (IntersectionId, &Intersection)> + '_ {
        self.entities.iter().filter_map(|(id, entity)| match id {
            EntityId::Intersection(id) => Some((*id, entity.as_intersection()?)),
            EntityId::Road(_) => None,
        })
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    pub fn resolve(&self, unique_id: &UniqueId) -> Option<EntityId> {
        self.registry.resolve(unique_id)
    }

    pub fn insert_road(
        &mut self,
        unique_id: UniqueId,
        spline: Spline,
        params: RoadParams,
    ) -> NetworkResult<RoadId> {
        let id = self.road_ids.gen();
        self.registry.register(unique_id.clone(), EntityId::Road(id))?;
        let road = Road::new(unique_id, spline, params);
        self.entities.insert(EntityId::Road(id), road.into());
        Ok(id)
    }

    pub fn insert_intersection(
        &mut self,
        unique_id: UniqueId,
        loc: Loc,
        kind: IntersectionKind,
        params: IntersectionParams,
    ) -> NetworkResult<IntersectionId> {
        let kind = kind.validated()?;
        let id = self.intersection_ids.gen();
        self.registry
            .register(unique_id.clone(), EntityId::Intersection(id))?;
        let intersection = Intersection::new(unique_id, loc, kind, params);
        self.entities
            .insert(EntityId::Intersection(id), intersection.into());
        Ok(id)
    }

    /// Severs every connection of the entity and removes it.
    pub fn remove(&mut self, id: EntityId) -> NetworkResult<()> {
        for port in self.entity(id)?.ports() {
            self.disconnect(Endpoint::new(id, port));
        }
        if let Some(entity) = self.entities.remove(&id) {
            self.registry.unregister(entity.unique_id());
        }
        self.debug_check();
        Ok(())
    }
}

// #################################################################################################
// Connections
// #################################################################################################
impl RoadGraph {
    pub fn snap_point(&self, endpoint: Endpoint) -> NetworkResult<SnapPoint> {
        self.entity(endpoint.entity)?
            .snap_point(endpoint.port)
            .ok_or(NetworkError::InvalidPort {
                entity: endpoint.entity,
                port: endpoint.port,
            })
    }

    pub fn snap_points(&self, id: EntityId) -> NetworkResult<Vec<SnapPoint>> {
        Ok(self.entity(id)?.snap_points())
    }

    pub fn connection(&self, endpoint: Endpoint) -> Option<Endpoint> {
        self.edges.get(&endpoint).copied()
    }

    pub fn edges(&self) -> impl Iterator<Item = (Endpoint, Endpoint)> + '_ {
        self.edges.iter().map(|(a, b)| (*a, *b))
    }

    /// Connects two endpoints, replacing any connection either of them had before. Fails without
    /// changing anything if the endpoints are on the same entity, do not exist or have polarities
    /// that can not connect.
    pub fn connect(&mut self, a: Endpoint, b: Endpoint) -> NetworkResult<()> {
        if a.entity == b.entity {
            return Err(NetworkError::SelfConnection(a.entity));
        }
        let (point_a, point_b) = (self.snap_point(a)?, self.snap_point(b)?);
        if !point_a.polarity.accepts(point_b.polarity) {
            return Err(NetworkError::IncompatiblePolarity(a, b));
        }

        self.disconnect(a);
        self.disconnect(b);
        let remote_a = RemoteRef {
            unique_id: self.entity(b.entity)?.unique_id().clone(),
            port: b.port,
        };
        let remote_b = RemoteRef {
            unique_id: self.entity(a.entity)?.unique_id().clone(),
            port: a.port,
        };
        self.entity_mut(a.entity)?.set_remote(a.port, Some(remote_a));
        self.entity_mut(b.entity)?.set_remote(b.port, Some(remote_b));
        self.edges.insert(a, b);
        self.edges.insert(b, a);

        log::debug!("connected {a:?} to {b:?}");
        self.debug_check();
        Ok(())
    }

    /// Severs the connection at the given endpoint on both sides. Returns the endpoint it was
    /// connected to.
    pub fn disconnect(&mut self, endpoint: Endpoint) -> Option<Endpoint> {
        let remote = self.edges.remove(&endpoint)?;
        self.edges.remove(&remote);
        for side in [endpoint, remote] {
            if let Some(entity) = self.entities.get_mut(&side.entity) {
                entity.set_remote(side.port, None);
            }
        }
        log::debug!("disconnected {endpoint:?} from {remote:?}");
        Some(remote)
    }

    /// Severs every connection of the entity whose two endpoints lie further apart than the snap
    /// tolerance of the remote endpoint.
    pub fn check_for_disconnect(&mut self, id: EntityId) -> NetworkResult<usize> {
        let mut severed = 0;
        for port in self.entity(id)?.ports() {
            let local = Endpoint::new(id, port);
            let Some(remote) = self.connection(local) else {
                continue;
            };
            let (a, b) = (self.snap_point(local)?, self.snap_point(remote)?);
            if a.pos.distance(b.pos) > b.tolerance() {
                self.disconnect(local);
                severed += 1;
            }
        }
        self.debug_check();
        Ok(severed)
    }

    /// Finds the first endpoint that the given end of the road can snap to. Roads are searched
    /// before intersections, and the negative end of a road before its positive end. The first
    /// compatible endpoint in range is returned, not the nearest one.
    pub fn find_snap_target(
        &self,
        road: RoadId,
        end: RoadEnd,
    ) -> NetworkResult<Option<(Endpoint, SnapPoint)>> {
        let moved = Endpoint::road(road, end);
        let point = self.road(road)?.end_snap_point(end);
        let available = |target: Endpoint| match self.connection(target) {
            Some(connected) if connected != moved => {
                log::warn!("{target:?} is in range of {moved:?} but already connected");
                false
            }
            _ => true,
        };

        for (id, entity) in self.entities.iter() {
            match entity {
                Entity::Road(other) => {
                    if *id == moved.entity {
                        continue;
                    }
                    for other_end in [RoadEnd::Negative, RoadEnd::Positive] {
                        let target = other.end_snap_point(other_end);
                        let endpoint = Endpoint::new(*id, other_end.into());
                        if target.polarity.accepts(point.polarity)
                            && point.pos.distance(target.pos) <= target.tolerance()
                            && available(endpoint)
                        {
                            return Ok(Some((endpoint, target)));
                        }
                    }
                }
                Entity::Intersection(intersection) => {
                    for (slot, target) in intersection.snap_points().into_iter().enumerate() {
                        let endpoint = Endpoint::new(*id, Port::Slot(slot));
                        if point.pos.distance(target.pos) < target.tolerance()
                            && available(endpoint)
                        {
                            return Ok(Some((endpoint, target)));
                        }
                    }
                }
            }
        }
        Ok(None)
    }

    /// Moves the given end of the road exactly onto the target and points the road away from it,
    /// keeping the distance between the end and its adjacent handle. Then records the connection.
    pub fn snap_to(&mut self, road: RoadId, end: RoadEnd, target: Endpoint) -> NetworkResult<()> {
        let point = self.snap_point(target)?;
        let r = self.road_mut(road)?;
        let (end_index, adjacent_index) = (r.end_index(end), r.adjacent_index(end));
        let spline = r.spline_mut();
        let handle = spline.point(end_index)?.distance(spline.point(adjacent_index)?);
        spline.set_control_point(end_index, point.pos)?;
        spline.set_control_point(adjacent_index, point.pos + point.forward * handle)?;

        self.connect(Endpoint::road(road, end), target)?;
        log::debug!("snapped {end:?} end of road {road} to {target:?}");
        Ok(())
    }

    /// Snaps the given end of the road to the first compatible endpoint in range, if any, and
    /// then severs every other connection of the road that drifted out of range.
    pub fn try_snap(&mut self, road: RoadId, end: RoadEnd) -> NetworkResult<SnapOutcome> {
        match self.find_snap_target(road, end)? {
            Some((target, _)) => {
                self.snap_to(road, end, target)?;
                self.check_for_disconnect(EntityId::Road(road))?;
                Ok(SnapOutcome::Snapped(target))
            }
            None => Ok(SnapOutcome::Unsnapped),
        }
    }

    /// The cross sections that the ends of the road are pinned to by their connections. The pin
    /// direction is the direction the road travels in at that end.
    ///
    /// Both roads of a road to road connection are pinned to the negative end of the one that
    /// arrives at the junction, so the two cross sections are the same regardless of the handles
    /// on the other side.
    pub fn end_pins(&self, road: RoadId) -> NetworkResult<EndPins> {
        let pin = |end: RoadEnd| -> NetworkResult<Option<Pin>> {
            let Some(remote) = self.connection(Endpoint::road(road, end)) else {
                return Ok(None);
            };
            let pin = match (end, remote.port) {
                (RoadEnd::Negative, Port::End(_)) => {
                    let own = self.road(road)?.end_snap_point(end);
                    Pin::new(own.pos, own.forward)
                }
                (RoadEnd::Positive, _) => {
                    let point = self.snap_point(remote)?;
                    Pin::new(point.pos, point.forward)
                }
                (RoadEnd::Negative, Port::Slot(_)) => {
                    let point = self.snap_point(remote)?;
                    Pin::new(point.pos, -point.forward)
                }
            };
            Ok(Some(pin))
        };
        Ok(EndPins {
            start: pin(RoadEnd::Positive)?,
            end: pin(RoadEnd::Negative)?,
        })
    }

    /// Checks that the edge table and the references held by the entities agree, and that every
    /// entity is registered under its unique id.
    pub fn validate(&self) -> NetworkResult<()> {
        for (a, b) in self.edges.iter() {
            if self.edges.get(b) != Some(a) {
                return Err(NetworkError::AsymmetricConnection(*a, *b));
            }
            let expected = RemoteRef {
                unique_id: self.entity(b.entity)?.unique_id().clone(),
                port: b.port,
            };
            if self.entity(a.entity)?.remote(a.port) != Some(&expected) {
                return Err(NetworkError::AsymmetricConnection(*a, *b));
            }
        }

        for (id, entity) in self.entities.iter() {
            if self.registry.resolve(entity.unique_id()) != Some(*id) {
                return Err(NetworkError::UnknownUniqueId(entity.unique_id().clone()));
            }
            for port in entity.ports() {
                let endpoint = Endpoint::new(*id, port);
                if entity.remote(port).is_some() && self.connection(endpoint).is_none() {
                    return Err(NetworkError::AsymmetricConnection(endpoint, endpoint));
                }
            }
        }
        Ok(())
    }

    fn debug_check(&self) {
        debug_assert_eq!(self.validate(), Ok(()));
    }
}
