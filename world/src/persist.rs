//! Saving and loading of the road network. The network is written as a [`NetworkRecord`] in yaml.
//! Connections are stored on both sides by unique id and are resolved again after all entities of
//! a record have been created.
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use curves::Spline;
use thiserror::Error;
use utils::id::UniqueId;
use utils::loader;
use world_api::{
    EntityId, Endpoint, IntersectionRecord, NetworkError, NetworkRecord, Port, RemoteRef,
    RoadEnd, RoadRecord,
};

use crate::roads::{Connectable, RoadGraph};
use crate::World;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("could not access the save file: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse the save file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{from} is connected to {to}, which does not exist")]
    DanglingConnection { from: UniqueId, to: UniqueId },
    #[error("the unique id {0} is used by more than one entity")]
    DuplicateUniqueId(UniqueId),
    #[error("intersection {unique_id} has {expected} snap points but {found} connections")]
    SlotCountMismatch {
        unique_id: UniqueId,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Network(#[from] NetworkError),
}

type Result<T> = std::result::Result<T, PersistError>;

fn inserted<T>(result: std::result::Result<T, NetworkError>) -> Result<T> {
    result.map_err(|err| match err {
        NetworkError::DuplicateUniqueId(id) => PersistError::DuplicateUniqueId(id),
        err => err.into(),
    })
}

impl World {
    pub fn to_record(&self) -> NetworkRecord {
        let roads = self
            .graph
            .roads()
            .map(|(_, road)| RoadRecord {
                unique_id: road.unique_id().clone(),
                params: *road.params(),
                control_points: road.spline().points().to_vec(),
                modes: road.spline().modes().to_vec(),
                positive: road.connection_at(RoadEnd::Positive).cloned(),
                negative: road.connection_at(RoadEnd::Negative).cloned(),
            })
            .collect();
        let intersections = self
            .graph
            .intersections()
            .map(|(_, intersection)| IntersectionRecord {
                unique_id: intersection.unique_id().clone(),
                loc: intersection.loc(),
                kind: intersection.kind(),
                params: *intersection.params(),
                connections: intersection.connections().to_vec(),
            })
            .collect();
        NetworkRecord {
            roads,
            intersections,
        }
    }

    /// Rebuilds a world from a record. Every connection must be present on both sides, and every
    /// unique id must be unique and resolve to an entity of the record.
    pub fn from_record(record: &NetworkRecord) -> Result<World> {
        let mut graph = RoadGraph::new();
        let mut links: Vec<(UniqueId, Port, &RemoteRef)> = Vec::new();

        for road in record.roads.iter() {
            let spline = Spline::from_parts(road.control_points.clone(), road.modes.clone())
                .map_err(NetworkError::from)?;
            inserted(graph.insert_road(road.unique_id.clone(), spline, road.params))?;
            for (end, remote) in [
                (RoadEnd::Positive, &road.positive),
                (RoadEnd::Negative, &road.negative),
            ] {
                if let Some(remote) = remote {
                    links.push((road.unique_id.clone(), end.into(), remote));
                }
            }
        }

        for intersection in record.intersections.iter() {
            let expected = intersection.kind.arity();
            if intersection.connections.len() != expected {
                return Err(PersistError::SlotCountMismatch {
                    unique_id: intersection.unique_id.clone(),
                    expected,
                    found: intersection.connections.len(),
                });
            }
            inserted(graph.insert_intersection(
                intersection.unique_id.clone(),
                intersection.loc,
                intersection.kind,
                intersection.params,
            ))?;
            for (slot, remote) in intersection.connections.iter().enumerate() {
                if let Some(remote) = remote {
                    links.push((intersection.unique_id.clone(), Port::Slot(slot), remote));
                }
            }
        }

        let resolve = |unique_id: &UniqueId, from: &UniqueId| -> Result<EntityId> {
            graph
                .resolve(unique_id)
                .ok_or_else(|| PersistError::DanglingConnection {
                    from: from.clone(),
                    to: unique_id.clone(),
                })
        };
        let mut edges = BTreeMap::new();
        for (unique_id, port, remote) in links {
            let local = Endpoint::new(resolve(&unique_id, &unique_id)?, port);
            let remote = Endpoint::new(resolve(&remote.unique_id, &unique_id)?, remote.port);
            edges.insert(local, remote);
        }

        for (a, b) in edges.iter() {
            if edges.get(b) != Some(a) {
                return Err(NetworkError::AsymmetricConnection(*a, *b).into());
            }
            if a < b {
                graph.connect(*a, *b)?;
            }
        }
        graph.validate()?;

        Ok(World {
            graph,
            ..Default::default()
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let record = self.to_record();
        let yaml = serde_yaml::to_string(&record)?;
        loader::store_string(path.as_ref(), &yaml)?;
        log::info!(
            "saved {} roads and {} intersections to {}",
            record.roads.len(),
            record.intersections.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<World> {
        let yaml = loader::load_string(path.as_ref())?;
        let record: NetworkRecord = serde_yaml::from_str(&yaml)?;
        let world = World::from_record(&record)?;
        log::info!(
            "loaded {} roads and {} intersections from {}",
            record.roads.len(),
            record.intersections.len(),
            path.as_ref().display()
        );
        Ok(world)
    }

    /// Replaces the network with the one stored at the given path. On failure the current network
    /// is kept as is. Terrain and spacing settings are never touched.
    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        match World::load(path.as_ref()) {
            Ok(loaded) => {
                self.graph = loaded.graph;
                Ok(())
            }
            Err(err) => {
                log::warn!("failed to reload {}: {err}", path.as_ref().display());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use world_api::{NetworkManipulator, RoadParams};

    fn network() -> World {
        let mut world = World::new();
        let a = world
            .add_road(
                Spline::straight(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)),
                RoadParams::with_width(4.0),
            )
            .unwrap();
        world
            .attach_road(Endpoint::road(a, RoadEnd::Positive))
            .unwrap();
        let i = world.attach_intersection(a, RoadEnd::Negative, 3).unwrap();
        world.attach_road(Endpoint::slot(i, 1)).unwrap();
        world
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("world-{name}-{}.yml", std::process::id()))
    }

    #[test]
    fn records_rebuild_the_same_network() {
        let world = network();
        let record = world.to_record();
        assert_eq!(record.roads.len(), 3);
        assert_eq!(record.intersections.len(), 1);

        let loaded = World::from_record(&record).unwrap();
        assert_eq!(loaded.to_record(), record);
        assert_eq!(loaded.graph().edges().count(), 6);
        assert_eq!(loaded.validate(), Ok(()));
    }

    #[test]
    fn records_survive_yaml() {
        let record = network().to_record();
        let yaml = serde_yaml::to_string(&record).unwrap();
        let parsed: NetworkRecord = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn one_sided_connections_are_rejected() {
        let mut record = network().to_record();
        record.roads[0].positive = None;
        assert!(matches!(
            World::from_record(&record),
            Err(PersistError::Network(NetworkError::AsymmetricConnection(..)))
        ));
    }

    #[test]
    fn dangling_connections_are_rejected() {
        let mut record = network().to_record();
        record.roads[0].negative = Some(RemoteRef {
            unique_id: "ghost".into(),
            port: Port::Slot(0),
        });
        assert!(matches!(
            World::from_record(&record),
            Err(PersistError::DanglingConnection { to, .. }) if to.as_str() == "ghost"
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut record = network().to_record();
        record.roads[1].unique_id = record.roads[0].unique_id.clone();
        assert!(matches!(
            World::from_record(&record),
            Err(PersistError::DuplicateUniqueId(_))
        ));
    }

    #[test]
    fn slot_counts_must_match() {
        let mut record = network().to_record();
        record.intersections[0].connections.pop();
        assert!(matches!(
            World::from_record(&record),
            Err(PersistError::SlotCountMismatch {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("save");
        let world = network();
        world.save(&path).unwrap();
        let loaded = World::load(&path).unwrap();
        assert_eq!(loaded.to_record(), world.to_record());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn failed_reload_keeps_the_network() {
        let path = temp_path("broken");
        std::fs::write(&path, "roads: [[[").unwrap();
        let mut world = network();
        let before = world.to_record();
        assert!(matches!(world.reload(&path), Err(PersistError::Yaml(_))));
        assert_eq!(world.to_record(), before);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            world.reload(temp_path("missing")),
            Err(PersistError::Io(_))
        ));
        assert_eq!(world.to_record(), before);
    }
}
