use utils::id::UniqueId;
use utils::math::Loc;
use world_api::{IntersectionKind, IntersectionParams, Port, RemoteRef, SnapPoint};

use super::Connectable;

/// An intersection is a polygon placed at a location, with one bipolar slot per connector. Every
/// slot holds at most one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    unique_id: UniqueId,
    loc: Loc,
    kind: IntersectionKind,
    params: IntersectionParams,
    connections: Vec<Option<RemoteRef>>,
}

impl Intersection {
    pub fn new(
        unique_id: UniqueId,
        loc: Loc,
        kind: IntersectionKind,
        params: IntersectionParams,
    ) -> Self {
        Self {
            unique_id,
            loc,
            kind,
            params: params.clamped(kind),
            connections: vec![None; kind.arity()],
        }
    }

    pub fn loc(&self) -> Loc {
        self.loc
    }

    pub fn set_loc(&mut self, loc: Loc) {
        self.loc = loc;
    }

    pub fn kind(&self) -> IntersectionKind {
        self.kind
    }

    pub fn params(&self) -> &IntersectionParams {
        &self.params
    }

    pub fn set_params(&mut self, params: IntersectionParams) {
        self.params = params.clamped(self.kind);
    }

    pub fn connections(&self) -> &[Option<RemoteRef>] {
        &self.connections
    }

    pub fn snap_points(&self) -> Vec<SnapPoint> {
        mesh_gen::snap_points(self.kind, &self.params, self.loc)
    }
}

impl Connectable for Intersection {
    fn unique_id(&self) -> &UniqueId {
        &self.unique_id
    }

    fn ports(&self) -> Vec<Port> {
        (0..self.kind.arity()).map(Port::Slot).collect()
    }

    fn snap_point(&self, port: Port) -> Option<SnapPoint> {
        match port {
            Port::Slot(slot) => self.snap_points().get(slot).copied(),
            Port::End(_) => None,
        }
    }

    fn remote(&self, port: Port) -> Option<&RemoteRef> {
        match port {
            Port::Slot(slot) => self.connections.get(slot)?.as_ref(),
            Port::End(_) => None,
        }
    }

    fn set_remote(&mut self, port: Port, remote: Option<RemoteRef>) -> bool {
        match port {
            Port::Slot(slot) => match self.connections.get_mut(slot) {
                Some(connection) => {
                    *connection = remote;
                    true
                }
                None => false,
            },
            Port::End(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use world_api::RoadEnd;

    #[test]
    fn slots_hold_one_connection_each() {
        let mut intersection = Intersection::new(
            "i".into(),
            Loc::at(Vec3::ZERO),
            IntersectionKind::Fixed(3),
            IntersectionParams::default(),
        );
        assert_eq!(intersection.ports().len(), 3);
        let remote = RemoteRef {
            unique_id: "r".into(),
            port: RoadEnd::Positive.into(),
        };
        assert!(intersection.set_remote(Port::Slot(2), Some(remote.clone())));
        assert_eq!(intersection.remote(Port::Slot(2)), Some(&remote));
        assert!(!intersection.set_remote(Port::Slot(3), None));
        assert!(intersection.snap_point(Port::Slot(3)).is_none());
        assert!(intersection.snap_point(Port::End(RoadEnd::Negative)).is_none());
    }
}
