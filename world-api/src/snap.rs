use glam::Vec3;
use serde::{Deserialize, Serialize};
use utils::consts::SNAP_DIVISOR;
use utils::id::{IntersectionId, RoadId, UniqueId};
use utils::math::DirXZ;

/// Defines which endpoints may connect to each other. Road ends are polar and only connect to
/// the opposite polarity, intersection snap points are bipolar and accept anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    Negative,
    Bipolar,
}

/// The two ends of a road. The positive end is at t = 0 of its spline and the negative end at
/// t = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoadEnd {
    Positive,
    Negative,
}

/// The part of an entity that a connection attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Port {
    /// One of the two ends of a road.
    End(RoadEnd),
    /// The snap point with the given index on an intersection.
    Slot(usize),
}

/// Identifies an entity of the road network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityId {
    Road(RoadId),
    Intersection(IntersectionId),
}

/// One endpoint in the road network, i.e. a port on a specific entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Endpoint {
    pub entity: EntityId,
    pub port: Port,
}

/// A typed, positioned connector on a road or intersection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapPoint {
    pub pos: Vec3,
    /// Points away from the entity the snap point belongs to.
    pub forward: DirXZ,
    pub polarity: Polarity,
    /// The road width of the owning entity.
    pub width: f32,
}

/// A weak reference to the remote side of a connection, resolved through the registry of unique
/// ids. This is what entities store and what is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteRef {
    pub unique_id: UniqueId,
    pub port: Port,
}

// #################################################################################################
// Implementation of Polarity
// #################################################################################################
impl Polarity {
    /// Returns true if an endpoint of this polarity may connect to one of the other polarity.
    pub fn accepts(self, other: Polarity) -> bool {
        use Polarity::*;
        match (self, other) {
            (Bipolar, _) | (_, Bipolar) => true,
            (Positive, Negative) | (Negative, Positive) => true,
            _ => false,
        }
    }
}

// #################################################################################################
// Implementation of RoadEnd and Port
// #################################################################################################
impl RoadEnd {
    pub fn polarity(self) -> Polarity {
        match self {
            RoadEnd::Positive => Polarity::Positive,
            RoadEnd::Negative => Polarity::Negative,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            RoadEnd::Positive => RoadEnd::Negative,
            RoadEnd::Negative => RoadEnd::Positive,
        }
    }

    pub fn is_positive(self) -> bool {
        self == RoadEnd::Positive
    }

    /// The spline parameter of this end.
    pub fn t(self) -> f32 {
        match self {
            RoadEnd::Positive => 0.0,
            RoadEnd::Negative => 1.0,
        }
    }
}

impl From<RoadEnd> for Port {
    fn from(value: RoadEnd) -> Self {
        Port::End(value)
    }
}

impl Endpoint {
    pub fn new(entity: EntityId, port: Port) -> Self {
        Self { entity, port }
    }

    pub fn road(id: RoadId, end: RoadEnd) -> Self {
        Self::new(EntityId::Road(id), Port::End(end))
    }

    pub fn slot(id: IntersectionId, slot: usize) -> Self {
        Self::new(EntityId::Intersection(id), Port::Slot(slot))
    }
}

// #################################################################################################
// Implementation of SnapPoint
// #################################################################################################
impl SnapPoint {
    pub fn new(pos: Vec3, forward: DirXZ, polarity: Polarity, width: f32) -> Self {
        Self {
            pos,
            forward,
            polarity,
            width,
        }
    }

    /// The maximum distance at which another endpoint snaps to this one, and beyond which an
    /// existing connection to this one is severed.
    pub fn tolerance(&self) -> f32 {
        self.width / SNAP_DIVISOR
    }

    /// The horizontal direction perpendicular to forward, pointing to the right hand side when
    /// looking along forward.
    pub fn lateral(&self) -> DirXZ {
        self.forward.right_hand()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_ends_only_accept_the_opposite() {
        use Polarity::*;
        assert!(Positive.accepts(Negative));
        assert!(Negative.accepts(Positive));
        assert!(!Positive.accepts(Positive));
        assert!(!Negative.accepts(Negative));
        assert!(Bipolar.accepts(Positive));
        assert!(Negative.accepts(Bipolar));
        assert!(Bipolar.accepts(Bipolar));
    }

    #[test]
    fn tolerance_is_a_third_of_the_width() {
        let point = SnapPoint::new(Vec3::ZERO, DirXZ::new(), Polarity::Bipolar, 4.0);
        assert!((point.tolerance() - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(*point.lateral(), Vec3::Z);
    }

    #[test]
    fn road_ends() {
        assert_eq!(RoadEnd::Positive.opposite(), RoadEnd::Negative);
        assert_eq!(RoadEnd::Negative.polarity(), Polarity::Negative);
        assert_eq!(RoadEnd::Negative.t(), 1.0);
        assert_eq!(Port::from(RoadEnd::Positive), Port::End(RoadEnd::Positive));
    }
}
