mod id_manager;

use id_manager::Id;

pub use id_manager::IdManager;

use serde::{Deserialize, Serialize};

pub type RoadId = Id<id_manager::RoadMarker, u32>;
pub type IntersectionId = Id<id_manager::IntersectionMarker, u32>;

/// A process-wide unique identifier of an entity. Unlike [`RoadId`] and [`IntersectionId`], which
/// are only valid within the arena that generated them, this identifier survives persistence and
/// is what connections are resolved through after a load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueId(String);

impl UniqueId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UniqueId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for UniqueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_unique_ids_differ() {
        let a = UniqueId::generate();
        let b = UniqueId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn id_manager_hands_out_increasing_ids() {
        let mut manager: IdManager<RoadId> = IdManager::new();
        let a = manager.gen();
        let b = manager.gen();
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(b.to_string(), "1");
    }
}
