use std::collections::HashMap;

use utils::id::UniqueId;
use world_api::{EntityId, NetworkError, NetworkResult};

/// Maps the process-wide unique ids of entities to their ids in the graph. This is what weak
/// references between entities are resolved through.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: HashMap<UniqueId, EntityId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, unique_id: UniqueId, entity: EntityId) -> NetworkResult<()> {
        if self.entities.contains_key(&unique_id) {
            return Err(NetworkError::DuplicateUniqueId(unique_id));
        }
        self.entities.insert(unique_id, entity);
        Ok(())
    }

    pub fn unregister(&mut self, unique_id: &UniqueId) -> Option<EntityId> {
        self.entities.remove(unique_id)
    }

    pub fn resolve(&self, unique_id: &UniqueId) -> Option<EntityId> {
        self.entities.get(unique_id).copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utils::id::{IdManager, RoadId};

    #[test]
    fn unique_ids_are_registered_once() {
        let mut ids: IdManager<RoadId> = IdManager::new();
        let mut registry = Registry::new();
        let entity = EntityId::Road(ids.gen());
        let unique_id = UniqueId::from("road");

        assert_eq!(registry.register(unique_id.clone(), entity), Ok(()));
        assert_eq!(
            registry.register(unique_id.clone(), EntityId::Road(ids.gen())),
            Err(NetworkError::DuplicateUniqueId(unique_id.clone()))
        );
        assert_eq!(registry.resolve(&unique_id), Some(entity));
        assert_eq!(registry.unregister(&unique_id), Some(entity));
        assert!(registry.is_empty());
    }
}
