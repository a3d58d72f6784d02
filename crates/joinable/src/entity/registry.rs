//! Entity Registry - Runtime storage for entity metadata

use std::sync::Arc;
use dashmap::DashMap;

use crate::error::JoinResult;
use super::metadata::Entity;

/// Lookup of entity definitions by class name
pub trait EntityCatalog {
    /// Get an entity definition by class name
    fn entity(&self, class_name: &str) -> Option<Entity>;
}

/// Thread-safe registry of entity definitions
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    /// Map of class name -> entity definition
    entities: Arc<DashMap<String, Entity>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of entities
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> JoinResult<Self> {
        let registry = Self::new();
        for entity in entities {
            registry.register(entity)?;
        }
        Ok(registry)
    }

    /// Load entity definitions from a JSON array
    pub fn from_json(json: &str) -> JoinResult<Self> {
        let entities: Vec<Entity> = serde_json::from_str(json)?;
        Self::from_entities(entities)
    }

    /// Register an entity, replacing any previous definition of the same class
    pub fn register(&self, entity: Entity) -> JoinResult<()> {
        entity.validate()?;

        tracing::debug!(
            "Registering entity '{}' (table: {}, associations: {})",
            entity.name,
            entity.table,
            entity.associations.len()
        );
        self.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    /// Get an entity by class name
    pub fn get(&self, class_name: &str) -> Option<Entity> {
        self.entities.get(class_name).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityCatalog for EntityRegistry {
    fn entity(&self, class_name: &str) -> Option<Entity> {
        self.get(class_name)
    }
}
