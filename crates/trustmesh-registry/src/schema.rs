use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use trustmesh_core::{AttestationSchema, CategoryKey};

use crate::error::RegistryError;

/// Registry of attestation schemas, one per `(namespace, tag)` category.
pub struct SchemaRegistry {
    schemas: DashMap<CategoryKey, AttestationSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            schemas: DashMap::new(),
        }
    }

    /// Register a schema. A category can only be registered once.
    pub fn register(&self, schema: AttestationSchema) -> Result<(), RegistryError> {
        schema
            .category
            .validate()
            .map_err(|e| RegistryError::InvalidSchema(e.to_string()))?;
        if schema.min_score >= schema.max_score {
            return Err(RegistryError::InvalidSchema(format!(
                "min_score {} must be below max_score {}",
                schema.min_score, schema.max_score
            )));
        }

        match self.schemas.entry(schema.category.clone()) {
            Entry::Occupied(_) => Err(RegistryError::SchemaAlreadyRegistered(schema.category)),
            Entry::Vacant(slot) => {
                tracing::debug!(
                    category = %schema.category,
                    min = schema.min_score,
                    max = schema.max_score,
                    "registered attestation schema"
                );
                slot.insert(schema);
                Ok(())
            }
        }
    }

    /// Get the schema for a category.
    pub fn get(&self, category: &CategoryKey) -> Option<AttestationSchema> {
        self.schemas.get(category).map(|entry| entry.clone())
    }

    /// All registered categories, sorted.
    pub fn list(&self) -> Vec<CategoryKey> {
        let mut keys: Vec<CategoryKey> = self.schemas.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Number of registered schemas.
    pub fn count(&self) -> usize {
        self.schemas.len()
    }

    /// Check a score against the category's registered range.
    pub fn validate_score(&self, category: &CategoryKey, score: i64) -> Result<(), RegistryError> {
        let schema = self
            .schemas
            .get(category)
            .ok_or_else(|| RegistryError::SchemaNotFound(category.clone()))?;

        if !schema.contains(score) {
            return Err(RegistryError::ScoreOutOfRange {
                score,
                min: schema.min_score,
                max: schema.max_score,
            });
        }
        Ok(())
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
