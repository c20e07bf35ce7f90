//! Column-metadata cache: prototype parameter descriptors per column.
//!
//! The compiler never inspects a schema. When a comparison needs a bound
//! parameter for a column-backed subject, it asks the cache for that
//! column's prototype, clones it, and overrides name and value. A cache
//! miss is an [`UnknownColumn`](crate::CompileError::UnknownColumn) error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Provider-level parameter type carried on a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ProviderType {
    Boolean,
    Smallint,
    Integer,
    Bigint,
    Real,
    Double,
    Numeric,
    Varchar,
    Text,
    Timestamp,
    Date,
    Uuid,
    /// No prototype was available; the executing layer infers the type
    /// from the value.
    #[default]
    Unspecified,
}

/// Prototype for bound parameters targeting one column: the parameter name
/// stem and the provider type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterPrototype {
    /// Name stem, typically the entity property name; the compiler appends
    /// the statement-wide sequence number.
    pub name: String,
    pub provider_type: ProviderType,
}

impl ParameterPrototype {
    pub fn new(name: impl Into<String>, provider_type: ProviderType) -> Self {
        Self {
            name: name.into(),
            provider_type,
        }
    }
}

/// Source of parameter prototypes, keyed by entity identifier and column
/// name. Implementations typically front generated entity metadata.
pub trait ColumnMetadataCache {
    /// Returns a clone of the prototype for `column` on `entity`, or `None`
    /// when the pair is unknown.
    fn parameter_prototype(&self, entity: &str, column: &str) -> Option<ParameterPrototype>;
}

/// In-memory cache backing tests and small callers.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadataCache {
    entities: HashMap<String, HashMap<String, ParameterPrototype>>,
}

impl MemoryMetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        entity: impl Into<String>,
        column: impl Into<String>,
        prototype: ParameterPrototype,
    ) -> &mut Self {
        self.entities
            .entry(entity.into())
            .or_default()
            .insert(column.into(), prototype);
        self
    }
}

impl ColumnMetadataCache for MemoryMetadataCache {
    fn parameter_prototype(&self, entity: &str, column: &str) -> Option<ParameterPrototype> {
        self.entities.get(entity)?.get(column).cloned()
    }
}
