//! Module: schema
//! Responsibility: attribute descriptors and the resolver contract mapping
//! external SCIM attribute paths onto the storage model.
//! Does not own: predicate construction or filter-tree walking.
//! Boundary: resolution is a pure function of the path string for the
//! duration of one compilation; `Ok(None)` is the sole source of the
//! `Unsupported` compilation outcome.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// ValueKind
///
/// Closed classification of an attribute's stored value type. This is
/// deliberately smaller than a full schema type system and exists only to
/// drive literal coercion and operator handling during compilation.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ValueKind {
    #[default]
    Text,
    Timestamp,
    Bool,
}

///
/// AttributeDescriptor
///
/// Storage location and value type for one resolvable attribute path.
/// `is_primary = true` means the value is a column on the resource's root
/// record; `false` means it lives in the satellite name/value table and is
/// reached through the per-compilation attribute join.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub storage_name: String,
    pub is_primary: bool,
    pub value_kind: ValueKind,
}

impl AttributeDescriptor {
    /// Descriptor for a column on the root record.
    #[must_use]
    pub fn primary(storage_name: impl Into<String>, value_kind: ValueKind) -> Self {
        Self {
            storage_name: storage_name.into(),
            is_primary: true,
            value_kind,
        }
    }

    /// Descriptor for a satellite name/value attribute.
    #[must_use]
    pub fn satellite(storage_name: impl Into<String>, value_kind: ValueKind) -> Self {
        Self {
            storage_name: storage_name.into(),
            is_primary: false,
            value_kind,
        }
    }
}

///
/// ResolverError
///
/// Failure of the resolver itself (e.g. a schema-metadata outage). This is
/// distinct from an unknown attribute, which resolves to `Ok(None)` and is
/// ordinary filter data. The compiler propagates resolver failures as-is
/// and performs no retries.
///

#[derive(Debug, ThisError)]
#[error("attribute resolver failure: {message}")]
pub struct ResolverError {
    pub message: String,
}

impl ResolverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

///
/// AttributeResolver
///
/// Consumed contract: maps an external attribute path to its storage
/// descriptor. Must behave as a pure function of `path` for the duration
/// of one compilation; implementations backed by I/O are expected to load
/// their metadata up front and expose a synchronous in-memory lookup.
///

pub trait AttributeResolver {
    fn resolve(&self, path: &str) -> Result<Option<AttributeDescriptor>, ResolverError>;
}

///
/// SchemaMap
///
/// Map-backed resolver over a fixed attribute table. Lookups are
/// case-insensitive, matching SCIM attribute-name semantics.
///

#[derive(Clone, Debug, Default)]
pub struct SchemaMap {
    entries: BTreeMap<String, AttributeDescriptor>,
}

impl SchemaMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an attribute path, replacing any previous registration.
    pub fn insert(&mut self, path: &str, descriptor: AttributeDescriptor) {
        self.entries.insert(path.to_ascii_lowercase(), descriptor);
    }

    #[must_use]
    pub fn with(mut self, path: &str, descriptor: AttributeDescriptor) -> Self {
        self.insert(path, descriptor);
        self
    }

    /// Stock mapping for the SCIM core User schema. Standard profile
    /// attributes are columns on the user record; the long tail of profile
    /// attributes lives in the satellite table.
    #[must_use]
    pub fn user_core() -> Self {
        Self::new()
            .with("userName", AttributeDescriptor::primary("username", ValueKind::Text))
            .with(
                "emails[0].value",
                AttributeDescriptor::primary("email", ValueKind::Text),
            )
            .with(
                "name.givenName",
                AttributeDescriptor::primary("first_name", ValueKind::Text),
            )
            .with(
                "name.familyName",
                AttributeDescriptor::primary("last_name", ValueKind::Text),
            )
            .with("active", AttributeDescriptor::primary("enabled", ValueKind::Bool))
            .with(
                "meta.created",
                AttributeDescriptor::primary("created_timestamp", ValueKind::Timestamp),
            )
            .with(
                "externalId",
                AttributeDescriptor::satellite("externalId", ValueKind::Text),
            )
            .with("nickName", AttributeDescriptor::satellite("nickName", ValueKind::Text))
            .with("locale", AttributeDescriptor::satellite("locale", ValueKind::Text))
            .with(
                "name.middleName",
                AttributeDescriptor::satellite("middleName", ValueKind::Text),
            )
            .with(
                "name.honorificPrefix",
                AttributeDescriptor::satellite("honorificPrefix", ValueKind::Text),
            )
            .with(
                "name.honorificSuffix",
                AttributeDescriptor::satellite("honorificSuffix", ValueKind::Text),
            )
    }
}

impl AttributeResolver for SchemaMap {
    fn resolve(&self, path: &str) -> Result<Option<AttributeDescriptor>, ResolverError> {
        Ok(self.entries.get(&path.to_ascii_lowercase()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_case_insensitive() {
        let schema = SchemaMap::user_core();

        let lower = schema.resolve("username").unwrap();
        let mixed = schema.resolve("UserName").unwrap();

        assert_eq!(lower, mixed);
        assert_eq!(
            lower,
            Some(AttributeDescriptor::primary("username", ValueKind::Text))
        );
    }

    #[test]
    fn unknown_path_resolves_to_none() {
        let schema = SchemaMap::user_core();

        assert_eq!(schema.resolve("unknownAttr").unwrap(), None);
    }

    #[test]
    fn user_core_classifies_value_kinds() {
        let schema = SchemaMap::user_core();

        let active = schema.resolve("active").unwrap().unwrap();
        assert!(active.is_primary);
        assert_eq!(active.value_kind, ValueKind::Bool);

        let created = schema.resolve("meta.created").unwrap().unwrap();
        assert_eq!(created.value_kind, ValueKind::Timestamp);

        let nick = schema.resolve("nickName").unwrap().unwrap();
        assert!(!nick.is_primary);
        assert_eq!(nick.value_kind, ValueKind::Text);
    }
}
