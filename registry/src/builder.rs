//! RegistryBuilder for constructing an immutable TypeRegistry.

use crate::{RecordDescriptor, TypeRegistry};
use dbtest_core::{RecordType, Service, TypeDescriptor};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during registry construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// The type does not resolve to a record, even through references.
    #[error("invalid type '{type_name}': {reason}")]
    InvalidType { type_name: String, reason: String },
}

impl RegistryError {
    pub fn invalid_type(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidType {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Builder for constructing an immutable TypeRegistry.
///
/// Registration is append-only: the first registration of a qualified name
/// wins and later ones are ignored.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Records registered so far, by qualified name.
    records: HashMap<String, RecordDescriptor>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record type and, transitively, every record type reachable
    /// through its fields.
    pub fn register(&mut self, ty: &TypeDescriptor) -> RegistryResult<&mut Self> {
        let record = ty.as_record().ok_or_else(|| {
            RegistryError::invalid_type(ty.to_string(), "not a record type")
        })?;
        self.register_record(record);
        Ok(self)
    }

    /// Register the Rust type `T`.
    pub fn register_type<T: dbtest_core::Describe>(&mut self) -> RegistryResult<&mut Self> {
        self.register(&T::describe())
    }

    /// Register every record type used by the parameters and results of the
    /// service's methods.
    pub fn discover_from_service(&mut self, service: &dyn Service) -> RegistryResult<&mut Self> {
        let descriptor = service.descriptor();
        if descriptor.as_record().is_none() {
            return Err(RegistryError::invalid_type(
                descriptor.to_string(),
                "service is not a record type",
            ));
        }

        for method in service.methods() {
            let signature = method.signature();
            for ty in signature.types() {
                if let TypeDescriptor::Record(record) = ty.innermost() {
                    self.register_record(record);
                }
            }
        }
        Ok(self)
    }

    /// Check whether a qualified name has been registered.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Build the immutable registry.
    pub fn build(self) -> TypeRegistry {
        TypeRegistry::new(self.records)
    }

    fn register_record(&mut self, record: &RecordType) {
        let name = record.qualified_name();
        if self.records.contains_key(&name) {
            return;
        }

        // Insert before walking the fields so self-referential records stop.
        let fields = record.fields();
        self.records
            .insert(name.clone(), RecordDescriptor::from_record_type(record));
        debug!(record = %name, fields = fields.len(), "registered record type");

        for field in &fields {
            if let TypeDescriptor::Record(nested) = field.ty.innermost() {
                self.register_record(nested);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbtest_core::{
        describe_record, Context, Describe, MethodTable, Primitive, ValueType,
    };

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        label: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Node {
        id: i64,
        tags: Vec<Tag>,
        next: Option<Box<Node>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Graph {
        root: Box<Node>,
    }

    struct GraphService;

    describe_record!("graph" :: Tag { label: String });
    describe_record!("graph" :: Node { id: i64, tags: Vec<Tag>, next: Option<Box<Node>> });
    describe_record!("graph" :: Graph { root: Box<Node> });
    describe_record!("graph" :: GraphService {});

    // ========== TEST: register_nested_records ==========
    #[test]
    fn test_register_nested_records() {
        // GIVEN a record whose fields reference other records
        let mut builder = RegistryBuilder::new();

        // WHEN registering it
        builder.register_type::<Graph>().unwrap();
        let registry = builder.build();

        // THEN every reachable record is registered, the cycle terminates
        assert_eq!(registry.names(), vec!["graph.Graph", "graph.Node", "graph.Tag"]);
        let node = registry.get("graph.Node").unwrap();
        assert_eq!(
            node.field_for_key("tags").unwrap().ty,
            ValueType::sequence(ValueType::record("graph.Tag"))
        );
    }

    // ========== TEST: register_through_reference ==========
    #[test]
    fn test_register_through_reference() {
        // GIVEN a reference to a record
        let mut builder = RegistryBuilder::new();

        // WHEN registering it
        builder.register_type::<Option<Tag>>().unwrap();

        // THEN the record is registered
        assert!(builder.contains("graph.Tag"));
    }

    // ========== TEST: register_non_record_fails ==========
    #[test]
    fn test_register_non_record_fails() {
        // GIVEN a primitive and a sequence of records
        let mut builder = RegistryBuilder::new();

        // WHEN registering them
        let primitive = builder
            .register(&TypeDescriptor::Primitive(Primitive::Int))
            .map(|_| ());
        let sequence = builder.register_type::<Vec<Tag>>().map(|_| ());

        // THEN both fail with InvalidType
        assert!(matches!(primitive, Err(RegistryError::InvalidType { .. })));
        assert!(matches!(sequence, Err(RegistryError::InvalidType { .. })));
        assert!(builder.build().is_empty());
    }

    // ========== TEST: discover_from_service ==========
    #[test]
    fn test_discover_from_service() {
        // GIVEN a service whose methods take and return records
        let service = MethodTable::for_type::<GraphService>()
            .method("Tags", |_ctx: Context, _id: i64| Ok::<_, String>(Vec::<Tag>::new()))
            .method("Ping", || Ok::<_, String>(()));

        // WHEN discovering types from it
        let mut builder = RegistryBuilder::new();
        builder.discover_from_service(&service).unwrap();
        let registry = builder.build();

        // THEN record types in signatures are registered, the service is not
        assert!(registry.contains("graph.Tag"));
        assert!(!registry.contains("graph.GraphService"));
        assert_eq!(registry.len(), 1);
    }

    // ========== TEST: discover_from_non_record_service ==========
    #[test]
    fn test_discover_from_non_record_service() {
        // GIVEN a service whose own type is not a record
        let service = MethodTable::new(TypeDescriptor::Primitive(Primitive::String));

        // WHEN discovering types
        let result = RegistryBuilder::new()
            .discover_from_service(&service)
            .map(|_| ());

        // THEN discovery fails
        assert_eq!(
            result,
            Err(RegistryError::invalid_type(
                "string",
                "service is not a record type"
            ))
        );
    }

    // ========== TEST: first_registration_wins ==========
    #[test]
    fn test_first_registration_wins() {
        // GIVEN two registrations of the same type
        let mut builder = RegistryBuilder::new();
        builder.register_type::<Tag>().unwrap();
        builder.register(&Tag::describe()).unwrap();

        // THEN only one descriptor exists
        assert_eq!(builder.build().len(), 1);
    }
}
