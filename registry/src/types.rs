//! Registered record layouts.

use dbtest_core::{RecordType, ValueType};

/// A field of a registered record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name as declared.
    pub name: String,
    /// Declared field type.
    pub ty: ValueType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Check whether a key from a value description addresses this field.
    ///
    /// The first letter is compared case-insensitively, the rest exactly, so
    /// `field1` addresses `Field1` and `Field1` addresses `field1`.
    pub fn matches_key(&self, key: &str) -> bool {
        let mut key_chars = key.chars();
        let mut name_chars = self.name.chars();
        match (key_chars.next(), name_chars.next()) {
            (Some(k), Some(n)) => {
                k.to_uppercase().eq(n.to_uppercase()) && key_chars.as_str() == name_chars.as_str()
            }
            _ => false,
        }
    }
}

/// The layout of a registered record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDescriptor {
    /// Qualified name (`namespace.Name`).
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
}

impl RecordDescriptor {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Flatten a described record type.
    pub fn from_record_type(record: &RecordType) -> Self {
        let fields = record
            .fields()
            .into_iter()
            .map(|f| FieldDef::new(f.name, f.ty.value_type()))
            .collect();
        Self::new(record.qualified_name(), fields)
    }

    /// Find the field addressed by a description key.
    pub fn field_for_key(&self, key: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.matches_key(key))
    }
}
