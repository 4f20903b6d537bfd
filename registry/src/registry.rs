//! The TypeRegistry - immutable record layout lookup.

use crate::RecordDescriptor;
use std::collections::HashMap;

/// Record layouts by qualified name. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    records: HashMap<String, RecordDescriptor>,
}

impl TypeRegistry {
    /// Create a registry (use RegistryBuilder for construction).
    pub(crate) fn new(records: HashMap<String, RecordDescriptor>) -> Self {
        Self { records }
    }

    /// Get a record layout by qualified name.
    pub fn get(&self, name: &str) -> Option<&RecordDescriptor> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Get the number of registered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Registered qualified names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.records.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
