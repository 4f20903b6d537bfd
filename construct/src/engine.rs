//! The construction engine.

use crate::form::FORMS;
use crate::{zero_value, ConstructionError, ConstructionResult, TypedValue};
use dbtest_core::{Context, List, Record, Value};
use dbtest_registry::{RecordDescriptor, TypeRegistry};
use serde_json::Value as Json;
use tracing::debug;

/// Builds values from `{type, value}` descriptions.
///
/// Record tags are resolved through the registry the constructor borrows.
#[derive(Debug, Clone, Copy)]
pub struct Constructor<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> Constructor<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Build the value a description stands for.
    pub fn build(&self, typed: &TypedValue) -> ConstructionResult<Value> {
        let tag = typed.type_name.as_str();
        let value = &typed.value;
        match tag {
            "context" => {
                let name = value
                    .as_str()
                    .ok_or_else(|| ConstructionError::unexpected_value(tag, "string"))?;
                if name == "background" {
                    Ok(Value::Context(Context::background()))
                } else {
                    Err(ConstructionError::UnknownContext)
                }
            }
            "string" => value
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(|| ConstructionError::unexpected_value(tag, "string")),
            "int" => value
                .as_i64()
                .map(Value::Int)
                .ok_or_else(|| ConstructionError::unexpected_value(tag, "int")),
            "float" => value
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| ConstructionError::unexpected_value(tag, "float")),
            "bool" => value
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| ConstructionError::unexpected_value(tag, "bool")),
            "array" => self.build_array(value),
            _ => self.build_record(tag, value),
        }
    }

    /// Build a nested `{type, value}` entry taken from a raw document.
    pub fn build_entry(&self, entry: &Json) -> ConstructionResult<Value> {
        self.build(&TypedValue::from_entry(entry)?)
    }

    /// Build every description in order, stopping at the first failure.
    pub fn build_all(&self, values: &[TypedValue]) -> ConstructionResult<Vec<Value>> {
        values.iter().map(|v| self.build(v)).collect()
    }

    fn build_array(&self, value: &Json) -> ConstructionResult<Value> {
        let entries = match value.as_array() {
            Some(entries) if !entries.is_empty() => entries,
            _ => return Err(ConstructionError::InvalidArray),
        };

        let mut items = Vec::with_capacity(entries.len());
        let mut element = None;
        for entry in entries {
            if !entry.is_object() {
                return Err(ConstructionError::InvalidArray);
            }
            let item = self.build_entry(entry)?;
            let ty = item.value_type();
            match &element {
                None => element = Some(ty),
                Some(first) if *first != ty => return Err(ConstructionError::ArrayTypeMismatch),
                Some(_) => {}
            }
            items.push(item);
        }

        let element = element.ok_or(ConstructionError::InvalidArray)?;
        Ok(Value::List(List::new(element, items)))
    }

    fn build_record(&self, tag: &str, value: &Json) -> ConstructionResult<Value> {
        if tag.is_empty() {
            return Err(ConstructionError::EmptyType);
        }
        let simple = tag.rsplit('.').next().unwrap_or(tag);
        if !simple.chars().next().is_some_and(char::is_uppercase) {
            return Err(ConstructionError::not_capitalized(tag));
        }

        let record = self
            .registry
            .get(tag)
            .ok_or_else(|| ConstructionError::unknown_type(tag))?;
        let form = FORMS
            .iter()
            .find(|form| form.accepts(value))
            .ok_or_else(|| ConstructionError::invalid_record_value(tag))?;

        debug!(record = tag, form = form.name(), "constructing record");
        form.construct(self, record, value)
    }

    /// A record of the given layout with every field at its zero value.
    pub(crate) fn zero_record(&self, record: &RecordDescriptor) -> Record {
        let fields = record
            .fields
            .iter()
            .map(|f| (f.name.clone(), zero_value(&f.ty, self.registry)))
            .collect();
        Record::new(record.name.clone(), fields)
    }
}
