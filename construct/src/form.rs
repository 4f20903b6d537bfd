//! Record representations.
//!
//! A record tag accepts either a structured map of nested descriptions or a
//! JSON document string. Each representation is a [`RecordForm`]; the
//! constructor picks the first form that accepts the raw value.

use crate::typed::json_kind;
use crate::{convert, zero_value, ConstructionError, ConstructionResult, Constructor};
use dbtest_core::{List, Record, Value, ValueType};
use dbtest_registry::RecordDescriptor;
use serde_json::{Map, Value as Json};

/// One way of describing a record value.
pub trait RecordForm {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this form handles the given raw value.
    fn accepts(&self, value: &Json) -> bool;

    /// Build a record of the given layout from the raw value.
    fn construct(
        &self,
        ctor: &Constructor<'_>,
        record: &RecordDescriptor,
        value: &Json,
    ) -> ConstructionResult<Value>;
}

/// Forms in the order they are tried.
pub(crate) const FORMS: &[&dyn RecordForm] = &[&StructuredForm, &DocumentForm];

/// A map of field name to nested `{type, value}` description.
///
/// Every built field must be assignable, or convertible, to the declared
/// field type.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredForm;

impl RecordForm for StructuredForm {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn accepts(&self, value: &Json) -> bool {
        value.is_object()
    }

    fn construct(
        &self,
        ctor: &Constructor<'_>,
        record: &RecordDescriptor,
        value: &Json,
    ) -> ConstructionResult<Value> {
        let entries = value
            .as_object()
            .ok_or_else(|| ConstructionError::invalid_record_value(&record.name))?;

        let mut instance = ctor.zero_record(record);
        for (key, entry) in entries {
            let field = record
                .field_for_key(key)
                .ok_or_else(|| ConstructionError::field_not_found(key, &record.name))?;
            if !entry.is_object() {
                return Err(ConstructionError::field_not_map(key, json_kind(entry)));
            }
            let built = ctor.build_entry(entry)?;
            let value = convert(built, &field.ty)
                .ok_or_else(|| ConstructionError::field_type_mismatch(key))?;
            instance.set(&field.name, value);
        }
        Ok(Value::Record(instance))
    }
}

/// A string holding a JSON object, decoded straight against the layout.
///
/// Nested objects become nested records, arrays are decoded element-wise
/// and scalars are converted to the declared field type. JSON `null` leaves
/// the zero value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentForm;

impl RecordForm for DocumentForm {
    fn name(&self) -> &'static str {
        "document"
    }

    fn accepts(&self, value: &Json) -> bool {
        value.is_string()
    }

    fn construct(
        &self,
        ctor: &Constructor<'_>,
        record: &RecordDescriptor,
        value: &Json,
    ) -> ConstructionResult<Value> {
        let text = value
            .as_str()
            .ok_or_else(|| ConstructionError::invalid_record_value(&record.name))?;
        let object: Map<String, Json> = serde_json::from_str(text)
            .map_err(|e| ConstructionError::invalid_json(&record.name, e.to_string()))?;
        decode_record(ctor, record, &object).map(Value::Record)
    }
}

fn decode_record(
    ctor: &Constructor<'_>,
    record: &RecordDescriptor,
    object: &Map<String, Json>,
) -> ConstructionResult<Record> {
    let mut instance = ctor.zero_record(record);
    for (key, raw) in object {
        let field = record
            .field_for_key(key)
            .ok_or_else(|| ConstructionError::field_not_found(key, &record.name))?;
        let value = decode_value(ctor, &field.ty, raw)?;
        instance.set(&field.name, value);
    }
    Ok(instance)
}

fn decode_value(ctor: &Constructor<'_>, ty: &ValueType, raw: &Json) -> ConstructionResult<Value> {
    match raw {
        Json::Null => Ok(zero_value(ty, ctor.registry())),
        Json::Object(object) => {
            let name = ty
                .record_name()
                .ok_or_else(|| ConstructionError::not_convertible(ty.to_string()))?;
            let nested = ctor
                .registry()
                .get(name)
                .ok_or_else(|| ConstructionError::unknown_type(name))?;
            decode_record(ctor, nested, object).map(Value::Record)
        }
        Json::Array(items) => match ty.erase_references() {
            ValueType::Sequence(element) => {
                let values = items
                    .iter()
                    .map(|item| decode_value(ctor, &element, item))
                    .collect::<ConstructionResult<Vec<_>>>()?;
                Ok(Value::List(List::new(*element, values)))
            }
            _ => Err(ConstructionError::not_convertible(ty.to_string())),
        },
        scalar => {
            let value = match scalar {
                Json::Bool(b) => Value::Bool(*b),
                Json::Number(n) => match n.as_i64() {
                    Some(i) => Value::Int(i),
                    None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
                },
                Json::String(s) => Value::String(s.clone()),
                _ => Value::Null,
            };
            convert(value, ty).ok_or_else(|| ConstructionError::not_convertible(ty.to_string()))
        }
    }
}
