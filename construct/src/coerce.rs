//! Assignment and conversion rules between built values and declared types.

use dbtest_core::{List, Primitive, Record, Value, ValueType};
use dbtest_registry::TypeRegistry;

/// Convert a value so it can be stored in a slot of type `target`.
///
/// Values already assignable are returned unchanged. Otherwise:
///
/// - `int` widens to `float`
/// - `float` narrows to `int` only when integral and in range
/// - `bytes` and `string` convert when the bytes are valid UTF-8
/// - lists convert element-wise
///
/// Returns `None` when no conversion applies.
pub fn convert(value: Value, target: &ValueType) -> Option<Value> {
    if value.value_type().is_assignable_to(target) {
        return Some(value);
    }

    match (value, target.erase_references()) {
        (Value::Int(i), ValueType::Primitive(Primitive::Float)) => Some(Value::Float(i as f64)),
        (Value::Float(f), ValueType::Primitive(Primitive::Int)) => float_to_int(f).map(Value::Int),
        (Value::Bytes(bytes), ValueType::Primitive(Primitive::String)) => {
            String::from_utf8(bytes).ok().map(Value::String)
        }
        (Value::String(s), ValueType::Primitive(Primitive::Bytes)) => {
            Some(Value::Bytes(s.into_bytes()))
        }
        (Value::List(list), ValueType::Sequence(element)) => {
            let items = list
                .into_items()
                .into_iter()
                .map(|item| convert(item, &element))
                .collect::<Option<Vec<_>>>()?;
            Some(Value::List(List::new(*element, items)))
        }
        _ => None,
    }
}

fn float_to_int(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// The value an unset slot of type `ty` holds.
///
/// Records are zero-filled field by field; references and contexts are
/// `Null`; sequences are empty.
pub fn zero_value(ty: &ValueType, registry: &TypeRegistry) -> Value {
    let mut visiting = Vec::new();
    zero_value_guarded(ty, registry, &mut visiting)
}

fn zero_value_guarded<'r>(
    ty: &ValueType,
    registry: &'r TypeRegistry,
    visiting: &mut Vec<&'r str>,
) -> Value {
    match ty {
        ValueType::Null | ValueType::Reference(_) => Value::Null,
        ValueType::Primitive(p) => match p {
            Primitive::Bool => Value::Bool(false),
            Primitive::Int => Value::Int(0),
            Primitive::Float => Value::Float(0.0),
            Primitive::String => Value::String(String::new()),
            Primitive::Bytes => Value::Bytes(Vec::new()),
            Primitive::Context => Value::Null,
        },
        ValueType::Sequence(element) => Value::List(List::empty((**element).clone())),
        ValueType::Record(name) => {
            let Some(descriptor) = registry.get(name) else {
                return Value::Null;
            };
            if visiting.contains(&descriptor.name.as_str()) {
                return Value::Null;
            }
            visiting.push(&descriptor.name);
            let fields = descriptor
                .fields
                .iter()
                .map(|f| (f.name.clone(), zero_value_guarded(&f.ty, registry, visiting)))
                .collect();
            visiting.pop();
            Value::Record(Record::new(descriptor.name.clone(), fields))
        }
    }
}
