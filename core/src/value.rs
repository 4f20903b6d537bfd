//! Runtime values.
//!
//! Values are what the construction engine produces, what service methods
//! receive and return, and what database drivers hand back for each column.
//! dbtest supports scalar types (Bool, Int, Float, String, Bytes, Context),
//! homogeneous lists and records.

use crate::{Context, Primitive, ValueType};
use std::fmt;

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Execution context.
    Context(Context),
    /// Ordered list whose items all share one type.
    List(List),
    /// Instance of a record type.
    Record(Record),
}

impl Value {
    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as boolean if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer if this is an Int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float if this is a Float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string reference if this is a String value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as list if this is a List value.
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Get as record if this is a Record value.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// The concrete type of this value. Never contains references.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Primitive(Primitive::Bool),
            Value::Int(_) => ValueType::Primitive(Primitive::Int),
            Value::Float(_) => ValueType::Primitive(Primitive::Float),
            Value::String(_) => ValueType::Primitive(Primitive::String),
            Value::Bytes(_) => ValueType::Primitive(Primitive::Bytes),
            Value::Context(_) => ValueType::Primitive(Primitive::Context),
            Value::List(list) => ValueType::sequence(list.element.clone()),
            Value::Record(record) => ValueType::Record(record.type_name.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{}", s),
            Value::Bytes(bytes) => {
                write!(f, "0x")?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Value::Context(ctx) => write!(f, "{}", ctx),
            Value::List(list) => write!(f, "{}", list),
            Value::Record(record) => write!(f, "{}", record),
        }
    }
}

/// A homogeneous list.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    element: ValueType,
    items: Vec<Value>,
}

impl List {
    /// Create a list; references are erased from the element type.
    pub fn new(element: ValueType, items: Vec<Value>) -> Self {
        Self {
            element: element.erase_references(),
            items,
        }
    }

    /// An empty list of the given element type.
    pub fn empty(element: ValueType) -> Self {
        Self::new(element, Vec::new())
    }

    pub fn element_type(&self) -> &ValueType {
        &self.element
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}

/// An instance of a record type. Fields keep their declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(type_name: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    /// Unwrap a record value of the given qualified type.
    pub fn try_from_value(value: Value, type_name: &str) -> crate::CoreResult<Self> {
        match value {
            Value::Record(record) if record.type_name == type_name => Ok(record),
            other => Err(crate::CoreError::type_mismatch(
                type_name,
                other.value_type().to_string(),
            )),
        }
    }

    /// Qualified name of the record type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Replace a field value. Returns false if the field does not exist.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Move a field value out, leaving `Null` behind.
    pub fn take(&mut self, name: &str) -> crate::CoreResult<Value> {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => Ok(std::mem::replace(slot, Value::Null)),
            None => Err(crate::CoreError::missing_field(&self.type_name, name)),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.type_name)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:{}", name, value)?;
        }
        write!(f, "}}")
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Context> for Value {
    fn from(ctx: Context) -> Self {
        Value::Context(ctx)
    }
}
