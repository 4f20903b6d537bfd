//! Type identity and type descriptors.
//!
//! Two related views of a type exist:
//!
//! - [`TypeDescriptor`] is what a Rust type reports about itself through
//!   [`crate::Describe`]. Records carry a lazily evaluated field layout so
//!   self-referential records can be described without infinite recursion.
//! - [`ValueType`] is the flattened identity used at run time. Records are
//!   referred to by qualified name and resolved through a type registry.

use std::fmt;

/// Built-in scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Int,
    Float,
    String,
    Bytes,
    Context,
}

impl Primitive {
    /// The tag used for this primitive in value descriptions.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::String => "string",
            Primitive::Bytes => "bytes",
            Primitive::Context => "context",
        }
    }

    /// Returns true for `Int` and `Float`.
    pub fn is_numeric(self) -> bool {
        matches!(self, Primitive::Int | Primitive::Float)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime type identity of a value or a declared field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// The type of `Value::Null`.
    Null,
    Primitive(Primitive),
    /// A record, by qualified name.
    Record(String),
    /// An ordered, homogeneous sequence.
    Sequence(Box<ValueType>),
    /// A nullable reference (`Option<T>`). Only appears in declared types;
    /// values are reference-transparent.
    Reference(Box<ValueType>),
}

impl ValueType {
    pub fn record(name: impl Into<String>) -> Self {
        ValueType::Record(name.into())
    }

    pub fn sequence(element: ValueType) -> Self {
        ValueType::Sequence(Box::new(element))
    }

    pub fn reference(target: ValueType) -> Self {
        ValueType::Reference(Box::new(target))
    }

    /// Strip every reference wrapper, including those nested in sequences.
    pub fn erase_references(&self) -> ValueType {
        match self {
            ValueType::Reference(inner) => inner.erase_references(),
            ValueType::Sequence(element) => ValueType::sequence(element.erase_references()),
            other => other.clone(),
        }
    }

    /// Unwrap references and sequences down to the element type.
    pub fn innermost(&self) -> &ValueType {
        match self {
            ValueType::Reference(inner) | ValueType::Sequence(inner) => inner.innermost(),
            other => other,
        }
    }

    /// The record name reached through references only, if any.
    pub fn record_name(&self) -> Option<&str> {
        match self {
            ValueType::Record(name) => Some(name),
            ValueType::Reference(inner) => inner.record_name(),
            _ => None,
        }
    }

    /// Whether a declared slot of this type may hold `Null`.
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            ValueType::Null | ValueType::Reference(_) | ValueType::Primitive(Primitive::Context)
        )
    }

    /// Returns true for numeric primitives, looking through references.
    pub fn is_numeric(&self) -> bool {
        match self.erase_references() {
            ValueType::Primitive(p) => p.is_numeric(),
            _ => false,
        }
    }

    /// A value of type `self` can be stored as-is in a slot of type `target`.
    pub fn is_assignable_to(&self, target: &ValueType) -> bool {
        if *self == ValueType::Null {
            return target.is_nullable();
        }
        self.erase_references() == target.erase_references()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Null => write!(f, "null"),
            ValueType::Primitive(p) => write!(f, "{}", p),
            ValueType::Record(name) => write!(f, "{}", name),
            ValueType::Sequence(element) => write!(f, "[]{}", element),
            ValueType::Reference(target) => write!(f, "*{}", target),
        }
    }
}

/// Produces the fields of a record type on demand.
pub type LayoutFn = fn() -> Vec<FieldDescriptor>;

/// A record type as described by its Rust counterpart.
#[derive(Clone)]
pub struct RecordType {
    namespace: String,
    name: String,
    layout: LayoutFn,
}

impl RecordType {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, layout: LayoutFn) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            layout,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The simple (unqualified) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `namespace.Name`, or just `Name` without a namespace.
    pub fn qualified_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }

    /// Evaluate the field layout.
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        (self.layout)()
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("layout", &"<fn>")
            .finish()
    }
}

// Identity is the qualified name; the layout function is not comparable.
impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.name == other.name
    }
}

/// Join a namespace and a simple name.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

/// One field of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Structural description of a type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    Record(RecordType),
    Sequence(Box<TypeDescriptor>),
    Reference(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn sequence(element: TypeDescriptor) -> Self {
        TypeDescriptor::Sequence(Box::new(element))
    }

    pub fn reference(target: TypeDescriptor) -> Self {
        TypeDescriptor::Reference(Box::new(target))
    }

    /// The runtime identity of this type.
    pub fn value_type(&self) -> ValueType {
        match self {
            TypeDescriptor::Primitive(p) => ValueType::Primitive(*p),
            TypeDescriptor::Record(record) => ValueType::Record(record.qualified_name()),
            TypeDescriptor::Sequence(element) => ValueType::sequence(element.value_type()),
            TypeDescriptor::Reference(target) => ValueType::reference(target.value_type()),
        }
    }

    /// The record reached through references only, if any.
    pub fn as_record(&self) -> Option<&RecordType> {
        match self {
            TypeDescriptor::Record(record) => Some(record),
            TypeDescriptor::Reference(target) => target.as_record(),
            _ => None,
        }
    }

    /// Unwrap references and sequences down to the element type.
    pub fn innermost(&self) -> &TypeDescriptor {
        match self {
            TypeDescriptor::Reference(inner) | TypeDescriptor::Sequence(inner) => {
                inner.innermost()
            }
            other => other,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value_type())
    }
}
