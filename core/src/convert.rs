//! Conversions between Rust types and dynamic values.
//!
//! - [`Describe`] reports the structural type of a Rust type.
//! - [`FromValue`] / [`ToValue`] move data across the dynamic boundary.
//! - [`Returns`] describes what a service method hands back besides its error.
//!
//! Plain structs opt in through [`describe_record!`](crate::describe_record).

use crate::{Context, CoreError, CoreResult, List, Primitive, TypeDescriptor, Value};

/// Types that can report their structure.
pub trait Describe {
    fn describe() -> TypeDescriptor;
}

/// Types that can be rebuilt from a value.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> CoreResult<Self>;
}

/// Types that can be turned into a value.
pub trait ToValue {
    fn to_value(self) -> Value;
}

/// The non-error results of a service method.
///
/// `()` declares no results; every other supported type declares exactly one.
pub trait Returns {
    fn descriptors() -> Vec<TypeDescriptor>;
    fn into_values(self) -> Vec<Value>;
}

fn mismatch(expected: &str, actual: &Value) -> CoreError {
    CoreError::type_mismatch(expected, actual.value_type().to_string())
}

macro_rules! primitive_conversions {
    ($($ty:ty => $prim:ident, $variant:ident;)*) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::Primitive(Primitive::$prim)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> CoreResult<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(mismatch(Primitive::$prim.name(), &other)),
                    }
                }
            }

            impl ToValue for $ty {
                fn to_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

primitive_conversions! {
    bool => Bool, Bool;
    i64 => Int, Int;
    f64 => Float, Float;
    String => String, String;
}

impl Describe for i32 {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Primitive(Primitive::Int)
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> CoreResult<Self> {
        match value {
            Value::Int(v) => {
                i32::try_from(v).map_err(|_| CoreError::out_of_range(v.to_string(), "i32"))
            }
            other => Err(mismatch("int", &other)),
        }
    }
}

impl ToValue for i32 {
    fn to_value(self) -> Value {
        Value::Int(self as i64)
    }
}

impl Describe for Context {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Primitive(Primitive::Context)
    }
}

impl FromValue for Context {
    fn from_value(value: Value) -> CoreResult<Self> {
        match value {
            Value::Context(ctx) => Ok(ctx),
            // zero value of a context slot
            Value::Null => Ok(Context::background()),
            other => Err(mismatch("context", &other)),
        }
    }
}

impl ToValue for Context {
    fn to_value(self) -> Value {
        Value::Context(self)
    }
}

impl ToValue for &str {
    fn to_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for Value {
    fn to_value(self) -> Value {
        self
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence(T::describe())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> CoreResult<Self> {
        match value {
            Value::List(list) => list.into_items().into_iter().map(T::from_value).collect(),
            Value::Null => Ok(Vec::new()),
            other => Err(mismatch("sequence", &other)),
        }
    }
}

impl<T: Describe + ToValue> ToValue for Vec<T> {
    fn to_value(self) -> Value {
        let element = T::describe().value_type();
        Value::List(List::new(
            element,
            self.into_iter().map(ToValue::to_value).collect(),
        ))
    }
}

// A box owns its target and is never null, so it describes as the target.
impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: Value) -> CoreResult<Self> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: ToValue> ToValue for Box<T> {
    fn to_value(self) -> Value {
        (*self).to_value()
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::reference(T::describe())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> CoreResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl Returns for () {
    fn descriptors() -> Vec<TypeDescriptor> {
        Vec::new()
    }

    fn into_values(self) -> Vec<Value> {
        Vec::new()
    }
}

/// Implement [`Returns`] for types that produce a single result.
#[macro_export]
macro_rules! single_return {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Returns for $ty {
                fn descriptors() -> Vec<$crate::TypeDescriptor> {
                    vec![<$ty as $crate::Describe>::describe()]
                }

                fn into_values(self) -> Vec<$crate::Value> {
                    vec![$crate::ToValue::to_value(self)]
                }
            }
        )*
    };
}

single_return!(bool, i64, i32, f64, String, Context);

impl<T: Describe + ToValue> Returns for Vec<T> {
    fn descriptors() -> Vec<TypeDescriptor> {
        vec![Self::describe()]
    }

    fn into_values(self) -> Vec<Value> {
        vec![self.to_value()]
    }
}

impl<T: Describe + ToValue> Returns for Box<T> {
    fn descriptors() -> Vec<TypeDescriptor> {
        vec![Self::describe()]
    }

    fn into_values(self) -> Vec<Value> {
        vec![self.to_value()]
    }
}

impl<T: Describe + ToValue> Returns for Option<T> {
    fn descriptors() -> Vec<TypeDescriptor> {
        vec![Self::describe()]
    }

    fn into_values(self) -> Vec<Value> {
        vec![self.to_value()]
    }
}

/// Implement `Describe`, `FromValue`, `ToValue` and `Returns` for a struct.
///
/// Fields are listed with their types, in declaration order. The namespace
/// forms the first half of the qualified name used in value descriptions.
///
/// # Example
///
/// ```ignore
/// struct Item { name: String, qty: i64, tags: Vec<String> }
///
/// describe_record!("shop" :: Item { name: String, qty: i64, tags: Vec<String> });
/// // referred to as `shop.Item`
/// ```
#[macro_export]
macro_rules! describe_record {
    ($namespace:literal :: $name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        impl $crate::Describe for $name {
            fn describe() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::Record($crate::RecordType::new(
                    $namespace,
                    stringify!($name),
                    || {
                        vec![$(
                            $crate::FieldDescriptor::new(
                                stringify!($field),
                                <$ty as $crate::Describe>::describe(),
                            ),
                        )*]
                    },
                ))
            }
        }

        impl $crate::FromValue for $name {
            #[allow(unused_mut, unused_variables)]
            fn from_value(value: $crate::Value) -> $crate::CoreResult<Self> {
                let type_name = $crate::qualify($namespace, stringify!($name));
                let mut record = $crate::Record::try_from_value(value, &type_name)?;
                Ok(Self {
                    $(
                        $field: <$ty as $crate::FromValue>::from_value(
                            record.take(stringify!($field))?,
                        )?,
                    )*
                })
            }
        }

        impl $crate::ToValue for $name {
            fn to_value(self) -> $crate::Value {
                $crate::Value::Record($crate::Record::new(
                    $crate::qualify($namespace, stringify!($name)),
                    vec![$(
                        (
                            stringify!($field).to_string(),
                            $crate::ToValue::to_value(self.$field),
                        ),
                    )*],
                ))
            }
        }

        $crate::single_return!($name);
    };
}
