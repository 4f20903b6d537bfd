//! A registered dispatch table implementing [`Service`].
//!
//! Methods are plain closures; their signatures are inferred from the
//! closure's argument and return types.
//!
//! # Example
//!
//! ```ignore
//! let service = MethodTable::for_type::<ItemService>()
//!     .method("Get", move |_ctx: Context, id: i64| store.name_of(id));
//! ```

use crate::{
    Describe, FromValue, InvokeError, InvokeResult, MethodError, MethodHandle, MethodSignature,
    Outcome, Returns, Service, TypeDescriptor, Value,
};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// A closure usable as a service method.
///
/// Implemented for `Fn(A1, .., An) -> Result<R, E>` with up to six
/// arguments, where every `Ai: Describe + FromValue`, `R: Returns` and
/// `E: Display`.
pub trait Handler<Args>: 'static {
    fn params() -> Vec<TypeDescriptor>;
    fn returns() -> Vec<TypeDescriptor>;
    fn call(&self, method: &str, args: Vec<Value>) -> InvokeResult<Outcome>;
}

macro_rules! impl_handler {
    ($($arg:ident),*) => {
        impl<Func, Ret, Err, $($arg,)*> Handler<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Result<Ret, Err> + 'static,
            Ret: Returns,
            Err: fmt::Display,
            $($arg: Describe + FromValue,)*
        {
            fn params() -> Vec<TypeDescriptor> {
                vec![$(<$arg as Describe>::describe()),*]
            }

            fn returns() -> Vec<TypeDescriptor> {
                Ret::descriptors()
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn call(&self, method: &str, args: Vec<Value>) -> InvokeResult<Outcome> {
                let expected = <Self as Handler<($($arg,)*)>>::params().len();
                let provided = args.len();
                let mut args = args.into_iter().enumerate();
                $(
                    let $arg = match args.next() {
                        Some((index, value)) => <$arg as FromValue>::from_value(value)
                            .map_err(|e| InvokeError::argument(method, index, e.to_string()))?,
                        None => return Err(InvokeError::arity(method, expected, provided)),
                    };
                )*
                match (self)($($arg),*) {
                    Ok(ret) => Ok(Outcome::success(ret.into_values())),
                    Err(err) => Ok(Outcome::failure(MethodError::new(err.to_string()))),
                }
            }
        }
    };
}

impl_handler!();
impl_handler!(A1);
impl_handler!(A1, A2);
impl_handler!(A1, A2, A3);
impl_handler!(A1, A2, A3, A4);
impl_handler!(A1, A2, A3, A4, A5);
impl_handler!(A1, A2, A3, A4, A5, A6);

/// A handler bound to its inferred signature.
struct TypedMethod<H, Args> {
    handler: H,
    signature: MethodSignature,
    _args: PhantomData<fn() -> Args>,
}

impl<H, Args> MethodHandle for TypedMethod<H, Args>
where
    H: Handler<Args>,
{
    fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    fn invoke(&self, args: Vec<Value>) -> InvokeResult<Outcome> {
        if args.len() != self.signature.arity() {
            return Err(InvokeError::arity(
                &self.signature.name,
                self.signature.arity(),
                args.len(),
            ));
        }
        self.handler.call(&self.signature.name, args)
    }
}

/// A service assembled from named handlers.
pub struct MethodTable {
    descriptor: TypeDescriptor,
    methods: Vec<Box<dyn MethodHandle>>,
    index: HashMap<String, usize>,
}

impl MethodTable {
    /// Create an empty table for a service of the given type.
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            methods: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create an empty table for the service type `T`.
    pub fn for_type<T: Describe>() -> Self {
        Self::new(T::describe())
    }

    /// Add a method backed by a closure. A later method with the same name
    /// replaces the earlier one.
    pub fn method<Args, H>(self, name: impl Into<String>, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        let signature = MethodSignature::new(name, H::params(), H::returns());
        self.handle(TypedMethod {
            handler,
            signature,
            _args: PhantomData,
        })
    }

    /// Add a hand-written method handle.
    pub fn handle(mut self, handle: impl MethodHandle + 'static) -> Self {
        let name = handle.signature().name.clone();
        match self.index.get(&name) {
            Some(&slot) => self.methods[slot] = Box::new(handle),
            None => {
                self.index.insert(name, self.methods.len());
                self.methods.push(Box::new(handle));
            }
        }
        self
    }

    /// Get the number of methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Service for MethodTable {
    fn descriptor(&self) -> TypeDescriptor {
        self.descriptor.clone()
    }

    fn methods(&self) -> Vec<&dyn MethodHandle> {
        self.methods.iter().map(|m| m.as_ref()).collect()
    }

    fn resolve(&self, name: &str) -> Option<&dyn MethodHandle> {
        self.index.get(name).map(|&slot| self.methods[slot].as_ref())
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("descriptor", &self.descriptor)
            .field(
                "methods",
                &self
                    .methods
                    .iter()
                    .map(|m| m.signature().name.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
