//! Declarative bindings to C shared libraries.
//!
//! The pieces, leaves first:
//!
//! - [`types`]: how declared Rust types map onto the C calling convention
//! - [`loader`]: locating and loading a shared library by symbolic name
//! - [`binding`]: resolving declared functions and marshaling calls

pub mod binding;
pub mod loader;
pub mod types;

pub(crate) use binding::native_functions;
pub use binding::{
    bind, BindingError, BoundFunction, FunctionDeclaration, MarshalError, Parameter, Signature,
    SymbolTable,
};
pub use loader::load_library;
pub use types::{
    map_type, CallType, DeclaredType, Handle, IntWidth, NativeArg, NativeReturn, NativeType,
    Position, Text,
};
