//! Binding generator: turns function declarations into callable native symbols.
//!
//! A [`FunctionDeclaration`] names a native symbol and states the declared
//! type of each parameter and of the return value. [`bind`] validates the
//! declaration against the type-mapping rules and then resolves the symbol in
//! a [`SymbolTable`] (usually a loaded shared library). Binding is meant to
//! happen eagerly at startup so a missing mapping or symbol stops the program
//! before any rendering work begins.
//!
//! The [`native_functions!`] macro builds a whole table of such bindings from
//! ordinary Rust signatures and generates one marshaling method per entry.

use super::types::{map_type, CallType, DeclaredType, Position};
use libloading::Library;
use std::ffi::c_void;
use thiserror::Error;

/// Errors detected while building bindings. All of them are fatal and
/// surface before any native call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// A parameter or the return value has no recognized type mapping.
    #[error("{function}: missing type annotation for {parameter}")]
    MissingTypeAnnotation {
        function: &'static str,
        parameter: &'static str,
    },
    /// No shared library matching the symbolic name could be loaded.
    #[error("cannot find library {name}")]
    LibraryNotFound { name: String },
    /// The library does not export the declared function.
    #[error("symbol {function} not found")]
    SymbolNotFound { function: &'static str },
}

/// Errors raised while encoding arguments for one call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarshalError {
    #[error("{function}: argument {parameter} contains an interior NUL byte")]
    InteriorNul {
        function: &'static str,
        parameter: &'static str,
    },
}

/// Source of native symbol addresses.
pub trait SymbolTable: Send + Sync {
    /// Returns the address of the exported symbol whose name is exactly `name`.
    fn resolve(&self, name: &str) -> Option<*const c_void>;
}

impl SymbolTable for Library {
    fn resolve(&self, name: &str) -> Option<*const c_void> {
        // SAFETY: the address is only reinterpreted as a function pointer with
        // the signature recorded in the matching declaration.
        let symbol = unsafe { self.get::<unsafe extern "C" fn()>(name.as_bytes()) }.ok()?;
        Some(*symbol as *const c_void)
    }
}

/// One declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub declared: DeclaredType,
}

impl Parameter {
    pub const fn new(name: &'static str, declared: DeclaredType) -> Self {
        Self { name, declared }
    }
}

/// A function name with its ordered parameter types and return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDeclaration {
    name: &'static str,
    params: Vec<Parameter>,
    returns: DeclaredType,
}

impl FunctionDeclaration {
    pub fn new(name: &'static str, params: Vec<Parameter>, returns: DeclaredType) -> Self {
        Self {
            name,
            params,
            returns,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn returns(&self) -> DeclaredType {
        self.returns
    }

    /// Maps every parameter and the return value to calling-convention types.
    ///
    /// # Errors
    ///
    /// `MissingTypeAnnotation` naming the first slot without a mapping, or
    /// `"return value"` if only the return type is unmapped.
    pub fn signature(&self) -> Result<Signature, BindingError> {
        let params = self
            .params
            .iter()
            .map(|param| {
                map_type(param.declared, Position::Parameter).ok_or(
                    BindingError::MissingTypeAnnotation {
                        function: self.name,
                        parameter: param.name,
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let returns = map_type(self.returns, Position::Return).ok_or(
            BindingError::MissingTypeAnnotation {
                function: self.name,
                parameter: "return value",
            },
        )?;

        Ok(Signature { params, returns })
    }
}

/// Fixed-arity native signature of a bound function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<CallType>,
    pub returns: CallType,
}

/// A declaration paired with its resolved symbol.
#[derive(Debug)]
pub struct BoundFunction {
    declaration: FunctionDeclaration,
    signature: Signature,
    address: *const c_void,
}

// SAFETY: the address points at immutable code in a loaded library that the
// owning binding table keeps alive.
unsafe impl Send for BoundFunction {}
unsafe impl Sync for BoundFunction {}

impl BoundFunction {
    pub fn declaration(&self) -> &FunctionDeclaration {
        &self.declaration
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn address(&self) -> *const c_void {
        self.address
    }
}

/// Binds one declaration against a symbol table.
///
/// Type mapping is checked before the symbol is looked up, so an unmapped
/// declaration never touches the library.
///
/// # Arguments
///
/// * `declaration` - The function to bind
/// * `symbols` - Where to resolve the symbol
///
/// # Errors
///
/// `MissingTypeAnnotation` or `SymbolNotFound`.
pub fn bind(
    declaration: FunctionDeclaration,
    symbols: &dyn SymbolTable,
) -> Result<BoundFunction, BindingError> {
    let signature = declaration.signature()?;
    let address = symbols
        .resolve(declaration.name)
        .filter(|address| !address.is_null())
        .ok_or(BindingError::SymbolNotFound {
            function: declaration.name,
        })?;

    Ok(BoundFunction {
        declaration,
        signature,
        address,
    })
}

/// Declares a table of native functions.
///
/// Each entry is written as a Rust signature whose types implement
/// [`NativeType`](super::types::NativeType). The macro generates a struct
/// with one bound symbol per entry, a `declarations()` table, a `bind`
/// constructor that binds every entry eagerly, and one method per entry that
/// marshals its arguments, calls the symbol and unmarshals the result.
///
/// ```ignore
/// native_functions! {
///     pub struct MathApi {
///         fn add(a: i32, b: i32) -> i32;
///         fn log_message(text: Text);
///     }
/// }
/// ```
macro_rules! native_functions {
    (@declare $name:ident ( $( $param:ident : $pty:ty ),* ) $( $ret:ty )?) => {
        $crate::native::FunctionDeclaration::new(
            stringify!($name),
            vec![
                $(
                    $crate::native::Parameter::new(
                        stringify!($param),
                        <$pty as $crate::native::NativeType>::DECLARED,
                    )
                ),*
            ],
            <$crate::native::native_functions!(@ret $( $ret )?) as $crate::native::NativeType>::DECLARED,
        )
    };

    (@ret) => { () };
    (@ret $ret:ty) => { $ret };

    (
        $(#[$meta:meta])*
        $vis:vis struct $api:ident {
            $(
                fn $name:ident ( $( $param:ident : $pty:ty ),* $(,)? ) $( -> $ret:ty )? ;
            )*
        }
    ) => {
        $(#[$meta])*
        $vis struct $api {
            $( $name: $crate::native::BoundFunction, )*
            _symbols: std::sync::Arc<dyn $crate::native::SymbolTable>,
        }

        impl $api {
            /// Every function in the table, in declaration order.
            pub fn declarations() -> Vec<$crate::native::FunctionDeclaration> {
                vec![ $( $crate::native::native_functions!(@declare $name ( $( $param : $pty ),* ) $( $ret )?) ),* ]
            }

            /// Binds every function eagerly.
            ///
            /// The symbol table is kept alive for as long as the bindings are.
            pub fn bind(
                symbols: std::sync::Arc<dyn $crate::native::SymbolTable>,
            ) -> Result<Self, $crate::native::BindingError> {
                Ok(Self {
                    $(
                        $name: $crate::native::bind(
                            $crate::native::native_functions!(@declare $name ( $( $param : $pty ),* ) $( $ret )?),
                            &*symbols,
                        )?,
                    )*
                    _symbols: symbols,
                })
            }

            $(
                #[allow(clippy::too_many_arguments)]
                pub fn $name(
                    &self,
                    $( $param: <$pty as $crate::native::NativeArg>::Arg<'_> ),*
                ) -> Result<$crate::native::native_functions!(@ret $( $ret )?), $crate::native::MarshalError> {
                    #[allow(unused_imports)]
                    use $crate::native::{NativeArg, NativeReturn, NativeType};

                    $(
                        let $param = <$pty as NativeArg>::marshal($param).map_err(|_| {
                            $crate::native::MarshalError::InteriorNul {
                                function: stringify!($name),
                                parameter: stringify!($param),
                            }
                        })?;
                    )*

                    type Function = unsafe extern "C" fn(
                        $( <$pty as NativeType>::Raw ),*
                    ) -> <$crate::native::native_functions!(@ret $( $ret )?) as NativeType>::Raw;

                    // SAFETY: the symbol was resolved for this exact declaration,
                    // and every argument type is the C ABI type it maps to.
                    let raw = unsafe {
                        let function = std::mem::transmute::<*const std::ffi::c_void, Function>(
                            self.$name.address(),
                        );
                        function($( <$pty as NativeArg>::raw(&$param) ),*)
                    };

                    Ok(<$crate::native::native_functions!(@ret $( $ret )?) as NativeReturn>::unmarshal(raw))
                }
            )*
        }
    };
}

pub(crate) use native_functions;
