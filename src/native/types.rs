//! Type-mapping rules between declared parameter types and the C calling
//! convention.
//!
//! Every parameter and return value of a bound function carries a
//! [`DeclaredType`]. [`map_type`] turns it into the [`CallType`] used for the
//! native call, or reports that no mapping exists. The [`NativeType`],
//! [`NativeArg`] and [`NativeReturn`] traits attach a declared type and a
//! marshaling strategy to the Rust types used in binding tables.

use std::ffi::{c_char, c_void, CString, NulError};

/// Width of an explicitly sized native integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    /// 16-bit (`short`).
    W16,
    /// 32-bit (`int`, `unsigned int`).
    W32,
    /// Address-sized (`void *`, `intptr_t`).
    Pointer,
}

/// The semantic type a function declaration states for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    /// No value. Only meaningful as a return type.
    Unit,
    /// A plain integer, passed as a 32-bit signed `int`.
    Integer,
    /// Text, passed as a null-terminated UTF-8 buffer.
    Text,
    /// An integer whose native width is stated explicitly.
    Sized { width: IntWidth, signed: bool },
    /// The declaration carries no usable type information.
    Unannotated,
}

/// The calling-convention type of one argument or return slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallType {
    Void,
    Int32,
    Utf8Text,
    ExplicitWidthInteger { width: IntWidth, signed: bool },
}

/// Where a declared type appears in a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Parameter,
    Return,
}

/// Maps a declared type to its calling-convention type.
///
/// # Arguments
///
/// * `declared` - The declared type of the slot
/// * `position` - Whether the slot is a parameter or the return value
///
/// # Returns
///
/// The native type, or `None` if the slot has no recognized mapping.
/// `Unit` maps to `Void` in return position only.
pub fn map_type(declared: DeclaredType, position: Position) -> Option<CallType> {
    match declared {
        DeclaredType::Unit => match position {
            Position::Return => Some(CallType::Void),
            Position::Parameter => None,
        },
        DeclaredType::Integer => Some(CallType::Int32),
        DeclaredType::Text => Some(CallType::Utf8Text),
        DeclaredType::Sized { width, signed } => {
            Some(CallType::ExplicitWidthInteger { width, signed })
        }
        DeclaredType::Unannotated => None,
    }
}

/// Opaque, address-sized token for a resource owned by a native library.
///
/// The null address is the canonical invalid handle.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(*mut c_void);

impl Handle {
    /// The invalid handle.
    pub const NULL: Handle = Handle(std::ptr::null_mut());

    /// Wraps a raw native address.
    pub fn from_ptr(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    /// Returns the raw native address.
    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }

    /// Returns true for the invalid handle.
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

/// Marker for text parameters.
///
/// Arguments are taken as `&str` and encoded into an owned, null-terminated
/// buffer that lives exactly as long as the call.
#[derive(Debug, Clone, Copy)]
pub enum Text {}

/// A Rust type usable in a binding table.
pub trait NativeType {
    /// The declared type recorded in the function declaration.
    const DECLARED: DeclaredType;
    /// The C ABI representation handed to or returned by the native symbol.
    type Raw: Copy;
}

/// A [`NativeType`] that can be passed as an argument.
pub trait NativeArg: NativeType {
    /// What callers pass in.
    type Arg<'a>;
    /// Owned storage that must outlive the native call.
    type Marshaled;

    /// Encodes the caller's value.
    fn marshal(arg: Self::Arg<'_>) -> Result<Self::Marshaled, NulError>;

    /// Borrows the raw ABI value out of the marshaled storage.
    fn raw(marshaled: &Self::Marshaled) -> Self::Raw;
}

/// A [`NativeType`] that can be returned from a native call.
pub trait NativeReturn: NativeType {
    fn unmarshal(raw: Self::Raw) -> Self;
}

impl NativeType for () {
    const DECLARED: DeclaredType = DeclaredType::Unit;
    type Raw = ();
}

impl NativeReturn for () {
    fn unmarshal(_raw: ()) -> Self {}
}

impl NativeType for Text {
    const DECLARED: DeclaredType = DeclaredType::Text;
    type Raw = *const c_char;
}

impl NativeArg for Text {
    type Arg<'a> = &'a str;
    type Marshaled = CString;

    fn marshal(arg: Self::Arg<'_>) -> Result<CString, NulError> {
        CString::new(arg)
    }

    fn raw(marshaled: &CString) -> *const c_char {
        marshaled.as_ptr()
    }
}

/// Implements the traits for types passed through unchanged.
macro_rules! passthrough {
    ($($ty:ty => $declared:expr),* $(,)?) => {
        $(
            impl NativeType for $ty {
                const DECLARED: DeclaredType = $declared;
                type Raw = $ty;
            }

            impl NativeArg for $ty {
                type Arg<'a> = $ty;
                type Marshaled = $ty;

                fn marshal(arg: Self::Arg<'_>) -> Result<$ty, NulError> {
                    Ok(arg)
                }

                fn raw(marshaled: &$ty) -> $ty {
                    *marshaled
                }
            }

            impl NativeReturn for $ty {
                fn unmarshal(raw: $ty) -> Self {
                    raw
                }
            }
        )*
    };
}

passthrough! {
    i32 => DeclaredType::Integer,
    i16 => DeclaredType::Sized { width: IntWidth::W16, signed: true },
    u32 => DeclaredType::Sized { width: IntWidth::W32, signed: false },
    Handle => DeclaredType::Sized { width: IntWidth::Pointer, signed: false },
}
