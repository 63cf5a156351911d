//! Errors raised while building types and objects.

use crate::{ObjRef, TypeIdx};

/// Error from type registration or a heap read/write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    /// A type index that was never registered.
    #[error("unknown type {0:?}")]
    UnknownType(TypeIdx),

    /// A class name registered twice.
    #[error("class `{0}` is already registered")]
    DuplicateClass(String),

    /// A class operation on a primitive or array type.
    #[error("`{0}` is not a class")]
    NotAClass(String),

    /// An object handle this heap never allocated.
    #[error("invalid object reference {0:?}")]
    InvalidRef(ObjRef),

    /// A field access on an array.
    #[error("object of type `{0}` is not an instance")]
    NotAnInstance(String),

    /// An element access on a class instance.
    #[error("object of type `{0}` is not an array")]
    NotAnArray(String),

    #[error("type `{ty}` has no field `{field}`")]
    NoSuchField { ty: String, field: String },

    /// A write whose value does not fit the slot's declared type.
    #[error("cannot store {found} into a slot of type `{expected}`")]
    TypeMismatch { expected: String, found: String },

    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}
