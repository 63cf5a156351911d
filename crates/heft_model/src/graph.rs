//! Interfaces the sizing engine consumes.
//!
//! [`ObjectGraph`] is the type layout provider plus the reference reads a
//! traversal needs. [`Instrumentation`] is the privileged per-object size
//! query. [`Heap`](crate::Heap) implements both.

use crate::{ObjRef, TypeDescriptor};

/// Read-only view of an object graph.
///
/// Implementations must return the same descriptor for every object of the
/// same concrete type, and must list all instance fields (inherited ones
/// included) for non-array types.
pub trait ObjectGraph {
    /// Layout metadata of the object's concrete type.
    ///
    /// `None` if `obj` does not belong to this graph.
    fn describe(&self, obj: ObjRef) -> Option<TypeDescriptor<'_>>;

    /// Number of elements of an array object. Zero for non-arrays and
    /// unknown objects.
    fn array_len(&self, obj: ObjRef) -> usize;

    /// Target of the reference held in field `field` (an index into
    /// [`TypeDescriptor::fields`]). `None` for null and primitive fields.
    fn read_field(&self, obj: ObjRef, field: usize) -> Option<ObjRef>;

    /// Target of the reference held in element `index` of an array.
    /// `None` for null and primitive elements.
    fn read_element(&self, obj: ObjRef, index: usize) -> Option<ObjRef>;
}

/// Privileged shallow-size query provided by the runtime that owns the
/// objects.
///
/// Must be O(1) per call; callers do not cache its answers.
pub trait Instrumentation {
    /// Bytes occupied by `obj` itself, excluding anything it references.
    ///
    /// `None` if the runtime does not own `obj`.
    fn object_size(&self, obj: ObjRef) -> Option<u64>;
}
