//! Type descriptors handed to visitors.

use crate::{TypeFlags, TypeIdx};

/// One instance field: its name and declared static type.
///
/// The declared type is only used for width lookup and to decide whether
/// the slot can hold a reference; field values are read through
/// [`ObjectGraph`](crate::ObjectGraph).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeIdx,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeIdx) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Layout metadata for one concrete type.
///
/// For classes, `fields` lists every instance field, inherited ones first.
/// For arrays, `fields` is empty and `element` is set.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TypeDescriptor<'a> {
    ty: TypeIdx,
    flags: TypeFlags,
    element: Option<TypeIdx>,
    fields: &'a [FieldDescriptor],
}

impl<'a> TypeDescriptor<'a> {
    pub(crate) fn new(
        ty: TypeIdx,
        flags: TypeFlags,
        element: Option<TypeIdx>,
        fields: &'a [FieldDescriptor],
    ) -> Self {
        Self {
            ty,
            flags,
            element,
            fields,
        }
    }

    /// The type this descriptor describes. Cache key for per-type sizes.
    #[inline]
    pub fn ty(&self) -> TypeIdx {
        self.ty
    }

    #[inline]
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.flags.is_array()
    }

    /// Element type of an array type, `None` otherwise.
    #[inline]
    pub fn element(&self) -> Option<TypeIdx> {
        self.element
    }

    /// All instance fields, inherited ones first. Empty for arrays.
    #[inline]
    pub fn fields(&self) -> &'a [FieldDescriptor] {
        self.fields
    }

    #[inline]
    pub fn has_references(&self) -> bool {
        self.flags.has_references()
    }
}
