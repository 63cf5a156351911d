//! Field and element slot values.

use std::fmt;

use crate::{ObjRef, PrimitiveKind, TypeIdx};

/// Contents of one field or array element.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value {
    Byte(i8),
    Boolean(bool),
    Short(i16),
    Char(u16),
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    /// A reference slot; `None` is null.
    Ref(Option<ObjRef>),
}

impl Value {
    /// The null reference.
    pub const NULL: Self = Self::Ref(None);

    /// The default value of a slot with the given declared type: zero for
    /// primitives, null for references.
    pub fn zero_for(ty: TypeIdx) -> Self {
        match ty.primitive() {
            Some(PrimitiveKind::Byte) => Self::Byte(0),
            Some(PrimitiveKind::Boolean) => Self::Boolean(false),
            Some(PrimitiveKind::Short) => Self::Short(0),
            Some(PrimitiveKind::Char) => Self::Char(0),
            Some(PrimitiveKind::Int) => Self::Int(0),
            Some(PrimitiveKind::Float) => Self::Float(0.0),
            Some(PrimitiveKind::Long) => Self::Long(0),
            Some(PrimitiveKind::Double) => Self::Double(0.0),
            None => Self::NULL,
        }
    }

    /// Primitive kind of this value, `None` for references.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Byte(_) => Some(PrimitiveKind::Byte),
            Self::Boolean(_) => Some(PrimitiveKind::Boolean),
            Self::Short(_) => Some(PrimitiveKind::Short),
            Self::Char(_) => Some(PrimitiveKind::Char),
            Self::Int(_) => Some(PrimitiveKind::Int),
            Self::Float(_) => Some(PrimitiveKind::Float),
            Self::Long(_) => Some(PrimitiveKind::Long),
            Self::Double(_) => Some(PrimitiveKind::Double),
            Self::Ref(_) => None,
        }
    }

    /// The referenced object, if this is a non-null reference.
    #[inline]
    pub fn as_object(&self) -> Option<ObjRef> {
        match self {
            Self::Ref(target) => *target,
            _ => None,
        }
    }
}

impl From<ObjRef> for Value {
    fn from(obj: ObjRef) -> Self {
        Self::Ref(Some(obj))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primitive_kind() {
            Some(kind) => f.write_str(kind.name()),
            None if *self == Self::NULL => f.write_str("null"),
            None => f.write_str("reference"),
        }
    }
}
