//! Type and object handles.
//!
//! `TypeIdx` is the identity of a concrete runtime type. All types live in a
//! [`TypeRegistry`](crate::TypeRegistry) and are referenced by a 32-bit index.
//! The eight primitive types and a handful of well-known classes have fixed
//! indices, so width lookups on them never touch the registry.
//!
//! `ObjRef` is the identity of one object in a [`Heap`](crate::Heap).

use std::fmt;

/// A 32-bit index into the type registry.
///
/// Types are compared by index equality, never structurally.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeIdx(u32);

impl TypeIdx {
    // === Primitive Types (indices 0-7) ===

    /// 8-bit signed integer.
    pub const BYTE: Self = Self(0);
    /// Boolean, one byte wide.
    pub const BOOLEAN: Self = Self(1);
    /// 16-bit signed integer.
    pub const SHORT: Self = Self(2);
    /// UTF-16 code unit.
    pub const CHAR: Self = Self(3);
    /// 32-bit signed integer.
    pub const INT: Self = Self(4);
    /// 32-bit float.
    pub const FLOAT: Self = Self(5);
    /// 64-bit signed integer.
    pub const LONG: Self = Self(6);
    /// 64-bit float.
    pub const DOUBLE: Self = Self(7);

    // === Well-known classes (indices 8-11) ===

    /// Root class with no fields.
    pub const OBJECT: Self = Self(8);
    /// `String { value: char[], hash: int }`.
    pub const STRING: Self = Self(9);
    /// Boxed integer `Integer { value: int }`.
    pub const INTEGER: Self = Self(10);
    /// `char[]`, the backing store of `String`.
    pub const CHAR_ARRAY: Self = Self(11);

    /// First index handed out for user-registered types.
    pub const FIRST_DYNAMIC: u32 = 12;

    /// Number of primitive types.
    pub const PRIMITIVE_COUNT: u32 = 8;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is one of the eight primitive types.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }

    /// The primitive kind, or `None` for classes and arrays.
    #[inline]
    pub const fn primitive(self) -> Option<PrimitiveKind> {
        match self.0 {
            0 => Some(PrimitiveKind::Byte),
            1 => Some(PrimitiveKind::Boolean),
            2 => Some(PrimitiveKind::Short),
            3 => Some(PrimitiveKind::Char),
            4 => Some(PrimitiveKind::Int),
            5 => Some(PrimitiveKind::Float),
            6 => Some(PrimitiveKind::Long),
            7 => Some(PrimitiveKind::Double),
            _ => None,
        }
    }

    /// Check if a slot of this declared type holds a reference.
    #[inline]
    pub const fn is_reference(self) -> bool {
        !self.is_primitive()
    }
}

impl fmt::Debug for TypeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primitive() {
            Some(kind) => write!(f, "TypeIdx::{}", kind.name().to_uppercase()),
            None => write!(f, "TypeIdx({})", self.0),
        }
    }
}

/// The eight primitive value kinds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PrimitiveKind {
    Byte,
    Boolean,
    Short,
    Char,
    Int,
    Float,
    Long,
    Double,
}

impl PrimitiveKind {
    /// Width in bytes of one value of this kind.
    #[inline]
    pub const fn width(self) -> u64 {
        match self {
            Self::Byte | Self::Boolean => 1,
            Self::Short | Self::Char => 2,
            Self::Int | Self::Float => 4,
            Self::Long | Self::Double => 8,
        }
    }

    /// The fixed type index of this kind.
    #[inline]
    pub const fn idx(self) -> TypeIdx {
        match self {
            Self::Byte => TypeIdx::BYTE,
            Self::Boolean => TypeIdx::BOOLEAN,
            Self::Short => TypeIdx::SHORT,
            Self::Char => TypeIdx::CHAR,
            Self::Int => TypeIdx::INT,
            Self::Float => TypeIdx::FLOAT,
            Self::Long => TypeIdx::LONG,
            Self::Double => TypeIdx::DOUBLE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Boolean => "boolean",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Float => "float",
            Self::Long => "long",
            Self::Double => "double",
        }
    }

    /// All kinds in index order.
    pub const ALL: [Self; 8] = [
        Self::Byte,
        Self::Boolean,
        Self::Short,
        Self::Char,
        Self::Int,
        Self::Float,
        Self::Long,
        Self::Double,
    ];
}

/// Identity of one object in a heap.
///
/// Two distinct objects with equal contents have distinct `ObjRef`s.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ObjRef(u32);

impl ObjRef {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}
