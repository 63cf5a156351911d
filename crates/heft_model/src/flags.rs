//! Pre-computed type metadata flags.
//!
//! Computed once when a type is registered, so the traverser can decide
//! whether an object can hold references without walking its field list.

use bitflags::bitflags;

bitflags! {
    /// Per-type properties, fixed at registration time.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u32 {
        /// One of the eight primitive types.
        const IS_PRIMITIVE = 1 << 0;
        /// A class (instances have named fields).
        const IS_CLASS = 1 << 1;
        /// An array type (instances have indexed elements).
        const IS_ARRAY = 1 << 2;

        /// Instances hold at least one reference slot: a reference-typed
        /// field (own or inherited) or a reference element type.
        const HAS_REFERENCES = 1 << 8;
    }
}

impl TypeFlags {
    #[inline]
    pub fn is_array(self) -> bool {
        self.contains(Self::IS_ARRAY)
    }

    #[inline]
    pub fn is_class(self) -> bool {
        self.contains(Self::IS_CLASS)
    }

    #[inline]
    pub fn has_references(self) -> bool {
        self.contains(Self::HAS_REFERENCES)
    }
}
