//! Layout-based shallow-size strategy.
//!
//! Derives an object's size from its type's field list and the platform
//! profile, without asking the runtime:
//!
//! - class instance: `align8(overhead + Σ width(field))` over every instance
//!   field, inherited ones included, memoized per type;
//! - array: `align8(overhead + reference_width + len × width(element))`,
//!   computed per object since the length varies.
//!
//! # Known limitation
//!
//! Only the whole object is aligned. Runtimes that pad each level of a class
//! hierarchy separately, or that size collection internals differently, can
//! report more than this strategy for deep hierarchies.

use rustc_hash::FxHashMap;

use heft_model::{ObjRef, ObjectGraph, TypeDescriptor, TypeIdx};

use crate::{ObjectVisitor, PlatformProfile, SizeError, SizeVisitor, VisitAction};

/// Round `n` up to the next multiple of 8.
#[inline]
pub const fn align8(n: u64) -> u64 {
    n + ((8 - n % 8) % 8)
}

/// Size visitor backed by layout rules and a per-type size cache.
///
/// The cache lives as long as the visitor. Reusing one visitor across
/// several walks reuses its cache and keeps adding to its total.
#[derive(Clone, Debug)]
pub struct LayoutSizeVisitor {
    profile: PlatformProfile,
    cache: FxHashMap<TypeIdx, u64>,
    total: u64,
}

impl Default for LayoutSizeVisitor {
    fn default() -> Self {
        Self::new(PlatformProfile::default())
    }
}

impl LayoutSizeVisitor {
    pub fn new(profile: PlatformProfile) -> Self {
        Self {
            profile,
            cache: FxHashMap::default(),
            total: 0,
        }
    }

    pub fn profile(&self) -> PlatformProfile {
        self.profile
    }

    /// Shallow size of one instance of `desc`'s type.
    ///
    /// Class sizes are memoized; repeated calls return the cached value.
    /// For an array type this is the size of an empty array, never cached.
    pub fn shallow_size(&mut self, desc: &TypeDescriptor<'_>) -> u64 {
        if let Some(element) = desc.element() {
            return self.array_size(element, 0);
        }
        if let Some(&cached) = self.cache.get(&desc.ty()) {
            return cached;
        }

        let size = self.calculate_size(desc);
        tracing::trace!(ty = ?desc.ty(), size, "computed shallow size");
        self.cache.insert(desc.ty(), size);
        size
    }

    /// Size of an array of `len` elements of type `element`.
    pub fn array_size(&self, element: TypeIdx, len: usize) -> u64 {
        align8(
            self.profile.object_overhead()
                + self.profile.reference_width()
                + len as u64 * self.profile.width_of(element),
        )
    }

    /// Number of types with a memoized size.
    pub fn cached_types(&self) -> usize {
        self.cache.len()
    }

    fn calculate_size(&self, desc: &TypeDescriptor<'_>) -> u64 {
        let fields: u64 = desc
            .fields()
            .iter()
            .map(|field| self.profile.width_of(field.ty))
            .sum();
        align8(self.profile.object_overhead() + fields)
    }
}

impl ObjectVisitor for LayoutSizeVisitor {
    fn visit(
        &mut self,
        graph: &dyn ObjectGraph,
        desc: &TypeDescriptor<'_>,
        obj: ObjRef,
    ) -> Result<VisitAction, SizeError> {
        self.total += match desc.element() {
            Some(element) => self.array_size(element, graph.array_len(obj)),
            None => self.shallow_size(desc),
        };
        Ok(VisitAction::Continue)
    }
}

impl SizeVisitor for LayoutSizeVisitor {
    fn total(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests;
