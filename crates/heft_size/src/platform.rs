//! Platform profile: reference width and per-object overhead.
//!
//! The reference width is derived once from the architecture signal
//! ([`ARCH_ENV_VAR`]). A signal containing `"64"` means 8-byte references,
//! anything else 4-byte references. A missing signal is not an error: the
//! profile falls back to 8 bytes and logs a warning.

use heft_model::{HeapLayout, PrimitiveKind, TypeIdx};

/// Environment variable carrying the architecture signal (e.g. `x86_64`).
pub const ARCH_ENV_VAR: &str = "HEFT_ARCH";

/// Machine parameters the layout-based strategy sizes objects with.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PlatformProfile {
    reference_width: u64,
    object_overhead: u64,
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self::LP64
    }
}

impl PlatformProfile {
    /// 8-byte references, 16-byte object overhead.
    pub const LP64: Self = Self::new(8);
    /// 4-byte references, 8-byte object overhead.
    pub const ILP32: Self = Self::new(4);

    /// Profile with the given reference width; the object overhead models a
    /// two-word header.
    pub const fn new(reference_width: u64) -> Self {
        Self {
            reference_width,
            object_overhead: 2 * reference_width,
        }
    }

    /// Profile from an architecture signal.
    pub fn from_arch(arch: Option<&str>) -> Self {
        match arch {
            Some(arch) => {
                let profile = if arch.contains("64") {
                    Self::LP64
                } else {
                    Self::ILP32
                };
                tracing::debug!(
                    arch,
                    reference_width = profile.reference_width,
                    "detected architecture"
                );
                profile
            }
            None => {
                tracing::warn!("{ARCH_ENV_VAR} not set, assuming 64-bit references");
                Self::LP64
            }
        }
    }

    /// Profile from the [`ARCH_ENV_VAR`] environment variable.
    pub fn detect() -> Self {
        Self::from_arch(std::env::var(ARCH_ENV_VAR).ok().as_deref())
    }

    /// Profile matching a heap's allocator layout.
    pub const fn for_heap(layout: HeapLayout) -> Self {
        Self::new(layout.reference_width()).with_object_overhead(layout.header_bytes())
    }

    #[must_use]
    pub const fn with_object_overhead(mut self, bytes: u64) -> Self {
        self.object_overhead = bytes;
        self
    }

    #[inline]
    pub const fn reference_width(self) -> u64 {
        self.reference_width
    }

    #[inline]
    pub const fn object_overhead(self) -> u64 {
        self.object_overhead
    }

    /// Width of one slot of declared type `ty`.
    #[inline]
    pub fn width_of(self, ty: TypeIdx) -> u64 {
        ty.primitive()
            .map_or(self.reference_width, PrimitiveKind::width)
    }
}
