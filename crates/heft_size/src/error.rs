//! Sizing errors.

use heft_model::ObjRef;

/// Error raised by a sizing operation.
///
/// A traversal either completes and returns a total or propagates the first
/// error unchanged; there are no partial results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SizeError {
    /// The privileged size query was requested but never granted.
    ///
    /// Use the layout-based strategy instead, or fail.
    #[error("instrumentation is not available: the native size query was never granted")]
    InstrumentationUnavailable,

    /// A reference that the graph or runtime being sized does not own, such
    /// as a root taken from another heap.
    #[error("object {0:?} does not belong to the graph being sized")]
    InvalidObject(ObjRef),
}
