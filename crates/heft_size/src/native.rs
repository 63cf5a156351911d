//! Native shallow-size strategy.
//!
//! Defers every object to the runtime's privileged size query. No caching:
//! the query is O(1) already.

use heft_model::{Instrumentation, ObjRef, ObjectGraph, TypeDescriptor};

use crate::{ObjectVisitor, SizeError, SizeVisitor, VisitAction};

/// Size visitor backed by [`Instrumentation::object_size`].
#[derive(Clone, Copy)]
pub struct NativeSizeVisitor<'i> {
    instrumentation: &'i dyn Instrumentation,
    total: u64,
}

impl<'i> NativeSizeVisitor<'i> {
    pub fn new(instrumentation: &'i dyn Instrumentation) -> Self {
        Self {
            instrumentation,
            total: 0,
        }
    }

    /// Build from a possibly-missing grant.
    ///
    /// Fails with [`SizeError::InstrumentationUnavailable`] when nothing was
    /// granted.
    pub fn try_new(instrumentation: Option<&'i dyn Instrumentation>) -> Result<Self, SizeError> {
        instrumentation
            .map(Self::new)
            .ok_or(SizeError::InstrumentationUnavailable)
    }
}

impl std::fmt::Debug for NativeSizeVisitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeSizeVisitor")
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

impl ObjectVisitor for NativeSizeVisitor<'_> {
    fn visit(
        &mut self,
        _graph: &dyn ObjectGraph,
        _desc: &TypeDescriptor<'_>,
        obj: ObjRef,
    ) -> Result<VisitAction, SizeError> {
        self.total += self
            .instrumentation
            .object_size(obj)
            .ok_or(SizeError::InvalidObject(obj))?;
        Ok(VisitAction::Continue)
    }
}

impl SizeVisitor for NativeSizeVisitor<'_> {
    fn total(&self) -> u64 {
        self.total
    }
}
