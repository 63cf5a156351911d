//! Visitor protocol between the traverser and the size strategies.

use heft_model::{ObjRef, ObjectGraph, TypeDescriptor};

use crate::SizeError;

/// What the traverser should do after visiting an object.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VisitAction {
    /// Follow the object's references.
    Continue,
    /// Do not follow the object's fields. The object itself is already
    /// visited. Array elements are followed regardless.
    Skip,
}

/// Receives every newly reached object exactly once.
pub trait ObjectVisitor {
    fn visit(
        &mut self,
        graph: &dyn ObjectGraph,
        desc: &TypeDescriptor<'_>,
        obj: ObjRef,
    ) -> Result<VisitAction, SizeError>;
}

/// A visitor that accumulates a running byte total.
pub trait SizeVisitor: ObjectVisitor {
    /// Bytes accumulated so far.
    fn total(&self) -> u64;
}

/// Visits without accounting. Populates a visited set for baseline passes.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopVisitor;

impl ObjectVisitor for NoopVisitor {
    fn visit(
        &mut self,
        _graph: &dyn ObjectGraph,
        _desc: &TypeDescriptor<'_>,
        _obj: ObjRef,
    ) -> Result<VisitAction, SizeError> {
        Ok(VisitAction::Continue)
    }
}
