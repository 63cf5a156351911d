//! Graph traverser.
//!
//! Walks the reachability graph from a root and offers every object to a
//! visitor exactly once. The visited set belongs to the traverser, not to a
//! single walk: calling [`GraphTraverser::traverse`] again never re-offers an
//! object seen by an earlier call. Baseline subtraction relies on this.
//!
//! Descent order is depth-first, fields in declaration order, elements in
//! index order. Primitive slots are never read.

use rustc_hash::FxHashSet;

use heft_model::{ObjRef, ObjectGraph};

use crate::stack::ensure_sufficient_stack;
use crate::{ObjectVisitor, SizeError, VisitAction};

/// Identity-keyed, visit-once walker over an [`ObjectGraph`].
pub struct GraphTraverser<'g> {
    graph: &'g dyn ObjectGraph,
    visited: FxHashSet<ObjRef>,
}

impl<'g> GraphTraverser<'g> {
    pub fn new(graph: &'g dyn ObjectGraph) -> Self {
        Self {
            graph,
            visited: FxHashSet::default(),
        }
    }

    /// Walk everything reachable from `root` that no earlier walk reached.
    ///
    /// A `None` root does nothing. The first error aborts the walk and is
    /// returned unchanged; objects visited before it stay visited. A reference
    /// the graph cannot describe fails with [`SizeError::InvalidObject`].
    pub fn traverse<V>(&mut self, visitor: &mut V, root: Option<ObjRef>) -> Result<(), SizeError>
    where
        V: ObjectVisitor + ?Sized,
    {
        match root {
            Some(root) => self.walk(visitor, root),
            None => Ok(()),
        }
    }

    /// Number of distinct objects visited over this traverser's lifetime.
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, obj: ObjRef) -> bool {
        self.visited.contains(&obj)
    }

    fn walk<V>(&mut self, visitor: &mut V, obj: ObjRef) -> Result<(), SizeError>
    where
        V: ObjectVisitor + ?Sized,
    {
        if self.visited.contains(&obj) {
            return Ok(());
        }

        let graph = self.graph;
        let desc = graph
            .describe(obj)
            .ok_or(SizeError::InvalidObject(obj))?;
        self.visited.insert(obj);
        let action = visitor.visit(graph, &desc, obj)?;
        tracing::trace!(?obj, ty = ?desc.ty(), ?action, "visited");

        if !desc.has_references() {
            return Ok(());
        }

        ensure_sufficient_stack(|| {
            if desc.is_array() {
                for index in 0..graph.array_len(obj) {
                    if let Some(next) = graph.read_element(obj, index) {
                        self.walk(visitor, next)?;
                    }
                }
            } else if action == VisitAction::Continue {
                for (index, field) in desc.fields().iter().enumerate() {
                    if !field.ty.is_reference() {
                        continue;
                    }
                    if let Some(next) = graph.read_field(obj, index) {
                        self.walk(visitor, next)?;
                    }
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests;
