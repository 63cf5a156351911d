//! Sizer: strategy selection and the public sizing entry points.
//!
//! # Strategy selection
//!
//! If the runtime granted its [`Instrumentation`], every entry point sizes
//! objects with [`NativeSizeVisitor`]; otherwise with
//! [`LayoutSizeVisitor`]. Both agree on every shape the layout rules model.
//!
//! # Baseline subtraction
//!
//! [`Sizer::size_of_delta`] measures what a structure adds on top of
//! another. It opens one [`TraversalSession`], walks the baseline without
//! counting, then walks the measured root with counting. Objects reachable
//! from the baseline are already in the session's visited set, so only the
//! additions are counted.

use heft_model::{Instrumentation, ObjRef, ObjectGraph, TypeDescriptor};

use crate::{
    GraphTraverser, LayoutSizeVisitor, NativeSizeVisitor, NoopVisitor, ObjectVisitor,
    PlatformProfile, SizeError, SizeVisitor, VisitAction,
};

/// Which size strategy an entry point uses.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Strategy {
    /// Field/type layout rules with a per-type cache.
    Layout,
    /// The runtime's privileged size query.
    Native,
}

/// A size visitor of either strategy.
#[derive(Debug)]
pub enum StrategyVisitor<'i> {
    Layout(LayoutSizeVisitor),
    Native(NativeSizeVisitor<'i>),
}

impl StrategyVisitor<'_> {
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Layout(_) => Strategy::Layout,
            Self::Native(_) => Strategy::Native,
        }
    }
}

impl ObjectVisitor for StrategyVisitor<'_> {
    fn visit(
        &mut self,
        graph: &dyn ObjectGraph,
        desc: &TypeDescriptor<'_>,
        obj: ObjRef,
    ) -> Result<VisitAction, SizeError> {
        match self {
            Self::Layout(v) => v.visit(graph, desc, obj),
            Self::Native(v) => v.visit(graph, desc, obj),
        }
    }
}

impl SizeVisitor for StrategyVisitor<'_> {
    fn total(&self) -> u64 {
        match self {
            Self::Layout(v) => v.total(),
            Self::Native(v) => v.total(),
        }
    }
}

/// Deep-size queries over one object graph.
#[derive(Clone, Copy)]
pub struct Sizer<'g> {
    graph: &'g dyn ObjectGraph,
    profile: PlatformProfile,
    instrumentation: Option<&'g dyn Instrumentation>,
}

impl<'g> Sizer<'g> {
    /// Sizer using layout rules for `profile` until instrumentation is granted.
    pub fn new(graph: &'g dyn ObjectGraph, profile: PlatformProfile) -> Self {
        Self {
            graph,
            profile,
            instrumentation: None,
        }
    }

    /// Sizer with the profile detected from the environment.
    pub fn detect(graph: &'g dyn ObjectGraph) -> Self {
        Self::new(graph, PlatformProfile::detect())
    }

    /// Grant the privileged size query. Switches every entry point to the
    /// native strategy.
    #[must_use]
    pub fn with_instrumentation(mut self, instrumentation: &'g dyn Instrumentation) -> Self {
        self.instrumentation = Some(instrumentation);
        self
    }

    pub fn profile(&self) -> PlatformProfile {
        self.profile
    }

    pub fn strategy(&self) -> Strategy {
        if self.instrumentation.is_some() {
            Strategy::Native
        } else {
            Strategy::Layout
        }
    }

    /// A fresh size visitor of the selected strategy.
    pub fn size_visitor(&self) -> StrategyVisitor<'g> {
        match self.instrumentation {
            Some(instrumentation) => StrategyVisitor::Native(NativeSizeVisitor::new(instrumentation)),
            None => StrategyVisitor::Layout(LayoutSizeVisitor::new(self.profile)),
        }
    }

    /// Bytes occupied by `obj` alone, from the privileged query.
    ///
    /// `None` is 0. Fails if instrumentation was never granted, or if the
    /// runtime does not own `obj`.
    pub fn shallow_size(&self, obj: Option<ObjRef>) -> Result<u64, SizeError> {
        let instrumentation = self
            .instrumentation
            .ok_or(SizeError::InstrumentationUnavailable)?;
        match obj {
            Some(obj) => instrumentation
                .object_size(obj)
                .ok_or(SizeError::InvalidObject(obj)),
            None => Ok(0),
        }
    }

    /// Deep size of everything reachable from `root`, each object once.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn size_of(&self, root: Option<ObjRef>) -> Result<u64, SizeError> {
        let mut visitor = self.size_visitor();
        let total = self.size_of_with(&mut visitor, root)?;
        tracing::debug!(strategy = ?visitor.strategy(), total, "sized graph");
        Ok(total)
    }

    /// Deep size of `root` with a caller-chosen visitor.
    ///
    /// Returns the visitor's total afterwards, which includes anything it had
    /// accumulated before this call.
    pub fn size_of_with<V>(&self, visitor: &mut V, root: Option<ObjRef>) -> Result<u64, SizeError>
    where
        V: SizeVisitor + ?Sized,
    {
        GraphTraverser::new(self.graph).traverse(visitor, root)?;
        Ok(visitor.total())
    }

    /// Bytes reachable from `measured` that are not reachable from `baseline`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn size_of_delta(
        &self,
        baseline: Option<ObjRef>,
        measured: Option<ObjRef>,
    ) -> Result<u64, SizeError> {
        let mut session = self.session();
        session.exclude(baseline)?;
        let added = session.measure(measured)?;
        tracing::debug!(
            excluded = session.visited_count(),
            added,
            "sized graph against baseline"
        );
        Ok(added)
    }

    /// Open a traversal session sharing one visited set across walks.
    pub fn session(&self) -> TraversalSession<'g> {
        TraversalSession {
            traverser: GraphTraverser::new(self.graph),
            visitor: self.size_visitor(),
        }
    }
}

impl std::fmt::Debug for Sizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sizer")
            .field("profile", &self.profile)
            .field("strategy", &self.strategy())
            .finish_non_exhaustive()
    }
}

/// A sequence of walks over one visited set.
///
/// Objects reached by any earlier walk, counted or not, are never counted
/// again. Use it to layer several structures:
///
/// ```text
/// let mut session = sizer.session();
/// session.exclude(Some(shared_config))?;
/// let first = session.measure(Some(request_a))?;
/// let second = session.measure(Some(request_b))?; // excludes request_a too
/// ```
pub struct TraversalSession<'g> {
    traverser: GraphTraverser<'g>,
    visitor: StrategyVisitor<'g>,
}

impl TraversalSession<'_> {
    /// Walk `root` without counting, so its objects are excluded from later
    /// measurements.
    pub fn exclude(&mut self, root: Option<ObjRef>) -> Result<(), SizeError> {
        self.traverser.traverse(&mut NoopVisitor, root)
    }

    /// Walk `root` counting only objects no earlier walk reached.
    ///
    /// Returns the bytes this call added.
    pub fn measure(&mut self, root: Option<ObjRef>) -> Result<u64, SizeError> {
        let before = self.visitor.total();
        self.traverser.traverse(&mut self.visitor, root)?;
        Ok(self.visitor.total() - before)
    }

    /// Bytes counted by every `measure` call so far.
    pub fn total(&self) -> u64 {
        self.visitor.total()
    }

    pub fn strategy(&self) -> Strategy {
        self.visitor.strategy()
    }

    /// Distinct objects reached by any walk in this session.
    pub fn visited_count(&self) -> usize {
        self.traverser.visited_count()
    }
}
