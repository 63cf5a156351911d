//! Deep memory footprint of object graphs.
//!
//! This crate provides:
//!
//! - **Graph traversal** ([`GraphTraverser`]) that offers every reachable
//!   object to a visitor exactly once per traverser, across cycles and shared
//!   substructure, honoring [`VisitAction::Skip`].
//! - **Two interchangeable size strategies**: [`LayoutSizeVisitor`] derives
//!   shallow sizes from field layout and a [`PlatformProfile`], caching per
//!   type; [`NativeSizeVisitor`] asks the runtime's
//!   [`Instrumentation`](heft_model::Instrumentation).
//! - **The [`Sizer`]** entry points: `shallow_size`, `size_of`,
//!   `size_of_with`, and `size_of_delta` for baseline subtraction, built on
//!   an explicit [`TraversalSession`].
//!
//! # Concurrency
//!
//! Everything here is single-threaded mutable state. The graph must not be
//! mutated while a walk is in progress.
//!
//! # Logging
//!
//! Uses `tracing`. Call [`init_tracing`] once and set `RUST_LOG`
//! (e.g. `RUST_LOG=heft_size=trace`) to see per-object visits.

mod error;
mod layout;
mod native;
mod platform;
mod sizer;
mod stack;
mod traverse;
mod visitor;

pub use error::SizeError;
pub use layout::{align8, LayoutSizeVisitor};
pub use native::NativeSizeVisitor;
pub use platform::{PlatformProfile, ARCH_ENV_VAR};
pub use sizer::{Sizer, Strategy, StrategyVisitor, TraversalSession};
pub use traverse::GraphTraverser;
pub use visitor::{NoopVisitor, ObjectVisitor, SizeVisitor, VisitAction};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
