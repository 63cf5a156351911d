//! Managed object model for heft.
//!
//! This crate provides:
//!
//! - **Type identities** ([`TypeIdx`], [`PrimitiveKind`], [`TypeFlags`]) and the
//!   [`TypeRegistry`] that interns classes and array types.
//! - **Layout descriptors** ([`TypeDescriptor`], [`FieldDescriptor`]) that
//!   visitors receive for every object.
//! - **An object heap** ([`Heap`], [`ObjRef`], [`Value`]) whose objects are
//!   the graphs being measured.
//! - **The interfaces the sizing engine consumes**: [`ObjectGraph`] (type
//!   layout provider plus reference reads) and [`Instrumentation`] (the
//!   privileged shallow-size query). `Heap` implements both.
//!
//! # Crate Dependencies
//!
//! No heft dependencies. `heft_size` depends on this crate only through the
//! two traits and the identity types.

mod descriptor;
mod error;
mod flags;
mod graph;
mod heap;
mod idx;
mod registry;
mod value;

pub use descriptor::{FieldDescriptor, TypeDescriptor};
pub use error::HeapError;
pub use flags::TypeFlags;
pub use graph::{Instrumentation, ObjectGraph};
pub use heap::{Heap, HeapLayout};
pub use idx::{ObjRef, PrimitiveKind, TypeIdx};
pub use registry::TypeRegistry;
pub use value::Value;
