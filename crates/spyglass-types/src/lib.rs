//! Pure data types for spyglass: the inspected value universe and the
//! classified node tree.
//!
//! This crate is a leaf dependency with no engine state and no I/O. It
//! exists so that renderers can consume node descriptors, and embedders can
//! build heaps, without pulling in the inspection kernel.

pub mod heap;
pub mod kind;
pub mod node;
pub mod path;
pub mod value;

// Flat re-exports for convenience
pub use heap::*;
pub use kind::*;
pub use node::*;
pub use path::*;
pub use value::*;
