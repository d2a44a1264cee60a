//! spyglass-kernel: the inspection engine.
//!
//! This crate provides:
//!
//! - **Classifier**: maps any value to one variant of a closed set
//! - **Enumerator**: member listing for instances (base class first) and functions
//! - **Cycle detector**: identity + path-prefix check that cuts circular traversal
//! - **Collapse store**: per-path expanded/collapsed flags with forward and reversed defaults
//! - **Inspector**: drives the above over a heap and emits node descriptors
//! - **Config**: the `collapse` / `collapseExcept` options, from JSON or TOML
//!
//! ```
//! use spyglass_kernel::Inspector;
//! use spyglass_types::{Heap, Value, ValueKind};
//!
//! let mut heap = Heap::new();
//! let v = heap.object();
//! heap.set_property(v, "self", Value::Object(v));
//!
//! let node = Inspector::new().inspect(&heap, &Value::Object(v));
//! assert_eq!(node.kind, ValueKind::PlainObject);
//! assert_eq!(node.find("$.self").map(|n| n.kind), Some(ValueKind::CircularReference));
//! ```

pub mod classify;
pub mod collapse;
pub mod config;
pub mod cycle;
pub mod enumerate;
pub mod error;
pub mod inspector;

pub use classify::{classify, Child, CIRCULAR, UNREPRESENTABLE};
pub use collapse::{CollapseStore, DefaultMode};
pub use config::{CollapseExcept, CollapseOption, CollapsePolicy, InspectorConfig};
pub use cycle::CycleDetector;
pub use error::{InspectError, InspectResult};
pub use inspector::Inspector;
