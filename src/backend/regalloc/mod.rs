//! Register Allocation Support
//!
//! The data model consumed by the graph-coloring pass: the interference
//! graph. The coloring algorithm itself lives with the compiler passes,
//! outside this crate.

pub mod interference;

pub use interference::InterferenceGraph;
