//! Tandem
//!
//! Infrastructure for building and validating an incremental, multi-pass
//! compiler by differential testing. Each transformation pass may declare
//! a reference interpreter; the harness runs the interpreters in tandem
//! and stops the moment two of them disagree about a test program.
//!
//! # Components
//!
//! ```text
//! Test driver (driver)
//!     │
//!     ▼
//! Pass pipeline + differential checker (pipeline)
//!     │
//!     ├── program reader (frontend)
//!     ├── generic helpers (common)
//!     └── allocator data models (backend)
//!             ├── x86-64 register/ABI catalogs
//!             └── interference graph
//! ```
//!
//! The compiler passes themselves, the per-representation interpreters and
//! the system toolchain are collaborators reached through narrow
//! interfaces ([`pipeline::Pass`], [`driver::native::NativeBackend`]); the
//! `arith` module is a small built-in instance of those collaborators used
//! by the binary and the test suite.

pub mod arith;
pub mod backend;
pub mod common;
pub mod driver;
pub mod frontend;
pub mod pipeline;

// Re-export the types most callers need
pub use backend::{InterferenceGraph, X86Reg};
pub use common::{DebugLog, Sexp};
pub use driver::{compile_file, compiler_tests, interp_tests, TestSuite, SUCCESS_EXIT_CODE};
pub use pipeline::{Pass, Pipeline, PipelineError};
