//! Frontend
//!
//! The reader that turns test program text into the [`crate::common::Sexp`]
//! tree, and pretty diagnostics for programs that fail to parse.

pub mod reader;
pub mod report;

pub use reader::{read_str, sexp_parser, ReadError};
pub use report::report_read_error;
