//! x86-64 Target Description
//!
//! Register catalogs and ABI arithmetic for the System V AMD64 target.

pub mod regs;

pub use regs::{align, label_name, X86Reg, RESERVED_COLOR};
