//! x86-64 Register Model
//!
//! This module describes the target machine's general-purpose registers
//! following the System V AMD64 ABI: the argument-passing order, the
//! caller-saved and callee-saved partitions, the subset available to the
//! register allocator, and a fixed coloring that seeds graph coloring.
//! The catalogs are compiled in and never change at runtime.

use crate::common::util::LookupError;
use std::fmt;

/// Color assigned to the reserved registers rax and rsp, which are known
/// to the color table but never handed out by the allocator.
pub const RESERVED_COLOR: i32 = -1;

/// x86-64 General Purpose Registers (64-bit)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum X86Reg {
    // Caller-saved registers (volatile)
    Rax, // Return value, accumulator
    Rcx, // 4th argument
    Rdx, // 3rd argument
    Rsi, // 2nd argument
    Rdi, // 1st argument
    R8,  // 5th argument
    R9,  // 6th argument
    R10, // Caller-saved
    R11, // Caller-saved

    // Callee-saved registers (non-volatile)
    Rbx, // Callee-saved
    Rbp, // Base pointer (callee-saved)
    R12, // Callee-saved
    R13, // Callee-saved
    R14, // Callee-saved
    R15, // Callee-saved

    // Special registers
    Rsp, // Stack pointer
}

impl X86Reg {
    /// Registers available for allocation, in color order.
    ///
    /// Excludes RAX (return value and scratch), RSP and RBP (stack
    /// discipline), R11 (reserved as a scratch register for lowering) and
    /// R15 (reserved for the runtime).
    pub const ALLOCATABLE: &'static [X86Reg] = &[
        X86Reg::Rcx,
        X86Reg::Rdx,
        X86Reg::Rsi,
        X86Reg::Rdi,
        X86Reg::R8,
        X86Reg::R9,
        X86Reg::R10,
        X86Reg::Rbx,
        X86Reg::R12,
        X86Reg::R13,
        X86Reg::R14,
    ];

    /// Caller-saved registers (must be saved by caller if live across call)
    pub const CALLER_SAVED: &'static [X86Reg] = &[
        X86Reg::Rax,
        X86Reg::Rcx,
        X86Reg::Rdx,
        X86Reg::Rsi,
        X86Reg::Rdi,
        X86Reg::R8,
        X86Reg::R9,
        X86Reg::R10,
        X86Reg::R11,
    ];

    /// Callee-saved registers (must be preserved by callee)
    pub const CALLEE_SAVED: &'static [X86Reg] = &[
        X86Reg::Rbx,
        X86Reg::Rbp,
        X86Reg::R12,
        X86Reg::R13,
        X86Reg::R14,
        X86Reg::R15,
    ];

    /// Argument registers (System V AMD64 ABI order)
    pub const ARG_REGS: &'static [X86Reg] = &[
        X86Reg::Rdi, // 1st argument
        X86Reg::Rsi, // 2nd argument
        X86Reg::Rdx, // 3rd argument
        X86Reg::Rcx, // 4th argument
        X86Reg::R8,  // 5th argument
        X86Reg::R9,  // 6th argument
    ];

    /// Return value register
    pub const RETURN_REG: X86Reg = X86Reg::Rax;

    /// Stack pointer
    pub const STACK_PTR: X86Reg = X86Reg::Rsp;

    /// Look up this register's allocation color.
    ///
    /// The table is fixed: the allocatable registers map injectively onto
    /// `0..=10` in [`X86Reg::ALLOCATABLE`] order, and the two reserved
    /// registers RAX and RSP map to [`RESERVED_COLOR`]. Registers outside
    /// the table fail with a lookup error.
    pub fn color(self) -> Result<i32, LookupError> {
        match self {
            X86Reg::Rcx => Ok(0),
            X86Reg::Rdx => Ok(1),
            X86Reg::Rsi => Ok(2),
            X86Reg::Rdi => Ok(3),
            X86Reg::R8 => Ok(4),
            X86Reg::R9 => Ok(5),
            X86Reg::R10 => Ok(6),
            X86Reg::Rbx => Ok(7),
            X86Reg::R12 => Ok(8),
            X86Reg::R13 => Ok(9),
            X86Reg::R14 => Ok(10),
            X86Reg::Rax | X86Reg::Rsp => Ok(RESERVED_COLOR),
            other => Err(LookupError::new(other)),
        }
    }

    /// The allocatable register carrying a given color.
    pub fn from_color(color: i32) -> Option<X86Reg> {
        usize::try_from(color)
            .ok()
            .and_then(|i| Self::ALLOCATABLE.get(i))
            .copied()
    }

    /// Check if this is a caller-saved register
    pub fn is_caller_saved(self) -> bool {
        Self::CALLER_SAVED.contains(&self)
    }

    /// Check if this is a callee-saved register
    pub fn is_callee_saved(self) -> bool {
        Self::CALLEE_SAVED.contains(&self)
    }
}

impl fmt::Display for X86Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            X86Reg::Rax => "rax",
            X86Reg::Rbx => "rbx",
            X86Reg::Rcx => "rcx",
            X86Reg::Rdx => "rdx",
            X86Reg::Rsi => "rsi",
            X86Reg::Rdi => "rdi",
            X86Reg::Rsp => "rsp",
            X86Reg::Rbp => "rbp",
            X86Reg::R8 => "r8",
            X86Reg::R9 => "r9",
            X86Reg::R10 => "r10",
            X86Reg::R11 => "r11",
            X86Reg::R12 => "r12",
            X86Reg::R13 => "r13",
            X86Reg::R14 => "r14",
            X86Reg::R15 => "r15",
        };
        write!(f, "{}", name)
    }
}

/// Round `n` up to the next multiple of `alignment`.
///
/// Returns `n` unchanged when it is already a multiple.
pub fn align(n: i64, alignment: i64) -> i64 {
    let rem = n % alignment;
    if rem == 0 {
        n
    } else {
        n + alignment - rem
    }
}

/// Adjust a code label for the host platform's symbol naming convention.
///
/// macOS prefixes C-visible symbols with an underscore; everywhere else
/// the name is used as-is.
pub fn label_name(name: &str) -> String {
    if cfg!(target_os = "macos") {
        format!("_{}", name)
    } else {
        name.to_string()
    }
}
