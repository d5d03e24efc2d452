//! Compiler Pipeline and Differential Checker
//!
//! A [`Pipeline`] applies named transformation passes to a program
//! representation, strictly left to right:
//!
//! ```text
//! Source tree (Sexp)
//!     │
//!     ▼ pass 1 ── interpreter? ──┐
//! Tree                           │ results must agree
//!     │                          │
//!     ▼ pass 2 ── interpreter? ──┘
//! Tree
//!     │
//!     ▼ final pass (code generation pipelines)
//! Assembly text (Sexp::Str)
//! ```
//!
//! Passes that declare a reference interpreter participate in differential
//! checking: after the transform runs, the interpreter executes against the
//! new tree and its result must deeply equal the most recently validated
//! result. The first disagreement aborts the whole run with the pass name,
//! both values, and the offending intermediate tree. Passes without an
//! interpreter propagate silently.

use crate::common::debug::DebugLog;
use crate::common::sexp::Sexp;
use std::fmt;
use std::path::Path;

/// A program transformation, `Sexp` to `Sexp`.
pub type TransformFn = Box<dyn Fn(Sexp) -> Sexp>;

/// A reference interpreter for one intermediate representation.
///
/// The second argument is the test's input file, handed through so the
/// interpreter can redirect its standard input; `None` means the
/// interpreter reads the process's own stdin if it reads at all.
pub type InterpFn = Box<dyn Fn(&Sexp, Option<&Path>) -> Result<Sexp, String>>;

/// One named stage of a pipeline.
pub struct Pass {
    name: &'static str,
    transform: TransformFn,
    interp: Option<InterpFn>,
}

impl Pass {
    /// A silent transformation: no interpreter, no consistency checking.
    pub fn new(name: &'static str, transform: impl Fn(Sexp) -> Sexp + 'static) -> Self {
        Pass {
            name,
            transform: Box::new(transform),
            interp: None,
        }
    }

    /// A checked transformation: after it runs, `interp` validates the
    /// result against earlier interpreted passes.
    pub fn checked(
        name: &'static str,
        transform: impl Fn(Sexp) -> Sexp + 'static,
        interp: impl Fn(&Sexp, Option<&Path>) -> Result<Sexp, String> + 'static,
    ) -> Self {
        Pass {
            name,
            transform: Box::new(transform),
            interp: Some(Box::new(interp)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the transform.
    pub fn apply(&self, program: Sexp) -> Sexp {
        (self.transform)(program)
    }
}

/// Pipeline error types
#[derive(Clone, Debug)]
pub enum PipelineError {
    /// Two passes' reference interpreters disagree on the same test.
    ResultMismatch {
        pipeline: String,
        pass: String,
        expected: Sexp,
        actual: Sexp,
        /// The intermediate tree at the point of failure.
        tree: Sexp,
    },
    /// A reference interpreter failed outright.
    Interp { pass: String, message: String },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::ResultMismatch {
                pipeline,
                pass,
                expected,
                actual,
                tree,
            } => {
                writeln!(
                    f,
                    "interpreter results disagree in compiler `{}` at pass `{}`",
                    pipeline, pass
                )?;
                writeln!(f, "  expected: {}", expected)?;
                writeln!(f, "  actual:   {}", actual)?;
                write!(f, "program after `{}`:\n{}", pass, tree)
            }
            PipelineError::Interp { pass, message } => {
                write!(f, "interpreter for pass `{}` failed: {}", pass, message)
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// An ordered sequence of passes with a name for diagnostics.
pub struct Pipeline {
    name: String,
    passes: Vec<Pass>,
    debug: DebugLog,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, passes: Vec<Pass>) -> Self {
        Pipeline {
            name: name.into(),
            passes,
            debug: DebugLog::default(),
        }
    }

    /// Attach a logging context; intermediate trees are printed through it.
    pub fn with_debug(mut self, debug: DebugLog) -> Self {
        self.debug = debug;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    /// Apply the transforms only, left to right, with no interpreter
    /// execution. This is what single-file compilation uses.
    pub fn transform(&self, program: Sexp) -> Sexp {
        let mut current = program;
        for pass in &self.passes {
            current = pass.apply(current);
            self.debug.print(pass.name, &current);
        }
        current
    }

    /// Run the differential check on one program.
    ///
    /// `input` is the test's input file, if the test has one; it is handed
    /// to every interpreter for stdin redirection. Returns the last
    /// interpreted result, or `None` when no pass declares an interpreter.
    pub fn check(
        &self,
        program: Sexp,
        input: Option<&Path>,
    ) -> Result<Option<Sexp>, PipelineError> {
        let mut current = program;
        let mut validated: Option<Sexp> = None;

        for pass in &self.passes {
            current = pass.apply(current);
            self.debug.print(pass.name, &current);

            let Some(interp) = &pass.interp else {
                continue;
            };
            let result = interp(&current, input).map_err(|message| PipelineError::Interp {
                pass: pass.name.to_string(),
                message,
            })?;

            if let Some(expected) = &validated {
                if *expected != result {
                    return Err(PipelineError::ResultMismatch {
                        pipeline: self.name.clone(),
                        pass: pass.name.to_string(),
                        expected: expected.clone(),
                        actual: result,
                        tree: current,
                    });
                }
            }
            validated = Some(result);
        }

        Ok(validated)
    }
}
