//! Native Build Backend
//!
//! The narrow interface to the external assembler/linker toolchain and to
//! the executables it produces. The test driver depends only on
//! [`NativeBackend`]; [`SystemCc`] is the real implementation, and tests
//! substitute their own.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// An external tool invocation failed.
#[derive(Debug)]
pub enum ToolError {
    /// The command could not be launched at all.
    Launch { command: String, error: io::Error },
    /// The command ran but reported failure. `code` is `None` when the
    /// process was terminated by a signal.
    Failed { command: String, code: Option<i32> },
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::Launch { command, error } => {
                write!(f, "failed to launch `{}`: {}", command, error)
            }
            ToolError::Failed {
                command,
                code: Some(code),
            } => {
                write!(f, "`{}` exited with code {}", command, code)
            }
            ToolError::Failed {
                command,
                code: None,
            } => {
                write!(f, "`{}` was terminated by a signal", command)
            }
        }
    }
}

impl std::error::Error for ToolError {}

/// Assembles, links and runs generated code.
///
/// Both operations block until the external process finishes; there is no
/// timeout, so a hung tool hangs the test run.
pub trait NativeBackend {
    /// Turn an assembly file plus the fixed runtime object into an
    /// executable, returning its path.
    fn assemble_and_link(&self, asm: &Path, runtime: &Path) -> Result<PathBuf, ToolError>;

    /// Run an executable, optionally redirecting its standard input from a
    /// file, and return its exit code. Signal termination reports -1.
    fn run(&self, exe: &Path, input: Option<&Path>) -> Result<i32, ToolError>;
}

/// The system C compiler driver, used as assembler and linker in one step.
pub struct SystemCc {
    cc: String,
}

impl SystemCc {
    pub fn new() -> Self {
        SystemCc {
            cc: "cc".to_string(),
        }
    }

    /// Use a specific compiler driver instead of `cc`.
    pub fn with_compiler(cc: impl Into<String>) -> Self {
        SystemCc { cc: cc.into() }
    }
}

impl Default for SystemCc {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeBackend for SystemCc {
    fn assemble_and_link(&self, asm: &Path, runtime: &Path) -> Result<PathBuf, ToolError> {
        let exe = asm.with_extension("");
        let status = Command::new(&self.cc)
            .arg("-g")
            .arg(runtime)
            .arg(asm)
            .arg("-o")
            .arg(&exe)
            .status()
            .map_err(|error| ToolError::Launch {
                command: self.cc.clone(),
                error,
            })?;
        if !status.success() {
            return Err(ToolError::Failed {
                command: self.cc.clone(),
                code: status.code(),
            });
        }
        Ok(exe)
    }

    fn run(&self, exe: &Path, input: Option<&Path>) -> Result<i32, ToolError> {
        let command_name = exe.display().to_string();
        let mut command = Command::new(exe);
        if let Some(path) = input {
            let file = File::open(path).map_err(|error| ToolError::Launch {
                command: command_name.clone(),
                error,
            })?;
            command.stdin(Stdio::from(file));
        }
        let status = command.status().map_err(|error| ToolError::Launch {
            command: command_name,
            error,
        })?;
        Ok(status.code().unwrap_or(-1))
    }
}
