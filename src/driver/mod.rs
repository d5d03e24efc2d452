//! Build/Run Test Driver
//!
//! Drives a [`Pipeline`] over conventionally named test artifacts. A test
//! `T` in a suite directory consists of `T.rkt` (the source program), an
//! optional `T.in` (input the program reads), and the generated `T.s`
//! (assembly output). Test families expand `F` with indices `n1..nk` into
//! canonical names `F_n1 .. F_nk`.
//!
//! Two batch drivers exist: [`interp_tests`] runs the differential checker
//! on every test, and [`compiler_tests`] compiles each test to assembly,
//! hands it to the native build backend, runs the produced binary and
//! requires the exit code 42. Both are fail-fast: the first failure aborts
//! the whole run.

pub mod native;

use crate::common::debug::soft_assert;
use crate::common::sexp::Sexp;
use crate::frontend::reader::{read_str, ReadError};
use crate::pipeline::{Pipeline, PipelineError};
use self::native::{NativeBackend, ToolError};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Exit code a compiled test binary must produce to pass.
pub const SUCCESS_EXIT_CODE: i32 = 42;

/// A directory of conventionally named test artifacts.
#[derive(Clone, Debug)]
pub struct TestSuite {
    dir: PathBuf,
}

impl TestSuite {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        TestSuite { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the test's source program.
    pub fn source_path(&self, test: &str) -> PathBuf {
        self.dir.join(format!("{}.rkt", test))
    }

    /// Path of the test's input file, if the test has one.
    pub fn input_path(&self, test: &str) -> Option<PathBuf> {
        let path = self.dir.join(format!("{}.in", test));
        path.exists().then_some(path)
    }

    /// Path the test's generated assembly is written to.
    pub fn asm_path(&self, test: &str) -> PathBuf {
        self.dir.join(format!("{}.s", test))
    }
}

impl Default for TestSuite {
    fn default() -> Self {
        TestSuite::new("tests")
    }
}

/// Expand a test family and indices into canonical test names.
pub fn test_names(family: &str, nums: &[u32]) -> Vec<String> {
    nums.iter().map(|n| format!("{}_{}", family, n)).collect()
}

/// Driver error types
#[derive(Debug)]
pub enum DriverError {
    /// The differential checker aborted.
    Pipeline(PipelineError),
    /// A test source program failed to parse.
    Read { path: PathBuf, error: ReadError },
    /// A test artifact could not be read or written.
    Io { path: PathBuf, error: io::Error },
    /// The final pass of a code-generation pipeline produced a tree, not
    /// assembly text.
    NonTextualOutput { pass: String, value: Sexp },
    /// The assembler/linker could not be run or reported failure; the
    /// whole batch aborts.
    Tool(ToolError),
    /// A compiled test binary exited with the wrong code.
    UnexpectedExit { test: String, code: i32 },
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Pipeline(e) => write!(f, "{}", e),
            DriverError::Read { path, error } => {
                write!(f, "malformed program in {}:\n{}", path.display(), error)
            }
            DriverError::Io { path, error } => {
                write!(f, "cannot access {}: {}", path.display(), error)
            }
            DriverError::NonTextualOutput { pass, value } => {
                write!(
                    f,
                    "final pass `{}` must produce assembly text, got: {}",
                    pass, value
                )
            }
            DriverError::Tool(e) => write!(f, "external build failed: {}", e),
            DriverError::UnexpectedExit { test, code } => {
                write!(
                    f,
                    "test `{}` exited with code {} (expected {})",
                    test, code, SUCCESS_EXIT_CODE
                )
            }
        }
    }
}

impl std::error::Error for DriverError {}

impl From<PipelineError> for DriverError {
    fn from(e: PipelineError) -> Self {
        DriverError::Pipeline(e)
    }
}

impl From<ToolError> for DriverError {
    fn from(e: ToolError) -> Self {
        DriverError::Tool(e)
    }
}

fn read_program(path: &Path) -> Result<Sexp, DriverError> {
    let source = fs::read_to_string(path).map_err(|error| DriverError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    read_str(&source).map_err(|error| DriverError::Read {
        path: path.to_path_buf(),
        error,
    })
}

/// Run the differential checker on a single named test.
pub fn check_test(
    pipeline: &Pipeline,
    suite: &TestSuite,
    test: &str,
) -> Result<Option<Sexp>, DriverError> {
    let program = read_program(&suite.source_path(test))?;
    let input = suite.input_path(test);
    Ok(pipeline.check(program, input.as_deref())?)
}

/// Run the differential checker across a test family, fail-fast.
pub fn interp_tests(
    pipeline: &Pipeline,
    suite: &TestSuite,
    family: &str,
    nums: &[u32],
) -> Result<(), DriverError> {
    for name in test_names(family, nums) {
        check_test(pipeline, suite, &name)?;
        println!("{} passed", name);
    }
    Ok(())
}

/// Compile one source file to assembly.
///
/// Runs the pipeline's transforms only (no interpreter execution). The
/// final value must be flat text; it is written, with a trailing newline,
/// to the source path with its extension replaced by `.s`.
pub fn compile_file(pipeline: &Pipeline, source: &Path) -> Result<PathBuf, DriverError> {
    let program = read_program(source)?;
    let output = pipeline.transform(program);

    let asm = match output {
        Sexp::Str(text) => text,
        other => {
            let pass = pipeline
                .passes()
                .last()
                .map(|p| p.name().to_string())
                .unwrap_or_else(|| pipeline.name().to_string());
            return Err(DriverError::NonTextualOutput {
                pass,
                value: other,
            });
        }
    };

    soft_assert(
        !asm.is_empty(),
        &format!("generated assembly for {} is empty", source.display()),
    );

    let out_path = source.with_extension("s");
    fs::write(&out_path, format!("{}\n", asm)).map_err(|error| DriverError::Io {
        path: out_path.clone(),
        error,
    })?;
    Ok(out_path)
}

/// Compile, assemble, link and run every test in a family, fail-fast.
///
/// Each test's binary must exit with [`SUCCESS_EXIT_CODE`]. A tool failure
/// aborts the entire batch; a wrong exit code aborts naming the test and
/// the observed code. Returns the names of the tests that passed.
pub fn compiler_tests(
    pipeline: &Pipeline,
    backend: &dyn NativeBackend,
    runtime: &Path,
    suite: &TestSuite,
    family: &str,
    nums: &[u32],
) -> Result<Vec<String>, DriverError> {
    let mut passed = Vec::new();
    for name in test_names(family, nums) {
        let asm = compile_file(pipeline, &suite.source_path(&name))?;
        let exe = backend.assemble_and_link(&asm, runtime)?;
        let code = backend.run(&exe, suite.input_path(&name).as_deref())?;
        if code != SUCCESS_EXIT_CODE {
            return Err(DriverError::UnexpectedExit { test: name, code });
        }
        println!("{} passed", name);
        passed.push(name);
    }
    Ok(passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pass;
    use std::env;
    use std::process;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn temp_dir() -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let dir = env::temp_dir().join(format!(
            "tandem-driver-{}-{}",
            process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn eval(program: &Sexp) -> Result<Sexp, String> {
        // Tiny evaluator for (program <int>) fixtures.
        match program.tag() {
            Some(("program", [Sexp::Int(n)])) => Ok(Sexp::Int(*n)),
            _ => Err(format!("bad fixture: {}", program)),
        }
    }

    fn emit(program: Sexp) -> Sexp {
        if let Some(("program", [Sexp::Int(n)])) = program.tag() {
            return Sexp::Str(format!("movq ${}, %rax", n));
        }
        program
    }

    fn codegen_pipeline() -> Pipeline {
        Pipeline::new(
            "fixture",
            vec![
                Pass::checked("identity", |p| p, |p: &Sexp, _: Option<&Path>| eval(p)),
                Pass::new("emit", emit),
            ],
        )
    }

    struct FakeBackend {
        exit_code: i32,
        fail_link: bool,
    }

    impl NativeBackend for FakeBackend {
        fn assemble_and_link(&self, asm: &Path, _runtime: &Path) -> Result<PathBuf, ToolError> {
            if self.fail_link {
                return Err(ToolError::Failed {
                    command: "cc".to_string(),
                    code: Some(1),
                });
            }
            Ok(asm.with_extension(""))
        }

        fn run(&self, _exe: &Path, _input: Option<&Path>) -> Result<i32, ToolError> {
            Ok(self.exit_code)
        }
    }

    fn write_suite(programs: &[(&str, &str)]) -> TestSuite {
        let dir = temp_dir();
        for (name, text) in programs {
            fs::write(dir.join(format!("{}.rkt", name)), text).unwrap();
        }
        TestSuite::new(dir)
    }

    #[test]
    fn test_canonical_names() {
        assert_eq!(test_names("arith", &[1, 2, 10]), ["arith_1", "arith_2", "arith_10"]);
        assert!(test_names("arith", &[]).is_empty());
    }

    #[test]
    fn test_suite_paths() {
        let suite = TestSuite::new("progs");
        assert_eq!(suite.source_path("r_1"), Path::new("progs/r_1.rkt"));
        assert_eq!(suite.asm_path("r_1"), Path::new("progs/r_1.s"));
        assert_eq!(suite.input_path("r_1"), None);
    }

    #[test]
    fn test_input_path_found_when_present() {
        let suite = write_suite(&[("t_1", "(program 42)")]);
        fs::write(suite.dir().join("t_1.in"), "5\n").unwrap();
        assert!(suite.input_path("t_1").is_some());
    }

    #[test]
    fn test_check_test_reads_and_checks() {
        let suite = write_suite(&[("t_1", "(program 42)")]);
        let pipeline = codegen_pipeline();
        let result = check_test(&pipeline, &suite, "t_1").unwrap();
        assert_eq!(result, Some(Sexp::Int(42)));
    }

    #[test]
    fn test_check_test_missing_source() {
        let suite = write_suite(&[]);
        let pipeline = codegen_pipeline();
        match check_test(&pipeline, &suite, "absent_1") {
            Err(DriverError::Io { path, .. }) => {
                assert!(path.to_string_lossy().ends_with("absent_1.rkt"));
            }
            other => panic!("expected Io error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_compile_file_writes_assembly() {
        let suite = write_suite(&[("t_1", "(program 7)")]);
        let pipeline = codegen_pipeline();
        let out = compile_file(&pipeline, &suite.source_path("t_1")).unwrap();
        assert_eq!(out, suite.asm_path("t_1"));
        let written = fs::read_to_string(&out).unwrap();
        assert_eq!(written, "movq $7, %rax\n");
    }

    #[test]
    fn test_compile_file_rejects_tree_output() {
        let suite = write_suite(&[("t_1", "(program 7)")]);
        // No emit pass: the final value is still a tree.
        let pipeline = Pipeline::new("no-emit", vec![Pass::new("identity", |p| p)]);
        match compile_file(&pipeline, &suite.source_path("t_1")) {
            Err(DriverError::NonTextualOutput { pass, .. }) => assert_eq!(pass, "identity"),
            other => panic!("expected NonTextualOutput, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_compiler_tests_pass_on_sentinel() {
        let suite = write_suite(&[("t_1", "(program 42)"), ("t_2", "(program 42)")]);
        let backend = FakeBackend {
            exit_code: SUCCESS_EXIT_CODE,
            fail_link: false,
        };
        let passed = compiler_tests(
            &codegen_pipeline(),
            &backend,
            Path::new("runtime.o"),
            &suite,
            "t",
            &[1, 2],
        )
        .unwrap();
        assert_eq!(passed, ["t_1", "t_2"]);
        assert!(suite.asm_path("t_1").exists());
        assert!(suite.asm_path("t_2").exists());
    }

    #[test]
    fn test_compiler_tests_abort_on_wrong_exit_code() {
        let suite = write_suite(&[("t_1", "(program 42)")]);
        let backend = FakeBackend {
            exit_code: 7,
            fail_link: false,
        };
        match compiler_tests(
            &codegen_pipeline(),
            &backend,
            Path::new("runtime.o"),
            &suite,
            "t",
            &[1],
        ) {
            Err(DriverError::UnexpectedExit { test, code }) => {
                assert_eq!(test, "t_1");
                assert_eq!(code, 7);
            }
            other => panic!("expected UnexpectedExit, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_compiler_tests_abort_on_tool_failure() {
        let suite = write_suite(&[("t_1", "(program 42)")]);
        let backend = FakeBackend {
            exit_code: SUCCESS_EXIT_CODE,
            fail_link: true,
        };
        match compiler_tests(
            &codegen_pipeline(),
            &backend,
            Path::new("runtime.o"),
            &suite,
            "t",
            &[1],
        ) {
            Err(DriverError::Tool(_)) => {}
            other => panic!("expected Tool error, got {:?}", other.map(|_| ())),
        }
    }
}
