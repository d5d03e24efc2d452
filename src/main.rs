use std::env;
use std::fs;
use std::path::Path;
use std::process;

use tandem::arith;
use tandem::common::debug::DebugLog;
use tandem::driver::{compile_file, DriverError};
use tandem::frontend::report_read_error;

/// Configuration for the CLI application
struct Config {
    file_path: String,
    debug: DebugLog,
}

impl Config {
    /// Parse command line arguments and environment variables
    fn from_args() -> Option<Self> {
        let args: Vec<String> = env::args().collect();
        let file_path = args.get(1)?.clone();
        Some(Config {
            file_path,
            debug: DebugLog::from_env(),
        })
    }
}

fn main() {
    let Some(config) = Config::from_args() else {
        eprintln!("usage: tandem <program.rkt>");
        eprintln!("  writes the generated assembly next to the source, as <program>.s");
        eprintln!("  set TANDEM_DEBUG to print every intermediate representation");
        process::exit(2);
    };

    let pipeline = arith::pipeline(config.debug);
    match compile_file(&pipeline, Path::new(&config.file_path)) {
        Ok(out) => println!("wrote {}", out.display()),
        Err(DriverError::Read { path, error }) => {
            let source = fs::read_to_string(&path).unwrap_or_default();
            report_read_error(&path.display().to_string(), &source, &error);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
