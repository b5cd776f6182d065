//! CLI module for the simrun batch harness
//!
//! ## Usage
//!
//! - `simrun [TESTS]` - Run every memory image listed in TESTS (default `tests.txt`)
//! - `simrun --classify FILE` - Classify a captured simulator transcript
//! - `simrun --emit-template MEMFILE` - Print the template as it would be rewritten for MEMFILE
//!
//! ## Modules
//!
//! - `batch` - Batch loop, result table and raw log
//! - `config` - Paths, placeholder and simulator command
//! - `interfaces` - Error taxonomy and the simulator invocation seam
//! - `report` - Progress and summary output
//! - `template_guard` - Backup/restore bracket around the template
//!
//! ## Design
//!
//! Argument parsing uses clap derive. Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod batch;
pub mod config;
pub mod interfaces;
pub mod report;
pub mod template_guard;

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use simrun_core::{classify, rewrite_bytes};

use batch::BatchRunner;
use config::HarnessConfig;
use interfaces::ProcessInvoker;
use report::ConsoleReporter;

use crate::version::SIMRUN_VERSION as VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<interfaces::HarnessError> for CliError {
    fn from(e: interfaces::HarnessError) -> Self {
        if e.is_setup() {
            CliError::failure(format!("Error: {}\nNo tests were run.", e))
        } else {
            CliError::failure(format!("Error: {}", e))
        }
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Batch harness for an external HDL simulator
#[derive(Parser, Debug)]
#[command(name = "simrun")]
#[command(version = VERSION)]
#[command(about = "Run an HDL simulator over a list of memory images and summarize the verdicts", long_about = None)]
pub struct Cli {
    /// Test list: one memory image per line
    #[arg(value_name = "TESTS", default_value = config::DEFAULT_TEST_LIST)]
    pub tests: PathBuf,

    /// Working directory for relative paths and for the simulator
    #[arg(short = 'C', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Template source rewritten before each test
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_TEMPLATE)]
    pub template: PathBuf,

    /// Backup location for the pristine template
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_BACKUP)]
    pub backup: PathBuf,

    /// Raw simulator output log
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_LOG)]
    pub log: PathBuf,

    /// Literal token in the template replaced by each test name
    #[arg(long, value_name = "TOKEN", default_value = config::DEFAULT_PLACEHOLDER)]
    pub placeholder: String,

    /// Echo each test's simulator output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    // Debug/development flags
    /// Classify a captured simulator transcript (debug)
    #[arg(long = "classify", value_name = "FILE", conflicts_with = "emit_template")]
    pub classify_file: Option<PathBuf>,

    /// Print the template rewritten for MEMFILE (debug)
    #[arg(long = "emit-template", value_name = "MEMFILE")]
    pub emit_template: Option<String>,
}

impl Cli {
    /// Build the harness configuration from the parsed arguments.
    pub fn harness_config(&self) -> HarnessConfig {
        let config = HarnessConfig::new()
            .with_test_list(&self.tests)
            .with_template(&self.template)
            .with_backup(&self.backup)
            .with_log(&self.log)
            .with_placeholder(&self.placeholder);
        match &self.dir {
            Some(dir) => config.with_work_dir(dir),
            None => config,
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.harness_config();

    // Handle debug flags first
    if let Some(file) = &cli.classify_file {
        return classify_file(&config, file);
    }
    if let Some(memfile) = &cli.emit_template {
        return emit_template(&config, memfile);
    }

    run_batch(config, cli.verbose)
}

/// Run the full batch with the subprocess invoker.
///
/// Individual test verdicts and per-test I/O problems never affect the exit code; only setup and restoration
/// failures do.
pub fn run_batch(config: HarnessConfig, verbose: bool) -> CliResult<ExitCode> {
    let invoker = match &config.work_dir {
        Some(dir) => ProcessInvoker::in_dir(dir),
        None => ProcessInvoker::new(),
    };
    let runner = BatchRunner::new(config, invoker);
    let mut reporter = ConsoleReporter::new(verbose);
    runner.run(&mut reporter)?;
    Ok(ExitCode::SUCCESS)
}

fn classify_file(config: &HarnessConfig, file: &Path) -> CliResult<ExitCode> {
    let path = config.resolve(file);
    let output = fs::read_to_string(&path)
        .map_err(|e| CliError::failure(format!("Error reading '{}': {}", path.display(), e)))?;
    let outcome = classify(&output);
    println!("{} - {}", outcome.status, outcome.timing);
    Ok(ExitCode::SUCCESS)
}

fn emit_template(config: &HarnessConfig, memfile: &str) -> CliResult<ExitCode> {
    let path = config.template_path();
    let source = fs::read(&path)
        .map_err(|e| CliError::failure(format!("Error reading template '{}': {}", path.display(), e)))?;
    let rewritten = rewrite_bytes(&source, config.placeholder.as_bytes(), memfile.as_bytes());
    io::stdout()
        .write_all(&rewritten)
        .map_err(|e| CliError::failure(format!("Error writing to stdout: {}", e)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Tests
// ============================================================================
