//! Harness I/O boundary interfaces
//!
//! This module defines the error taxonomy for batch runs and the trait-based seam around the external simulator.
//! Swapping the invoker allows for:
//! - Dry runs against canned output
//! - Testing the batch loop without a simulator installed
//!
//! The default implementation spawns the simulator as a subprocess.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, warn};

use super::config::SimulatorCommand;

/// Errors that abort a batch run
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to read test list '{}': {source}", .path.display())]
    TestList { path: PathBuf, source: io::Error },

    #[error("failed to back up template '{}' to '{}': {source}", .template.display(), .backup.display())]
    Backup {
        template: PathBuf,
        backup: PathBuf,
        source: io::Error,
    },

    #[error("failed to write template '{}': {source}", .path.display())]
    TemplateWrite { path: PathBuf, source: io::Error },

    #[error("failed to write output log '{}': {source}", .path.display())]
    LogWrite { path: PathBuf, source: io::Error },

    #[error(
        "failed to restore template '{}' from backup '{}': {source}; the template may still hold a substituted test",
        .template.display(),
        .backup.display()
    )]
    Restore {
        template: PathBuf,
        backup: PathBuf,
        source: io::Error,
    },
}

impl HarnessError {
    /// Return `true` for failures that happen before any test runs.
    pub fn is_setup(&self) -> bool {
        matches!(self, HarnessError::TestList { .. } | HarnessError::Backup { .. })
    }
}

/// Captured result of one simulator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// stdout followed by stderr, or a synthetic diagnostic when the launch failed
    pub output: String,
    /// Set only when the simulator was never started for this test
    pub launch_error: Option<String>,
}

impl Invocation {
    pub fn completed(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            launch_error: None,
        }
    }

    /// Build the record for a process that never started.
    pub fn launch_failed(program: &str, test_name: &str, error: impl ToString) -> Self {
        let error = error.to_string();
        Self {
            output: format!("Error running {} for {}: {}\n", program, test_name, error),
            launch_error: Some(error),
        }
    }

    /// Build the record for a test whose template could not be written. The simulator is not run.
    pub fn template_failed(test_name: &str, error: &HarnessError) -> Self {
        Self {
            output: format!("Error preparing template for {}: {}\n", test_name, error),
            launch_error: Some(error.to_string()),
        }
    }

    pub fn is_launch_failure(&self) -> bool {
        self.launch_error.is_some()
    }
}

// ============================================================================
// Simulation Invoker Interface
// ============================================================================

/// Run the external simulator once and capture its text.
///
/// Implementations must not fail: a launch failure is reported through [`Invocation::launch_error`] so the batch
/// can move on to the next test. A non-zero exit status is not a failure at all.
pub trait SimulationInvoker {
    fn invoke(&self, command: &SimulatorCommand, test_name: &str) -> Invocation;
}

impl<T: SimulationInvoker + ?Sized> SimulationInvoker for &T {
    fn invoke(&self, command: &SimulatorCommand, test_name: &str) -> Invocation {
        (**self).invoke(command, test_name)
    }
}

// ============================================================================
// Default Implementation
// ============================================================================

/// Subprocess-backed simulator invocation.
#[derive(Debug, Clone, Default)]
pub struct ProcessInvoker {
    work_dir: Option<PathBuf>,
}

impl ProcessInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the simulator inside `dir` instead of the current directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            work_dir: Some(dir.as_ref().to_path_buf()),
        }
    }
}

impl SimulationInvoker for ProcessInvoker {
    fn invoke(&self, command: &SimulatorCommand, test_name: &str) -> Invocation {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }

        match cmd.output() {
            Ok(output) => {
                debug!(test = test_name, status = %output.status, "simulator exited");
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                Invocation::completed(combined)
            }
            Err(e) => {
                warn!(test = test_name, program = %command.program, error = %e, "failed to launch simulator");
                Invocation::launch_failed(&command.program, test_name, e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_failure_for_missing_binary() {
        let command = SimulatorCommand::new("simrun-definitely-missing-simulator", ["-c"]);
        let invocation = ProcessInvoker::new().invoke(&command, "add.mem");

        assert!(invocation.is_launch_failure());
        assert!(
            invocation
                .output
                .starts_with("Error running simrun-definitely-missing-simulator for add.mem: ")
        );
        assert!(invocation.output.ends_with('\n'));
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_precedes_stderr() {
        let command = SimulatorCommand::new("sh", ["-c", "echo err >&2; echo out"]);
        let invocation = ProcessInvoker::new().invoke(&command, "t.mem");

        assert!(!invocation.is_launch_failure());
        assert_eq!(invocation.output, "out\nerr\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_not_a_launch_failure() {
        let command = SimulatorCommand::new("sh", ["-c", "echo 'Simulation failed'; exit 3"]);
        let invocation = ProcessInvoker::new().invoke(&command, "t.mem");

        assert!(invocation.launch_error.is_none());
        assert_eq!(invocation.output, "Simulation failed\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_work_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let command = SimulatorCommand::new("cat", ["marker.txt"]);
        let invocation = ProcessInvoker::in_dir(dir.path()).invoke(&command, "t.mem");

        assert_eq!(invocation.output, "here");
    }

    #[test]
    fn test_template_failure_record() {
        let err = HarnessError::TemplateWrite {
            path: PathBuf::from("top.sv"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        let invocation = Invocation::template_failed("fib.mem", &err);

        assert!(invocation.is_launch_failure());
        assert_eq!(
            invocation.output,
            "Error preparing template for fib.mem: failed to write template 'top.sv': read-only\n"
        );
    }

    #[test]
    fn test_setup_error_classification() {
        let err = HarnessError::TestList {
            path: PathBuf::from("tests.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.is_setup());
        assert_eq!(err.to_string(), "failed to read test list 'tests.txt': missing");

        let err = HarnessError::Restore {
            template: PathBuf::from("a.sv"),
            backup: PathBuf::from("b.sv"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(!err.is_setup());
        assert!(err.to_string().starts_with("failed to restore template 'a.sv' from backup 'b.sv': gone"));
    }
}
