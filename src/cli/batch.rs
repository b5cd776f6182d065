//! Batch runner
//!
//! Drives the simulator once per test identifier, strictly in list order:
//!
//! ```text
//! read test list -> back up template -> for each test:
//!     rewrite -> write template -> invoke -> classify -> append log -> record
//! -> restore template -> report
//! ```
//!
//! Only an unreadable test list or a failed backup stops the run before it starts. Per-test problems (launch
//! failures, an unwritable template, missing markers) become `UNKNOWN` results, and an unwritable log only loses
//! the raw output. The template is restored on every exit path, including
//! panics, through [`TemplateGuard`].
//!
//! Tests share one template file and one simulator working directory, so they never run concurrently.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use simrun_core::{Outcome, Status, SuccessRate, classify, rewrite_bytes};
use tracing::{debug, error, info};

use super::config::HarnessConfig;
use super::interfaces::{HarnessError, Invocation, SimulationInvoker};
use super::report::BatchReporter;
use super::template_guard::TemplateGuard;

// ============================================================================
// Result table
// ============================================================================

/// Per-test outcomes in first-seen order.
///
/// A repeated identifier keeps its original position but takes the later run's outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    entries: IndexMap<String, Outcome>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, test: impl Into<String>, outcome: Outcome) {
        self.entries.insert(test.into(), outcome);
    }

    pub fn get(&self, test: &str) -> Option<&Outcome> {
        self.entries.get(test)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn passed(&self) -> usize {
        self.entries.values().filter(|o| o.status.is_success()).count()
    }

    pub fn success_rate(&self) -> SuccessRate {
        SuccessRate::new(self.passed(), self.len())
    }
}

// ============================================================================
// Test list and raw log
// ============================================================================

/// Parse a test list: one identifier per line, surrounding whitespace trimmed, blank lines skipped.
pub fn parse_test_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read and parse the test list at `path`.
pub fn read_test_list(path: &Path) -> Result<Vec<String>, HarnessError> {
    let content = fs::read_to_string(path).map_err(|source| HarnessError::TestList {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_test_list(&content))
}

/// Append-only log of raw simulator output, truncated when opened.
pub struct RawLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl RawLog {
    pub fn create(path: &Path) -> Result<Self, HarnessError> {
        let file = File::create(path).map_err(|source| HarnessError::LogWrite {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    /// Write one bracketed section and flush it, so a later crash leaves earlier sections intact.
    pub fn append(&mut self, test: &str, output: &str) -> Result<(), HarnessError> {
        let section = format_log_section(test, output);
        self.writer
            .write_all(section.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|source| HarnessError::LogWrite {
                path: self.path.clone(),
                source,
            })
    }
}

/// Render one log section. The output is copied verbatim between the markers.
pub fn format_log_section(test: &str, output: &str) -> String {
    format!("===== Running Test: {test} =====\n{output}===== End Test: {test} =====\n\n")
}

// ============================================================================
// Batch runner
// ============================================================================

/// Sequential batch driver over a [`SimulationInvoker`].
pub struct BatchRunner<I> {
    config: HarnessConfig,
    invoker: I,
}

impl<I: SimulationInvoker> BatchRunner<I> {
    pub fn new(config: HarnessConfig, invoker: I) -> Self {
        Self { config, invoker }
    }

    /// Run every test in the configured list and report the results.
    ///
    /// ## Returns
    /// - `Ok(ResultTable)` once the template has been restored, whatever the individual test verdicts. A test whose
    ///   template could not be written is recorded as `UNKNOWN`; a log that cannot be written is reported with
    ///   `error!` and the batch carries on.
    /// - `Err` for setup failures (nothing was touched) or a failed restoration. The summary is still reported
    ///   before a restoration failure is returned.
    pub fn run(&self, reporter: &mut dyn BatchReporter) -> Result<ResultTable, HarnessError> {
        let tests = read_test_list(&self.config.test_list_path())?;
        reporter.on_collection_complete(tests.len());

        let guard = TemplateGuard::acquire(&self.config.template_path(), &self.config.backup_path())?;
        let table = self.run_tests(&tests, &guard, reporter);
        let restored = guard.restore();

        info!(passed = table.passed(), total = table.len(), "batch complete");
        reporter.on_run_complete(&table, &self.config.log_path());
        restored.map(|()| table)
    }

    fn run_tests(&self, tests: &[String], guard: &TemplateGuard, reporter: &mut dyn BatchReporter) -> ResultTable {
        let log_path = self.config.log_path();
        let mut log = match RawLog::create(&log_path) {
            Ok(log) => Some(log),
            Err(e) => {
                error!(error = %e, "raw output will not be logged");
                None
            }
        };
        let mut table = ResultTable::new();
        let placeholder = self.config.placeholder.as_bytes();

        for test in tests {
            reporter.on_test_start(test);

            let invocation = match guard.write(&rewrite_bytes(guard.pristine(), placeholder, test.as_bytes())) {
                Ok(()) => self.invoker.invoke(&self.config.simulator, test),
                Err(e) => {
                    error!(test = %test, error = %e, "skipping simulator run");
                    Invocation::template_failed(test, &e)
                }
            };
            let outcome = classify_invocation(&invocation);
            debug!(test = %test, status = %outcome.status, timing = %outcome.timing, "test classified");

            if let Some(Err(e)) = log.as_mut().map(|writer| writer.append(test, &invocation.output)) {
                error!(test = %test, error = %e, "raw output logging stopped");
                log = None;
            }
            reporter.on_test_complete(test, &outcome, &invocation);
            table.insert(test.as_str(), outcome);
        }

        table
    }
}

/// Classify an invocation; a process that never launched is always `UNKNOWN`.
pub fn classify_invocation(invocation: &Invocation) -> Outcome {
    let mut outcome = classify(&invocation.output);
    if invocation.is_launch_failure() {
        outcome.status = Status::Unknown;
    }
    outcome
}
