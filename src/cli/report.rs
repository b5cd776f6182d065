//! Batch reporting
//!
//! ## BatchReporter Trait
//!
//! The batch runner calls a `BatchReporter` at each stage instead of printing directly, so progress and summary
//! output can be redirected or captured.

use std::path::Path;

use simrun_core::Outcome;

use super::batch::ResultTable;
use super::interfaces::Invocation;

/// Trait for reporting batch progress and results.
pub trait BatchReporter {
    /// Called once the test list has been read
    fn on_collection_complete(&mut self, _test_count: usize) {}

    /// Called before the simulator is invoked for a test
    fn on_test_start(&mut self, test: &str);

    /// Called after a test has been classified and logged
    fn on_test_complete(&mut self, _test: &str, _outcome: &Outcome, _invocation: &Invocation) {}

    /// Called once the template has been restored
    fn on_run_complete(&mut self, results: &ResultTable, log_path: &Path);
}

/// Default console reporter
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    /// Echo each test's captured output to stderr
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl BatchReporter for ConsoleReporter {
    fn on_collection_complete(&mut self, test_count: usize) {
        if test_count == 0 {
            eprintln!("No tests listed");
        }
    }

    fn on_test_start(&mut self, test: &str) {
        println!("{}", progress_line(test));
    }

    fn on_test_complete(&mut self, test: &str, outcome: &Outcome, invocation: &Invocation) {
        if self.verbose {
            eprintln!("----- {} ({}) -----", test, outcome.status);
            eprint!("{}", invocation.output);
        }
    }

    fn on_run_complete(&mut self, results: &ResultTable, log_path: &Path) {
        print!("{}", render_summary(results, log_path));
    }
}

pub fn progress_line(test: &str) -> String {
    format!("Running test with: {}", test)
}

/// Render one report line: `<identifier>: <status> - <timing>`.
pub fn result_line(test: &str, outcome: &Outcome) -> String {
    format!("{}: {} - {}", test, outcome.status, outcome.timing)
}

/// Render the end-of-run summary, including the aggregate success rate.
pub fn render_summary(results: &ResultTable, log_path: &Path) -> String {
    let mut out = String::from("\nSimulation Summary:\n");
    for (test, outcome) in results.iter() {
        out.push_str("  ");
        out.push_str(&result_line(test, outcome));
        out.push('\n');
    }
    out.push_str(&format!("\nSUCCESS rate: {}\n", results.success_rate()));
    out.push_str(&format!("All simulations complete. Full logs in {}\n", log_path.display()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use simrun_core::Status;

    fn table() -> ResultTable {
        let mut table = ResultTable::new();
        table.insert(
            "add.mem",
            Outcome {
                status: Status::Success,
                timing: "Time: 4755 ns".to_string(),
            },
        );
        table.insert(
            "fib.mem",
            Outcome {
                status: Status::Failure,
                timing: "Time: 120 ns".to_string(),
            },
        );
        table.insert(
            "sort.mem",
            Outcome {
                status: Status::Unknown,
                timing: "Time: N/A".to_string(),
            },
        );
        table
    }

    #[test]
    fn test_result_line() {
        let outcome = Outcome {
            status: Status::Success,
            timing: "Time: 100 ns".to_string(),
        };
        assert_eq!(result_line("a.mem", &outcome), "a.mem: SUCCESS - Time: 100 ns");
    }

    #[test]
    fn test_progress_line() {
        assert_eq!(progress_line("a.mem"), "Running test with: a.mem");
    }

    #[test]
    fn test_render_summary() {
        let summary = render_summary(&table(), Path::new("sim_output.txt"));
        insta::assert_snapshot!(summary.trim(), @r"
        Simulation Summary:
          add.mem: SUCCESS - Time: 4755 ns
          fib.mem: FAILURE - Time: 120 ns
          sort.mem: UNKNOWN - Time: N/A

        SUCCESS rate: 1/3 (33.3333%)
        All simulations complete. Full logs in sim_output.txt
        ");
    }

    #[test]
    fn test_render_summary_empty() {
        let summary = render_summary(&ResultTable::new(), Path::new("sim_output.txt"));
        assert!(summary.contains("SUCCESS rate: 0/0 (0.0000%)"));
    }
}
