//! Classify captured simulator output.
//!
//! ## Notes
//! - **Markers**: the simulator reports its verdict by printing [`SUCCESS_MARKER`] or [`FAILURE_MARKER`].
//!   When both appear, success wins; this precedence is part of the output protocol and must not be "fixed".
//! - **Timing**: the first `Time: <digits> ns` match is reported verbatim; later matches are ignored.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Substring the simulator prints when the testbench passes.
pub const SUCCESS_MARKER: &str = "Simulation succeeded";
/// Substring the simulator prints when the testbench fails.
pub const FAILURE_MARKER: &str = "Simulation failed";
/// Timing label used when the output carries no timing string.
pub const TIMING_UNAVAILABLE: &str = "Time: N/A";

const TIMING_PATTERN: &str = r"Time:\s*\d+\s*ns";

/// Represent the verdict for a single simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Failure,
    /// Neither marker was found (including launch errors).
    Unknown,
}

impl Status {
    /// Return the upper-case label used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::Failure => "FAILURE",
            Status::Unknown => "UNKNOWN",
        }
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represent the classification of one captured output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    /// Either the exact matched timing substring or [`TIMING_UNAVAILABLE`].
    pub timing: String,
}

fn timing_regex() -> &'static Regex {
    static TIMING: OnceLock<Regex> = OnceLock::new();
    TIMING.get_or_init(|| Regex::new(TIMING_PATTERN).expect("INVARIANT: timing pattern is a valid regex"))
}

/// Determine the status of a run from its output.
///
/// ## Returns
/// - (`Status`): `Success` if [`SUCCESS_MARKER`] occurs, else `Failure` if [`FAILURE_MARKER`] occurs, else `Unknown`.
pub fn classify_status(output: &str) -> Status {
    if output.contains(SUCCESS_MARKER) {
        Status::Success
    } else if output.contains(FAILURE_MARKER) {
        Status::Failure
    } else {
        Status::Unknown
    }
}

/// Extract the first timing string from the output.
///
/// ## Returns
/// - (`Option<&str>`): the matched substring, e.g. `"Time: 4755 ns"`, or `None`.
pub fn extract_timing(output: &str) -> Option<&str> {
    timing_regex().find(output).map(|m| m.as_str())
}

/// Classify captured simulator output into a status and timing label.
///
/// ## Examples
/// ```rust
/// use simrun_core::{classify, Status};
/// let outcome = classify("# Simulation succeeded\n# Time: 4755 ns  Iteration: 1\n");
/// assert_eq!(outcome.status, Status::Success);
/// assert_eq!(outcome.timing, "Time: 4755 ns");
/// ```
pub fn classify(output: &str) -> Outcome {
    Outcome {
        status: classify_status(output),
        timing: extract_timing(output).unwrap_or(TIMING_UNAVAILABLE).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_marker() {
        assert_eq!(classify_status("...\n# Simulation succeeded\n"), Status::Success);
    }

    #[test]
    fn test_failure_marker() {
        assert_eq!(classify_status("# ** Note: Simulation failed\n"), Status::Failure);
    }

    #[test]
    fn test_no_marker_is_unknown() {
        assert_eq!(classify_status("# Loading work.top\n"), Status::Unknown);
        assert_eq!(classify_status(""), Status::Unknown);
    }

    #[test]
    fn test_success_takes_precedence_over_failure() {
        assert_eq!(classify_status("Simulation failed\nSimulation succeeded\n"), Status::Success);
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        assert_eq!(classify_status("simulation succeeded"), Status::Unknown);
    }

    #[test]
    fn test_timing_extracted_verbatim() {
        let outcome = classify("# Simulation succeeded\n# Time: 4755 ns  Iteration: 1  Instance: /tb\n");
        assert_eq!(outcome.timing, "Time: 4755 ns");
    }

    #[test]
    fn test_timing_first_match_wins() {
        assert_eq!(extract_timing("Time: 10 ns\nTime: 20 ns"), Some("Time: 10 ns"));
    }

    #[test]
    fn test_timing_whitespace_is_optional() {
        assert_eq!(extract_timing("Time:15ns"), Some("Time:15ns"));
        assert_eq!(extract_timing("Time:  15   ns"), Some("Time:  15   ns"));
    }

    #[test]
    fn test_timing_requires_ns_unit() {
        assert_eq!(extract_timing("Time: 15 ps"), None);
        assert_eq!(extract_timing("Time: N/A"), None);
    }

    #[test]
    fn test_missing_timing_uses_fallback() {
        let outcome = classify("Simulation failed");
        assert_eq!(outcome.status, Status::Failure);
        assert_eq!(outcome.timing, TIMING_UNAVAILABLE);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::Success.to_string(), "SUCCESS");
        assert_eq!(Status::Failure.to_string(), "FAILURE");
        assert_eq!(Status::Unknown.to_string(), "UNKNOWN");
    }
}
