//! Aggregate success-rate arithmetic for batch reports.

use std::fmt;

/// Represent `passed / total` for a finished batch.
///
/// ## Notes
/// - An empty batch has a rate of `0.0`; the division is never performed with a zero denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuccessRate {
    pub passed: usize,
    pub total: usize,
}

impl SuccessRate {
    pub fn new(passed: usize, total: usize) -> Self {
        debug_assert!(passed <= total);
        Self { passed, total }
    }

    /// Return the success ratio in `[0.0, 1.0]`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64
        }
    }

    /// Format the ratio as a percentage with four decimal places (e.g. `50.0000%`).
    pub fn percentage(&self) -> String {
        format!("{:.4}%", self.ratio() * 100.0)
    }
}

impl fmt::Display for SuccessRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.passed, self.total, self.percentage())
    }
}
