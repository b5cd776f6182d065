//! Provide the pure helpers behind `simrun`: template substitution, simulator output classification, and
//! success-rate arithmetic.
//!
//! ## Notes
//!
//! - This is a "semantic core" crate: **no IO**, no global mutable state, and no CLI-specific types.
//! - The simulator protocol is textual. A run is judged by two fixed marker substrings and a timing string, never
//!   by the process exit status.

pub mod outcome;
pub mod summary;
pub mod template;

pub use outcome::{FAILURE_MARKER, Outcome, SUCCESS_MARKER, Status, TIMING_UNAVAILABLE, classify};
pub use summary::SuccessRate;
pub use template::{rewrite, rewrite_bytes};
