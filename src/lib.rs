#![forbid(unsafe_code)]
//! simrun: batch harness for an external HDL simulator
//!
//! For every memory image in a test list, simrun substitutes the image name into a shared template source, runs
//! the simulator, classifies its transcript, and appends it to a raw log. The template is restored when the
//! batch ends, however it ends.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a programming bug, use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod cli;
pub mod version;

pub use cli::batch::{BatchRunner, ResultTable};
pub use cli::config::{HarnessConfig, SimulatorCommand};
pub use cli::interfaces::{HarnessError, Invocation, ProcessInvoker, SimulationInvoker};
pub use cli::report::{BatchReporter, ConsoleReporter};
pub use simrun_core::{Outcome, Status, SuccessRate, classify, rewrite, rewrite_bytes};
