//! Glossa command-line library.
//!
//! Backs the `glossa` binary and can be driven directly in tests.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Error types reported by the binary
//! - [`extract`] - The `extract` command
//! - [`id`] - The `id` command
//! - [`output`] - The extraction document and progress messages

use std::io::Write;

pub mod cli;
pub mod error;
pub mod extract;
pub mod id;
pub mod output;

/// Write one line to `stderr`, ignoring failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
