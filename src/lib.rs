//! Glossa: message extraction and runtime lookup for component UIs.
//!
//! This crate ties the workspace together. It owns the project
//! configuration ([`SharedConfig`]) and re-exports the member crates so
//! applications can depend on one package:
//!
//! - [`common`] derives message ids and compiles plural messages;
//! - [`extract`] finds marked messages in source files;
//! - [`runtime`] resolves marked messages against the active catalog.

pub mod config;

pub use config::{CONFIG_FILE_NAME, ConfigError, DEFAULT_OUTPUT, NameOverrides, SharedConfig};
pub use glossa_common as common;
pub use glossa_extract as extract;
pub use glossa_runtime as runtime;
