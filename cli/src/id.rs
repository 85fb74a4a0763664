//! The `id` command.

use std::io::Write;

use glossa_common::generate_message_id;

use crate::cli::IdArgs;
use crate::error::{CliError, Result};

/// Print the catalog id of the message in `args` to `stdout`.
///
/// # Errors
///
/// Returns [`CliError::Write`] when `stdout` cannot be written.
pub fn run_id(args: &IdArgs, stdout: &mut dyn Write) -> Result<()> {
    let id = generate_message_id(&args.message, args.context.as_deref());
    writeln!(stdout, "{id}").map_err(|source| CliError::Write {
        path: "<stdout>".into(),
        source,
    })
}
