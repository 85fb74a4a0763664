//! `glossa` CLI entrypoint.
//!
//! Extracts translatable messages from a project and prints message ids.
//! Progress and errors go to stderr; only `glossa id` writes to stdout.

use std::io::Write;

use camino::Utf8Path;
use clap::Parser;
use glossa_cli::cli::{Cli, Command};
use glossa_cli::error::Result;
use glossa_cli::extract::run_extract;
use glossa_cli::id::run_id;
use glossa_cli::write_stderr_line;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Extract(args) => run_extract(args, Utf8Path::new(""), stderr),
        Command::Id(args) => run_id(args, stdout),
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}
