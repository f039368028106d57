//! Command implementations for the `ermvc` CLI.
//!
//! Every command takes the project root explicitly; the binary passes the
//! current directory.

use colored::Colorize;
use std::path::Path;
use std::process::Command;

/// Code generation: `ermvc generate model|controller|resource`.
///
/// Writes source files, views and migrations from the embedded templates
/// and registers new controllers in `src/controllers/mod.rs`.
pub mod generate;

/// Project scaffolding: `ermvc init <dir>`.
pub mod init;

/// Route listing: `ermvc routes`.
///
/// Reads `src/controllers/*_controller.rs`, detects the exported action
/// functions and prints the bindings the convention router derives.
pub mod routes;

/// Embedded templates and the `{{key}}` renderer.
pub mod templates;

/// Result type shared by all commands.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Run an external tool in `dir`, streaming its output.
///
/// Returns `false` when the tool is missing or exits unsuccessfully.
pub(crate) fn run_tool(dir: &Path, program: &str, args: &[&str]) -> bool {
    println!("  {} {} {}", "$".dimmed(), program, args.join(" "));
    match Command::new(program).args(args).current_dir(dir).status() {
        Ok(status) => status.success(),
        Err(err) => {
            eprintln!("{} Could not run {program}: {err}", "!".yellow());
            false
        }
    }
}
