//! Core library entry for the `classgen` CLI.
//!
//! `classgen` turns a class model into Java sources and keeps them in sync
//! across model changes: every run reparses the existing files into keyed
//! fragments, purges the code of elements that vanished or changed since the
//! last run, and merges freshly generated code in place, leaving hand-written
//! and protected code alone.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod fragments;
pub mod generate;
pub mod model;
pub mod ports;
pub mod signature;
pub mod templates;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}
