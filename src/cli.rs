//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `classgen`.
#[derive(Debug, Parser)]
#[command(name = "classgen", version, about = "Regenerate Java classes from a class model in place")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Regenerate the sources of a model definition, purging stale code.
    Generate {
        /// Model definition file (YAML).
        model: PathBuf,
        /// YAML file overriding built-in templates by name.
        #[arg(long, value_name = "FILE")]
        templates: Option<PathBuf>,
        /// Also generate relational table helper classes.
        #[arg(long)]
        tables: bool,
    },
    /// Show which generated elements the next run would purge.
    Diff {
        /// Model definition file (YAML).
        model: PathBuf,
    },
    /// List the fragments a source file is split into.
    Fragments {
        /// Java source file.
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn parses_generate_with_flags() {
        let cli = Cli::parse_from(["classgen", "generate", "model.yaml", "--templates", "t.yaml", "--tables"]);
        match cli.command {
            Command::Generate { model, templates, tables } => {
                assert_eq!(model, PathBuf::from("model.yaml"));
                assert_eq!(templates, Some(PathBuf::from("t.yaml")));
                assert!(tables);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_diff_subcommand() {
        let cli = Cli::parse_from(["classgen", "diff", "model.yaml"]);
        assert!(matches!(cli.command, Command::Diff { .. }));
    }

    #[test]
    fn fragments_requires_a_file() {
        assert!(Cli::try_parse_from(["classgen", "fragments"]).is_err());
    }
}
