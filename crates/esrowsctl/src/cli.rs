//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// esrows CLI
#[derive(Parser, Debug)]
#[command(name = "esrowsctl")]
#[command(about = "Turn search engine SQL responses into flat rows", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Config file (overrides $ESROWS_CONFIG and ~/.config/esrows/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a SQL or search response into rows
    Normalize {
        /// Dialect tag (elasticsearch, awselasticsearch, odelasticsearch)
        #[arg(long, short)]
        dialect: Option<String>,

        /// Output format: jsonl, json or table
        #[arg(long, short)]
        format: Option<String>,

        /// Response file ("-" or absent reads stdin)
        input: Option<PathBuf>,
    },

    /// Flatten a bare aggregation tree into rows
    Flatten {
        /// Output format: jsonl, json or table
        #[arg(long, short)]
        format: Option<String>,

        /// Aggregation file ("-" or absent reads stdin)
        input: Option<PathBuf>,
    },

    /// List recognized dialect tags
    Dialects,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_normalize() {
        let cli = Cli::try_parse_from([
            "esrowsctl",
            "-vv",
            "normalize",
            "--dialect",
            "odelasticsearch",
            "--format",
            "table",
            "resp.json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Normalize {
                dialect,
                format,
                input,
            } => {
                assert_eq!(dialect.as_deref(), Some("odelasticsearch"));
                assert_eq!(format.as_deref(), Some("table"));
                assert_eq!(input, Some(PathBuf::from("resp.json")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
