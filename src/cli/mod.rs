use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;
pub mod runner;

#[derive(Parser)]
#[command(name = "scorecard")]
#[command(version, about = "Baseline-relative performance scoring for portfolio snapshots")]
#[command(
    long_about = "Score portfolio snapshots against a fixed starting snapshot: cumulative return, per-holding evaluation and per-asset price change since the baseline."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to a TOML config file (defaults to <config dir>/scorecard/config.toml)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a JSON array of snapshots; the first one is the baseline
    Replay {
        /// Path to the snapshots JSON file
        file: PathBuf,

        /// Report rejected snapshots and keep going instead of stopping
        #[arg(long)]
        skip_invalid: bool,

        /// Render timestamps as UTC dates (timestamps are Unix seconds)
        #[arg(long)]
        dates: bool,
    },

    /// Score one snapshot against a baseline snapshot
    Score {
        /// Path to the baseline snapshot JSON file
        baseline: PathBuf,

        /// Path to the current snapshot JSON file
        current: PathBuf,

        /// Render timestamps as UTC dates (timestamps are Unix seconds)
        #[arg(long)]
        dates: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_replay_with_global_flags() {
        let cli = Cli::try_parse_from([
            "scorecard",
            "replay",
            "snaps.json",
            "--skip-invalid",
            "--json",
            "--no-color",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(cli.no_color);
        match cli.command {
            Commands::Replay {
                file,
                skip_invalid,
                dates,
            } => {
                assert_eq!(file, PathBuf::from("snaps.json"));
                assert!(skip_invalid);
                assert!(!dates);
            }
            _ => panic!("expected replay command"),
        }
    }
}
