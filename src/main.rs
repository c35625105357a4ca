mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{formatters, runner, Cli, Commands};
use scorecard::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Initialize logging on stderr so tables/JSON on stdout stay clean
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Replay {
            file,
            skip_invalid,
            dates,
        } => {
            info!("Replaying snapshots from: {}", file.display());
            let snapshots = runner::load_snapshots(&file)?;
            let summary = runner::replay(config, snapshots, skip_invalid).await?;

            if cli.json {
                println!("{}", formatters::format_scores_json(&summary.records));
            } else {
                print!("{}", formatters::format_scores_table(&summary.records, dates));
                if summary.rejected > 0 {
                    println!("\n{} snapshot(s) rejected", summary.rejected);
                }
            }
            Ok(())
        }

        Commands::Score {
            baseline,
            current,
            dates,
        } => {
            let record = runner::score_files(&config, &baseline, &current)?;
            if cli.json {
                println!("{}", formatters::format_scores_json(std::slice::from_ref(&record)));
            } else {
                print!("{}", formatters::format_record_detail(&record, dates));
            }
            Ok(())
        }
    }
}
