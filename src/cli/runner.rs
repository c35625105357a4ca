use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::VecDeque;
use std::path::Path;
use tracing::{info, warn};

use scorecard::config::Config;
use scorecard::reports::compute_score;
use scorecard::{Analyzer, Channel, PortfolioSnapshot, ScoreRecord, SnapshotHandler};

/// Read a single snapshot JSON object
pub fn load_snapshot(path: &Path) -> Result<PortfolioSnapshot> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("invalid snapshot JSON in {}", path.display()))
}

/// Read a JSON array of snapshots, in delivery order
pub fn load_snapshots(path: &Path) -> Result<Vec<PortfolioSnapshot>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshots file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("invalid snapshots JSON in {}", path.display()))
}

/// Outcome of a replay: accepted records plus rejected snapshot count
#[derive(Debug)]
pub struct ReplaySummary {
    pub records: Vec<ScoreRecord>,
    pub rejected: usize,
}

/// Feed `snapshots` through an analyzer, one per registration.
///
/// The queue stands in for a live source: each registration on the asset
/// channel is answered with the next snapshot, and the handler is dropped
/// once the queue is empty, which ends the replay.
pub async fn replay(
    config: Config,
    snapshots: Vec<PortfolioSnapshot>,
    skip_invalid: bool,
) -> Result<ReplaySummary> {
    info!("Replaying {} snapshots", snapshots.len());
    let mut queue: VecDeque<PortfolioSnapshot> = snapshots.into();

    let mut analyzer: Analyzer<Value, Value> = Analyzer::new(config);
    analyzer.initialize(move |channel: Channel, handler: SnapshotHandler| {
        if channel != Channel::Asset {
            return;
        }
        if let Some(snapshot) = queue.pop_front() {
            if handler.deliver(snapshot).is_err() {
                warn!("Analyzer dropped registration before delivery");
            }
        }
    });
    analyzer.reset()?;

    let mut rejected = 0;
    loop {
        match analyzer.next_snapshot().await {
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) if skip_invalid => {
                eprintln!("Skipping snapshot: {}", e);
                rejected += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!(
                        "replay stopped after {} scored snapshots",
                        analyzer.score_records().len()
                    )
                })
            }
        }
    }

    Ok(ReplaySummary {
        records: analyzer.score_records().to_vec(),
        rejected,
    })
}

/// Score two snapshot files directly
pub fn score_files(config: &Config, baseline: &Path, current: &Path) -> Result<ScoreRecord> {
    let baseline = load_snapshot(baseline)?;
    let current = load_snapshot(current)?;
    compute_score(&baseline, &current, config.precision).context("failed to score snapshot")
}
