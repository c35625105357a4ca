//! Scorecard - baseline-relative performance scoring for portfolio snapshots
//!
//! Snapshots of a portfolio (cash, holdings, quotes) arrive from an external
//! source. The first one is the baseline; every snapshot after it is scored
//! against that baseline for cumulative return, per-holding evaluation and
//! per-asset price movement.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod records;
pub mod reports;
pub mod subscription;
pub mod utils;

pub use analyzer::Analyzer;
pub use error::{Result, ScoreError};
pub use records::{AssetEvaluation, Holding, PortfolioSnapshot, ScoreRecord};
pub use subscription::{Channel, SnapshotHandler, UpdateHook};
