//! Append-only record stores owned by the analyzer
//!
//! Every store only grows until an explicit `reset`. Nothing here computes;
//! the scoring arithmetic lives in [`crate::reports::score`].

pub mod models;

pub use models::{AssetEvaluation, Holding, PortfolioSnapshot, ScoreRecord};

use crate::error::{Result, ScoreError};

/// Ordered snapshots; index 0 is the baseline
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshots: Vec<PortfolioSnapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, snapshot: PortfolioSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// The first snapshot ever appended since the last reset
    pub fn baseline(&self) -> Result<&PortfolioSnapshot> {
        self.snapshots.first().ok_or(ScoreError::EmptyBaseline)
    }

    pub fn latest(&self) -> Option<&PortfolioSnapshot> {
        self.snapshots.last()
    }

    pub fn as_slice(&self) -> &[PortfolioSnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn reset(&mut self) {
        self.snapshots.clear();
    }
}

/// Ordered score records, one per scored snapshot
#[derive(Debug, Clone, Default)]
pub struct ScoreRecordStore {
    records: Vec<ScoreRecord>,
}

impl ScoreRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and hand back a reference to the stored copy
    pub fn append(&mut self, record: ScoreRecord) -> &ScoreRecord {
        self.records.push(record);
        let last = self.records.len() - 1;
        &self.records[last]
    }

    pub fn latest(&self) -> Option<&ScoreRecord> {
        self.records.last()
    }

    pub fn as_slice(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }
}

/// Opaque request/result bookkeeping
///
/// The payload types are whatever the trading layer decides they are;
/// this log never inspects them.
#[derive(Debug, Clone)]
pub struct EventLog<Req, Res> {
    requests: Vec<Req>,
    results: Vec<Res>,
}

impl<Req, Res> Default for EventLog<Req, Res> {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            results: Vec::new(),
        }
    }
}

impl<Req, Res> EventLog<Req, Res> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_request(&mut self, request: Req) {
        self.requests.push(request);
    }

    pub fn put_result(&mut self, result: Res) {
        self.results.push(result);
    }

    pub fn requests(&self) -> &[Req] {
        &self.requests
    }

    pub fn results(&self) -> &[Res] {
        &self.results
    }

    /// Clears both sequences
    pub fn reset(&mut self) {
        self.requests.clear();
        self.results.clear();
    }
}
