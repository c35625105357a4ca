//! Composition root: stores, scoring and subscription wired together
//!
//! ```text
//! source --(SnapshotHandler)--> on_new_snapshot
//!                                 -> SnapshotStore.append
//!                                 -> compute_score(baseline, snapshot)
//!                                 -> ScoreRecordStore.append
//!                               subscribe again
//! ```
//!
//! All mutation goes through `&mut self`. Share an analyzer across tasks
//! only behind a mutex.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, ScoreError};
use crate::records::{EventLog, PortfolioSnapshot, ScoreRecord, ScoreRecordStore, SnapshotStore};
use crate::reports::compute_score;
use crate::subscription::{SubscriptionManager, UpdateHook};

/// Tracks snapshots against a fixed baseline and scores each one
///
/// `Req` and `Res` are the caller's request/result payloads; they are only
/// recorded, never inspected.
#[derive(Debug)]
pub struct Analyzer<Req, Res> {
    config: Config,
    snapshots: SnapshotStore,
    events: EventLog<Req, Res>,
    scores: ScoreRecordStore,
    subscription: SubscriptionManager,
}

impl<Req, Res> Default for Analyzer<Req, Res> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<Req, Res> Analyzer<Req, Res> {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            snapshots: SnapshotStore::new(),
            events: EventLog::new(),
            scores: ScoreRecordStore::new(),
            subscription: SubscriptionManager::new(),
        }
    }

    /// Keep the producer's registration hook. Nothing is registered yet;
    /// the first registration happens on `put_result` or `reset`.
    pub fn initialize(&mut self, hook: impl UpdateHook + 'static) {
        info!("Analyzer initialized with update hook");
        self.subscription.initialize(Box::new(hook));
    }

    pub fn is_initialized(&self) -> bool {
        self.subscription.is_initialized()
    }

    pub fn put_request(&mut self, request: Req) {
        self.events.put_request(request);
    }

    /// Record a result and ask the source for a fresh snapshot.
    ///
    /// Fails with `NotInitialized`, recording nothing, if no hook is set.
    pub fn put_result(&mut self, result: Res) -> Result<()> {
        self.subscription.ensure_initialized()?;
        self.events.put_result(result);
        self.subscription.subscribe()
    }

    /// Record a snapshot and score it against the baseline.
    ///
    /// The first snapshot after a reset becomes the baseline and scores as
    /// all zeros. A `MissingQuote` leaves every store untouched.
    pub fn on_new_snapshot(&mut self, snapshot: PortfolioSnapshot) -> Result<&ScoreRecord> {
        let record = {
            let baseline = self.snapshots.baseline().unwrap_or(&snapshot);
            compute_score(baseline, &snapshot, self.config.precision)
        };
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("Rejected snapshot at {}: {}", snapshot.timestamp, e);
                return Err(e);
            }
        };

        if self.snapshots.is_empty() {
            info!("Baseline established at {}", snapshot.timestamp);
        }
        self.snapshots.append(snapshot);
        Ok(self.scores.append(record))
    }

    /// Score `current` against the existing baseline without recording the
    /// snapshot itself.
    ///
    /// Fails with `EmptyBaseline` before any snapshot exists.
    pub fn make_score_record(&mut self, current: &PortfolioSnapshot) -> Result<&ScoreRecord> {
        let baseline = self.snapshots.baseline()?;
        let record = compute_score(baseline, current, self.config.precision)?;
        Ok(self.scores.append(record))
    }

    /// Process a snapshot the source has already delivered, if any, and
    /// register for the next one.
    pub fn poll_snapshot(&mut self) -> Result<Option<ScoreRecord>> {
        match self.subscription.try_take() {
            Some(snapshot) => self.handle_delivery(snapshot).map(Some),
            None => Ok(None),
        }
    }

    /// Wait for the source to deliver, process the snapshot and register
    /// for the next one. `None` once the source stops delivering.
    pub async fn next_snapshot(&mut self) -> Result<Option<ScoreRecord>> {
        match self.subscription.recv().await {
            Some(snapshot) => self.handle_delivery(snapshot).map(Some),
            None => Ok(None),
        }
    }

    // Registers again even when the snapshot is rejected, so one bad
    // snapshot does not end the subscription.
    fn handle_delivery(&mut self, snapshot: PortfolioSnapshot) -> Result<ScoreRecord> {
        debug!("Snapshot delivered at {}", snapshot.timestamp);
        let outcome = self.on_new_snapshot(snapshot).cloned();
        self.subscription.subscribe()?;
        outcome
    }

    /// Make a new start point: clear every store and register fresh.
    ///
    /// The next snapshot received becomes the baseline. Fails with
    /// `NotInitialized`, clearing nothing, if no hook is set.
    pub fn reset(&mut self) -> Result<()> {
        self.subscription.ensure_initialized()?;
        info!(
            "Resetting start point ({} snapshots, {} scores dropped)",
            self.snapshots.len(),
            self.scores.len()
        );
        self.snapshots.reset();
        self.events.reset();
        self.scores.reset();
        self.subscription.subscribe()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn baseline(&self) -> Result<&PortfolioSnapshot> {
        self.snapshots.baseline()
    }

    pub fn snapshots(&self) -> &[PortfolioSnapshot] {
        self.snapshots.as_slice()
    }

    pub fn requests(&self) -> &[Req] {
        self.events.requests()
    }

    pub fn results(&self) -> &[Res] {
        self.events.results()
    }

    pub fn score_records(&self) -> &[ScoreRecord] {
        self.scores.as_slice()
    }

    pub fn latest_score(&self) -> Option<&ScoreRecord> {
        self.scores.latest()
    }

    /// True while a registration is waiting on the source
    pub fn is_awaiting_snapshot(&self) -> bool {
        self.subscription.is_pending()
    }

    /// Convenience for callers that treat `EmptyBaseline` as "nothing to score yet"
    pub fn try_score(&mut self, current: &PortfolioSnapshot) -> Result<Option<&ScoreRecord>> {
        match self.make_score_record(current) {
            Ok(record) => Ok(Some(record)),
            Err(ScoreError::EmptyBaseline) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::{Channel, SnapshotHandler};
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    fn counting_hook() -> (impl UpdateHook, Arc<Mutex<Vec<Channel>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let hook = move |channel: Channel, _handler: SnapshotHandler| {
            sink.lock().unwrap().push(channel);
        };
        (hook, calls)
    }

    #[test]
    fn test_put_result_without_initialize_records_nothing() {
        let mut analyzer: Analyzer<String, String> = Analyzer::default();
        assert_eq!(
            analyzer.put_result("banana".to_string()),
            Err(ScoreError::NotInitialized)
        );
        assert!(analyzer.results().is_empty());
    }

    #[test]
    fn test_reset_without_initialize_keeps_stores() {
        let mut analyzer: Analyzer<&str, &str> = Analyzer::default();
        analyzer.put_request("mango");
        assert_eq!(analyzer.reset(), Err(ScoreError::NotInitialized));
        assert_eq!(analyzer.requests(), &["mango"]);
    }

    #[test]
    fn test_first_snapshot_scores_against_itself() {
        let mut analyzer: Analyzer<(), ()> = Analyzer::default();
        let snapshot = PortfolioSnapshot::new(dec!(1000), 1)
            .with_holding("apple", dec!(250), dec!(2))
            .with_quote("apple", dec!(500));

        let record = analyzer.on_new_snapshot(snapshot).unwrap();
        assert_eq!(record.cumulative_return_pct, dec!(0));
        assert_eq!(record.price_change("apple"), Some(dec!(0)));
        assert_eq!(record.asset_evaluations[0].evaluation_pct, dec!(100));
        assert_eq!(analyzer.baseline().unwrap().timestamp, 1);
    }

    #[test]
    fn test_missing_quote_leaves_stores_untouched() {
        let mut analyzer: Analyzer<(), ()> = Analyzer::default();
        let bad = PortfolioSnapshot::new(dec!(1000), 1).with_holding("apple", dec!(250), dec!(2));

        assert!(analyzer.on_new_snapshot(bad).is_err());
        assert!(analyzer.snapshots().is_empty());
        assert!(analyzer.score_records().is_empty());
    }

    #[test]
    fn test_try_score_treats_empty_baseline_as_none() {
        let mut analyzer: Analyzer<(), ()> = Analyzer::default();
        let snapshot = PortfolioSnapshot::new(dec!(1000), 1);
        assert_eq!(analyzer.try_score(&snapshot), Ok(None));
        assert!(analyzer.score_records().is_empty());
    }

    #[test]
    fn test_poll_without_delivery_does_not_register() {
        let (hook, calls) = counting_hook();
        let mut analyzer: Analyzer<(), ()> = Analyzer::default();
        analyzer.initialize(hook);
        analyzer.reset().unwrap();
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert!(analyzer.is_awaiting_snapshot());
        // the counting hook drops its handler, so nothing is ever delivered
        assert_eq!(analyzer.poll_snapshot(), Ok(None));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }
}
