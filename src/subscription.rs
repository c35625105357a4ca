//! Snapshot subscription against an external update source
//!
//! The analyzer never pulls data. It hands the source a one-shot
//! [`SnapshotHandler`] through the [`UpdateHook`] it was initialized with,
//! and registers a fresh handler after every delivery, every result and
//! every reset. Consuming the handler on delivery is what limits a source
//! to one snapshot per registration.

use std::fmt;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, warn};

use crate::error::{Result, ScoreError};
use crate::records::PortfolioSnapshot;

/// Update channels a hook can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Asset,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Asset => "asset",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-shot capability to deliver the next snapshot to the analyzer
#[derive(Debug)]
pub struct SnapshotHandler {
    tx: oneshot::Sender<PortfolioSnapshot>,
}

impl SnapshotHandler {
    /// Hand over a snapshot.
    ///
    /// Gives the snapshot back if the registration was superseded (by a
    /// reset or a newer registration) or the analyzer is gone.
    pub fn deliver(self, snapshot: PortfolioSnapshot) -> std::result::Result<(), PortfolioSnapshot> {
        self.tx.send(snapshot)
    }

    /// False once the analyzer has dropped this registration
    pub fn is_live(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Registration capability supplied by the snapshot producer
pub trait UpdateHook: Send {
    fn register(&mut self, channel: Channel, handler: SnapshotHandler);
}

impl<F> UpdateHook for F
where
    F: FnMut(Channel, SnapshotHandler) + Send,
{
    fn register(&mut self, channel: Channel, handler: SnapshotHandler) {
        (*self)(channel, handler)
    }
}

/// Whether a hook has been supplied yet
#[derive(Default)]
pub enum HookState {
    #[default]
    Unset,
    Registered(Box<dyn UpdateHook>),
}

impl fmt::Debug for HookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookState::Unset => f.write_str("Unset"),
            HookState::Registered(_) => f.write_str("Registered"),
        }
    }
}

/// Holds the hook and the receiving end of the outstanding registration
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    state: HookState,
    pending: Option<oneshot::Receiver<PortfolioSnapshot>>,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the hook; replaces any previous one and drops its registration
    pub fn initialize(&mut self, hook: Box<dyn UpdateHook>) {
        if matches!(self.state, HookState::Registered(_)) {
            warn!("Replacing previously initialized update hook");
        }
        self.state = HookState::Registered(hook);
        self.pending = None;
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, HookState::Registered(_))
    }

    /// True while a registration is waiting for the source
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fail with `NotInitialized` unless a hook is set
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(ScoreError::NotInitialized)
        }
    }

    /// Register a fresh snapshot handler on the asset channel.
    ///
    /// Any registration still outstanding is dropped first, so a snapshot
    /// delivered against it is discarded.
    pub fn subscribe(&mut self) -> Result<()> {
        let hook = match &mut self.state {
            HookState::Registered(hook) => hook,
            HookState::Unset => return Err(ScoreError::NotInitialized),
        };

        let (tx, rx) = oneshot::channel();
        self.pending = Some(rx);
        debug!("Registering snapshot handler on '{}' channel", Channel::Asset);
        hook.register(Channel::Asset, SnapshotHandler { tx });
        Ok(())
    }

    /// Take a delivered snapshot without waiting.
    ///
    /// `None` when nothing is pending, nothing has arrived yet, or the
    /// source dropped the handler.
    pub fn try_take(&mut self) -> Option<PortfolioSnapshot> {
        let mut rx = self.pending.take()?;
        match rx.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(TryRecvError::Empty) => {
                self.pending = Some(rx);
                None
            }
            Err(TryRecvError::Closed) => {
                debug!("Snapshot source dropped its handler");
                None
            }
        }
    }

    /// Wait for the outstanding registration to be fulfilled.
    ///
    /// `None` when nothing is pending or the source dropped the handler.
    pub async fn recv(&mut self) -> Option<PortfolioSnapshot> {
        let rx = self.pending.take()?;
        match rx.await {
            Ok(snapshot) => Some(snapshot),
            Err(_) => {
                debug!("Snapshot source dropped its handler");
                None
            }
        }
    }
}
