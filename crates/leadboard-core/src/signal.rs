//! Cross-component invalidation signals.
//!
//! Counters and views in different parts of the console need to know when a
//! sibling action changed something they derive from (a message was read, an
//! approval resolved, a lead created). Rather than each component reaching
//! into the others, actions publish a [`Signal`] on the shared bus and
//! interested pollers re-fetch immediately.

use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// A new lead was created somewhere in the console.
    LeadCreated,
    /// Messages were marked read.
    MessagesRead,
    /// A pending approval was accepted or rejected.
    ApprovalResolved,
    /// The hosting view became visible again.
    ViewRestored,
}

/// Broadcast bus for [`Signal`]s.
///
/// Delivery is lossy under backpressure, which is fine: every subscriber
/// reacts by re-fetching authoritative state, so a dropped signal costs one
/// poll interval, never correctness.
#[derive(Debug, Clone)]
pub struct SignalBus {
    tx: broadcast::Sender<Signal>,
}

impl SignalBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Publish a signal. Returns the number of current subscribers.
    pub fn publish(&self, signal: Signal) -> usize {
        self.tx.send(signal).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.tx.subscribe()
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}
