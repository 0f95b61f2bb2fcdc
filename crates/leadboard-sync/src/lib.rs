//! The optimistic state-synchronization engine behind the lead console.
//!
//! A drag on the board mutates local state immediately, a single coordinated
//! write carries the mutation to the versioned store, and background pollers
//! fold authoritative data back in without ever undoing an optimistic change
//! the store has not yet caught up with.

pub mod banner;
pub mod board;
pub mod coordinator;
pub mod counter;
pub mod reconcile;
pub mod service;

pub use banner::{Banner, BannerVariant};
pub use board::{BoardState, IgnoreReason, StageOutcome, SyncState};
pub use coordinator::StatusCoordinator;
pub use counter::{CounterIntervals, CounterService};
pub use reconcile::ReconciliationPoller;
pub use service::BoardService;
