//! Adaptive polling for one navigation-badge counter.
//!
//! Three instances of this service back the console badges (pending
//! approvals, unread messages, new leads); they differ only in endpoint and
//! in which bus signals force an immediate re-poll.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;

use leadboard_core::{Signal, SignalBus};
use leadboard_store::CounterSource;

/// Consecutive unchanged polls before the interval backs off.
const UNCHANGED_POLLS_BEFORE_BACKOFF: u32 = 2;

#[derive(Debug, Clone, Copy)]
pub struct CounterIntervals {
    /// Poll cadence while the value keeps changing.
    pub fast: Duration,
    /// Poll cadence once the value has gone quiet.
    pub slow: Duration,
}

impl Default for CounterIntervals {
    fn default() -> Self {
        Self {
            fast: Duration::from_secs(15),
            slow: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Default)]
struct CounterState {
    value: u64,
    last_seen: Option<u64>,
    unchanged_polls: u32,
    /// Bumped by every local reset; a poll that was already in flight when
    /// the user acted compares generations and discards its result.
    generation: u64,
}

pub struct CounterService<C> {
    source: Arc<C>,
    intervals: CounterIntervals,
    triggers: Vec<Signal>,
    state: Mutex<CounterState>,
}

impl<C: CounterSource> CounterService<C> {
    pub fn new(source: Arc<C>, intervals: CounterIntervals) -> Self {
        Self {
            source,
            intervals,
            triggers: Vec::new(),
            state: Mutex::new(CounterState::default()),
        }
    }

    /// Bus signals that force an immediate re-poll on top of the interval
    /// timer. [`Signal::ViewRestored`] is worth including for every badge.
    pub fn with_triggers(mut self, triggers: Vec<Signal>) -> Self {
        self.triggers = triggers;
        self
    }

    pub fn value(&self) -> u64 {
        self.state.lock().value
    }

    /// Interval to sleep before the next poll.
    pub fn interval(&self) -> Duration {
        if self.state.lock().unchanged_polls >= UNCHANGED_POLLS_BEFORE_BACKOFF {
            self.intervals.slow
        } else {
            self.intervals.fast
        }
    }

    /// Poll the source once. A fetch failure keeps the stale value and never
    /// surfaces; the next tick simply tries again.
    pub async fn tick(&self) -> u64 {
        let generation = self.state.lock().generation;

        match self.source.count().await {
            Ok(fetched) => {
                let mut state = self.state.lock();
                if state.generation != generation {
                    // The user reset the badge while this poll was in
                    // flight; its result no longer applies. The next poll
                    // is authoritative.
                    tracing::debug!(fetched, "discarding poll result from before a local reset");
                    return state.value;
                }
                if state.last_seen == Some(fetched) {
                    state.unchanged_polls += 1;
                } else {
                    state.unchanged_polls = 0;
                }
                state.last_seen = Some(fetched);
                state.value = fetched;
                state.value
            }
            Err(err) => {
                tracing::debug!(error = %err, "counter poll failed, keeping stale value");
                self.state.lock().value
            }
        }
    }

    /// Optimistically zero the badge (e.g. the unread indicator on click).
    pub fn reset_local(&self) {
        let mut state = self.state.lock();
        state.value = 0;
        state.generation += 1;
    }

    /// Optimistically subtract from the badge (e.g. one approval handled).
    pub fn deduct_local(&self, amount: u64) {
        let mut state = self.state.lock();
        state.value = state.value.saturating_sub(amount);
        state.generation += 1;
    }

    /// Poll until shutdown: on the adaptive interval, plus immediately on
    /// any subscribed bus signal.
    pub async fn run(&self, bus: &SignalBus, mut shutdown: mpsc::UnboundedReceiver<()>) {
        let mut signals = bus.subscribe();
        let mut bus_open = true;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval()) => {
                    self.tick().await;
                }
                signal = signals.recv(), if bus_open => {
                    match signal {
                        Ok(signal) if self.triggers.contains(&signal) => {
                            self.tick().await;
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(_)) => {
                            // Missed signals; refresh once to cover them all.
                            self.tick().await;
                        }
                        Err(RecvError::Closed) => {
                            bus_open = false;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    return;
                }
            }
        }
    }
}
