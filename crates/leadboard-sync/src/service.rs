//! Async driver around [`BoardState`].
//!
//! The state machine is guarded by a non-poisoning mutex that is never held
//! across an await: a drag stages synchronously, the store write runs
//! unlocked, and the result settles synchronously. A write in flight
//! therefore blocks neither reconciliation ticks nor drags of other leads.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use leadboard_core::LeadboardResult;
use leadboard_domain::{BoardView, DropTarget, Lead, LeadId};
use leadboard_store::LeadStore;

use crate::board::{BoardState, StageOutcome, SyncState};
use crate::coordinator::StatusCoordinator;

pub struct BoardService<S> {
    state: Mutex<BoardState>,
    coordinator: StatusCoordinator<S>,
}

impl<S: LeadStore> BoardService<S> {
    pub fn new(store: Arc<S>, banner_ttl: Duration) -> Self {
        Self {
            state: Mutex::new(BoardState::new(banner_ttl)),
            coordinator: StatusCoordinator::new(store),
        }
    }

    pub fn with_success_hook(
        store: Arc<S>,
        banner_ttl: Duration,
        hook: impl Fn(&Lead) + Send + Sync + 'static,
    ) -> Self {
        Self {
            state: Mutex::new(BoardState::new(banner_ttl)),
            coordinator: StatusCoordinator::new(store).with_success_hook(hook),
        }
    }

    pub fn begin_drag(&self, id: LeadId) {
        self.state.lock().begin_drag(id);
    }

    /// Drive one drop end-to-end: stage the optimistic move, issue the
    /// coordinated write, settle the outcome. Failures are absorbed into
    /// rollback + banner; only an expired session escapes, because the whole
    /// console has to re-authenticate.
    pub async fn end_drag(&self, id: LeadId, target: DropTarget) -> LeadboardResult<()> {
        let staged = self.state.lock().stage_move(id, target);
        let StageOutcome::Staged {
            to, known_version, ..
        } = staged
        else {
            tracing::debug!(lead_id = id, outcome = ?staged, "drop ignored");
            return Ok(());
        };

        let result = self
            .coordinator
            .update_status(id, to, Some(known_version))
            .await;

        let mut state = self.state.lock();
        match result {
            Ok(updated) => {
                state.settle_success(id, &updated);
                Ok(())
            }
            Err(err) if err.is_auth_expired() => {
                state.settle_auth_expired(id);
                Err(err)
            }
            Err(err) => {
                tracing::warn!(lead_id = id, error = %err, "status write failed, rolling back");
                state.settle_failure(id, &err.banner_message());
                Ok(())
            }
        }
    }

    /// Fold an authoritative listing into the board (see
    /// [`BoardState::reconcile`]).
    pub fn reconcile(&self, leads: Vec<Lead>) {
        self.state.lock().reconcile(leads);
    }

    /// Cloned snapshot of the current view.
    pub fn board(&self) -> BoardView {
        self.state.lock().view().clone()
    }

    pub fn sync_state(&self, id: LeadId) -> SyncState {
        self.state.lock().sync_state(id)
    }

    /// Message of the active banner, if one is showing.
    pub fn banner_message(&self) -> Option<String> {
        self.state
            .lock()
            .current_banner()
            .map(|banner| banner.message.clone())
    }

    /// Run a closure against the locked state machine. The closure must not
    /// block; the lock is released before any await point.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut BoardState) -> R) -> R {
        f(&mut self.state.lock())
    }
}
