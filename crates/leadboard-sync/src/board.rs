//! Board state machine.
//!
//! Holds the client's view of every lead partitioned by status column and the
//! per-lead synchronization markers that serialize writes and shield
//! optimistic moves from concurrent refreshes. Everything here is synchronous
//! and free of store handles, so the ordering rules are testable without a
//! runtime; [`crate::service::BoardService`] drives the async edges.

use std::collections::HashMap;
use std::time::Duration;

use leadboard_domain::{BoardView, DropTarget, Lead, LeadId, LeadStatus, PendingMutation};

use crate::banner::Banner;

/// Why a drop was discarded without touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The dragged id is not on the board.
    UnknownLead,
    /// Dropped back onto its own column.
    SameColumn,
    /// Dropped on empty space or an unrecognized element.
    UnresolvedTarget,
    /// A write for this lead is still outstanding; rapid re-drops are
    /// dropped, not queued.
    WriteInFlight,
}

/// Result of staging a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The optimistic move was applied locally; the caller must now drive
    /// exactly one store write using `known_version` and settle the result.
    Staged {
        from: LeadStatus,
        to: LeadStatus,
        known_version: u64,
    },
    Ignored(IgnoreReason),
}

/// Synchronization state of one lead, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No pending mutation; authoritative data applies unconditionally.
    Settled,
    /// Optimistically moved, write outstanding.
    Pending { target: LeadStatus },
    /// Write confirmed, but the store's list reads may still serve the old
    /// status; reconciliation defers until it observes `target`.
    AwaitingSync { target: LeadStatus },
}

#[derive(Debug)]
enum Marker {
    InFlight(PendingMutation),
    AwaitingSync { target: LeadStatus },
}

pub struct BoardState {
    view: BoardView,
    markers: HashMap<LeadId, Marker>,
    drag_origin: Option<(LeadId, LeadStatus)>,
    banner: Option<Banner>,
    banner_ttl: Duration,
}

impl BoardState {
    pub fn new(banner_ttl: Duration) -> Self {
        Self {
            view: BoardView::new(),
            markers: HashMap::new(),
            drag_origin: None,
            banner: None,
            banner_ttl,
        }
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn sync_state(&self, id: LeadId) -> SyncState {
        match self.markers.get(&id) {
            None => SyncState::Settled,
            Some(Marker::InFlight(pending)) => SyncState::Pending {
                target: pending.to_status,
            },
            Some(Marker::AwaitingSync { target }) => SyncState::AwaitingSync { target: *target },
        }
    }

    /// A drag started: remember where the card came from and clear any stale
    /// error notice so the user is not looking at the previous failure.
    pub fn begin_drag(&mut self, id: LeadId) {
        self.banner = None;
        self.drag_origin = self.view.locate(id).map(|origin| (id, origin));
    }

    /// A drag ended. Resolves the drop target, applies the move
    /// optimistically, and registers the pending mutation with its rollback
    /// snapshot. Never issues I/O; the caller drives the write on `Staged`.
    pub fn stage_move(&mut self, id: LeadId, target: DropTarget) -> StageOutcome {
        let grabbed = self.drag_origin.take();

        // The column the user grabbed the card from, falling back to its
        // current placement when no begin_drag was seen for this id.
        let origin = grabbed
            .filter(|(drag_id, _)| *drag_id == id)
            .map(|(_, origin)| origin)
            .or_else(|| self.view.locate(id));
        let Some(origin) = origin else {
            return StageOutcome::Ignored(IgnoreReason::UnknownLead);
        };
        let Some(to) = self.resolve_target(target) else {
            return StageOutcome::Ignored(IgnoreReason::UnresolvedTarget);
        };
        if to == origin {
            return StageOutcome::Ignored(IgnoreReason::SameColumn);
        }
        if matches!(self.markers.get(&id), Some(Marker::InFlight(_))) {
            return StageOutcome::Ignored(IgnoreReason::WriteInFlight);
        }

        let known_version = match self.view.get(id) {
            Some(lead) => lead.version,
            None => return StageOutcome::Ignored(IgnoreReason::UnknownLead),
        };

        let snapshot = self.view.clone();
        self.view.move_lead(id, to);

        // A leftover AwaitingSync marker from an earlier move is superseded.
        self.markers.insert(
            id,
            Marker::InFlight(PendingMutation {
                lead_id: id,
                from_status: origin,
                to_status: to,
                snapshot,
            }),
        );

        StageOutcome::Staged {
            from: origin,
            to,
            known_version,
        }
    }

    /// The write landed. Column placement is already correct, so only the
    /// version token is patched; the marker stays (demoted) until a
    /// reconciliation fetch shows the store serving the new status.
    pub fn settle_success(&mut self, id: LeadId, updated: &Lead) {
        self.view.patch_version(id, updated.version);
        if let Some(Marker::InFlight(pending)) = self.markers.remove(&id) {
            self.markers.insert(
                id,
                Marker::AwaitingSync {
                    target: pending.to_status,
                },
            );
        }
    }

    /// The write was rejected: restore the pre-drag snapshot in full and
    /// surface the store's message until the banner TTL runs out.
    pub fn settle_failure(&mut self, id: LeadId, message: &str) {
        if let Some(Marker::InFlight(pending)) = self.markers.remove(&id) {
            self.view = pending.snapshot;
        }
        self.banner = Some(Banner::error(format!(
            "Failed to update lead status: {message}"
        )));
    }

    /// The session died mid-write. The whole view is about to be torn down
    /// for re-authentication, so release the guard without rollback.
    pub fn settle_auth_expired(&mut self, id: LeadId) {
        self.markers.remove(&id);
    }

    /// Defensive release for drivers whose write never settled; the next
    /// reconciliation tick restores authoritative placement.
    pub fn abandon(&mut self, id: LeadId) {
        self.markers.remove(&id);
    }

    /// Fold an authoritative listing into the view.
    ///
    /// The view is rebuilt wholesale from `leads`, except that a lead with a
    /// live marker keeps its optimistic copy verbatim until the fetched copy
    /// proves the store has caught up (status equals the pending target). An
    /// in-flight lead missing from the fetch is carried over; a settled one
    /// missing from the fetch is dropped.
    pub fn reconcile(&mut self, leads: Vec<Lead>) {
        enum Fold {
            /// Authoritative copy applies unconditionally.
            Adopt,
            /// Store has caught up with a confirmed write: drop the marker,
            /// then adopt.
            CaughtUp,
            /// Optimism still outranks this fetch: keep the current copy.
            KeepOptimistic,
        }

        let mut next = BoardView::new();

        for lead in leads {
            let fold = match self.markers.get(&lead.id) {
                None => Fold::Adopt,
                Some(Marker::InFlight(_)) => Fold::KeepOptimistic,
                Some(Marker::AwaitingSync { target }) if lead.status == *target => Fold::CaughtUp,
                Some(Marker::AwaitingSync { .. }) => Fold::KeepOptimistic,
            };
            match fold {
                Fold::Adopt => next.insert(lead),
                Fold::CaughtUp => {
                    self.markers.remove(&lead.id);
                    next.insert(lead);
                }
                Fold::KeepOptimistic => match self.view.get(lead.id) {
                    Some(current) => next.insert(current.clone()),
                    None => next.insert(lead),
                },
            }
        }

        // Marked leads the fetch no longer contains: an in-flight one keeps
        // its optimistic copy until the write settles, any other marker is
        // stale and the store's silence wins.
        let missing: Vec<LeadId> = self
            .markers
            .keys()
            .copied()
            .filter(|id| next.get(*id).is_none())
            .collect();
        for id in missing {
            let in_flight = matches!(self.markers.get(&id), Some(Marker::InFlight(_)));
            if in_flight {
                if let Some(current) = self.view.get(id) {
                    next.insert(current.clone());
                }
            } else {
                self.markers.remove(&id);
            }
        }

        self.view = next;
    }

    /// The active banner, if any; an expired one is dropped on access.
    pub fn current_banner(&mut self) -> Option<&Banner> {
        if let Some(banner) = &self.banner {
            if banner.is_expired(self.banner_ttl) {
                self.banner = None;
            }
        }
        self.banner.as_ref()
    }

    fn resolve_target(&self, target: DropTarget) -> Option<LeadStatus> {
        match target {
            DropTarget::Column(status) => Some(status),
            DropTarget::Card(other) => self.view.locate(other),
            DropTarget::Empty => None,
        }
    }
}
