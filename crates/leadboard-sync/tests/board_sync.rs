//! End-to-end scenarios for the board synchronization engine, driven over
//! the in-memory store and a couple of scriptable store fakes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::Notify;

use leadboard_core::{LeadboardError, LeadboardResult};
use leadboard_domain::{DropTarget, Lead, LeadFilter, LeadId, LeadStatus, PageRequest};
use leadboard_store::{LeadPage, LeadStore, MemoryLeadStore};
use leadboard_sync::{BoardService, ReconciliationPoller, SyncState};

const TTL: Duration = Duration::from_secs(5);

fn lead(id: LeadId, status: LeadStatus, version: u64) -> Lead {
    Lead {
        id,
        name: format!("Lead {id}"),
        email: format!("lead{id}@example.com"),
        country: "VN".to_string(),
        target_country: "UK".to_string(),
        intake: "Fall 2026".to_string(),
        source: "website".to_string(),
        status,
        version,
        created_at: Utc::now(),
        updated_at: None,
    }
}

async fn load(board: &BoardService<MemoryLeadStore>, store: &Arc<MemoryLeadStore>) {
    let poller = ReconciliationPoller::new(store.clone(), 50);
    poller.tick(board).await.unwrap();
}

#[tokio::test]
async fn successful_drag_lands_the_new_version() {
    let store = Arc::new(MemoryLeadStore::seed(vec![lead(42, LeadStatus::New, 3)]));
    let board = BoardService::new(store.clone(), TTL);
    load(&board, &store).await;

    board.begin_drag(42);
    board
        .end_drag(42, DropTarget::Column(LeadStatus::Qualified))
        .await
        .unwrap();

    let view = board.board();
    assert_eq!(view.locate(42), Some(LeadStatus::Qualified));
    assert_eq!(view.get(42).unwrap().version, 4);
    assert!(board.banner_message().is_none());
}

#[tokio::test]
async fn rejected_drag_rolls_back_and_shows_the_store_message() {
    let store = Arc::new(MemoryLeadStore::seed(vec![lead(
        7,
        LeadStatus::Contacted,
        5,
    )]));
    let board = BoardService::new(store.clone(), TTL);
    load(&board, &store).await;

    // Another staff member moves the lead first; our cached version is stale.
    store.force_status(7, LeadStatus::Qualified);

    board.begin_drag(7);
    board
        .end_drag(7, DropTarget::Column(LeadStatus::Won))
        .await
        .unwrap();

    let view = board.board();
    assert_eq!(view.locate(7), Some(LeadStatus::Contacted));
    assert_eq!(view.get(7).unwrap().version, 5);
    assert_eq!(board.sync_state(7), SyncState::Settled);

    let banner = board.banner_message().unwrap();
    assert!(
        banner.starts_with("Failed to update lead status: stale version"),
        "unexpected banner: {banner}"
    );
}

/// Store whose `list` responses can be scripted ahead of time; everything
/// else delegates to an in-memory store.
struct StaleListStore {
    inner: MemoryLeadStore,
    scripted_lists: Mutex<VecDeque<Vec<Lead>>>,
}

impl StaleListStore {
    fn new(inner: MemoryLeadStore, lists: Vec<Vec<Lead>>) -> Self {
        Self {
            inner,
            scripted_lists: Mutex::new(lists.into()),
        }
    }
}

#[async_trait]
impl LeadStore for StaleListStore {
    async fn read(&self, id: LeadId) -> LeadboardResult<Lead> {
        self.inner.read(id).await
    }

    async fn list(&self, filter: &LeadFilter, page: PageRequest) -> LeadboardResult<LeadPage> {
        if let Some(items) = self.scripted_lists.lock().pop_front() {
            return Ok(LeadPage {
                items,
                page: 1,
                total_pages: 1,
            });
        }
        self.inner.list(filter, page).await
    }

    async fn write_status(
        &self,
        id: LeadId,
        new_status: LeadStatus,
        expected_version: u64,
    ) -> LeadboardResult<Lead> {
        self.inner.write_status(id, new_status, expected_version).await
    }
}

#[tokio::test]
async fn reconciliation_defers_to_the_pending_move_until_the_store_catches_up() {
    // The store accepts the write, but its listings lag behind for a tick.
    let inner = MemoryLeadStore::seed(vec![lead(9, LeadStatus::Contacted, 2)]);
    let store = Arc::new(StaleListStore::new(
        inner,
        vec![
            vec![lead(9, LeadStatus::Contacted, 2)], // initial load
            vec![lead(9, LeadStatus::Contacted, 2)], // stale read after the write
        ],
    ));
    let board = BoardService::new(store.clone(), TTL);
    let poller = ReconciliationPoller::new(store.clone(), 50);

    poller.tick(&board).await.unwrap();
    board.begin_drag(9);
    board
        .end_drag(9, DropTarget::Column(LeadStatus::Lost))
        .await
        .unwrap();
    assert_eq!(
        board.sync_state(9),
        SyncState::AwaitingSync {
            target: LeadStatus::Lost
        }
    );

    // Stale tick: the card must not snap back.
    poller.tick(&board).await.unwrap();
    assert_eq!(board.board().locate(9), Some(LeadStatus::Lost));

    // Script exhausted: the next tick reads the caught-up inner store.
    poller.tick(&board).await.unwrap();
    assert_eq!(board.board().locate(9), Some(LeadStatus::Lost));
    assert_eq!(board.sync_state(9), SyncState::Settled);
    assert_eq!(board.board().get(9).unwrap().version, 3);
}

/// Store whose `write_status` parks until released, to interleave a second
/// drop with an outstanding write.
struct GatedWriteStore {
    inner: MemoryLeadStore,
    entered: Notify,
    release: Notify,
    write_calls: AtomicUsize,
}

impl GatedWriteStore {
    fn new(inner: MemoryLeadStore) -> Self {
        Self {
            inner,
            entered: Notify::new(),
            release: Notify::new(),
            write_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LeadStore for GatedWriteStore {
    async fn read(&self, id: LeadId) -> LeadboardResult<Lead> {
        self.inner.read(id).await
    }

    async fn list(&self, filter: &LeadFilter, page: PageRequest) -> LeadboardResult<LeadPage> {
        self.inner.list(filter, page).await
    }

    async fn write_status(
        &self,
        id: LeadId,
        new_status: LeadStatus,
        expected_version: u64,
    ) -> LeadboardResult<Lead> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.write_status(id, new_status, expected_version).await
    }
}

#[tokio::test]
async fn second_drop_while_a_write_is_outstanding_issues_no_second_write() {
    let store = Arc::new(GatedWriteStore::new(MemoryLeadStore::seed(vec![lead(
        1,
        LeadStatus::New,
        0,
    )])));
    let board = Arc::new(BoardService::new(store.clone(), TTL));
    {
        let poller = ReconciliationPoller::new(store.clone(), 50);
        poller.tick(&board).await.unwrap();
    }

    let first = {
        let board = board.clone();
        tokio::spawn(async move {
            board
                .end_drag(1, DropTarget::Column(LeadStatus::Won))
                .await
        })
    };
    store.entered.notified().await;

    // Rapid re-drop while the first write is parked in the store.
    board
        .end_drag(1, DropTarget::Column(LeadStatus::Lost))
        .await
        .unwrap();

    assert_eq!(store.write_calls.load(Ordering::SeqCst), 1);
    assert_eq!(board.board().locate(1), Some(LeadStatus::Won));

    store.release.notify_one();
    first.await.unwrap().unwrap();

    assert_eq!(store.write_calls.load(Ordering::SeqCst), 1);
    assert_eq!(board.board().get(1).unwrap().version, 1);
}

/// Store that rejects every write with an expired session.
struct ExpiredSessionStore {
    inner: MemoryLeadStore,
}

#[async_trait]
impl LeadStore for ExpiredSessionStore {
    async fn read(&self, id: LeadId) -> LeadboardResult<Lead> {
        self.inner.read(id).await
    }

    async fn list(&self, filter: &LeadFilter, page: PageRequest) -> LeadboardResult<LeadPage> {
        self.inner.list(filter, page).await
    }

    async fn write_status(
        &self,
        _id: LeadId,
        _new_status: LeadStatus,
        _expected_version: u64,
    ) -> LeadboardResult<Lead> {
        Err(LeadboardError::AuthExpired)
    }
}

#[tokio::test]
async fn expired_session_escapes_without_a_banner() {
    let store = Arc::new(ExpiredSessionStore {
        inner: MemoryLeadStore::seed(vec![lead(4, LeadStatus::New, 1)]),
    });
    let board = BoardService::new(store.clone(), TTL);
    {
        let poller = ReconciliationPoller::new(store.clone(), 50);
        poller.tick(&board).await.unwrap();
    }

    let err = board
        .end_drag(4, DropTarget::Column(LeadStatus::Contacted))
        .await
        .unwrap_err();

    assert!(err.is_auth_expired());
    assert!(board.banner_message().is_none());
    // The guard is released; the next reconciliation restores store truth.
    assert_eq!(board.sync_state(4), SyncState::Settled);
}

/// Store whose `list` always fails with a transient error.
struct OfflineStore;

#[async_trait]
impl LeadStore for OfflineStore {
    async fn read(&self, _id: LeadId) -> LeadboardResult<Lead> {
        Err(LeadboardError::Connection("offline".to_string()))
    }

    async fn list(&self, _filter: &LeadFilter, _page: PageRequest) -> LeadboardResult<LeadPage> {
        Err(LeadboardError::Connection("offline".to_string()))
    }

    async fn write_status(
        &self,
        _id: LeadId,
        _new_status: LeadStatus,
        _expected_version: u64,
    ) -> LeadboardResult<Lead> {
        Err(LeadboardError::Connection("offline".to_string()))
    }
}

#[tokio::test]
async fn transient_fetch_failure_leaves_the_view_untouched() {
    let memory = Arc::new(MemoryLeadStore::seed(vec![lead(2, LeadStatus::New, 1)]));
    let board = BoardService::new(memory.clone(), TTL);
    load(&board, &memory).await;

    let offline_poller = ReconciliationPoller::new(Arc::new(OfflineStore), 50);
    offline_poller.tick(&board).await.unwrap();

    assert_eq!(board.board().len(), 1);
    assert_eq!(board.board().locate(2), Some(LeadStatus::New));
}

#[tokio::test]
async fn paged_listings_are_fetched_in_full() {
    let store = Arc::new(MemoryLeadStore::seed(
        (1..=7).map(|id| lead(id, LeadStatus::New, 0)),
    ));
    let board = BoardService::new(store.clone(), TTL);

    let poller = ReconciliationPoller::new(store.clone(), 3);
    poller.tick(&board).await.unwrap();

    assert_eq!(board.board().len(), 7);
}
