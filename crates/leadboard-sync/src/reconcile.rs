//! Background poller that keeps the board converging on store truth.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use leadboard_core::LeadboardResult;
use leadboard_domain::{Lead, LeadFilter, PageRequest};
use leadboard_store::LeadStore;

use crate::service::BoardService;

/// Hard cap on pages fetched per tick, against a backend that keeps
/// reporting more pages than it serves.
const MAX_PAGES_PER_TICK: u32 = 200;

pub struct ReconciliationPoller<S> {
    store: Arc<S>,
    filter: LeadFilter,
    page_size: u32,
}

impl<S: LeadStore> ReconciliationPoller<S> {
    pub fn new(store: Arc<S>, page_size: u32) -> Self {
        Self {
            store,
            filter: LeadFilter::default(),
            page_size,
        }
    }

    pub fn with_filter(mut self, filter: LeadFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Fetch every page of the authoritative listing.
    pub async fn fetch_all(&self) -> LeadboardResult<Vec<Lead>> {
        let mut request = PageRequest::first(self.page_size);
        let mut leads = Vec::new();

        loop {
            let page = self.store.list(&self.filter, request).await?;
            let has_more = page.has_more();
            leads.extend(page.items);

            if !has_more {
                break;
            }
            request = request.next();
            if request.page > MAX_PAGES_PER_TICK {
                tracing::warn!(
                    pages = MAX_PAGES_PER_TICK,
                    "page cap reached, reconciling with a truncated listing"
                );
                break;
            }
        }

        Ok(leads)
    }

    /// One reconciliation pass. A transient fetch failure leaves the view
    /// untouched for the next tick to retry; an expired session propagates.
    pub async fn tick<T: LeadStore>(&self, board: &BoardService<T>) -> LeadboardResult<()> {
        match self.fetch_all().await {
            Ok(leads) => {
                board.reconcile(leads);
                Ok(())
            }
            Err(err) if err.is_auth_expired() => Err(err),
            Err(err) => {
                tracing::debug!(error = %err, "reconciliation fetch failed, keeping current view");
                Ok(())
            }
        }
    }

    /// Tick on a fixed interval until shutdown or session expiry.
    pub async fn run<T: LeadStore>(
        &self,
        board: &BoardService<T>,
        interval: Duration,
        mut shutdown: mpsc::UnboundedReceiver<()>,
    ) -> LeadboardResult<()> {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    self.tick(board).await?;
                }
                _ = shutdown.recv() => {
                    return Ok(());
                }
            }
        }
    }
}
