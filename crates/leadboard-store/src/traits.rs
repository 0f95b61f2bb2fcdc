use async_trait::async_trait;
use leadboard_core::LeadboardResult;
use leadboard_domain::{Lead, LeadFilter, LeadId, LeadStatus, PageRequest};

use crate::dto::LeadPage;

/// Remote store of versioned leads.
///
/// `write_status` is the optimistic-concurrency gate: the write is accepted
/// only when `expected_version` matches the stored version, and the returned
/// lead carries the freshly incremented token.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn read(&self, id: LeadId) -> LeadboardResult<Lead>;

    async fn list(&self, filter: &LeadFilter, page: PageRequest) -> LeadboardResult<LeadPage>;

    async fn write_status(
        &self,
        id: LeadId,
        new_status: LeadStatus,
        expected_version: u64,
    ) -> LeadboardResult<Lead>;
}

/// One scalar aggregate (pending approvals, unread messages, new leads).
#[async_trait]
pub trait CounterSource: Send + Sync {
    async fn count(&self) -> LeadboardResult<u64>;
}
