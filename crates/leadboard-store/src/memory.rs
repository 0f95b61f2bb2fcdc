//! In-memory store implementing the same contract as the REST backend.
//!
//! Used by tests and the CLI demo mode. Honors the optimistic-concurrency
//! rule exactly: a status write with a stale version is rejected with the
//! same error class the wire produces.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use leadboard_core::{LeadboardError, LeadboardResult};
use leadboard_domain::{Lead, LeadFilter, LeadId, LeadStatus, PageRequest};

use crate::dto::LeadPage;
use crate::traits::{CounterSource, LeadStore};

#[derive(Clone, Default)]
pub struct MemoryLeadStore {
    leads: Arc<Mutex<BTreeMap<LeadId, Lead>>>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(leads: impl IntoIterator<Item = Lead>) -> Self {
        let store = Self::new();
        {
            let mut guard = store.leads.lock();
            for lead in leads {
                guard.insert(lead.id, lead);
            }
        }
        store
    }

    pub fn insert(&self, lead: Lead) {
        self.leads.lock().insert(lead.id, lead);
    }

    pub fn remove(&self, id: LeadId) -> Option<Lead> {
        self.leads.lock().remove(&id)
    }

    /// Overwrite a lead's status server-side without the version check, as a
    /// concurrent writer (another staff member) would.
    pub fn force_status(&self, id: LeadId, status: LeadStatus) {
        if let Some(lead) = self.leads.lock().get_mut(&id) {
            lead.update_status(status);
            lead.version += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.leads.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.lock().is_empty()
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn read(&self, id: LeadId) -> LeadboardResult<Lead> {
        self.leads
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| LeadboardError::NotFound(format!("lead {id}")))
    }

    async fn list(&self, filter: &LeadFilter, page: PageRequest) -> LeadboardResult<LeadPage> {
        if page.page == 0 || page.page_size == 0 {
            return Err(LeadboardError::Validation(
                "page and page_size must be positive".to_string(),
            ));
        }

        let guard = self.leads.lock();
        let matching: Vec<&Lead> = guard.values().filter(|l| filter.matches(l)).collect();
        let total_pages = (matching.len() as u32).div_ceil(page.page_size).max(1);

        let start = ((page.page - 1) * page.page_size) as usize;
        let items = matching
            .into_iter()
            .skip(start)
            .take(page.page_size as usize)
            .cloned()
            .collect();

        Ok(LeadPage {
            items,
            page: page.page,
            total_pages,
        })
    }

    async fn write_status(
        &self,
        id: LeadId,
        new_status: LeadStatus,
        expected_version: u64,
    ) -> LeadboardResult<Lead> {
        let mut guard = self.leads.lock();
        let lead = guard
            .get_mut(&id)
            .ok_or_else(|| LeadboardError::NotFound(format!("lead {id}")))?;

        if lead.version != expected_version {
            return Err(LeadboardError::Conflict {
                message: format!(
                    "stale version for lead {id}: expected {expected_version}, found {}",
                    lead.version
                ),
            });
        }

        lead.status = new_status;
        lead.version += 1;
        lead.updated_at = Some(Utc::now());
        Ok(lead.clone())
    }
}

/// Scalar counter backed by a shared cell, settable from tests and demos.
#[derive(Clone, Default)]
pub struct MemoryCounterSource {
    count: Arc<Mutex<u64>>,
}

impl MemoryCounterSource {
    pub fn new(initial: u64) -> Self {
        Self {
            count: Arc::new(Mutex::new(initial)),
        }
    }

    pub fn set(&self, value: u64) {
        *self.count.lock() = value;
    }
}

#[async_trait]
impl CounterSource for MemoryCounterSource {
    async fn count(&self) -> LeadboardResult<u64> {
        Ok(*self.count.lock())
    }
}
