//! Single coordinated status write against the versioned store.

use std::sync::Arc;

use leadboard_core::LeadboardResult;
use leadboard_domain::{Lead, LeadId, LeadStatus};
use leadboard_store::LeadStore;

type SuccessHook = Box<dyn Fn(&Lead) + Send + Sync>;

/// Performs one status change, resolving a missing version token by reading
/// first, and hands back the refreshed lead so the caller can cache the new
/// version. Rollback on failure is the caller's job.
pub struct StatusCoordinator<S> {
    store: Arc<S>,
    on_success: Option<SuccessHook>,
}

impl<S: LeadStore> StatusCoordinator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            on_success: None,
        }
    }

    /// Hook fired after a confirmed write; the table view uses it to kick a
    /// light re-fetch for pagination consistency. Must not block.
    pub fn with_success_hook(mut self, hook: impl Fn(&Lead) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    pub async fn update_status(
        &self,
        id: LeadId,
        new_status: LeadStatus,
        known_version: Option<u64>,
    ) -> LeadboardResult<Lead> {
        let version = match known_version {
            Some(version) => version,
            None => self.resolve_version(id).await?,
        };

        let updated = self.store.write_status(id, new_status, version).await?;

        if let Some(hook) = &self.on_success {
            hook(&updated);
        }
        Ok(updated)
    }

    /// Fetch the current version when the caller has none cached. A failed
    /// pre-read degrades to version 0, which disables the optimistic check
    /// for this one write; the store rejects it for any already-versioned
    /// row, so the blast radius is a rejected write. Session expiry is never
    /// degraded.
    async fn resolve_version(&self, id: LeadId) -> LeadboardResult<u64> {
        match self.store.read(id).await {
            Ok(lead) => Ok(lead.version),
            Err(err) if err.is_auth_expired() => Err(err),
            Err(err) => {
                tracing::warn!(lead_id = id, error = %err, "pre-read failed, writing with version 0");
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use leadboard_core::LeadboardError;
    use leadboard_domain::{LeadFilter, PageRequest};
    use leadboard_store::LeadPage;
    use std::sync::atomic::{AtomicU64, Ordering};

    mockall::mock! {
        Store {}

        #[async_trait]
        impl LeadStore for Store {
            async fn read(&self, id: LeadId) -> LeadboardResult<Lead>;
            async fn list(
                &self,
                filter: &LeadFilter,
                page: PageRequest,
            ) -> LeadboardResult<LeadPage>;
            async fn write_status(
                &self,
                id: LeadId,
                new_status: LeadStatus,
                expected_version: u64,
            ) -> LeadboardResult<Lead>;
        }
    }

    fn lead(id: LeadId, status: LeadStatus, version: u64) -> Lead {
        Lead {
            id,
            name: format!("Lead {id}"),
            email: format!("lead{id}@example.com"),
            country: "PK".to_string(),
            target_country: "AU".to_string(),
            intake: "Spring 2027".to_string(),
            source: "referral".to_string(),
            status,
            version,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_known_version_skips_pre_read() {
        let mut store = MockStore::new();
        store.expect_read().times(0);
        store
            .expect_write_status()
            .withf(|id, status, version| {
                *id == 42 && *status == LeadStatus::Qualified && *version == 3
            })
            .returning(|id, status, version| Ok(lead(id, status, version + 1)));

        let coordinator = StatusCoordinator::new(Arc::new(store));
        let updated = coordinator
            .update_status(42, LeadStatus::Qualified, Some(3))
            .await
            .unwrap();

        assert_eq!(updated.version, 4);
    }

    #[tokio::test]
    async fn test_missing_version_pre_reads_the_lead() {
        let mut store = MockStore::new();
        store
            .expect_read()
            .withf(|id| *id == 7)
            .returning(|id| Ok(lead(id, LeadStatus::Contacted, 5)));
        store
            .expect_write_status()
            .withf(|_, _, version| *version == 5)
            .returning(|id, status, version| Ok(lead(id, status, version + 1)));

        let coordinator = StatusCoordinator::new(Arc::new(store));
        let updated = coordinator
            .update_status(7, LeadStatus::Won, None)
            .await
            .unwrap();

        assert_eq!(updated.version, 6);
        assert_eq!(updated.status, LeadStatus::Won);
    }

    #[tokio::test]
    async fn test_failed_pre_read_degrades_to_version_zero() {
        let mut store = MockStore::new();
        store
            .expect_read()
            .returning(|_| Err(LeadboardError::Connection("refused".to_string())));
        store
            .expect_write_status()
            .withf(|_, _, version| *version == 0)
            .returning(|id, status, version| Ok(lead(id, status, version + 1)));

        let coordinator = StatusCoordinator::new(Arc::new(store));
        let updated = coordinator
            .update_status(1, LeadStatus::Contacted, None)
            .await
            .unwrap();

        assert_eq!(updated.version, 1);
    }

    #[tokio::test]
    async fn test_expired_session_on_pre_read_propagates() {
        let mut store = MockStore::new();
        store
            .expect_read()
            .returning(|_| Err(LeadboardError::AuthExpired));
        store.expect_write_status().times(0);

        let coordinator = StatusCoordinator::new(Arc::new(store));
        let err = coordinator
            .update_status(1, LeadStatus::Contacted, None)
            .await
            .unwrap_err();

        assert!(err.is_auth_expired());
    }

    #[tokio::test]
    async fn test_rejected_write_surfaces_store_message() {
        let mut store = MockStore::new();
        store.expect_write_status().returning(|_, _, _| {
            Err(LeadboardError::Conflict {
                message: "stale version".to_string(),
            })
        });

        let coordinator = StatusCoordinator::new(Arc::new(store));
        let err = coordinator
            .update_status(7, LeadStatus::Won, Some(4))
            .await
            .unwrap_err();

        assert_eq!(err.banner_message(), "stale version");
    }

    #[tokio::test]
    async fn test_success_hook_sees_the_refreshed_lead() {
        let mut store = MockStore::new();
        store
            .expect_write_status()
            .returning(|id, status, version| Ok(lead(id, status, version + 1)));

        let seen = Arc::new(AtomicU64::new(0));
        let seen_in_hook = seen.clone();
        let coordinator = StatusCoordinator::new(Arc::new(store))
            .with_success_hook(move |updated| {
                seen_in_hook.store(updated.version, Ordering::SeqCst);
            });

        coordinator
            .update_status(42, LeadStatus::Qualified, Some(3))
            .await
            .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 4);
    }
}
