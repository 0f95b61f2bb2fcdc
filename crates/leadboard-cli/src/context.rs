use std::sync::Arc;

use chrono::Utc;

use leadboard_core::{AppConfig, AuthToken, Signal};
use leadboard_domain::{Lead, LeadStatus};
use leadboard_store::{MemoryCounterSource, MemoryLeadStore, RestCounterSource, RestLeadStore};

/// One badge counter: display name, bus signals that force a re-poll, source.
pub type CounterBinding<C> = (&'static str, Vec<Signal>, Arc<C>);

pub struct Context<S, C> {
    pub leads: Arc<S>,
    pub counters: Vec<CounterBinding<C>>,
    pub config: AppConfig,
}

pub fn rest_context(
    config: AppConfig,
    token: Option<AuthToken>,
) -> Context<RestLeadStore, RestCounterSource> {
    let base = config.api_base_url.clone();
    Context {
        leads: Arc::new(RestLeadStore::new(&base, token.clone())),
        counters: vec![
            (
                "pending_approvals",
                vec![Signal::ApprovalResolved, Signal::ViewRestored],
                Arc::new(RestCounterSource::new(
                    &base,
                    "admin/pending-users",
                    token.clone(),
                )),
            ),
            (
                "unread_messages",
                vec![Signal::MessagesRead, Signal::ViewRestored],
                Arc::new(RestCounterSource::new(
                    &base,
                    "admin/messages/unread",
                    token.clone(),
                )),
            ),
            (
                "new_leads",
                vec![Signal::LeadCreated, Signal::ViewRestored],
                Arc::new(RestCounterSource::new(&base, "v1/leads/new", token)),
            ),
        ],
        config,
    }
}

pub fn demo_context(config: AppConfig) -> Context<MemoryLeadStore, MemoryCounterSource> {
    Context {
        leads: Arc::new(MemoryLeadStore::seed(demo_leads())),
        counters: vec![
            (
                "pending_approvals",
                vec![Signal::ApprovalResolved, Signal::ViewRestored],
                Arc::new(MemoryCounterSource::new(2)),
            ),
            (
                "unread_messages",
                vec![Signal::MessagesRead, Signal::ViewRestored],
                Arc::new(MemoryCounterSource::new(4)),
            ),
            (
                "new_leads",
                vec![Signal::LeadCreated, Signal::ViewRestored],
                Arc::new(MemoryCounterSource::new(3)),
            ),
        ],
        config,
    }
}

fn demo_leads() -> Vec<Lead> {
    let seed = [
        (1, "Ana Silva", "ana@example.com", "BR", LeadStatus::New),
        (2, "Tunde Okoye", "tunde@example.com", "NG", LeadStatus::New),
        (3, "Mei Chen", "mei@example.com", "CN", LeadStatus::Contacted),
        (4, "Ravi Patel", "ravi@example.com", "IN", LeadStatus::Contacted),
        (5, "Sara Haddad", "sara@example.com", "LB", LeadStatus::Qualified),
        (6, "Jon Eriksen", "jon@example.com", "NO", LeadStatus::Won),
        (7, "Lucia Rossi", "lucia@example.com", "IT", LeadStatus::Lost),
    ];
    seed.into_iter()
        .map(|(id, name, email, country, status)| Lead {
            id,
            name: name.to_string(),
            email: email.to_string(),
            country: country.to_string(),
            target_country: "UK".to_string(),
            intake: "Fall 2026".to_string(),
            source: "website".to_string(),
            status,
            version: 1,
            created_at: Utc::now(),
            updated_at: None,
        })
        .collect()
}
