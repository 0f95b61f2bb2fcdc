//! REST backend speaking the console API.
//!
//! `ureq` is a blocking client, so every call is bridged onto the runtime's
//! blocking pool; the async surface never stalls the event loop. The agent
//! and token are cheap to clone into those closures.

use async_trait::async_trait;
use std::time::Duration;

use leadboard_core::{AuthToken, LeadboardError, LeadboardResult};
use leadboard_domain::{Lead, LeadFilter, LeadId, LeadStatus, PageRequest};

use crate::dto::{CountBody, ErrorBody, LeadPage};
use crate::traits::{CounterSource, LeadStore};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct RestLeadStore {
    agent: ureq::Agent,
    base_url: String,
    token: Option<AuthToken>,
}

impl RestLeadStore {
    pub fn new(base_url: impl Into<String>, token: Option<AuthToken>) -> Self {
        Self {
            agent: build_agent(),
            base_url: normalize_base(base_url.into()),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl LeadStore for RestLeadStore {
    async fn read(&self, id: LeadId) -> LeadboardResult<Lead> {
        let agent = self.agent.clone();
        let token = self.token.clone();
        let url = self.url(&format!("v1/leads/{id}"));

        run_blocking(move || {
            let response = with_auth(agent.get(&url), token.as_ref())
                .call()
                .map_err(map_fetch_error)?;
            parse_json(response)
        })
        .await
    }

    async fn list(&self, filter: &LeadFilter, page: PageRequest) -> LeadboardResult<LeadPage> {
        let agent = self.agent.clone();
        let token = self.token.clone();
        let url = self.url("v1/leads");
        let filter = filter.clone();

        run_blocking(move || {
            let mut request = with_auth(agent.get(&url), token.as_ref())
                .query("page", &page.page.to_string())
                .query("page_size", &page.page_size.to_string());
            if let Some(status) = filter.status {
                request = request.query("status", status.as_str());
            }
            if let Some(source) = &filter.source {
                request = request.query("source", source);
            }
            if let Some(search) = &filter.search {
                request = request.query("search", search);
            }

            let response = request.call().map_err(map_fetch_error)?;
            parse_json(response)
        })
        .await
    }

    async fn write_status(
        &self,
        id: LeadId,
        new_status: LeadStatus,
        expected_version: u64,
    ) -> LeadboardResult<Lead> {
        let agent = self.agent.clone();
        let token = self.token.clone();
        let url = self.url(&format!("v1/leads/{id}/status"));

        run_blocking(move || {
            let response = with_auth(agent.request("PATCH", &url), token.as_ref())
                .query("new_status", new_status.as_str())
                .query("version", &expected_version.to_string())
                .call()
                .map_err(map_write_error)?;
            parse_json(response)
        })
        .await
    }
}

/// Counter endpoint client; `resource` is the path prefix of a
/// `GET /{resource}/count` route, e.g. `admin/messages/unread`.
#[derive(Clone)]
pub struct RestCounterSource {
    agent: ureq::Agent,
    url: String,
    token: Option<AuthToken>,
}

impl RestCounterSource {
    pub fn new(base_url: impl Into<String>, resource: &str, token: Option<AuthToken>) -> Self {
        let base = normalize_base(base_url.into());
        Self {
            agent: build_agent(),
            url: format!("{base}/{}/count", resource.trim_matches('/')),
            token,
        }
    }
}

#[async_trait]
impl CounterSource for RestCounterSource {
    async fn count(&self) -> LeadboardResult<u64> {
        let agent = self.agent.clone();
        let token = self.token.clone();
        let url = self.url.clone();

        run_blocking(move || {
            let response = with_auth(agent.get(&url), token.as_ref())
                .call()
                .map_err(map_fetch_error)?;
            let body: CountBody = parse_json(response)?;
            Ok(body.count)
        })
        .await
    }
}

fn build_agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(REQUEST_TIMEOUT)
        .build()
}

fn normalize_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

fn with_auth(request: ureq::Request, token: Option<&AuthToken>) -> ureq::Request {
    let request = request.set("Accept", "application/json");
    match token {
        Some(token) => request.set("Authorization", &token.bearer_header()),
        None => request,
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(response: ureq::Response) -> LeadboardResult<T> {
    response
        .into_json::<T>()
        .map_err(|e| LeadboardError::Serialization(format!("bad response body: {e}")))
}

async fn run_blocking<T, F>(f: F) -> LeadboardResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> LeadboardResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| LeadboardError::Internal(format!("blocking task failed: {e}")))?
}

/// Read/list/count paths: auth errors end the session, a 404 is a real
/// miss, everything else is treated as transient so pollers retry quietly.
fn map_fetch_error(err: ureq::Error) -> LeadboardError {
    match err {
        ureq::Error::Status(401 | 403, _) => LeadboardError::AuthExpired,
        ureq::Error::Status(404, response) => {
            LeadboardError::NotFound(detail_or_status(response, 404))
        }
        ureq::Error::Status(code, response) => {
            LeadboardError::Connection(detail_or_status(response, code))
        }
        ureq::Error::Transport(transport) => LeadboardError::Connection(transport.to_string()),
    }
}

/// Status-update path: any non-2xx that is not an auth failure means the
/// write was rejected and the caller must roll back.
fn map_write_error(err: ureq::Error) -> LeadboardError {
    match err {
        ureq::Error::Status(401 | 403, _) => LeadboardError::AuthExpired,
        ureq::Error::Status(code, response) => LeadboardError::Conflict {
            message: detail_or_status(response, code),
        },
        ureq::Error::Transport(transport) => LeadboardError::Connection(transport.to_string()),
    }
}

fn detail_or_status(response: ureq::Response, code: u16) -> String {
    response
        .into_json::<ErrorBody>()
        .ok()
        .and_then(|body| body.detail)
        .unwrap_or_else(|| format!("HTTP {code}"))
}
