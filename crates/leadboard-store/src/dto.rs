use serde::{Deserialize, Serialize};

use leadboard_domain::Lead;

/// One page of the lead listing, as returned by `GET /v1/leads`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadPage {
    pub items: Vec<Lead>,
    pub page: u32,
    pub total_pages: u32,
}

impl LeadPage {
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountBody {
    pub count: u64,
}

/// Error payload shape used by the backend for rejected requests.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<String>,
}
