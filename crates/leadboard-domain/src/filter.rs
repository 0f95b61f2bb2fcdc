use serde::{Deserialize, Serialize};

use crate::lead::{Lead, LeadStatus};

/// Optional narrowing criteria for lead listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    /// Case-insensitive substring match on name or email.
    pub search: Option<String>,
}

impl LeadFilter {
    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(status) = self.status {
            if lead.status != status {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if !lead.source.eq_ignore_ascii_case(source) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !lead.name.to_lowercase().contains(&needle)
                && !lead.email.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.source.is_none() && self.search.is_none()
    }
}

/// One page of a listing request. Pages are 1-based, matching the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn first(page_size: u32) -> Self {
        Self { page: 1, page_size }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }
}
