use crate::lead::{Lead, LeadId, LeadStatus};

/// Client-side view of all leads, partitioned into the five status columns.
///
/// Invariant: a lead id appears in exactly one column at any instant.
/// Insertion order within a column is display order and carries no other
/// meaning. The whole view is cheap enough to deep-copy for rollback
/// snapshots at console scale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardView {
    columns: [Vec<Lead>; 5],
}

fn column_index(status: LeadStatus) -> usize {
    LeadStatus::ALL
        .iter()
        .position(|s| *s == status)
        .expect("LeadStatus::ALL covers every variant")
}

impl BoardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a view from an authoritative list. A lead whose id was already
    /// placed is skipped, preserving the one-column-per-id invariant even
    /// against a misbehaving server.
    pub fn from_leads(leads: impl IntoIterator<Item = Lead>) -> Self {
        let mut view = Self::new();
        for lead in leads {
            if view.get(lead.id).is_none() {
                view.columns[column_index(lead.status)].push(lead);
            }
        }
        view
    }

    pub fn column(&self, status: LeadStatus) -> &[Lead] {
        &self.columns[column_index(status)]
    }

    /// Which column currently holds this lead.
    pub fn locate(&self, id: LeadId) -> Option<LeadStatus> {
        LeadStatus::ALL
            .into_iter()
            .find(|status| self.column(*status).iter().any(|l| l.id == id))
    }

    pub fn get(&self, id: LeadId) -> Option<&Lead> {
        self.iter().find(|l| l.id == id)
    }

    pub fn remove(&mut self, id: LeadId) -> Option<Lead> {
        for column in &mut self.columns {
            if let Some(pos) = column.iter().position(|l| l.id == id) {
                return Some(column.remove(pos));
            }
        }
        None
    }

    /// Place a lead in the column matching its status field, displacing any
    /// existing copy of the same id first.
    pub fn insert(&mut self, lead: Lead) {
        self.remove(lead.id);
        self.columns[column_index(lead.status)].push(lead);
    }

    /// Apply a local move: pull the lead out of its current column, update
    /// its status field, and append it to the target column. Returns false
    /// if the lead is not on the board.
    pub fn move_lead(&mut self, id: LeadId, target: LeadStatus) -> bool {
        match self.remove(id) {
            Some(mut lead) => {
                lead.update_status(target);
                self.columns[column_index(target)].push(lead);
                true
            }
            None => false,
        }
    }

    /// Patch only the version token of a lead, wherever it sits.
    pub fn patch_version(&mut self, id: LeadId, version: u64) -> bool {
        for column in &mut self.columns {
            if let Some(lead) = column.iter_mut().find(|l| l.id == id) {
                lead.version = version;
                return true;
            }
        }
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lead> {
        self.columns.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Vec::is_empty)
    }
}
