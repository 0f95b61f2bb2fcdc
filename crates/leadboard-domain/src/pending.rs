use crate::board::BoardView;
use crate::lead::{LeadId, LeadStatus};

/// Where a dragged card was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Dropped on a column itself.
    Column(LeadStatus),
    /// Dropped on another card; the target column is that card's column.
    Card(LeadId),
    /// Dropped on empty space or an unrecognized element.
    Empty,
}

/// Bookkeeping for one in-flight optimistic move.
///
/// Created the moment a drag is accepted. The snapshot is the whole board as
/// it looked before the move and backs a full rollback if the write fails.
#[derive(Debug, Clone)]
pub struct PendingMutation {
    pub lead_id: LeadId,
    pub from_status: LeadStatus,
    pub to_status: LeadStatus,
    pub snapshot: BoardView,
}
