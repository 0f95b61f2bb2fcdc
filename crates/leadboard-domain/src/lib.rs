pub mod board;
pub mod filter;
pub mod lead;
pub mod pending;

pub use board::BoardView;
pub use filter::{LeadFilter, PageRequest};
pub use lead::{Lead, LeadId, LeadStatus};
pub use pending::{DropTarget, PendingMutation};
