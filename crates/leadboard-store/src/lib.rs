pub mod dto;
pub mod memory;
pub mod rest;
pub mod traits;

pub use dto::LeadPage;
pub use memory::{MemoryCounterSource, MemoryLeadStore};
pub use rest::{RestCounterSource, RestLeadStore};
pub use traits::{CounterSource, LeadStore};
