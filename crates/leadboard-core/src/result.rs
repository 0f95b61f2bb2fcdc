use crate::error::LeadboardError;

pub type LeadboardResult<T> = Result<T, LeadboardError>;
