pub mod auth;
pub mod config;
pub mod error;
pub mod result;
pub mod signal;

pub use auth::AuthToken;
pub use config::AppConfig;
pub use error::LeadboardError;
pub use result::LeadboardResult;
pub use signal::{Signal, SignalBus};
