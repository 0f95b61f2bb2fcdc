use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerVariant {
    Error,
    Success,
}

/// Transient user-facing notice. The board surfaces write failures through
/// one of these and drops it once the TTL elapses.
#[derive(Debug, Clone)]
pub struct Banner {
    pub message: String,
    pub variant: BannerVariant,
    pub created_at: Instant,
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            variant: BannerVariant::Error,
            created_at: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            variant: BannerVariant::Success,
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}
