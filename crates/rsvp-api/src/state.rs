use std::sync::Arc;

use rsvp_db::Database;

use crate::rate_limit::RateLimiter;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub security: Security,
    pub rate_limiter: RateLimiter,
}

impl AppStateInner {
    pub fn new(db: Database, security: Security, rate_limiter: RateLimiter) -> AppState {
        Arc::new(Self {
            db,
            security,
            rate_limiter,
        })
    }
}

/// Which routes require the shared `x-api-key` secret.
#[derive(Debug, Clone)]
pub struct Security {
    /// `None` while a gated route is reachable is a misconfiguration, reported as 500.
    pub api_key: Option<String>,
    pub protect_writes: bool,
    pub protect_reads: bool,
}

impl Default for Security {
    fn default() -> Self {
        Self {
            api_key: None,
            protect_writes: true,
            protect_reads: false,
        }
    }
}
