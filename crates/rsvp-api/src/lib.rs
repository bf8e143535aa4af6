pub mod error;
pub mod health;
pub mod middleware;
pub mod music;
pub mod rate_limit;
pub mod router;
pub mod rsvp;
pub mod state;

pub use error::ApiError;
pub use router::router;
pub use state::{AppState, AppStateInner, Security};
