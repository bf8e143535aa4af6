use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::middleware::{gated_write_interceptors, read_interceptors, write_interceptors};
use crate::state::AppState;
use crate::{health, music, rsvp};

/// Submissions are small JSON documents; anything bigger is refused outright.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    let rsvp_submissions = Router::new().route("/api/rsvp", post(rsvp::submit_rsvp));

    let music_submissions =
        Router::new().route("/api/music-suggestions", post(music::submit_music_suggestion));

    let listings = Router::new()
        .route("/api/rsvp", get(rsvp::list_rsvps))
        .route("/api/music-suggestions", get(music::list_music_suggestions));

    Router::new()
        .route("/api/health", get(health::health))
        .merge(gated_write_interceptors(rsvp_submissions, &state))
        .merge(write_interceptors(music_submissions, &state))
        .merge(read_interceptors(listings, &state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
