use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use tracing::{info, warn};

use rsvp_db::models::MusicSuggestionRow;
use rsvp_types::api::{MusicSuggestion, MusicSuggestionListResponse, SubmitResponse};
use rsvp_types::validate::validate_music_suggestion;

use crate::error::{ApiError, run_blocking};
use crate::rsvp::parse_created_at;
use crate::state::AppState;

pub async fn submit_music_suggestion(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let suggestion = validate_music_suggestion(&payload)?;

    let db = state.clone();
    let record = suggestion.clone();
    let id = run_blocking(move || db.db.insert_music_suggestion(&record)).await?;

    info!(
        "Music suggestion received: \"{}\" by {}",
        suggestion.song_name, suggestion.artist
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse::created("Music suggestion submitted successfully", id)),
    ))
}

pub async fn list_music_suggestions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = run_blocking(move || db.db.list_music_suggestions()).await?;

    let data = rows
        .into_iter()
        .map(|row: MusicSuggestionRow| MusicSuggestion {
            created_at: parse_created_at(&row.created_at).unwrap_or_else(|| {
                warn!("Corrupt created_at '{}' on music suggestion {}", row.created_at, row.id);
                chrono::DateTime::default()
            }),
            id: row.id,
            song_name: row.song_name,
            artist: row.artist,
            link: row.link,
        })
        .collect();

    Ok(Json(MusicSuggestionListResponse::new(data)))
}
