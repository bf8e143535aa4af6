use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use tracing::{info, warn};

use rsvp_db::models::RsvpRow;
use rsvp_types::api::{Rsvp, RsvpListResponse, SubmitResponse};
use rsvp_types::validate::validate_rsvp;

use crate::error::{ApiError, run_blocking};
use crate::state::AppState;

pub async fn submit_rsvp(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let rsvp = validate_rsvp(&payload)?;

    let db = state.clone();
    let record = rsvp.clone();
    let id = run_blocking(move || db.db.insert_rsvp(&record)).await?;

    info!(
        "RSVP received: {} - {}",
        rsvp.name,
        if rsvp.can_attend { "Attending" } else { "Not attending" }
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse::created("RSVP submitted successfully", id)),
    ))
}

pub async fn list_rsvps(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = run_blocking(move || db.db.list_rsvps()).await?;

    let data: Vec<Rsvp> = rows.into_iter().map(to_rsvp).collect();
    Ok(Json(RsvpListResponse::new(data)))
}

fn to_rsvp(row: RsvpRow) -> Rsvp {
    Rsvp {
        created_at: parse_created_at(&row.created_at).unwrap_or_else(|| {
            warn!("Corrupt created_at '{}' on rsvp {}", row.created_at, row.id);
            chrono::DateTime::default()
        }),
        id: row.id,
        name: row.name,
        can_attend: row.can_attend,
        dietary_restrictions: row.dietary_restrictions,
        where_staying: row.where_staying,
    }
}

/// Accepts RFC 3339 as well as SQLite's bare `YYYY-MM-DD HH:MM:SS` (UTC).
pub(crate) fn parse_created_at(raw: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    raw.parse::<chrono::DateTime<chrono::Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .ok()
}
