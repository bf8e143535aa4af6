use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::ValidationErrors;

// -- RSVPs --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub id: i64,
    pub name: String,
    pub can_attend: bool,
    pub dietary_restrictions: Option<String>,
    pub where_staying: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpListResponse {
    pub success: bool,
    pub data: Vec<Rsvp>,
    pub total: usize,
    pub attending: usize,
    pub not_attending: usize,
}

impl RsvpListResponse {
    /// Counts are derived from `data` so they can never drift from it.
    pub fn new(data: Vec<Rsvp>) -> Self {
        let attending = data.iter().filter(|r| r.can_attend).count();
        Self {
            success: true,
            total: data.len(),
            attending,
            not_attending: data.len() - attending,
            data,
        }
    }
}

// -- Music suggestions --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicSuggestion {
    pub id: i64,
    pub song_name: String,
    pub artist: String,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MusicSuggestionListResponse {
    pub success: bool,
    pub data: Vec<MusicSuggestion>,
    pub total: usize,
}

impl MusicSuggestionListResponse {
    pub fn new(data: Vec<MusicSuggestion>) -> Self {
        Self {
            success: true,
            total: data.len(),
            data,
        }
    }
}

// -- Shared envelopes --

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub id: i64,
}

impl SubmitResponse {
    pub fn created(message: impl Into<String>, id: i64) -> Self {
        Self {
            success: true,
            message: message.into(),
            id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ValidationErrors>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: ValidationErrors) -> Self {
        Self {
            details: Some(details),
            ..Self::new(error)
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}
