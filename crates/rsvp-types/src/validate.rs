//! Payload validation for the public submission endpoints.
//!
//! Each `validate_*` function takes the raw JSON body and either returns a
//! typed record or every field violation found. Validation never stops at the
//! first failure, and unknown fields are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::models::{NewMusicSuggestion, NewRsvp};

pub const NAME_MAX: usize = 200;
pub const DIETARY_RESTRICTIONS_MAX: usize = 1000;
pub const WHERE_STAYING_MAX: usize = 500;
pub const SONG_NAME_MAX: usize = 300;
pub const ARTIST_MAX: usize = 300;
pub const LINK_MAX: usize = 500;

/// A single violated constraint. `path` is the JSON field name, or empty for
/// the payload as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error that applies to the whole payload rather than one field.
    pub fn root(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push("", message);
        errors
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// True if any violation is reported against `path`.
    #[cfg(test)]
    pub fn has_path(&self, path: &str) -> bool {
        self.0.iter().any(|e| e.path == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|e| {
                if e.path.is_empty() {
                    e.message.clone()
                } else {
                    format!("{}: {}", e.path, e.message)
                }
            })
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn validate_rsvp(payload: &Value) -> Result<NewRsvp, ValidationErrors> {
    let mut fields = Fields::new(payload)?;

    let name = fields.required_string("name", NAME_MAX, "Name is required");
    let can_attend = fields.required_bool("canAttend");
    let dietary_restrictions =
        fields.optional_string("dietaryRestrictions", DIETARY_RESTRICTIONS_MAX);
    let where_staying = fields.optional_string("whereStaying", WHERE_STAYING_MAX);

    fields.finish()?;

    match (name, can_attend) {
        (Some(name), Some(can_attend)) => Ok(NewRsvp {
            name,
            can_attend,
            dietary_restrictions,
            where_staying,
        }),
        // finish() already failed for any missing required field
        _ => Err(ValidationErrors::root("Invalid payload")),
    }
}

pub fn validate_music_suggestion(payload: &Value) -> Result<NewMusicSuggestion, ValidationErrors> {
    let mut fields = Fields::new(payload)?;

    let song_name = fields.required_string("songName", SONG_NAME_MAX, "Song name is required");
    let artist = fields.required_string("artist", ARTIST_MAX, "Artist is required");
    let link = fields.optional_url("link", LINK_MAX);

    fields.finish()?;

    match (song_name, artist) {
        (Some(song_name), Some(artist)) => Ok(NewMusicSuggestion {
            song_name,
            artist,
            link,
        }),
        _ => Err(ValidationErrors::root("Invalid payload")),
    }
}

/// Field accessor that records violations as it goes.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> Fields<'a> {
    fn new(payload: &'a Value) -> Result<Self, ValidationErrors> {
        let object = payload.as_object().ok_or_else(|| {
            ValidationErrors::root(format!("Expected object, received {}", kind(payload)))
        })?;
        Ok(Self {
            object,
            errors: ValidationErrors::new(),
        })
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn required_string(&mut self, key: &str, max: usize, empty_message: &str) -> Option<String> {
        match self.object.get(key) {
            None => {
                self.errors.push(key, "Required");
                None
            }
            Some(Value::String(s)) => {
                let len = s.chars().count();
                if len == 0 {
                    self.errors.push(key, empty_message);
                    None
                } else if len > max {
                    self.errors.push(key, too_long(max));
                    None
                } else {
                    Some(s.clone())
                }
            }
            Some(other) => {
                self.errors
                    .push(key, format!("Expected string, received {}", kind(other)));
                None
            }
        }
    }

    fn required_bool(&mut self, key: &str) -> Option<bool> {
        match self.object.get(key) {
            None => {
                self.errors.push(key, "Required");
                None
            }
            Some(Value::Bool(b)) => Some(*b),
            Some(other) => {
                self.errors
                    .push(key, format!("Expected boolean, received {}", kind(other)));
                None
            }
        }
    }

    /// Absent, `null` and `""` all mean "no value".
    fn optional_string(&mut self, key: &str, max: usize) -> Option<String> {
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => {
                if s.chars().count() > max {
                    self.errors.push(key, too_long(max));
                    None
                } else if s.is_empty() {
                    None
                } else {
                    Some(s.clone())
                }
            }
            Some(other) => {
                self.errors
                    .push(key, format!("Expected string, received {}", kind(other)));
                None
            }
        }
    }

    fn optional_url(&mut self, key: &str, max: usize) -> Option<String> {
        let raw = self.optional_string(key, max)?;
        match Url::parse(&raw) {
            Ok(_) => Some(raw),
            Err(_) => {
                self.errors.push(key, "Invalid url");
                None
            }
        }
    }
}

fn too_long(max: usize) -> String {
    format!("Must contain at most {max} character(s)")
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_rsvp() {
        let rsvp = validate_rsvp(&json!({ "name": "Ada", "canAttend": true })).unwrap();
        assert_eq!(rsvp.name, "Ada");
        assert!(rsvp.can_attend);
        assert_eq!(rsvp.dietary_restrictions, None);
        assert_eq!(rsvp.where_staying, None);
    }

    #[test]
    fn null_and_empty_optionals_become_absent() {
        let rsvp = validate_rsvp(&json!({
            "name": "Ada",
            "canAttend": false,
            "dietaryRestrictions": null,
            "whereStaying": "",
        }))
        .unwrap();
        assert_eq!(rsvp.dietary_restrictions, None);
        assert_eq!(rsvp.where_staying, None);
    }

    #[test]
    fn keeps_optional_text() {
        let rsvp = validate_rsvp(&json!({
            "name": "Ada",
            "canAttend": true,
            "dietaryRestrictions": "vegetarian",
            "whereStaying": "Hotel du Lac",
        }))
        .unwrap();
        assert_eq!(rsvp.dietary_restrictions.as_deref(), Some("vegetarian"));
        assert_eq!(rsvp.where_staying.as_deref(), Some("Hotel du Lac"));
    }

    #[test]
    fn missing_name_is_reported() {
        let errors = validate_rsvp(&json!({ "canAttend": true })).unwrap_err();
        assert!(errors.has_path("name"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn empty_name_is_reported() {
        let errors = validate_rsvp(&json!({ "name": "", "canAttend": true })).unwrap_err();
        let error = errors.iter().find(|e| e.path == "name").unwrap();
        assert_eq!(error.message, "Name is required");
    }

    #[test]
    fn collects_every_violation() {
        let errors = validate_rsvp(&json!({
            "name": "x".repeat(NAME_MAX + 1),
            "canAttend": "yes",
            "dietaryRestrictions": "d".repeat(DIETARY_RESTRICTIONS_MAX + 1),
            "whereStaying": 12,
        }))
        .unwrap_err();
        assert_eq!(errors.len(), 4);
        for path in ["name", "canAttend", "dietaryRestrictions", "whereStaying"] {
            assert!(errors.has_path(path), "missing error for {path}");
        }
    }

    #[test]
    fn length_limits_count_characters() {
        let name = "é".repeat(NAME_MAX);
        assert!(name.len() > NAME_MAX);
        assert!(validate_rsvp(&json!({ "name": name, "canAttend": true })).is_ok());
    }

    #[test]
    fn rejects_non_object_payload() {
        let errors = validate_rsvp(&json!([1, 2, 3])).unwrap_err();
        assert!(errors.has_path(""));
    }

    #[test]
    fn ignores_unknown_fields() {
        let rsvp = validate_rsvp(&json!({
            "name": "Ada",
            "canAttend": true,
            "id": 999,
            "createdAt": "1970-01-01T00:00:00Z",
        }));
        assert!(rsvp.is_ok());
    }

    #[test]
    fn empty_link_is_absent() {
        let s = validate_music_suggestion(&json!({
            "songName": "September",
            "artist": "Earth, Wind & Fire",
            "link": "",
        }))
        .unwrap();
        assert_eq!(s.link, None);
    }

    #[test]
    fn keeps_valid_link() {
        let s = validate_music_suggestion(&json!({
            "songName": "September",
            "artist": "Earth, Wind & Fire",
            "link": "https://example.com/watch?v=1",
        }))
        .unwrap();
        assert_eq!(s.link.as_deref(), Some("https://example.com/watch?v=1"));
    }

    #[test]
    fn rejects_relative_link() {
        let errors = validate_music_suggestion(&json!({
            "songName": "September",
            "artist": "Earth, Wind & Fire",
            "link": "not-a-url",
        }))
        .unwrap_err();
        assert!(errors.has_path("link"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn rejects_overlong_link() {
        let link = format!("https://example.com/{}", "a".repeat(LINK_MAX));
        let errors = validate_music_suggestion(&json!({
            "songName": "September",
            "artist": "Earth, Wind & Fire",
            "link": link,
        }))
        .unwrap_err();
        assert!(errors.has_path("link"));
    }

    #[test]
    fn requires_song_and_artist() {
        let errors =
            validate_music_suggestion(&json!({ "songName": "", "artist": null })).unwrap_err();
        assert!(errors.has_path("songName"));
        assert!(errors.has_path("artist"));
    }

    fn rsvp_with_lodging(where_staying: String) -> Result<NewRsvp, ValidationErrors> {
        validate_rsvp(&json!({ "name": "Ada", "canAttend": true, "whereStaying": where_staying }))
    }

    fn suggestion(
        song: String,
        artist: String,
        link: String,
    ) -> Result<NewMusicSuggestion, ValidationErrors> {
        validate_music_suggestion(&json!({ "songName": song, "artist": artist, "link": link }))
    }

    /// `https://x.io/` followed by padding, exactly `len` characters long.
    fn link_of_len(len: usize) -> String {
        let prefix = "https://x.io/";
        format!("{prefix}{}", "a".repeat(len - prefix.len()))
    }

    #[test]
    fn where_staying_limit_is_inclusive() {
        let at_max = rsvp_with_lodging("w".repeat(WHERE_STAYING_MAX)).unwrap();
        assert_eq!(at_max.where_staying.map(|w| w.chars().count()), Some(WHERE_STAYING_MAX));

        let errors = rsvp_with_lodging("w".repeat(WHERE_STAYING_MAX + 1)).unwrap_err();
        assert!(errors.has_path("whereStaying"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn dietary_restrictions_limit_is_inclusive() {
        let at_max = json!({
            "name": "Ada",
            "canAttend": true,
            "dietaryRestrictions": "d".repeat(DIETARY_RESTRICTIONS_MAX),
        });
        assert!(validate_rsvp(&at_max).is_ok());
    }

    #[test]
    fn song_name_limit_is_inclusive() {
        let ok = suggestion("s".repeat(SONG_NAME_MAX), "ABBA".into(), String::new());
        assert_eq!(ok.unwrap().song_name.len(), SONG_NAME_MAX);

        let errors =
            suggestion("s".repeat(SONG_NAME_MAX + 1), "ABBA".into(), String::new()).unwrap_err();
        assert!(errors.has_path("songName"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn artist_limit_is_inclusive() {
        let ok = suggestion("Waterloo".into(), "a".repeat(ARTIST_MAX), String::new());
        assert_eq!(ok.unwrap().artist.len(), ARTIST_MAX);

        let errors =
            suggestion("Waterloo".into(), "a".repeat(ARTIST_MAX + 1), String::new()).unwrap_err();
        assert!(errors.has_path("artist"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn link_limit_is_inclusive() {
        let link = link_of_len(LINK_MAX);
        let ok = suggestion("Waterloo".into(), "ABBA".into(), link.clone()).unwrap();
        assert_eq!(ok.link, Some(link));

        let errors =
            suggestion("Waterloo".into(), "ABBA".into(), link_of_len(LINK_MAX + 1)).unwrap_err();
        assert!(errors.has_path("link"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn display_joins_paths() {
        let mut errors = ValidationErrors::new();
        errors.push("name", "Required");
        errors.push("", "Malformed");
        assert_eq!(errors.to_string(), "name: Required; Malformed");
    }
}
