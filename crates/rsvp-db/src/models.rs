//! Database row types, mapping directly to SQLite rows.
//! Kept apart from the rsvp-types API models so the DB layer stays independent
//! of the wire format (snake_case, raw timestamp text).

#[derive(Debug, Clone)]
pub struct RsvpRow {
    pub id: i64,
    pub name: String,
    pub can_attend: bool,
    pub dietary_restrictions: Option<String>,
    pub where_staying: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct MusicSuggestionRow {
    pub id: i64,
    pub song_name: String,
    pub artist: String,
    pub link: Option<String>,
    pub created_at: String,
}
