//! Validated submissions, ready to be written.
//! Produced only by the `validate` module; never carry an id or timestamp
//! because both are assigned by the store.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRsvp {
    pub name: String,
    pub can_attend: bool,
    pub dietary_restrictions: Option<String>,
    pub where_staying: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMusicSuggestion {
    pub song_name: String,
    pub artist: String,
    pub link: Option<String>,
}
