use crate::Database;
use crate::models::{MusicSuggestionRow, RsvpRow};
use anyhow::Result;
use rsvp_types::models::{NewMusicSuggestion, NewRsvp};
use rusqlite::Connection;

impl Database {
    // -- RSVPs --

    /// Insert one RSVP and return its new id. `id` and `created_at` are
    /// always assigned by SQLite.
    pub fn insert_rsvp(&self, rsvp: &NewRsvp) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO rsvp (name, can_attend, dietary_restrictions, where_staying) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    rsvp.name,
                    rsvp.can_attend as i64,
                    rsvp.dietary_restrictions,
                    rsvp.where_staying,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// All RSVPs, newest first.
    pub fn list_rsvps(&self) -> Result<Vec<RsvpRow>> {
        self.with_conn(query_rsvps)
    }

    // -- Music suggestions --

    pub fn insert_music_suggestion(&self, suggestion: &NewMusicSuggestion) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO music_suggestions (song_name, artist, link) VALUES (?1, ?2, ?3)",
                rusqlite::params![suggestion.song_name, suggestion.artist, suggestion.link],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// All music suggestions, newest first.
    pub fn list_music_suggestions(&self) -> Result<Vec<MusicSuggestionRow>> {
        self.with_conn(query_music_suggestions)
    }
}

fn query_rsvps(conn: &Connection) -> Result<Vec<RsvpRow>> {
    // id breaks ties between rows written within the same millisecond
    let mut stmt = conn.prepare(
        "SELECT id, name, can_attend, dietary_restrictions, where_staying, created_at
         FROM rsvp
         ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(RsvpRow {
                id: row.get(0)?,
                name: row.get(1)?,
                can_attend: row.get::<_, i64>(2)? == 1,
                dietary_restrictions: row.get(3)?,
                where_staying: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_music_suggestions(conn: &Connection) -> Result<Vec<MusicSuggestionRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, song_name, artist, link, created_at
         FROM music_suggestions
         ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(MusicSuggestionRow {
                id: row.get(0)?,
                song_name: row.get(1)?,
                artist: row.get(2)?,
                link: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
