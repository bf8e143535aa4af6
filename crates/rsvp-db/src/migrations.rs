use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// SQLite-side UTC timestamp, RFC 3339 with millisecond precision.
pub const NOW_UTC: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (rsvp + music_suggestions)");
        conn.execute_batch(&format!(
            "
            BEGIN;

            CREATE TABLE IF NOT EXISTS rsvp (
                id                    INTEGER PRIMARY KEY AUTOINCREMENT,
                name                  TEXT NOT NULL,
                can_attend            INTEGER NOT NULL CHECK (can_attend IN (0, 1)),
                dietary_restrictions  TEXT,
                where_staying         TEXT,
                created_at            TEXT NOT NULL DEFAULT ({NOW_UTC})
            );

            CREATE TABLE IF NOT EXISTS music_suggestions (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                song_name   TEXT NOT NULL,
                artist      TEXT NOT NULL,
                link        TEXT,
                created_at  TEXT NOT NULL DEFAULT ({NOW_UTC})
            );

            CREATE INDEX IF NOT EXISTS idx_rsvp_created
                ON rsvp(created_at);

            CREATE INDEX IF NOT EXISTS idx_music_suggestions_created
                ON music_suggestions(created_at);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            "
        ))?;
    }

    info!("Database migrations complete");
    Ok(())
}
