//! Roster database schema.

use rusqlite::Connection;

/// Current on-disk schema version.
pub(crate) const CURRENT_SCHEMA_VERSION: u32 = 1;

/// DDL for the roster database. Every statement is `IF NOT EXISTS`.
pub(crate) const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS schema_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- One row per tracked individual. History and stats are replaced wholesale
-- on every sync, so they are stored as JSON documents.
CREATE TABLE IF NOT EXISTS individuals (
    id                      TEXT PRIMARY KEY,
    name                    TEXT NOT NULL,
    email                   TEXT NOT NULL UNIQUE,
    phone_number            TEXT,
    codeforces_handle       TEXT NOT NULL UNIQUE COLLATE NOCASE,
    current_rating          INTEGER NOT NULL DEFAULT 0,
    max_rating              INTEGER NOT NULL DEFAULT 0,
    last_sync_ms            INTEGER,            -- epoch millis, NULL until first sync
    disable_email_reminders INTEGER NOT NULL DEFAULT 0,
    reminder_emails_sent    INTEGER NOT NULL DEFAULT 0,
    contest_history         TEXT NOT NULL DEFAULT '[]',  -- JSON array of ContestResult
    problem_stats           TEXT NOT NULL DEFAULT '{}'   -- JSON ProblemSolvingSummary
);

CREATE INDEX IF NOT EXISTS idx_individuals_last_sync ON individuals(last_sync_ms);
"#;

/// Create missing tables and seed the schema version. Idempotent.
pub(crate) fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        rusqlite::params![CURRENT_SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

/// Read the stored schema version, if any.
pub(crate) fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<u32>> {
    let mut stmt = conn.prepare("SELECT value FROM schema_meta WHERE key = 'schema_version'")?;
    let mut rows = stmt.query([])?;
    match rows.next()? {
        Some(row) => {
            let value: String = row.get(0)?;
            Ok(value.parse().ok())
        }
        None => Ok(None),
    }
}
