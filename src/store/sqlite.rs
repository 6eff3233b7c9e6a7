//! SQLite-backed record store.
//!
//! A single database file holds the whole roster. Scalar fields map to
//! columns; contest history and the problem-solving summary are JSON
//! documents since every sync replaces them wholesale.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::DateTime;
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};

use super::RecordStore;
use super::schema::{apply_schema, read_schema_version};
use crate::error::PersistError;
use crate::model::TrackedIndividual;

const SELECT_COLUMNS: &str = "SELECT id, name, email, phone_number, codeforces_handle, \
     current_rating, max_rating, last_sync_ms, disable_email_reminders, \
     reminder_emails_sent, contest_history, problem_stats FROM individuals";

/// SQLite-backed [`RecordStore`].
///
/// Thread-safe via an internal `Mutex<Connection>`; all statements are
/// serialized, which is also what makes each `save` atomic.
pub struct SqliteRecordStore {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Open (or create) the database at `path`, creating parent directories
    /// and applying the schema as needed.
    pub fn open(path: &Path) -> Result<Self, PersistError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PersistError::Io(e.to_string()))?;
        }
        let conn = Connection::open(path).map_err(sqlite_error)?;
        apply_schema(&conn).map_err(sqlite_error)?;
        tracing::debug!(path = %path.display(), "opened roster database");
        Ok(Self {
            path: path.to_path_buf(),
            conn: Mutex::new(conn),
        })
    }

    /// Database file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current schema version from the database.
    pub fn schema_version(&self) -> Result<Option<u32>, PersistError> {
        let conn = self.lock()?;
        read_schema_version(&conn).map_err(sqlite_error)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, PersistError> {
        self.conn
            .lock()
            .map_err(|e| PersistError::Lock(e.to_string()))
    }

    fn upsert(&self, record: &TrackedIndividual) -> Result<(), PersistError> {
        let history = serde_json::to_string(&record.contest_history)
            .map_err(|e| PersistError::Serde(e.to_string()))?;
        let stats = serde_json::to_string(&record.problem_solving_stats)
            .map_err(|e| PersistError::Serde(e.to_string()))?;
        let last_sync_ms = record.last_sync.map(|t| t.timestamp_millis());

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO individuals \
             (id, name, email, phone_number, codeforces_handle, current_rating, max_rating, \
              last_sync_ms, disable_email_reminders, reminder_emails_sent, contest_history, problem_stats) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12) \
             ON CONFLICT(id) DO UPDATE SET \
               name = excluded.name, email = excluded.email, phone_number = excluded.phone_number, \
               codeforces_handle = excluded.codeforces_handle, current_rating = excluded.current_rating, \
               max_rating = excluded.max_rating, last_sync_ms = excluded.last_sync_ms, \
               disable_email_reminders = excluded.disable_email_reminders, \
               reminder_emails_sent = excluded.reminder_emails_sent, \
               contest_history = excluded.contest_history, problem_stats = excluded.problem_stats",
            params![
                record.id,
                record.name,
                record.email,
                record.phone_number,
                record.codeforces_handle,
                record.current_rating,
                record.max_rating,
                last_sync_ms,
                record.disable_email_reminders,
                record.reminder_emails_sent,
                history,
                stats
            ],
        )
        .map_err(|e| map_constraint(e, record))?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn get_all(&self) -> Result<Vec<TrackedIndividual>, PersistError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid"))
            .map_err(sqlite_error)?;
        let rows = stmt
            .query_map([], row_to_individual)
            .map_err(sqlite_error)?;

        let mut records = Vec::new();
        for r in rows {
            records.push(r.map_err(sqlite_error)?);
        }
        Ok(records)
    }

    async fn get_by_id(&self, id: &str) -> Result<TrackedIndividual, PersistError> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            params![id],
            row_to_individual,
        )
        .optional()
        .map_err(sqlite_error)?
        .ok_or_else(|| PersistError::NotFound(id.to_owned()))
    }

    async fn save(&self, record: &TrackedIndividual) -> Result<TrackedIndividual, PersistError> {
        self.upsert(record)?;
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), PersistError> {
        let conn = self.lock()?;
        let rows = conn
            .execute("DELETE FROM individuals WHERE id = ?1", params![id])
            .map_err(sqlite_error)?;
        if rows == 0 {
            return Err(PersistError::NotFound(id.to_owned()));
        }
        Ok(())
    }
}

/// Turn unique-constraint failures into [`PersistError::Conflict`].
fn map_constraint(err: rusqlite::Error, record: &TrackedIndividual) -> PersistError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, ref msg) if e.code == ErrorCode::ConstraintViolation => {
            let detail = msg.as_deref().unwrap_or("constraint violation");
            let field = if detail.contains("email") {
                format!("email '{}' already registered", record.email)
            } else if detail.contains("codeforces_handle") {
                format!(
                    "Codeforces handle '{}' already registered",
                    record.codeforces_handle
                )
            } else {
                detail.to_owned()
            };
            PersistError::Conflict(field)
        }
        other => sqlite_error(other),
    }
}

/// Separate "try again later" conditions from genuine SQLite failures.
fn sqlite_error(err: rusqlite::Error) -> PersistError {
    match err.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen) => {
            PersistError::Unavailable(err.to_string())
        }
        _ => PersistError::Sqlite(err),
    }
}

// ---------------------------------------------------------------------------
// Row conversion helpers
// ---------------------------------------------------------------------------

fn row_to_individual(row: &rusqlite::Row<'_>) -> rusqlite::Result<TrackedIndividual> {
    let last_sync_ms: Option<i64> = row.get(7)?;
    let history_json: String = row.get(10)?;
    let stats_json: String = row.get(11)?;

    Ok(TrackedIndividual {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone_number: row.get(3)?,
        codeforces_handle: row.get(4)?,
        current_rating: row.get(5)?,
        max_rating: row.get(6)?,
        last_sync: last_sync_ms.and_then(DateTime::from_timestamp_millis),
        disable_email_reminders: row.get(8)?,
        reminder_emails_sent: row.get(9)?,
        contest_history: decode_json(10, &history_json)?,
        problem_solving_stats: decode_json(11, &stats_json)?,
    })
}

fn decode_json<T: serde::de::DeserializeOwned>(idx: usize, raw: &str) -> rusqlite::Result<T> {
    serde_json::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContestResult, NewIndividual, RatingBand};
    use crate::store::schema::CURRENT_SCHEMA_VERSION;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn test_store() -> (tempfile::TempDir, SqliteRecordStore) {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let store = SqliteRecordStore::open(&dir.path().join("roster.db")).expect("open store");
        (dir, store)
    }

    fn individual(handle: &str) -> TrackedIndividual {
        TrackedIndividual::new(NewIndividual {
            name: format!("Person {handle}"),
            email: format!("{handle}@example.com"),
            phone_number: Some("+1 555 010 9999".into()),
            codeforces_handle: handle.into(),
        })
    }

    #[test]
    fn open_creates_schema() {
        let (_dir, store) = test_store();
        assert_eq!(
            store.schema_version().expect("version"),
            Some(CURRENT_SCHEMA_VERSION)
        );
    }

    #[tokio::test]
    async fn save_and_load_full_record() {
        let (_dir, store) = test_store();
        let mut rec = individual("hopper");
        rec.current_rating = 1540;
        rec.max_rating = 1610;
        rec.last_sync = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        rec.contest_history.push(ContestResult {
            contest_id: 1950,
            contest_name: "Div. 2".into(),
            rank: 812,
            rating_change: 37,
            new_rating: 1540,
            date: Utc.with_ymd_and_hms(2024, 4, 30, 18, 0, 0).unwrap(),
        });
        rec.problem_solving_stats.total_solved = 2;
        rec.problem_solving_stats.average_rating = 1150.0;
        rec.problem_solving_stats
            .rating_wise_solved
            .insert(RatingBand::of_rating(Some(1100)), 1);
        rec.problem_solving_stats
            .rating_wise_solved
            .insert(RatingBand::of_rating(Some(1200)), 1);
        rec.problem_solving_stats
            .submission_dates
            .push(Utc.with_ymd_and_hms(2024, 4, 29, 9, 30, 0).unwrap());

        store.save(&rec).await.expect("save");
        let loaded = store.get_by_id(&rec.id).await.expect("load");
        assert_eq!(loaded, rec);
    }

    #[tokio::test]
    async fn save_replaces_existing_row() {
        let (_dir, store) = test_store();
        let mut rec = individual("knuth");
        store.save(&rec).await.expect("insert");
        rec.reminder_emails_sent = 3;
        rec.disable_email_reminders = true;
        store.save(&rec).await.expect("update");

        let all = store.get_all().await.expect("all");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].reminder_emails_sent, 3);
        assert!(all[0].disable_email_reminders);
    }

    #[tokio::test]
    async fn get_all_keeps_insertion_order_across_updates() {
        let (_dir, store) = test_store();
        let first = individual("first");
        let second = individual("second");
        store.save(&first).await.expect("first");
        store.save(&second).await.expect("second");
        store.save(&first).await.expect("update first");

        let ids: Vec<String> = store
            .get_all()
            .await
            .expect("all")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let (_dir, store) = test_store();
        store.save(&individual("alpha")).await.expect("first");
        let mut clash = individual("beta");
        clash.email = "alpha@example.com".into();
        let err = store.save(&clash).await.unwrap_err();
        assert!(matches!(err, PersistError::Conflict(ref m) if m.contains("email")));
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let (_dir, store) = test_store();
        assert!(matches!(
            store.get_by_id("missing").await,
            Err(PersistError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let (_dir, store) = test_store();
        let rec = individual("gone");
        store.save(&rec).await.expect("save");
        store.delete(&rec.id).await.expect("delete");
        assert!(store.get_all().await.expect("all").is_empty());
        assert!(matches!(
            store.delete(&rec.id).await,
            Err(PersistError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn reopen_sees_persisted_rows() {
        let dir = tempfile::TempDir::new().expect("dir");
        let path = dir.path().join("nested").join("roster.db");
        let rec = individual("durable");
        {
            let store = SqliteRecordStore::open(&path).expect("open");
            store.save(&rec).await.expect("save");
        }
        let store = SqliteRecordStore::open(&path).expect("reopen");
        assert_eq!(store.get_by_id(&rec.id).await.expect("load"), rec);
    }

    #[tokio::test]
    async fn write_while_another_connection_holds_the_lock_is_unavailable() {
        let (_dir, store) = test_store();
        store
            .lock()
            .expect("lock")
            .busy_timeout(Duration::ZERO)
            .expect("busy timeout");

        let other = Connection::open(store.path()).expect("second connection");
        other.execute_batch("BEGIN EXCLUSIVE").expect("hold write lock");

        let rec = individual("blocked");
        let err = store.save(&rec).await.unwrap_err();
        assert!(matches!(err, PersistError::Unavailable(_)), "{err:?}");

        other.execute_batch("ROLLBACK").expect("release");
        store.save(&rec).await.expect("save after release");
    }

    #[test]
    fn busy_locked_and_cannot_open_map_to_unavailable() {
        for code in [
            rusqlite::ffi::SQLITE_BUSY,
            rusqlite::ffi::SQLITE_LOCKED,
            rusqlite::ffi::SQLITE_CANTOPEN,
        ] {
            let err = rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None);
            assert!(matches!(sqlite_error(err), PersistError::Unavailable(_)));
        }
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CORRUPT),
            None,
        );
        assert!(matches!(sqlite_error(err), PersistError::Sqlite(_)));
    }
}
