//! In-process record store.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{RecordStore, unique_conflict};
use crate::error::PersistError;
use crate::model::TrackedIndividual;

/// `Vec`-backed [`RecordStore`] that keeps insertion order.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<TrackedIndividual>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `records`.
    pub fn with_records(records: Vec<TrackedIndividual>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<TrackedIndividual>>, PersistError> {
        self.records
            .lock()
            .map_err(|e| PersistError::Lock(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get_all(&self) -> Result<Vec<TrackedIndividual>, PersistError> {
        Ok(self.lock()?.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<TrackedIndividual, PersistError> {
        self.lock()?
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| PersistError::NotFound(id.to_owned()))
    }

    async fn save(&self, record: &TrackedIndividual) -> Result<TrackedIndividual, PersistError> {
        let mut records = self.lock()?;
        if let Some(conflict) = records.iter().find_map(|r| unique_conflict(r, record)) {
            return Err(PersistError::Conflict(conflict));
        }
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => *slot = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), PersistError> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(PersistError::NotFound(id.to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewIndividual;

    fn individual(name: &str, handle: &str) -> TrackedIndividual {
        TrackedIndividual::new(NewIndividual {
            name: name.into(),
            email: format!("{handle}@example.com"),
            phone_number: None,
            codeforces_handle: handle.into(),
        })
    }

    #[tokio::test]
    async fn save_inserts_then_replaces() {
        let store = MemoryRecordStore::new();
        let mut rec = individual("Alan", "alan");
        store.save(&rec).await.expect("insert");
        rec.current_rating = 1500;
        store.save(&rec).await.expect("update");

        let all = store.get_all().await.expect("all");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].current_rating, 1500);
    }

    #[tokio::test]
    async fn get_all_keeps_insertion_order() {
        let store = MemoryRecordStore::new();
        for handle in ["c", "a", "b"] {
            store.save(&individual("Name", handle)).await.expect("save");
        }
        let handles: Vec<String> = store
            .get_all()
            .await
            .expect("all")
            .into_iter()
            .map(|r| r.codeforces_handle)
            .collect();
        assert_eq!(handles, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let store = MemoryRecordStore::new();
        assert!(matches!(
            store.get_by_id("nope").await,
            Err(PersistError::NotFound(_))
        ));
        assert!(matches!(
            store.delete("nope").await,
            Err(PersistError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_handle_conflicts() {
        let store = MemoryRecordStore::new();
        store.save(&individual("One", "dup")).await.expect("first");
        let mut second = individual("Two", "DUP");
        second.email = "other@example.com".into();
        let err = store.save(&second).await.unwrap_err();
        assert!(matches!(err, PersistError::Conflict(_)));
        assert_eq!(store.get_all().await.expect("all").len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let rec = individual("Edsger", "edsger");
        let store = MemoryRecordStore::with_records(vec![rec.clone()]);
        store.delete(&rec.id).await.expect("delete");
        assert!(store.get_all().await.expect("all").is_empty());
    }
}
