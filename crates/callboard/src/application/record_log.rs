//! Record Log - Today's finalized call records
//!
//! Append-only during the day and cleared wholesale. Every mutation holds
//! the log lock across mutate-then-persist, and is rolled back in memory
//! when the store write fails, so memory and store never disagree.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{CallRecord, DomainError};
use crate::ports::{keys, KeyValueStore};

/// Ordered, persisted collection of the day's call records
pub struct RecordLog<S: KeyValueStore> {
    store: Arc<S>,
    records: Mutex<Vec<CallRecord>>,
}

impl<S: KeyValueStore> RecordLog<S> {
    /// Restore the log from the store (empty when nothing was saved yet)
    pub async fn load(store: Arc<S>) -> Result<Self, DomainError> {
        let records = match store.get(keys::RECORDS).await? {
            Some(raw) => serde_json::from_str::<Vec<CallRecord>>(&raw).map_err(|e| {
                DomainError::Serialization(format!("stored records are unreadable: {e}"))
            })?,
            None => Vec::new(),
        };

        tracing::info!("📒 Record log loaded ({} records)", records.len());

        Ok(Self {
            store,
            records: Mutex::new(records),
        })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Append one record and persist the whole log
    pub async fn append(&self, record: CallRecord) -> Result<(), DomainError> {
        let mut records = self.records.lock().await;
        let room = record.room_number().clone();
        records.push(record);

        if let Err(e) = persist(self.store.as_ref(), &records).await {
            records.pop();
            tracing::warn!("⚠️  Record for room {} not saved: {}", room, e);
            return Err(e);
        }

        tracing::info!("📝 Record appended for room {} ({} today)", room, records.len());
        Ok(())
    }

    /// Snapshot of all records in insertion order
    pub async fn all(&self) -> Vec<CallRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// Remove every record; returns how many were cleared
    pub async fn clear(&self) -> Result<usize, DomainError> {
        self.clear_then(|| async { Ok(()) }).await
    }

    /// Clear the log, then run `commit` while still holding the log lock
    ///
    /// If `commit` fails the cleared records are written back, so the clear
    /// and whatever `commit` persists succeed or fail together.
    pub(crate) async fn clear_then<F, Fut>(&self, commit: F) -> Result<usize, DomainError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<(), DomainError>> + Send,
    {
        let mut records = self.records.lock().await;
        let previous = std::mem::take(&mut *records);

        if let Err(e) = self.store.remove(keys::RECORDS).await {
            *records = previous;
            tracing::warn!("⚠️  Record log not cleared: {}", e);
            return Err(e);
        }

        if let Err(e) = commit().await {
            match persist(self.store.as_ref(), &previous).await {
                Ok(()) => {
                    *records = previous;
                    tracing::warn!("⚠️  Clear rolled back: {}", e);
                }
                Err(restore_err) => {
                    tracing::error!(
                        "❌ Clear could not be rolled back, log stays empty: {} (restore: {})",
                        e,
                        restore_err
                    );
                }
            }
            return Err(e);
        }

        let cleared = previous.len();
        tracing::info!("🧹 Record log cleared ({} records)", cleared);
        Ok(cleared)
    }
}

async fn persist<S: KeyValueStore + ?Sized>(
    store: &S,
    records: &[CallRecord],
) -> Result<(), DomainError> {
    let raw = serde_json::to_string(records)?;
    store.set(keys::RECORDS, &raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::{MissedAttempt, RoomNumber};
    use chrono::{TimeZone, Utc};

    fn record(room: &str, minute: u32) -> CallRecord {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, minute, 0).unwrap();
        CallRecord::missed(RoomNumber::parse(room).unwrap(), MissedAttempt::First, at)
    }

    #[tokio::test]
    async fn test_append_keeps_order_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let log = RecordLog::load(store.clone()).await.unwrap();

        log.append(record("101", 1)).await.unwrap();
        log.append(record("102", 2)).await.unwrap();

        let rooms: Vec<_> = log
            .all()
            .await
            .iter()
            .map(|r| r.room_number().to_string())
            .collect();
        assert_eq!(rooms, vec!["101", "102"]);

        let reloaded = RecordLog::load(store).await.unwrap();
        assert_eq!(reloaded.all().await, log.all().await);
    }

    #[tokio::test]
    async fn test_failed_append_rolls_back() {
        let store = Arc::new(MemoryStore::new());
        let log = RecordLog::load(store.clone()).await.unwrap();
        log.append(record("101", 1)).await.unwrap();
        let before = log.all().await;

        store.fail_writes(true);
        let result = log.append(record("102", 2)).await;

        assert!(matches!(result, Err(DomainError::Persistence(_))));
        assert_eq!(log.all().await, before);

        // The next successful write saves the current state only
        store.fail_writes(false);
        log.append(record("103", 3)).await.unwrap();
        let reloaded = RecordLog::load(store).await.unwrap();
        assert_eq!(reloaded.len().await, 2);
    }

    #[tokio::test]
    async fn test_clear_empties_log_and_store() {
        let store = Arc::new(MemoryStore::new());
        let log = RecordLog::load(store.clone()).await.unwrap();
        log.append(record("101", 1)).await.unwrap();
        log.append(record("102", 2)).await.unwrap();

        assert_eq!(log.clear().await.unwrap(), 2);
        assert!(log.is_empty().await);
        assert_eq!(store.snapshot(keys::RECORDS), None);
    }

    #[tokio::test]
    async fn test_failed_clear_keeps_records() {
        let store = Arc::new(MemoryStore::new());
        let log = RecordLog::load(store.clone()).await.unwrap();
        log.append(record("101", 1)).await.unwrap();

        store.fail_writes(true);
        assert!(log.clear().await.is_err());
        assert_eq!(log.len().await, 1);
        assert!(store.snapshot(keys::RECORDS).is_some());
    }

    #[tokio::test]
    async fn test_failed_commit_restores_records() {
        let store = Arc::new(MemoryStore::new());
        let log = RecordLog::load(store.clone()).await.unwrap();
        log.append(record("101", 1)).await.unwrap();
        let before = log.all().await;

        let result = log
            .clear_then(|| async { Err(DomainError::persistence("stamp failed")) })
            .await;

        assert!(result.is_err());
        assert_eq!(log.all().await, before);
        let reloaded = RecordLog::load(store).await.unwrap();
        assert_eq!(reloaded.all().await, before);
    }

    #[tokio::test]
    async fn test_load_rejects_corrupt_store() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::RECORDS, "{not json").await.unwrap();
        assert!(matches!(
            RecordLog::load(store).await,
            Err(DomainError::Serialization(_))
        ));
    }
}
