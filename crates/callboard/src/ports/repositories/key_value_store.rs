//! Key-Value Store Port
//!
//! Abstract interface for the durable string store the record log and the
//! reset settings live in. Every call is awaited to completion before the
//! caller treats a change as durable.

use async_trait::async_trait;

use crate::domain::errors::DomainError;

/// Keys the core reads and writes
pub mod keys {
    /// JSON array of call records, in insertion order
    pub const RECORDS: &str = "records";
    /// `"true"` or `"false"`
    pub const AUTO_RESET_ENABLED: &str = "auto_reset_enabled";
    /// Local calendar date of the last automatic reset, `YYYY-MM-DD`
    pub const LAST_RESET_DATE: &str = "last_reset_date";
}

/// Durable key-value storage over string keys and values
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Insert or overwrite a value
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Delete a key; deleting an absent key succeeds
    async fn remove(&self, key: &str) -> Result<(), DomainError>;
}
