// Local persistent key/value storage used as a warm-start cache and token holder.
//
// Purpose
// - Keep tokens, the signed-in user and per-committee attendance snapshots across restarts.
//
// Boundaries
// - Nothing stored here is authoritative. Server fetches always win.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("malformed value under {key}: {reason}")]
    Malformed { key: String, reason: String },
}

#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

pub mod keys {
    use crate::shared::core::ids::CommitteeId;
    use chrono::NaiveDate;

    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const USER: &str = "user";

    pub fn active_shift(committee_id: CommitteeId) -> String {
        format!("active_shift:{committee_id}")
    }

    pub fn selected_shift(committee_id: CommitteeId) -> String {
        format!("selected_shift:{committee_id}")
    }

    pub fn attendance_snapshot(committee_id: CommitteeId, date: NaiveDate) -> String {
        format!("attendance_state:{committee_id}:{date}")
    }

    /// Date of the one snapshot kept per committee; older days are pruned.
    pub fn snapshot_date(committee_id: CommitteeId) -> String {
        format!("attendance_state_date:{committee_id}")
    }
}

pub async fn load_json<T: DeserializeOwned, S: LocalStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        None => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StoreError::Malformed {
                key: key.to_string(),
                reason: e.to_string(),
            }),
    }
}

pub async fn save_json<T: Serialize + Sync + ?Sized, S: LocalStore + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(value).map_err(|e| StoreError::Malformed {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, value).await
}

pub mod in_memory;
pub mod json_file;
