// JSON file implementation of the LocalStore port.
//
// The whole map is kept in memory and rewritten on every change. A missing or
// unreadable file starts an empty store.

use crate::shared::infrastructure::local_store::{LocalStore, StoreError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error};

pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path).await;
        debug!(path = %path.display(), entries = entries.len(), "local store opened");
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::Backend(e.to_string()))?;
            }
        }
        let payload =
            serde_json::to_vec_pretty(entries).map_err(|e| StoreError::Backend(e.to_string()))?;
        // Written beside the target, then renamed over it: readers see the old or the new map.
        let staging = self.staging_path();
        fs::write(&staging, payload)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

async fn load_entries(path: &Path) -> BTreeMap<String, Value> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(err) => {
                error!("failed to parse local store file: {err}");
                BTreeMap::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            error!("failed to read local store file: {err}");
            BTreeMap::new()
        }
    }
}

#[async_trait::async_trait]
impl LocalStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value);
        self.persist(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod json_file_store_tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn scratch_path() -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "volunteer_roster_store_{}_{}.json",
            std::process::id(),
            uuid::Uuid::now_v7()
        ));
        path
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_survive_a_reopen(scratch_path: PathBuf) {
        let store = JsonFileStore::open(&scratch_path).await;
        store.set("access_token", json!("abc")).await.unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&scratch_path).await;
        assert_eq!(reopened.get("access_token").await.unwrap(), Some(json!("abc")));
        let _ = std::fs::remove_file(&scratch_path);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_start_empty_when_the_file_is_garbage(scratch_path: PathBuf) {
        std::fs::write(&scratch_path, b"{ not json").unwrap();
        let store = JsonFileStore::open(&scratch_path).await;
        assert_eq!(store.get("anything").await.unwrap(), None);
        let _ = std::fs::remove_file(&scratch_path);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_drop_removed_keys_from_disk(scratch_path: PathBuf) {
        let store = JsonFileStore::open(&scratch_path).await;
        store.set("a", json!(1)).await.unwrap();
        store.set("b", json!(2)).await.unwrap();
        store.remove("a").await.unwrap();

        let reopened = JsonFileStore::open(&scratch_path).await;
        assert_eq!(reopened.get("a").await.unwrap(), None);
        assert_eq!(reopened.get("b").await.unwrap(), Some(json!(2)));
        let _ = std::fs::remove_file(&scratch_path);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_keep_the_last_complete_write_when_a_later_one_is_cut_short(
        scratch_path: PathBuf,
    ) {
        let store = JsonFileStore::open(&scratch_path).await;
        store.set("active_shift:2", json!({ "shift_label": "Morning" })).await.unwrap();
        assert!(!store.staging_path().exists());

        // A write interrupted before the rename only ever touches the staging file.
        std::fs::write(store.staging_path(), b"{ \"active_shift:2\": {").unwrap();
        let reopened = JsonFileStore::open(&scratch_path).await;
        assert_eq!(
            reopened.get("active_shift:2").await.unwrap(),
            Some(json!({ "shift_label": "Morning" }))
        );

        reopened.set("user", json!({ "id": 1 })).await.unwrap();
        assert!(!reopened.staging_path().exists());
        let _ = std::fs::remove_file(&scratch_path);
    }
}
