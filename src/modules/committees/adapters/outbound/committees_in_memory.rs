use crate::modules::committees::core::committee::{Committee, CommitteeUpdate, NewCommittee};
use crate::modules::committees::core::ports::CommitteesApi;
use crate::shared::core::ids::CommitteeId;
use crate::shared::infrastructure::api_client::ApiError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryCommitteesApi {
    rows: RwLock<Vec<Committee>>,
    is_offline: AtomicBool,
    list_calls: AtomicUsize,
}

impl InMemoryCommitteesApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_committees(committees: Vec<Committee>) -> Self {
        Self {
            rows: RwLock::new(committees),
            ..Self::default()
        }
    }

    /// Interior toggle so a shared instance can go offline mid-test.
    pub fn set_offline(&self, offline: bool) {
        self.is_offline.store(offline, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(ApiError::Network("Committees backend offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CommitteesApi for InMemoryCommitteesApi {
    async fn list(&self, limit: u32) -> Result<Vec<Committee>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let rows = self.rows.read().await;
        Ok(rows.iter().take(limit as usize).cloned().collect())
    }

    async fn get(&self, id: CommitteeId) -> Result<Committee, ApiError> {
        self.check_online()?;
        self.rows
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("committee {id}")))
    }

    async fn create(&self, committee: &NewCommittee) -> Result<Committee, ApiError> {
        self.check_online()?;
        let mut rows = self.rows.write().await;
        let next = rows.iter().map(|c| c.id.0).max().unwrap_or(0) + 1;
        let created = Committee {
            id: CommitteeId(next),
            event_id: Some(committee.event_id),
            name: committee.name.clone(),
            description: Some(committee.description.clone()),
            volunteer_count: Some(0),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: CommitteeId,
        update: &CommitteeUpdate,
    ) -> Result<Committee, ApiError> {
        self.check_online()?;
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("committee {id}")))?;
        if let Some(name) = &update.name {
            row.name = name.clone();
        }
        if let Some(description) = &update.description {
            row.description = Some(description.clone());
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: CommitteeId) -> Result<(), ApiError> {
        self.check_online()?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|c| c.id != id);
        if rows.len() == before {
            return Err(ApiError::NotFound(format!("committee {id}")));
        }
        Ok(())
    }
}
