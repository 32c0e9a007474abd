use crate::modules::committees::core::committee::{Committee, CommitteeUpdate, NewCommittee};
use crate::shared::core::ids::CommitteeId;
use crate::shared::infrastructure::api_client::ApiError;
use async_trait::async_trait;

#[async_trait]
pub trait CommitteesApi: Send + Sync {
    async fn list(&self, limit: u32) -> Result<Vec<Committee>, ApiError>;
    async fn get(&self, id: CommitteeId) -> Result<Committee, ApiError>;
    async fn create(&self, committee: &NewCommittee) -> Result<Committee, ApiError>;
    async fn update(&self, id: CommitteeId, update: &CommitteeUpdate)
    -> Result<Committee, ApiError>;
    async fn delete(&self, id: CommitteeId) -> Result<(), ApiError>;
}
