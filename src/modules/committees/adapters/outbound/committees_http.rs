use crate::modules::committees::core::committee::{Committee, CommitteeUpdate, NewCommittee};
use crate::modules::committees::core::ports::CommitteesApi;
use crate::shared::core::ids::CommitteeId;
use crate::shared::infrastructure::api_client::{ApiClient, ApiError, ApiRequest};
use async_trait::async_trait;
use std::sync::Arc;

pub struct HttpCommitteesApi {
    client: Arc<ApiClient>,
}

impl HttpCommitteesApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CommitteesApi for HttpCommitteesApi {
    async fn list(&self, limit: u32) -> Result<Vec<Committee>, ApiError> {
        self.client
            .fetch_list(ApiRequest::get("/committees").query("limit", limit))
            .await
    }

    async fn get(&self, id: CommitteeId) -> Result<Committee, ApiError> {
        self.client
            .fetch_json(ApiRequest::get(format!("/committees/{id}")))
            .await
    }

    async fn create(&self, committee: &NewCommittee) -> Result<Committee, ApiError> {
        let request = ApiRequest::post("/committees").json(committee)?;
        self.client.fetch_json(request).await
    }

    async fn update(
        &self,
        id: CommitteeId,
        update: &CommitteeUpdate,
    ) -> Result<Committee, ApiError> {
        let request = ApiRequest::put(format!("/committees/{id}")).json(update)?;
        self.client.fetch_json(request).await
    }

    async fn delete(&self, id: CommitteeId) -> Result<(), ApiError> {
        self.client
            .execute(ApiRequest::delete(format!("/committees/{id}")))
            .await
    }
}
