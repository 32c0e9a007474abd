use crate::modules::volunteers::core::assignment::{Assignment, AssignmentUpdate, NewAssignment};
use crate::modules::volunteers::core::bulk_upload::BulkUploadReport;
use crate::modules::volunteers::core::ports::{AssignmentsApi, VolunteersApi};
use crate::modules::volunteers::core::volunteer::{NewVolunteer, Volunteer, VolunteerUpdate};
use crate::shared::core::ids::{AssignmentId, CommitteeId, EventId, VolunteerId};
use crate::shared::infrastructure::api_client::{ApiClient, ApiError, ApiRequest};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub struct HttpVolunteersApi {
    client: Arc<ApiClient>,
}

impl HttpVolunteersApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VolunteersApi for HttpVolunteersApi {
    async fn list(&self, limit: u32) -> Result<Vec<Volunteer>, ApiError> {
        self.client
            .fetch_list(ApiRequest::get("/volunteers").query("limit", limit))
            .await
    }

    async fn get(&self, id: VolunteerId) -> Result<Volunteer, ApiError> {
        self.client
            .fetch_json(ApiRequest::get(format!("/volunteers/{id}")))
            .await
    }

    async fn create(&self, volunteer: &NewVolunteer) -> Result<Volunteer, ApiError> {
        let request = ApiRequest::post("/volunteers").json(volunteer)?;
        self.client.fetch_json(request).await
    }

    async fn update(
        &self,
        id: VolunteerId,
        update: &VolunteerUpdate,
    ) -> Result<Volunteer, ApiError> {
        let request = ApiRequest::put(format!("/volunteers/{id}")).json(update)?;
        self.client.fetch_json(request).await
    }

    async fn delete(&self, id: VolunteerId) -> Result<(), ApiError> {
        self.client
            .execute(ApiRequest::delete(format!("/volunteers/{id}")))
            .await
    }

    async fn bulk_upload(
        &self,
        file_name: &str,
        csv: Vec<u8>,
        event_id: EventId,
        committee_id: CommitteeId,
    ) -> Result<BulkUploadReport, ApiError> {
        info!(file_name, bytes = csv.len(), %committee_id, "uploading roster csv");
        let request = ApiRequest::post("/volunteers/bulk")
            .query("event_id", event_id)
            .query("committee_id", committee_id)
            .csv(file_name, csv);
        self.client.fetch_json(request).await
    }

    async fn export_csv(&self) -> Result<Vec<u8>, ApiError> {
        self.client
            .fetch_bytes(ApiRequest::get("/volunteers/export_csv"))
            .await
    }
}

pub struct HttpAssignmentsApi {
    client: Arc<ApiClient>,
}

impl HttpAssignmentsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssignmentsApi for HttpAssignmentsApi {
    async fn list_by_committee(
        &self,
        committee_id: CommitteeId,
        limit: u32,
    ) -> Result<Vec<Assignment>, ApiError> {
        self.client
            .fetch_list(
                ApiRequest::get("/volunteers/assignments")
                    .query("committee_id", committee_id)
                    .query("limit", limit),
            )
            .await
    }

    async fn create(&self, assignment: &NewAssignment) -> Result<Assignment, ApiError> {
        let request = ApiRequest::post("/volunteers/assignments").json(assignment)?;
        self.client.fetch_json(request).await
    }

    async fn update(
        &self,
        id: AssignmentId,
        update: &AssignmentUpdate,
    ) -> Result<Assignment, ApiError> {
        let request = ApiRequest::put(format!("/volunteers/assignments/{id}")).json(update)?;
        self.client.fetch_json(request).await
    }

    async fn delete(&self, id: AssignmentId) -> Result<(), ApiError> {
        self.client
            .execute(ApiRequest::delete(format!("/volunteers/assignments/{id}")))
            .await
    }

    async fn export_csv(&self) -> Result<Vec<u8>, ApiError> {
        self.client
            .fetch_bytes(ApiRequest::get("/volunteers/assignments/export_csv"))
            .await
    }
}
