use crate::modules::volunteers::core::assignment::{Assignment, AssignmentUpdate, NewAssignment};
use crate::modules::volunteers::core::bulk_upload::BulkUploadReport;
use crate::modules::volunteers::core::volunteer::{NewVolunteer, Volunteer, VolunteerUpdate};
use crate::shared::core::ids::{AssignmentId, CommitteeId, EventId, VolunteerId};
use crate::shared::infrastructure::api_client::ApiError;
use async_trait::async_trait;

#[async_trait]
pub trait VolunteersApi: Send + Sync {
    async fn list(&self, limit: u32) -> Result<Vec<Volunteer>, ApiError>;
    async fn get(&self, id: VolunteerId) -> Result<Volunteer, ApiError>;
    async fn create(&self, volunteer: &NewVolunteer) -> Result<Volunteer, ApiError>;
    async fn update(&self, id: VolunteerId, update: &VolunteerUpdate)
    -> Result<Volunteer, ApiError>;
    async fn delete(&self, id: VolunteerId) -> Result<(), ApiError>;
    async fn bulk_upload(
        &self,
        file_name: &str,
        csv: Vec<u8>,
        event_id: EventId,
        committee_id: CommitteeId,
    ) -> Result<BulkUploadReport, ApiError>;
    async fn export_csv(&self) -> Result<Vec<u8>, ApiError>;
}

#[async_trait]
pub trait AssignmentsApi: Send + Sync {
    async fn list_by_committee(
        &self,
        committee_id: CommitteeId,
        limit: u32,
    ) -> Result<Vec<Assignment>, ApiError>;
    async fn create(&self, assignment: &NewAssignment) -> Result<Assignment, ApiError>;
    async fn update(
        &self,
        id: AssignmentId,
        update: &AssignmentUpdate,
    ) -> Result<Assignment, ApiError>;
    async fn delete(&self, id: AssignmentId) -> Result<(), ApiError>;
    async fn export_csv(&self) -> Result<Vec<u8>, ApiError>;
}
