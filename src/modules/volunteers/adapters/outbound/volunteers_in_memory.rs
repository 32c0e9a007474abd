// In memory implementation of the VolunteersApi and AssignmentsApi ports.
//
// Responsibilities
// - Reject duplicate emails and college ids the way the backend does (409).
// - Allow assignment creation to be failed on demand.

use crate::modules::volunteers::core::assignment::{Assignment, AssignmentUpdate, NewAssignment};
use crate::modules::volunteers::core::bulk_upload::BulkUploadReport;
use crate::modules::volunteers::core::ports::{AssignmentsApi, VolunteersApi};
use crate::modules::volunteers::core::volunteer::{NewVolunteer, Volunteer, VolunteerUpdate};
use crate::shared::core::ids::{AssignmentId, CommitteeId, EventId, VolunteerId};
use crate::shared::infrastructure::api_client::ApiError;
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryVolunteersApi {
    volunteers: RwLock<Vec<Volunteer>>,
    assignments: RwLock<Vec<Assignment>>,
    is_offline: bool,
    reject_assignments: bool,
}

impl InMemoryVolunteersApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_volunteers(volunteers: Vec<Volunteer>) -> Self {
        Self {
            volunteers: RwLock::new(volunteers),
            ..Self::default()
        }
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub fn reject_assignments(&mut self) {
        self.reject_assignments = true;
    }

    pub async fn volunteers(&self) -> Vec<Volunteer> {
        self.volunteers.read().await.clone()
    }

    pub async fn assignments(&self) -> Vec<Assignment> {
        self.assignments.read().await.clone()
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.is_offline {
            return Err(ApiError::Network("Volunteers backend offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl VolunteersApi for InMemoryVolunteersApi {
    async fn list(&self, limit: u32) -> Result<Vec<Volunteer>, ApiError> {
        self.check_online()?;
        Ok(self
            .volunteers
            .read()
            .await
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, id: VolunteerId) -> Result<Volunteer, ApiError> {
        self.check_online()?;
        self.volunteers
            .read()
            .await
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("volunteer {id}")))
    }

    async fn create(&self, volunteer: &NewVolunteer) -> Result<Volunteer, ApiError> {
        self.check_online()?;
        let mut rows = self.volunteers.write().await;
        if let Some(email) = &volunteer.email {
            if rows.iter().any(|v| v.has_email(email)) {
                return Err(ApiError::Conflict("Email already registered".into()));
            }
        }
        if let Some(college_id) = &volunteer.college_id {
            if rows.iter().any(|v| v.college_id.as_ref() == Some(college_id)) {
                return Err(ApiError::Conflict(
                    "Volunteer with this college ID already exists".into(),
                ));
            }
        }
        let next = rows.iter().map(|v| v.id.0).max().unwrap_or(0) + 1;
        let created = Volunteer {
            id: VolunteerId(next),
            name: volunteer.name.clone(),
            email: volunteer.email.clone(),
            phone: volunteer.phone.clone(),
            dept: volunteer.dept.clone(),
            college_id: volunteer.college_id.clone(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: VolunteerId,
        update: &VolunteerUpdate,
    ) -> Result<Volunteer, ApiError> {
        self.check_online()?;
        let mut rows = self.volunteers.write().await;
        let row = rows
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("volunteer {id}")))?;
        if let Some(name) = &update.name {
            row.name = name.clone();
        }
        if update.email.is_some() {
            row.email = update.email.clone();
        }
        if update.phone.is_some() {
            row.phone = update.phone.clone();
        }
        if update.dept.is_some() {
            row.dept = update.dept.clone();
        }
        if update.college_id.is_some() {
            row.college_id = update.college_id.clone();
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: VolunteerId) -> Result<(), ApiError> {
        self.check_online()?;
        self.volunteers.write().await.retain(|v| v.id != id);
        Ok(())
    }

    async fn bulk_upload(
        &self,
        _file_name: &str,
        _csv: Vec<u8>,
        _event_id: EventId,
        _committee_id: CommitteeId,
    ) -> Result<BulkUploadReport, ApiError> {
        self.check_online()?;
        Ok(BulkUploadReport::default())
    }

    async fn export_csv(&self) -> Result<Vec<u8>, ApiError> {
        self.check_online()?;
        let mut out = String::from("id,name,email\n");
        for v in self.volunteers.read().await.iter() {
            out.push_str(&format!(
                "{},{},{}\n",
                v.id,
                v.name,
                v.email.as_deref().unwrap_or("")
            ));
        }
        Ok(out.into_bytes())
    }
}

#[async_trait]
impl AssignmentsApi for InMemoryVolunteersApi {
    async fn list_by_committee(
        &self,
        committee_id: CommitteeId,
        limit: u32,
    ) -> Result<Vec<Assignment>, ApiError> {
        self.check_online()?;
        Ok(self
            .assignments
            .read()
            .await
            .iter()
            .filter(|a| a.committee_id == Some(committee_id))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, assignment: &NewAssignment) -> Result<Assignment, ApiError> {
        self.check_online()?;
        if self.reject_assignments {
            return Err(ApiError::Validation("invalid reporting_time".into()));
        }
        let volunteer = self
            .volunteers
            .read()
            .await
            .iter()
            .find(|v| v.id == assignment.volunteer_id)
            .cloned();
        let mut rows = self.assignments.write().await;
        let next = rows.iter().map(|a| a.id.0).max().unwrap_or(0) + 1;
        let created = Assignment {
            id: AssignmentId(next),
            event_id: Some(assignment.event_id),
            committee_id: Some(assignment.committee_id),
            volunteer_id: assignment.volunteer_id,
            volunteer_name: volunteer.as_ref().map(|v| v.name.clone()),
            volunteer_email: volunteer.as_ref().and_then(|v| v.email.clone()),
            volunteer_phone: volunteer.as_ref().and_then(|v| v.phone.clone()),
            volunteer_college_id: volunteer.as_ref().and_then(|v| v.college_id.clone()),
            role: Some(assignment.role.clone()),
            shift: assignment.shift.clone(),
            reporting_time: assignment.reporting_time,
            start_time: assignment.start_time,
            end_time: assignment.end_time,
            status: assignment.status,
            notes: assignment.notes.clone(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: AssignmentId,
        update: &AssignmentUpdate,
    ) -> Result<Assignment, ApiError> {
        self.check_online()?;
        let mut rows = self.assignments.write().await;
        let row = rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("assignment {id}")))?;
        if update.role.is_some() {
            row.role = update.role.clone();
        }
        if let Some(status) = update.status {
            row.status = status;
        }
        if update.shift.is_some() {
            row.shift = update.shift.clone();
        }
        if update.notes.is_some() {
            row.notes = update.notes.clone();
        }
        if update.reporting_time.is_some() {
            row.reporting_time = update.reporting_time;
        }
        if update.start_time.is_some() {
            row.start_time = update.start_time;
        }
        if update.end_time.is_some() {
            row.end_time = update.end_time;
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: AssignmentId) -> Result<(), ApiError> {
        self.check_online()?;
        self.assignments.write().await.retain(|a| a.id != id);
        Ok(())
    }

    async fn export_csv(&self) -> Result<Vec<u8>, ApiError> {
        self.check_online()?;
        let mut out = String::from("id,volunteer_id,shift,notes\n");
        for a in self.assignments.read().await.iter() {
            out.push_str(&format!(
                "{},{},{},{}\n",
                a.id,
                a.volunteer_id,
                a.shift.as_deref().unwrap_or(""),
                a.notes.as_deref().unwrap_or("")
            ));
        }
        Ok(out.into_bytes())
    }
}
