// Add a volunteer to a committee: reuse or create the volunteer, then create the assignment.
//
// The two calls are sequential and independent. A failed assignment does not
// remove a volunteer created in the first step.

use crate::modules::volunteers::core::assignment::{Assignment, AssignmentSchedule, NewAssignment};
use crate::modules::volunteers::core::ports::{AssignmentsApi, VolunteersApi};
use crate::modules::volunteers::core::volunteer::{NewVolunteer, Volunteer};
use crate::shared::core::ids::{CommitteeId, EventId, VolunteerId};
use crate::shared::infrastructure::api_client::ApiError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum EnrollError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("a volunteer with this email already exists")]
    DuplicateEmail,

    #[error("a volunteer with this college ID already exists")]
    DuplicateCollegeId,

    #[error("volunteer already exists with this information")]
    AlreadyExists,

    #[error("invalid volunteer data: {0}")]
    Invalid(String),

    #[error("volunteer {volunteer_id} saved but assignment failed: {source}")]
    AssignmentFailed {
        volunteer_id: VolunteerId,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Api(ApiError),
}

impl EnrollError {
    fn from_create(err: ApiError) -> Self {
        match err {
            ApiError::Conflict(message) => {
                let lowered = message.to_lowercase();
                if lowered.contains("email already registered") {
                    EnrollError::DuplicateEmail
                } else if lowered.contains("college id already exists") {
                    EnrollError::DuplicateCollegeId
                } else {
                    EnrollError::AlreadyExists
                }
            }
            ApiError::Validation(message) => EnrollError::Invalid(message),
            other => EnrollError::Api(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnrollRequest {
    pub volunteer: NewVolunteer,
    pub schedule: AssignmentSchedule,
}

#[derive(Debug, Clone)]
pub struct EnrollOutcome {
    pub volunteer_id: VolunteerId,
    pub assignment: Assignment,
    pub reused_existing: bool,
    pub created_volunteer: Option<Volunteer>,
}

pub struct EnrollVolunteerHandler<TVolunteers, TAssignments>
where
    TVolunteers: VolunteersApi + 'static,
    TAssignments: AssignmentsApi + 'static,
{
    event_id: EventId,
    committee_id: CommitteeId,
    volunteers: Arc<TVolunteers>,
    assignments: Arc<TAssignments>,
}

impl<TVolunteers, TAssignments> EnrollVolunteerHandler<TVolunteers, TAssignments>
where
    TVolunteers: VolunteersApi + 'static,
    TAssignments: AssignmentsApi + 'static,
{
    pub fn new(
        event_id: EventId,
        committee_id: CommitteeId,
        volunteers: Arc<TVolunteers>,
        assignments: Arc<TAssignments>,
    ) -> Self {
        Self {
            event_id,
            committee_id,
            volunteers,
            assignments,
        }
    }

    /// `known` is the roster already on screen; a matching email there is reused.
    pub async fn handle(
        &self,
        request: EnrollRequest,
        known: &[Volunteer],
    ) -> Result<EnrollOutcome, EnrollError> {
        let volunteer = request.volunteer.normalized();
        if volunteer.name.is_empty() {
            return Err(EnrollError::MissingField("name"));
        }
        let Some(email) = volunteer.email.clone() else {
            return Err(EnrollError::MissingField("email"));
        };

        let (volunteer_id, created_volunteer) =
            match known.iter().find(|v| v.has_email(&email)) {
                Some(existing) => {
                    info!(volunteer_id = %existing.id, "reusing existing volunteer");
                    (existing.id, None)
                }
                None => {
                    let created = self
                        .volunteers
                        .create(&volunteer)
                        .await
                        .map_err(EnrollError::from_create)?;
                    info!(volunteer_id = %created.id, "volunteer created");
                    (created.id, Some(created))
                }
            };

        let payload = NewAssignment::new(self.event_id, self.committee_id, volunteer_id)
            .with_schedule(request.schedule);
        let assignment = self.assignments.create(&payload).await.map_err(|source| {
            warn!(%volunteer_id, error = %source, "assignment creation failed");
            EnrollError::AssignmentFailed {
                volunteer_id,
                source,
            }
        })?;

        Ok(EnrollOutcome {
            volunteer_id,
            assignment,
            reused_existing: created_volunteer.is_none(),
            created_volunteer,
        })
    }
}
