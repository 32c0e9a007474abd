// Shared builder for committee assignments as the backend returns them.

use crate::modules::volunteers::core::assignment::{Assignment, AssignmentStatus};
use crate::shared::core::ids::{AssignmentId, CommitteeId, EventId, VolunteerId};

pub const COMMITTEE: CommitteeId = CommitteeId(2);

pub struct AssignmentBuilder {
    inner: Assignment,
}

#[allow(dead_code)]
impl AssignmentBuilder {
    pub fn new(id: i64, volunteer_id: i64) -> Self {
        Self {
            inner: Assignment {
                id: AssignmentId(id),
                event_id: Some(EventId(1)),
                committee_id: Some(COMMITTEE),
                volunteer_id: VolunteerId(volunteer_id),
                volunteer_name: Some(format!("Volunteer {volunteer_id}")),
                volunteer_email: None,
                volunteer_phone: None,
                volunteer_college_id: None,
                role: Some("volunteer".to_string()),
                shift: None,
                reporting_time: None,
                start_time: None,
                end_time: None,
                status: AssignmentStatus::Assigned,
                notes: None,
            },
        }
    }

    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.inner.volunteer_name = Some(v.into());
        self
    }

    pub fn email(mut self, v: impl Into<String>) -> Self {
        self.inner.volunteer_email = Some(v.into());
        self
    }

    pub fn college_id(mut self, v: impl Into<String>) -> Self {
        self.inner.volunteer_college_id = Some(v.into());
        self
    }

    pub fn shift(mut self, v: impl Into<String>) -> Self {
        self.inner.shift = Some(v.into());
        self
    }

    pub fn notes(mut self, v: impl Into<String>) -> Self {
        self.inner.notes = Some(v.into());
        self
    }

    pub fn committee(mut self, v: CommitteeId) -> Self {
        self.inner.committee_id = Some(v);
        self
    }

    pub fn build(self) -> Assignment {
        self.inner
    }
}

pub fn make_assignment(id: i64, volunteer_id: i64, shift: &str, notes: &str) -> Assignment {
    AssignmentBuilder::new(id, volunteer_id)
        .shift(shift)
        .notes(notes)
        .build()
}
