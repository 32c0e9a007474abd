use crate::modules::volunteers::core::notes::ShiftGroup;
use crate::modules::volunteers::core::volunteer::non_blank;
use crate::shared::core::ids::{AssignmentId, CommitteeId, EventId, VolunteerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    Assigned,
    Standby,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// A volunteer's placement in a committee, with a snapshot of the volunteer's contact data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    #[serde(default)]
    pub event_id: Option<EventId>,
    #[serde(default)]
    pub committee_id: Option<CommitteeId>,
    pub volunteer_id: VolunteerId,
    #[serde(default)]
    pub volunteer_name: Option<String>,
    #[serde(default)]
    pub volunteer_email: Option<String>,
    #[serde(default)]
    pub volunteer_phone: Option<String>,
    #[serde(default)]
    pub volunteer_college_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub shift: Option<String>,
    #[serde(default)]
    pub reporting_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: AssignmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Assignment {
    /// Shift label, if it carries any non-whitespace text.
    pub fn shift_label(&self) -> Option<&str> {
        self.shift.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn group(&self) -> Option<ShiftGroup> {
        self.notes.as_deref().and_then(ShiftGroup::decode)
    }
}

pub const DEFAULT_ROLE: &str = "volunteer";

#[derive(Debug, Clone, Serialize)]
pub struct NewAssignment {
    pub event_id: EventId,
    pub committee_id: CommitteeId,
    pub volunteer_id: VolunteerId,
    pub role: String,
    pub status: AssignmentStatus,
    pub reporting_time: Option<DateTime<Utc>>,
    pub shift: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl NewAssignment {
    pub fn new(event_id: EventId, committee_id: CommitteeId, volunteer_id: VolunteerId) -> Self {
        Self {
            event_id,
            committee_id,
            volunteer_id,
            role: DEFAULT_ROLE.to_string(),
            status: AssignmentStatus::Assigned,
            reporting_time: None,
            shift: None,
            start_time: None,
            end_time: None,
            notes: None,
        }
    }

    pub fn with_schedule(mut self, schedule: AssignmentSchedule) -> Self {
        if let Some(role) = non_blank(schedule.role) {
            self.role = role;
        }
        self.reporting_time = schedule.reporting_time;
        self.shift = non_blank(schedule.shift);
        self.start_time = schedule.start_time;
        self.end_time = schedule.end_time;
        self.notes = non_blank(schedule.notes);
        self
    }
}

/// Per-assignment details collected alongside a new volunteer.
#[derive(Debug, Clone, Default)]
pub struct AssignmentSchedule {
    pub role: Option<String>,
    pub reporting_time: Option<DateTime<Utc>>,
    pub shift: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AssignmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AssignmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
