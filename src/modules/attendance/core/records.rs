use crate::shared::core::ids::{AssignmentId, AttendanceId, CommitteeId, EventId, VolunteerId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    #[serde(default)]
    pub assignment_id: Option<AssignmentId>,
    pub volunteer_id: VolunteerId,
    #[serde(default)]
    pub check_in_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub check_out_time: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    /// Checked in and not yet checked out.
    pub fn is_open(&self) -> bool {
        self.check_out_time.is_none()
    }
}

/// Location is not captured by this client; the backend receives 0,0.
#[derive(Debug, Clone, Serialize)]
pub struct CheckinRequest {
    pub assignment_id: AssignmentId,
    pub lat: f64,
    pub lng: f64,
    pub time: DateTime<Utc>,
}

impl CheckinRequest {
    pub fn new(assignment_id: AssignmentId, time: DateTime<Utc>) -> Self {
        Self {
            assignment_id,
            lat: 0.0,
            lng: 0.0,
            time,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckinReceipt {
    pub attendance_id: AttendanceId,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub attendance_id: AttendanceId,
    pub time: DateTime<Utc>,
}

/// Query parameters of the checkout-by-shift call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftCheckout {
    pub event_id: EventId,
    pub committee_id: CommitteeId,
    pub shift: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShiftCheckoutReceipt {
    #[serde(default)]
    pub message: Option<String>,
}

/// Filter shared by the missed check-in listing and the attendance export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceQuery {
    pub committee_id: CommitteeId,
    pub date: NaiveDate,
    pub shift: Option<String>,
}

/// An assignment whose volunteer never checked in on the queried day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissedCheckin {
    pub volunteer_id: VolunteerId,
    #[serde(default)]
    pub volunteer_name: Option<String>,
    #[serde(default)]
    pub assignment_id: Option<AssignmentId>,
    #[serde(default)]
    pub shift: Option<String>,
}
