// Per-volunteer merge of an assignment with its open attendance record.
//
// Rebuilt from scratch on every fetch. Outside an active shift every entry is
// `Assigned`; during one, an entry is `Present` iff an open record exists for
// the volunteer, otherwise `Absent`.

use crate::modules::attendance::core::records::{AttendanceRecord, MissedCheckin};
use crate::modules::committees::core::committee::AttendanceCounts;
use crate::modules::volunteers::core::assignment::Assignment;
use crate::shared::core::ids::{AssignmentId, AttendanceId, VolunteerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MISSING_COLLEGE_ID: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Assigned,
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerAttendance {
    pub volunteer_id: VolunteerId,
    pub name: String,
    pub college_id: String,
    pub email: String,
    pub assignment_id: Option<AssignmentId>,
    pub shift: Option<String>,
    pub status: AttendanceStatus,
    pub attendance_id: Option<AttendanceId>,
    #[serde(default)]
    pub missed_checkin: bool,
}

impl VolunteerAttendance {
    pub fn from_assignment(assignment: &Assignment) -> Self {
        let id = assignment.volunteer_id;
        Self {
            volunteer_id: id,
            name: assignment
                .volunteer_name
                .clone()
                .unwrap_or_else(|| format!("Volunteer {id}")),
            college_id: assignment
                .volunteer_college_id
                .clone()
                .unwrap_or_else(|| MISSING_COLLEGE_ID.to_string()),
            email: assignment
                .volunteer_email
                .clone()
                .unwrap_or_else(|| format!("volunteer{id}@example.com")),
            assignment_id: Some(assignment.id),
            shift: assignment.shift.clone(),
            status: AttendanceStatus::Assigned,
            attendance_id: None,
            missed_checkin: false,
        }
    }

    pub fn from_missed(missed: &MissedCheckin) -> Self {
        let id = missed.volunteer_id;
        Self {
            volunteer_id: id,
            name: missed
                .volunteer_name
                .clone()
                .unwrap_or_else(|| format!("Volunteer {id}")),
            college_id: MISSING_COLLEGE_ID.to_string(),
            email: MISSING_COLLEGE_ID.to_string(),
            assignment_id: missed.assignment_id,
            shift: missed.shift.clone(),
            status: AttendanceStatus::Absent,
            attendance_id: None,
            missed_checkin: true,
        }
    }

    pub fn is_present(&self) -> bool {
        self.status == AttendanceStatus::Present
    }
}

pub fn join(
    assignments: &[Assignment],
    records: &[AttendanceRecord],
    shift_active: bool,
) -> Vec<VolunteerAttendance> {
    let open: HashMap<VolunteerId, AttendanceId> = records
        .iter()
        .filter(|r| r.is_open())
        .map(|r| (r.volunteer_id, r.id))
        .collect();

    assignments
        .iter()
        .map(|assignment| {
            let mut entry = VolunteerAttendance::from_assignment(assignment);
            if shift_active {
                match open.get(&entry.volunteer_id) {
                    Some(attendance_id) => {
                        entry.status = AttendanceStatus::Present;
                        entry.attendance_id = Some(*attendance_id);
                    }
                    None => entry.status = AttendanceStatus::Absent,
                }
            }
            entry
        })
        .collect()
}

pub fn tally(volunteers: &[VolunteerAttendance]) -> AttendanceCounts {
    let count = |status| volunteers.iter().filter(|v| v.status == status).count();
    AttendanceCounts {
        total_volunteers: volunteers.len(),
        present: count(AttendanceStatus::Present),
        absent: count(AttendanceStatus::Absent),
    }
}
