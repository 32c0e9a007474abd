use crate::modules::attendance::core::shift::ActiveShift;
use crate::shared::core::ids::{AttendanceId, CommitteeId};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    CheckedIn(AttendanceId),
    CheckedOut,
    /// Another toggle for the same volunteer is still in flight.
    Ignored,
    /// The backend already had the volunteer checked in; the roster was refetched.
    Resynced,
    /// Present without a known record, or absent without an assignment.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndedShift {
    pub shift: ActiveShift,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub fn export_file_name(committee_id: CommitteeId, shift: Option<&str>, date: NaiveDate) -> String {
    let shift = shift.unwrap_or("all-shifts");
    format!("attendance-committee-{committee_id}-{shift}-{date}.csv")
}

#[cfg(test)]
mod track_attendance_outcome_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("Morning"), "attendance-committee-2-Morning-2025-03-15.csv")]
    #[case(None, "attendance-committee-2-all-shifts-2025-03-15.csv")]
    fn it_should_name_the_export_after_committee_shift_and_date(
        #[case] shift: Option<&str>,
        #[case] expected: &str,
    ) {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(export_file_name(CommitteeId(2), shift, date), expected);
    }
}
