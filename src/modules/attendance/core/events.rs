use crate::modules::attendance::core::records::{AttendanceRecord, MissedCheckin};
use crate::modules::attendance::core::shift::ActiveShift;
use crate::modules::attendance::core::view::VolunteerAttendance;
use crate::modules::volunteers::core::assignment::Assignment;
use crate::shared::core::ids::{AttendanceId, VolunteerId};

/// Everything that can change a committee roster. Server results are the only
/// source of truth; `SnapshotRestored` only seeds an empty roster.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterEvent {
    AssignmentsLoaded(Vec<Assignment>),
    AttendanceLoaded {
        assignments: Vec<Assignment>,
        records: Vec<AttendanceRecord>,
    },
    ShiftSelected(Option<String>),
    ShiftStarted(ActiveShift),
    ShiftEnded,
    CheckedIn {
        volunteer_id: VolunteerId,
        attendance_id: AttendanceId,
    },
    CheckedOut {
        volunteer_id: VolunteerId,
    },
    MissedCheckinsLoaded(Vec<MissedCheckin>),
    SnapshotRestored {
        active: ActiveShift,
        volunteers: Vec<VolunteerAttendance>,
    },
}
