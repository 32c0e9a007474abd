use crate::modules::attendance::core::events::RosterEvent;
use crate::modules::attendance::core::state::{RosterState, ShiftPhase};
use crate::modules::attendance::core::view::{self, AttendanceStatus, VolunteerAttendance};
use crate::shared::core::ids::VolunteerId;

fn update_one(
    volunteers: &mut [VolunteerAttendance],
    volunteer_id: VolunteerId,
    apply: impl FnOnce(&mut VolunteerAttendance),
) {
    if let Some(entry) = volunteers.iter_mut().find(|v| v.volunteer_id == volunteer_id) {
        apply(entry);
    }
}

pub fn evolve(mut state: RosterState, event: RosterEvent) -> RosterState {
    match event {
        RosterEvent::AssignmentsLoaded(assignments) => {
            state.assignments = assignments;
        }
        RosterEvent::AttendanceLoaded {
            assignments,
            records,
        } => {
            state.volunteers = view::join(&assignments, &records, state.is_shift_active());
            state.assignments = assignments;
        }
        RosterEvent::ShiftSelected(selected) => {
            if let ShiftPhase::Idle { .. } = state.phase {
                state.phase = ShiftPhase::Idle { selected };
            }
        }
        RosterEvent::ShiftStarted(active) => {
            state.phase = ShiftPhase::Active(active);
        }
        RosterEvent::ShiftEnded => {
            state.phase = ShiftPhase::Idle { selected: None };
            for volunteer in &mut state.volunteers {
                volunteer.status = AttendanceStatus::Assigned;
                volunteer.attendance_id = None;
            }
        }
        RosterEvent::CheckedIn {
            volunteer_id,
            attendance_id,
        } => update_one(&mut state.volunteers, volunteer_id, |v| {
            v.status = AttendanceStatus::Present;
            v.attendance_id = Some(attendance_id);
        }),
        RosterEvent::CheckedOut { volunteer_id } => {
            update_one(&mut state.volunteers, volunteer_id, |v| {
                v.status = AttendanceStatus::Absent;
                v.attendance_id = None;
            })
        }
        RosterEvent::MissedCheckinsLoaded(missed) => {
            state
                .volunteers
                .retain(|v| !missed.iter().any(|m| m.volunteer_id == v.volunteer_id));
            state
                .volunteers
                .extend(missed.iter().map(VolunteerAttendance::from_missed));
        }
        RosterEvent::SnapshotRestored { active, volunteers } => {
            state.phase = ShiftPhase::Active(active);
            if state.volunteers.is_empty() {
                state.volunteers = volunteers;
            }
        }
    }
    state
}

#[cfg(test)]
mod roster_evolve_tests {
    use super::*;
    use crate::modules::attendance::core::records::{AttendanceRecord, MissedCheckin};
    use crate::modules::attendance::core::shift::ActiveShift;
    use crate::shared::core::ids::{AssignmentId, AttendanceId, CommitteeId};
    use crate::tests::fixtures::assignments::make_assignment;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    fn open_record(id: i64, volunteer_id: i64) -> AttendanceRecord {
        AttendanceRecord {
            id: AttendanceId(id),
            assignment_id: None,
            volunteer_id: VolunteerId(volunteer_id),
            check_in_time: None,
            check_out_time: None,
        }
    }

    /// Active "Morning" shift with volunteers 1 and 2 present, 3 absent.
    #[fixture]
    fn before_each() -> RosterState {
        let active = ActiveShift::new(CommitteeId(2), "Morning", date());
        let state = evolve(
            RosterState::new(CommitteeId(2), date()),
            RosterEvent::ShiftStarted(active),
        );
        evolve(
            state,
            RosterEvent::AttendanceLoaded {
                assignments: vec![
                    make_assignment(11, 1, "Morning", "TeamA, Alice"),
                    make_assignment(12, 2, "Morning", "TeamA, Alice"),
                    make_assignment(13, 3, "Morning", "TeamB, Bob"),
                ],
                records: vec![open_record(100, 1), open_record(101, 2)],
            },
        )
    }

    #[rstest]
    fn it_should_flip_only_the_checked_out_volunteer(before_each: RosterState) {
        let before = before_each.clone();
        let after = evolve(
            before_each,
            RosterEvent::CheckedOut {
                volunteer_id: VolunteerId(1),
            },
        );
        let target = after.volunteer(VolunteerId(1)).unwrap();
        assert_eq!(target.status, AttendanceStatus::Absent);
        assert_eq!(target.attendance_id, None);
        assert_eq!(after.volunteers[1..], before.volunteers[1..]);
    }

    #[rstest]
    fn it_should_store_the_attendance_id_on_checkin(before_each: RosterState) {
        let after = evolve(
            before_each,
            RosterEvent::CheckedIn {
                volunteer_id: VolunteerId(3),
                attendance_id: AttendanceId(555),
            },
        );
        let target = after.volunteer(VolunteerId(3)).unwrap();
        assert!(target.is_present());
        assert_eq!(target.attendance_id, Some(AttendanceId(555)));
    }

    #[rstest]
    fn it_should_reset_everyone_when_the_shift_ends(before_each: RosterState) {
        let after = evolve(before_each, RosterEvent::ShiftEnded);
        assert_eq!(after.phase, ShiftPhase::Idle { selected: None });
        assert!(
            after
                .volunteers
                .iter()
                .all(|v| v.status == AttendanceStatus::Assigned && v.attendance_id.is_none())
        );
    }

    #[rstest]
    fn it_should_replace_entries_for_missed_checkins(before_each: RosterState) {
        let after = evolve(
            before_each,
            RosterEvent::MissedCheckinsLoaded(vec![MissedCheckin {
                volunteer_id: VolunteerId(3),
                volunteer_name: Some("Carol".into()),
                assignment_id: Some(AssignmentId(13)),
                shift: Some("Morning".into()),
            }]),
        );
        assert_eq!(after.volunteers.len(), 3);
        let missed = after.volunteer(VolunteerId(3)).unwrap();
        assert!(missed.missed_checkin);
        assert_eq!(missed.status, AttendanceStatus::Absent);
        assert_eq!(missed.name, "Carol");
    }

    #[rstest]
    fn it_should_ignore_selection_changes_while_a_shift_runs(before_each: RosterState) {
        let after = evolve(
            before_each.clone(),
            RosterEvent::ShiftSelected(Some("Evening".into())),
        );
        assert_eq!(after.phase, before_each.phase);
    }

    #[rstest]
    fn it_should_only_use_the_snapshot_as_a_placeholder(before_each: RosterState) {
        let active = ActiveShift::new(CommitteeId(2), "Morning", date());
        let placeholder = vec![];
        let after = evolve(
            before_each.clone(),
            RosterEvent::SnapshotRestored {
                active,
                volunteers: placeholder,
            },
        );
        assert_eq!(after.volunteers, before_each.volunteers);

        let snapshot = before_each.volunteers.clone();
        let restored = evolve(
            RosterState::new(CommitteeId(2), date()),
            RosterEvent::SnapshotRestored {
                active: ActiveShift::new(CommitteeId(2), "Morning", date()),
                volunteers: snapshot.clone(),
            },
        );
        assert!(restored.is_shift_active());
        assert_eq!(restored.volunteers, snapshot);
    }
}
