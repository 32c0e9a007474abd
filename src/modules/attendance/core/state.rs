use crate::modules::attendance::core::shift::ActiveShift;
use crate::modules::attendance::core::view::VolunteerAttendance;
use crate::modules::volunteers::core::assignment::Assignment;
use crate::shared::core::ids::{CommitteeId, VolunteerId};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftPhase {
    Idle { selected: Option<String> },
    Active(ActiveShift),
}

/// Client-local roster of one committee on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterState {
    pub committee_id: CommitteeId,
    pub date: NaiveDate,
    pub phase: ShiftPhase,
    pub assignments: Vec<Assignment>,
    pub volunteers: Vec<VolunteerAttendance>,
}

impl RosterState {
    pub fn new(committee_id: CommitteeId, date: NaiveDate) -> Self {
        Self {
            committee_id,
            date,
            phase: ShiftPhase::Idle { selected: None },
            assignments: Vec::new(),
            volunteers: Vec::new(),
        }
    }

    pub fn is_shift_active(&self) -> bool {
        matches!(self.phase, ShiftPhase::Active(_))
    }

    pub fn active_shift(&self) -> Option<&ActiveShift> {
        match &self.phase {
            ShiftPhase::Active(active) => Some(active),
            ShiftPhase::Idle { .. } => None,
        }
    }

    pub fn selected_shift(&self) -> Option<&str> {
        match &self.phase {
            ShiftPhase::Active(active) => Some(&active.shift_label),
            ShiftPhase::Idle { selected } => selected.as_deref(),
        }
    }

    pub fn volunteer(&self, volunteer_id: VolunteerId) -> Option<&VolunteerAttendance> {
        self.volunteers
            .iter()
            .find(|v| v.volunteer_id == volunteer_id)
    }
}

#[cfg(test)]
mod roster_state_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_start_idle_without_a_selection() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let state = RosterState::new(CommitteeId(2), date);
        assert!(!state.is_shift_active());
        assert_eq!(state.selected_shift(), None);
        assert!(state.volunteers.is_empty());
    }

    #[rstest]
    fn it_should_report_the_active_label_as_the_selection() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let mut state = RosterState::new(CommitteeId(2), date);
        state.phase = ShiftPhase::Active(ActiveShift::new(CommitteeId(2), "Morning", date));
        assert_eq!(state.selected_shift(), Some("Morning"));
        assert_eq!(state.active_shift().map(|a| a.date), Some(date));
    }
}
