use crate::modules::attendance::core::view::VolunteerAttendance;
use crate::modules::volunteers::core::assignment::Assignment;
use crate::modules::volunteers::core::notes::ShiftGroup;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolunteerFilter {
    pub search: String,
    pub shift: Option<String>,
    pub group: Option<ShiftGroup>,
}

impl VolunteerFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            ..Self::default()
        }
    }

    pub fn with_shift(mut self, shift: impl Into<String>) -> Self {
        self.shift = Some(shift.into());
        self
    }

    pub fn with_group(mut self, group: ShiftGroup) -> Self {
        self.group = Some(group);
        self
    }
}

fn matches_search(volunteer: &VolunteerAttendance, needle: &str) -> bool {
    needle.is_empty()
        || [&volunteer.name, &volunteer.college_id, &volunteer.email]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

fn matches_group(
    volunteer: &VolunteerAttendance,
    assignments: &[Assignment],
    selected: &ShiftGroup,
) -> bool {
    assignments
        .iter()
        .find(|a| a.volunteer_id == volunteer.volunteer_id)
        .and_then(Assignment::group)
        .is_some_and(|group| &group == selected)
}

pub fn filter_volunteers<'a>(
    all: &'a [VolunteerAttendance],
    assignments: &[Assignment],
    filter: &VolunteerFilter,
) -> Vec<&'a VolunteerAttendance> {
    let needle = filter.search.to_lowercase();
    all.iter()
        .filter(|v| matches_search(v, &needle))
        .filter(|v| {
            filter
                .shift
                .as_deref()
                .is_none_or(|shift| v.shift.as_deref() == Some(shift))
        })
        .filter(|v| {
            filter
                .group
                .as_ref()
                .is_none_or(|group| matches_group(v, assignments, group))
        })
        .collect()
}
