// Decoding of the assignment `notes` field.
//
// The backend stores a volunteer's group and group coordinator as free text:
// "<group>,<coordinator>[,anything else]". Only the first two comma segments
// matter; each is trimmed. Notes with fewer than two segments carry no group.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShiftGroup {
    pub group: String,
    pub coordinator: String,
}

impl ShiftGroup {
    pub fn new(group: impl Into<String>, coordinator: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            coordinator: coordinator.into(),
        }
    }

    pub fn decode(notes: &str) -> Option<Self> {
        let mut segments = notes.split(',').map(str::trim);
        let group = segments.next()?;
        let coordinator = segments.next()?;
        Some(Self::new(group, coordinator))
    }
}

impl fmt::Display for ShiftGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.group, self.coordinator)
    }
}

#[cfg(test)]
mod shift_group_notes_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("TeamA, Alice", Some(("TeamA", "Alice")))]
    #[case("TeamB,Bob", Some(("TeamB", "Bob")))]
    #[case("  Gate 3 ,  Ravi , bring radios", Some(("Gate 3", "Ravi")))]
    #[case("TeamC,", Some(("TeamC", "")))]
    #[case("TeamC", None)]
    #[case("", None)]
    fn it_should_decode_the_first_two_segments(
        #[case] notes: &str,
        #[case] expected: Option<(&str, &str)>,
    ) {
        let decoded = ShiftGroup::decode(notes);
        assert_eq!(
            decoded,
            expected.map(|(group, coordinator)| ShiftGroup::new(group, coordinator))
        );
    }

    #[rstest]
    fn it_should_display_group_and_coordinator() {
        assert_eq!(ShiftGroup::new("TeamA", "Alice").to_string(), "TeamA - Alice");
    }
}
