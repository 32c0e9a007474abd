use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! integer_id {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(pub i64);

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<i64> for $name {
                fn from(value: i64) -> Self {
                    Self(value)
                }
            }
        )+
    };
}

integer_id!(
    /// The event every committee, assignment and announcement belongs to.
    EventId,
    CommitteeId,
    VolunteerId,
    AssignmentId,
    AttendanceId,
    AnnouncementId,
    UserId,
);
