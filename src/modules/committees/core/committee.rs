use crate::shared::core::ids::{CommitteeId, EventId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committee {
    pub id: CommitteeId,
    pub event_id: Option<EventId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Server-side count; only used when live stats cannot be fetched.
    #[serde(default)]
    pub volunteer_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCommittee {
    pub event_id: EventId,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CommitteeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttendanceCounts {
    pub total_volunteers: usize,
    pub present: usize,
    pub absent: usize,
}

impl AttendanceCounts {
    pub fn from_totals(total_volunteers: usize, present: usize) -> Self {
        Self {
            total_volunteers,
            present,
            absent: total_volunteers.saturating_sub(present),
        }
    }
}

/// Committee plus counts recomputed from assignments and open attendance on every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeSummary {
    pub committee: Committee,
    pub counts: AttendanceCounts,
    pub stats_stale: bool,
}

impl CommitteeSummary {
    pub fn live(committee: Committee, counts: AttendanceCounts) -> Self {
        Self {
            committee,
            counts,
            stats_stale: false,
        }
    }

    /// Counts taken from the committee record when live stats are unavailable.
    pub fn fallback(committee: Committee) -> Self {
        let total = committee.volunteer_count.unwrap_or(0) as usize;
        Self {
            committee,
            counts: AttendanceCounts::from_totals(total, 0),
            stats_stale: true,
        }
    }
}
