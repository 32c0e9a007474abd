use crate::shared::core::ids::CommitteeId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A running shift. Shifts are not stored server-side; this value object is the
/// single client-side record of which shift a committee is tracking, and on which day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveShift {
    pub committee_id: CommitteeId,
    pub shift_label: String,
    pub date: NaiveDate,
}

impl ActiveShift {
    pub fn new(committee_id: CommitteeId, shift_label: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            committee_id,
            shift_label: shift_label.into(),
            date,
        }
    }
}
