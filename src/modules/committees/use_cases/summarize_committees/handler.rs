// Committee cards with live attendance counts.
//
// Counts come from the committee's assignments and its open attendance records.
// When either stats call fails the card falls back to the stored volunteer count.

use crate::modules::attendance::core::ports::AttendanceApi;
use crate::modules::committees::core::committee::{AttendanceCounts, Committee, CommitteeSummary};
use crate::modules::committees::core::ports::CommitteesApi;
use crate::shared::infrastructure::api_client::ApiError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

pub const STATS_PAGE_SIZE: u32 = 500;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("failed to load committees: {0}")]
    Committees(#[source] ApiError),
}

pub struct SummarizeCommitteesHandler<TCommittees, TAttendance>
where
    TCommittees: CommitteesApi + 'static,
    TAttendance: AttendanceApi + 'static,
{
    committees: Arc<TCommittees>,
    attendance: Arc<TAttendance>,
}

impl<TCommittees, TAttendance> SummarizeCommitteesHandler<TCommittees, TAttendance>
where
    TCommittees: CommitteesApi + 'static,
    TAttendance: AttendanceApi + 'static,
{
    pub fn new(committees: Arc<TCommittees>, attendance: Arc<TAttendance>) -> Self {
        Self {
            committees,
            attendance,
        }
    }

    pub async fn summarize(&self, committee: Committee) -> CommitteeSummary {
        let (assignments, open) = tokio::join!(
            self.attendance
                .assignments_for_committee(committee.id, STATS_PAGE_SIZE),
            self.attendance
                .active_in_committee(committee.id, STATS_PAGE_SIZE),
        );
        match (assignments, open) {
            (Ok(assignments), Ok(open)) => {
                let counts = AttendanceCounts::from_totals(assignments.len(), open.len());
                debug!(committee_id = %committee.id, ?counts, "committee stats loaded");
                CommitteeSummary::live(committee, counts)
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(committee_id = %committee.id, error = %err, "stats unavailable, using stored count");
                CommitteeSummary::fallback(committee)
            }
        }
    }

    pub async fn handle(&self, limit: u32) -> Result<Vec<CommitteeSummary>, SummaryError> {
        let committees = self
            .committees
            .list(limit)
            .await
            .map_err(SummaryError::Committees)?;
        let mut summaries = Vec::with_capacity(committees.len());
        for committee in committees {
            summaries.push(self.summarize(committee).await);
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod summarize_committees_handler_tests {
    use super::*;
    use crate::modules::attendance::adapters::outbound::attendance_in_memory::InMemoryAttendanceApi;
    use crate::modules::committees::adapters::outbound::committees_in_memory::InMemoryCommitteesApi;
    use crate::shared::core::ids::{CommitteeId, EventId, VolunteerId};
    use crate::tests::fixtures::assignments::{COMMITTEE, make_assignment};
    use rstest::{fixture, rstest};

    fn committee(id: CommitteeId, volunteer_count: Option<u32>) -> Committee {
        Committee {
            id,
            event_id: Some(EventId(1)),
            name: format!("Committee {id}"),
            description: None,
            volunteer_count,
        }
    }

    #[fixture]
    fn before_each() -> (Arc<InMemoryCommitteesApi>, Arc<InMemoryAttendanceApi>) {
        (
            Arc::new(InMemoryCommitteesApi::with_committees(vec![
                committee(COMMITTEE, Some(9)),
                committee(CommitteeId(3), Some(4)),
            ])),
            Arc::new(InMemoryAttendanceApi::with_assignments(vec![
                make_assignment(11, 1, "Morning", ""),
                make_assignment(12, 2, "Morning", ""),
                make_assignment(13, 3, "Evening", ""),
            ])),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_count_from_assignments_and_open_records(
        before_each: (Arc<InMemoryCommitteesApi>, Arc<InMemoryAttendanceApi>),
    ) {
        let (committees, attendance) = before_each;
        attendance.checkin_elsewhere(VolunteerId(2)).await;
        let summaries = SummarizeCommitteesHandler::new(committees, attendance)
            .handle(20)
            .await
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].counts, AttendanceCounts::from_totals(3, 1));
        assert!(!summaries[0].stats_stale);
        assert_eq!(summaries[1].counts.total_volunteers, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fall_back_to_the_stored_count_when_stats_fail(
        before_each: (Arc<InMemoryCommitteesApi>, Arc<InMemoryAttendanceApi>),
    ) {
        let (committees, attendance) = before_each;
        attendance.set_offline(true);
        let summaries = SummarizeCommitteesHandler::new(committees, attendance)
            .handle(20)
            .await
            .unwrap();

        assert!(summaries.iter().all(|s| s.stats_stale));
        assert_eq!(summaries[0].counts, AttendanceCounts::from_totals(9, 0));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_when_the_committee_list_is_unavailable(
        before_each: (Arc<InMemoryCommitteesApi>, Arc<InMemoryAttendanceApi>),
    ) {
        let (committees, attendance) = before_each;
        committees.set_offline(true);
        let result = SummarizeCommitteesHandler::new(committees, attendance)
            .handle(20)
            .await;
        assert!(matches!(result, Err(SummaryError::Committees(ApiError::Network(_)))));
    }
}
