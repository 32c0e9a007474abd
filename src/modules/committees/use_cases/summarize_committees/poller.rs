// Dashboard refresh loop.
//
// Loads active announcements and committee summaries on a fixed interval and
// immediately when the dashboard becomes visible again. Ticks that fire while
// hidden are skipped. Each load is sent to the consumer; the loop ends on the
// shutdown signal or once the consumer hangs up.

use crate::modules::announcements::core::announcement::{Announcement, AnnouncementQuery};
use crate::modules::announcements::core::ports::AnnouncementsApi;
use crate::modules::attendance::core::ports::AttendanceApi;
use crate::modules::committees::core::committee::CommitteeSummary;
use crate::modules::committees::core::ports::CommitteesApi;
use crate::modules::committees::use_cases::summarize_committees::handler::SummarizeCommitteesHandler;
use crate::shared::core::notice::Notice;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub const DASHBOARD_ANNOUNCEMENTS: u32 = 10;
pub const DASHBOARD_COMMITTEES: u32 = 20;

#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub announcements: Vec<Announcement>,
    pub committees: Vec<CommitteeSummary>,
    pub notice: Option<Notice>,
}

pub struct DashboardLoader<TCommittees, TAttendance, TAnnouncements>
where
    TCommittees: CommitteesApi + 'static,
    TAttendance: AttendanceApi + 'static,
    TAnnouncements: AnnouncementsApi + 'static,
{
    summaries: SummarizeCommitteesHandler<TCommittees, TAttendance>,
    announcements: Arc<TAnnouncements>,
}

impl<TCommittees, TAttendance, TAnnouncements>
    DashboardLoader<TCommittees, TAttendance, TAnnouncements>
where
    TCommittees: CommitteesApi + 'static,
    TAttendance: AttendanceApi + 'static,
    TAnnouncements: AnnouncementsApi + 'static,
{
    pub fn new(
        summaries: SummarizeCommitteesHandler<TCommittees, TAttendance>,
        announcements: Arc<TAnnouncements>,
    ) -> Self {
        Self {
            summaries,
            announcements,
        }
    }

    pub async fn load(&self) -> DashboardSnapshot {
        let query = AnnouncementQuery {
            active_only: true,
            limit: Some(DASHBOARD_ANNOUNCEMENTS),
            committee_id: None,
        };
        let (announcements, committees) = tokio::join!(
            self.announcements.list(query),
            self.summaries.handle(DASHBOARD_COMMITTEES),
        );
        match (announcements, committees) {
            (Ok(announcements), Ok(committees)) => DashboardSnapshot {
                announcements,
                committees,
                notice: None,
            },
            (announcements, committees) => {
                if let Err(err) = &announcements {
                    warn!(error = %err, "announcements unavailable");
                }
                if let Err(err) = &committees {
                    warn!(error = %err, "committees unavailable");
                }
                DashboardSnapshot {
                    announcements: announcements.unwrap_or_default(),
                    committees: committees.unwrap_or_default(),
                    notice: Some(Notice::error("Failed to load data")),
                }
            }
        }
    }
}

pub struct DashboardPoller<TCommittees, TAttendance, TAnnouncements>
where
    TCommittees: CommitteesApi + 'static,
    TAttendance: AttendanceApi + 'static,
    TAnnouncements: AnnouncementsApi + 'static,
{
    loader: Arc<DashboardLoader<TCommittees, TAttendance, TAnnouncements>>,
    interval: Duration,
}

impl<TCommittees, TAttendance, TAnnouncements>
    DashboardPoller<TCommittees, TAttendance, TAnnouncements>
where
    TCommittees: CommitteesApi + 'static,
    TAttendance: AttendanceApi + 'static,
    TAnnouncements: AnnouncementsApi + 'static,
{
    pub fn new(
        loader: Arc<DashboardLoader<TCommittees, TAttendance, TAnnouncements>>,
        interval: Duration,
    ) -> Self {
        Self { loader, interval }
    }

    /// Returns false once nobody listens anymore.
    async fn publish(&self, updates: &mpsc::Sender<DashboardSnapshot>) -> bool {
        let snapshot = self.loader.load().await;
        debug!(
            committees = snapshot.committees.len(),
            announcements = snapshot.announcements.len(),
            "dashboard refreshed"
        );
        updates.send(snapshot).await.is_ok()
    }

    pub async fn run(
        self,
        mut visibility: watch::Receiver<bool>,
        mut shutdown: watch::Receiver<bool>,
        updates: mpsc::Sender<DashboardSnapshot>,
    ) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = self.interval.as_secs(), "dashboard poller started");

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {
                    if !*visibility.borrow() {
                        debug!("dashboard hidden, skipping poll");
                        continue;
                    }
                    if !self.publish(&updates).await {
                        break;
                    }
                }
                changed = visibility.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    if *visibility.borrow_and_update() {
                        debug!("dashboard visible again, refreshing");
                        if !self.publish(&updates).await {
                            break;
                        }
                        ticker.reset();
                    }
                }
            }
        }
        info!("dashboard poller stopped");
    }
}
