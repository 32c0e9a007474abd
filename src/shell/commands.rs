// Composition root: builds the HTTP adapters over one shared gateway client and
// runs a single CLI command against them.

use crate::modules::announcements::adapters::outbound::announcements_http::HttpAnnouncementsApi;
use crate::modules::announcements::core::announcement::{
    Announcement, AnnouncementQuery, NewAnnouncement,
};
use crate::modules::announcements::core::ports::AnnouncementsApi;
use crate::modules::attendance::adapters::outbound::attendance_http::HttpAttendanceApi;
use crate::modules::attendance::core::filter::VolunteerFilter;
use crate::modules::attendance::core::view::VolunteerAttendance;
use crate::modules::attendance::use_cases::track_attendance::handler::AttendanceTracker;
use crate::modules::auth::adapters::outbound::auth_http::HttpAuthApi;
use crate::modules::auth::use_cases::manage_session::handler::SessionManager;
use crate::modules::committees::adapters::outbound::committees_http::HttpCommitteesApi;
use crate::modules::committees::core::committee::{CommitteeSummary, NewCommittee};
use crate::modules::committees::core::ports::CommitteesApi;
use crate::modules::committees::use_cases::summarize_committees::handler::SummarizeCommitteesHandler;
use crate::modules::committees::use_cases::summarize_committees::poller::{
    DashboardLoader, DashboardPoller, DashboardSnapshot,
};
use crate::modules::volunteers::adapters::outbound::volunteers_http::{
    HttpAssignmentsApi, HttpVolunteersApi,
};
use crate::modules::volunteers::core::assignment::AssignmentSchedule;
use crate::modules::volunteers::core::notes::ShiftGroup;
use crate::modules::volunteers::core::ports::{AssignmentsApi, VolunteersApi};
use crate::modules::volunteers::core::volunteer::NewVolunteer;
use crate::modules::volunteers::use_cases::enroll_volunteer::handler::{
    EnrollRequest, EnrollVolunteerHandler,
};
use crate::shared::core::ids::{AnnouncementId, CommitteeId, EventId, VolunteerId};
use crate::shared::infrastructure::api_client::ApiClient;
use crate::shared::infrastructure::local_store::LocalStore;
use crate::shared::infrastructure::local_store::json_file::JsonFileStore;
use crate::shell::cli::{Command, ExportTarget, FilterArgs, RosterArgs};
use crate::shell::config::AppConfig;
use anyhow::{Context, bail};
use chrono::{Local, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::info;

const VOLUNTEER_LOOKUP_LIMIT: u32 = 500;

pub struct App {
    config: AppConfig,
    store: Arc<dyn LocalStore>,
    client: Arc<ApiClient>,
}

impl App {
    pub async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn LocalStore> = Arc::new(JsonFileStore::open(config.state_path.clone()).await);
        let client = ApiClient::new(config.api_base_url.clone(), config.http_timeout, store.clone())
            .context("failed to build the HTTP client")?;
        info!(base_url = %config.api_base_url, "api client ready");
        Ok(Self {
            config,
            store,
            client: Arc::new(client),
        })
    }

    fn event_id(&self) -> EventId {
        EventId(self.config.event_id)
    }

    fn session(&self) -> SessionManager<HttpAuthApi> {
        SessionManager::new(
            Arc::new(HttpAuthApi::new(self.client.clone())),
            self.store.clone(),
        )
    }

    fn committees(&self) -> Arc<HttpCommitteesApi> {
        Arc::new(HttpCommitteesApi::new(self.client.clone()))
    }

    fn attendance(&self) -> Arc<HttpAttendanceApi> {
        Arc::new(HttpAttendanceApi::new(self.client.clone()))
    }

    fn announcements(&self) -> Arc<HttpAnnouncementsApi> {
        Arc::new(HttpAnnouncementsApi::new(self.client.clone()))
    }

    fn volunteers(&self) -> Arc<HttpVolunteersApi> {
        Arc::new(HttpVolunteersApi::new(self.client.clone()))
    }

    fn assignments(&self) -> Arc<HttpAssignmentsApi> {
        Arc::new(HttpAssignmentsApi::new(self.client.clone()))
    }

    /// Tracker with the persisted shift state already restored.
    async fn tracker(
        &self,
        roster: &RosterArgs,
    ) -> anyhow::Result<AttendanceTracker<HttpAttendanceApi>> {
        let date = roster.date.unwrap_or_else(|| Local::now().date_naive());
        let tracker = AttendanceTracker::new(
            self.event_id(),
            CommitteeId(roster.committee),
            date,
            self.attendance(),
            self.store.clone(),
        );
        tracker.restore().await?;
        Ok(tracker)
    }

    pub async fn run(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Login { email, password } => {
                let user = self.session().login(&email, &password).await?;
                println!("Signed in as {} <{}>", user.display_name, user.email);
            }
            Command::Logout => {
                self.session().logout().await?;
                println!("Signed out");
            }
            Command::Me => match self.session().restore().await? {
                Some(user) => println!("{} <{}> role={}", user.display_name, user.email, user.role.as_str()),
                None => println!("Not signed in"),
            },
            Command::Committees { limit } => {
                let summaries = SummarizeCommitteesHandler::new(self.committees(), self.attendance())
                    .handle(limit)
                    .await?;
                summaries.iter().for_each(print_summary);
            }
            Command::CommitteeCreate { name, description } => {
                let created = self
                    .committees()
                    .create(&NewCommittee {
                        event_id: self.event_id(),
                        name,
                        description,
                    })
                    .await?;
                println!("Created committee {} ({})", created.id, created.name);
            }
            Command::CommitteeDelete { id } => {
                self.committees().delete(CommitteeId(id)).await?;
                println!("Deleted committee {id}");
            }
            Command::Roster { roster, filter } => self.roster(&roster, &filter).await?,
            Command::StartShift { roster, shift } => {
                let tracker = self.tracker(&roster).await?;
                tracker.start_shift(&shift).await?;
                let (present, total) = tracker.shift_counts(&shift);
                println!("Shift {shift} started: {present}/{total} present");
            }
            Command::EndShift { roster } => {
                let tracker = self.tracker(&roster).await?;
                let ended = tracker.end_shift().await?;
                println!(
                    "{}",
                    ended
                        .message
                        .unwrap_or_else(|| format!("Shift {} ended", ended.shift.shift_label))
                );
            }
            Command::Toggle { roster, volunteer } => {
                let tracker = self.tracker(&roster).await?;
                let outcome = tracker.toggle_attendance(VolunteerId(volunteer)).await?;
                println!("{outcome:?}");
                if let Some(notice) = tracker.notice() {
                    eprintln!("{notice}");
                }
            }
            Command::Missed { roster, shift } => {
                let tracker = self.tracker(&roster).await?;
                tracker.load_attendance_view().await?;
                let missed = tracker.missed_checkins(shift.as_deref()).await?;
                println!("{} volunteers missed check-in", missed.len());
                tracker
                    .filtered(&VolunteerFilter::default())
                    .iter()
                    .filter(|v| v.missed_checkin)
                    .for_each(print_volunteer);
            }
            Command::Announcements {
                committee,
                mine,
                limit,
            } => {
                let query = AnnouncementQuery {
                    active_only: true,
                    limit: Some(limit),
                    committee_id: committee.map(CommitteeId),
                };
                let api = self.announcements();
                let rows = if mine {
                    api.mine(query).await?
                } else {
                    api.list(query).await?
                };
                rows.iter().for_each(print_announcement);
            }
            Command::Announce {
                title,
                body,
                priority,
                committee,
            } => {
                let Some(payload) = NewAnnouncement::new(self.event_id(), &title, &body, Utc::now())
                else {
                    bail!("title and body are required");
                };
                let payload = payload
                    .priority(priority.into())
                    .for_committee(committee.map(CommitteeId));
                let created = self.announcements().create(&payload).await?;
                println!("Posted announcement {}", created.id);
            }
            Command::AnnouncementDelete { id } => {
                self.announcements().delete(AnnouncementId(id)).await?;
                println!("Deleted announcement {id}");
            }
            Command::Volunteers { limit } => {
                for v in self.volunteers().list(limit).await? {
                    println!(
                        "{:>5}  {:<28} {:<32} {}",
                        v.id,
                        v.name,
                        v.email.as_deref().unwrap_or("-"),
                        v.college_id.as_deref().unwrap_or("-")
                    );
                }
            }
            Command::AddVolunteer {
                committee,
                name,
                email,
                phone,
                dept,
                college_id,
                shift,
                notes,
                role,
            } => {
                let known = self.volunteers().list(VOLUNTEER_LOOKUP_LIMIT).await?;
                let handler = EnrollVolunteerHandler::new(
                    self.event_id(),
                    CommitteeId(committee),
                    self.volunteers(),
                    self.assignments(),
                );
                let request = EnrollRequest {
                    volunteer: NewVolunteer {
                        name,
                        email: Some(email),
                        phone,
                        dept,
                        college_id,
                    },
                    schedule: AssignmentSchedule {
                        role,
                        shift,
                        notes,
                        ..AssignmentSchedule::default()
                    },
                };
                let outcome = handler.handle(request, &known).await?;
                let verb = if outcome.reused_existing { "Assigned existing" } else { "Created" };
                println!(
                    "{verb} volunteer {} (assignment {})",
                    outcome.volunteer_id, outcome.assignment.id
                );
            }
            Command::BulkUpload { committee, file } => {
                let bytes = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("failed to read {}", file.display()))?;
                let file_name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "upload.csv".to_string());
                let report = self
                    .volunteers()
                    .bulk_upload(&file_name, bytes, self.event_id(), CommitteeId(committee))
                    .await?;
                println!("{}", report.summary());
                for warning in report.warnings() {
                    eprintln!("{warning}");
                }
            }
            Command::Export { target } => self.export(target).await?,
            Command::Watch => self.watch().await?,
        }
        Ok(())
    }

    async fn roster(&self, roster: &RosterArgs, filter: &FilterArgs) -> anyhow::Result<()> {
        let tracker = self.tracker(roster).await?;
        tracker.load_assignments().await?;
        tracker.load_attendance_view().await?;

        let catalog = tracker.catalog();
        for shift in &catalog.shifts {
            let (present, total) = tracker.shift_counts(shift);
            let groups = catalog
                .groups_for(shift)
                .map(|g| g.iter().map(ShiftGroup::to_string).collect::<Vec<_>>().join("; "))
                .unwrap_or_default();
            println!("shift {shift}: {present}/{total} present  [{groups}]");
        }

        let group = match filter.group.as_deref() {
            Some(raw) => Some(
                ShiftGroup::decode(raw).context("group filter must look like \"group,coordinator\"")?,
            ),
            None => None,
        };
        let filter = VolunteerFilter {
            search: filter.search.clone(),
            shift: filter.shift.clone(),
            group,
        };
        tracker.filtered(&filter).iter().for_each(print_volunteer);

        let counts = tracker.counts();
        println!(
            "{} volunteers, {} present, {} absent",
            counts.total_volunteers, counts.present, counts.absent
        );
        if let Some(notice) = tracker.notice() {
            eprintln!("{notice}");
        }
        Ok(())
    }

    async fn export(&self, target: ExportTarget) -> anyhow::Result<()> {
        let (bytes, path) = match target {
            ExportTarget::Volunteers { out } => (
                self.volunteers().export_csv().await?,
                out.unwrap_or_else(|| PathBuf::from("volunteers.csv")),
            ),
            ExportTarget::Assignments { out } => (
                self.assignments().export_csv().await?,
                out.unwrap_or_else(|| PathBuf::from("assignments.csv")),
            ),
            ExportTarget::Attendance { roster, shift, out } => {
                let tracker = self.tracker(&roster).await?;
                let export = tracker.export_attendance(shift.as_deref()).await?;
                (export.bytes, out.unwrap_or_else(|| PathBuf::from(export.file_name)))
            }
        };
        write_file(&path, &bytes).await?;
        println!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    async fn watch(&self) -> anyhow::Result<()> {
        let summaries = SummarizeCommitteesHandler::new(self.committees(), self.attendance());
        let loader = Arc::new(DashboardLoader::new(summaries, self.announcements()));
        let poller = DashboardPoller::new(loader, self.config.poll_interval);

        // A terminal is always visible; the sender only has to outlive the poller.
        let (_visible, visibility) = watch::channel(true);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let (updates_tx, mut updates) = mpsc::channel(4);
        let task = tokio::spawn(poller.run(visibility, shutdown_rx, updates_tx));

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received, stopping dashboard");
                    shutdown.send(true).ok();
                    break;
                }
                snapshot = updates.recv() => match snapshot {
                    Some(snapshot) => print_dashboard(&snapshot),
                    None => break,
                },
            }
        }
        task.await.context("dashboard poller panicked")?;
        Ok(())
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

fn print_summary(summary: &CommitteeSummary) {
    let stale = if summary.stats_stale { " (stale)" } else { "" };
    println!(
        "{:>4}  {:<28} total={} present={} absent={}{stale}",
        summary.committee.id,
        summary.committee.name,
        summary.counts.total_volunteers,
        summary.counts.present,
        summary.counts.absent,
    );
}

fn print_volunteer(volunteer: &VolunteerAttendance) {
    let missed = if volunteer.missed_checkin { " missed" } else { "" };
    println!(
        "{:>5}  {:<28} {:<12} {:<10} {:?}{missed}",
        volunteer.volunteer_id,
        volunteer.name,
        volunteer.college_id,
        volunteer.shift.as_deref().unwrap_or("-"),
        volunteer.status,
    );
}

fn print_announcement(announcement: &Announcement) {
    let scope = announcement
        .committee_id
        .map(|c| format!("committee {c}"))
        .unwrap_or_else(|| "general".to_string());
    println!(
        "#{} [{:?}] {} ({scope})\n    {}",
        announcement.id, announcement.priority, announcement.title, announcement.body
    );
}

fn print_dashboard(snapshot: &DashboardSnapshot) {
    println!("--- {} ---", Local::now().format("%H:%M:%S"));
    snapshot.announcements.iter().for_each(print_announcement);
    snapshot.committees.iter().for_each(print_summary);
    if let Some(notice) = &snapshot.notice {
        eprintln!("{notice}");
    }
}
