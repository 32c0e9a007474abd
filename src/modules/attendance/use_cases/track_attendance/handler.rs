// Shift and attendance tracking for one committee on one day.
//
// Rules
// - Server fetches are the only source of truth. The local snapshot only seeds an empty roster.
// - Check-in, check-out and checkout-by-shift are never retried. A conflict on either toggle
//   triggers exactly one refetch instead.
// - At most one toggle per volunteer is in flight.
// - Once detached, results that arrive are dropped.

use crate::modules::attendance::core::catalog::{ShiftCatalog, derive_shift_catalog};
use crate::modules::attendance::core::events::RosterEvent;
use crate::modules::attendance::core::evolve::evolve;
use crate::modules::attendance::core::filter::{VolunteerFilter, filter_volunteers};
use crate::modules::attendance::core::ports::AttendanceApi;
use crate::modules::attendance::core::records::{
    AttendanceQuery, CheckinRequest, CheckoutRequest, MissedCheckin, ShiftCheckout,
};
use crate::modules::attendance::core::shift::ActiveShift;
use crate::modules::attendance::core::state::RosterState;
use crate::modules::attendance::core::view::{AttendanceStatus, VolunteerAttendance, tally};
use crate::modules::attendance::use_cases::track_attendance::outcome::{
    AttendanceExport, EndedShift, ToggleOutcome, export_file_name,
};
use crate::modules::committees::core::committee::AttendanceCounts;
use crate::modules::volunteers::core::assignment::Assignment;
use crate::shared::core::ids::{AssignmentId, AttendanceId, CommitteeId, EventId, VolunteerId};
use crate::shared::core::notice::{Notice, NoticeBoard, lock};
use crate::shared::infrastructure::api_client::ApiError;
use crate::shared::infrastructure::local_store::{LocalStore, keys, load_json, save_json};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const ROSTER_PAGE_SIZE: u32 = 500;
pub const ALREADY_CHECKED_IN: &str = "Volunteer is already checked in. Syncing status...";
pub const ALREADY_CHECKED_OUT: &str = "Volunteer is already checked out. Syncing status...";

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to load attendance data: {0}")]
    Fetch(#[source] ApiError),

    #[error("checkout failed: {0}")]
    Checkout(#[source] ApiError),

    #[error("check-in failed: {0}")]
    Checkin(#[source] ApiError),

    #[error("volunteer {0} is not on this roster")]
    UnknownVolunteer(VolunteerId),

    #[error("a shift label is required")]
    ShiftRequired,

    #[error("start a shift before taking attendance")]
    ShiftInactive,

    #[error("no shift is active")]
    NoActiveShift,
}

/// Marks a volunteer as mid-toggle until dropped.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<VolunteerId>>,
    volunteer_id: VolunteerId,
}

impl<'a> InFlight<'a> {
    fn acquire(set: &'a Mutex<HashSet<VolunteerId>>, volunteer_id: VolunteerId) -> Option<Self> {
        let inserted = lock(set).insert(volunteer_id);
        inserted.then(|| Self { set, volunteer_id })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.set).remove(&self.volunteer_id);
    }
}

pub struct AttendanceTracker<TApi>
where
    TApi: AttendanceApi + 'static,
{
    event_id: EventId,
    committee_id: CommitteeId,
    api: Arc<TApi>,
    store: Arc<dyn LocalStore>,
    state: Mutex<RosterState>,
    in_flight: Mutex<HashSet<VolunteerId>>,
    notices: NoticeBoard,
    detached: AtomicBool,
}

impl<TApi> AttendanceTracker<TApi>
where
    TApi: AttendanceApi + 'static,
{
    pub fn new(
        event_id: EventId,
        committee_id: CommitteeId,
        date: NaiveDate,
        api: Arc<TApi>,
        store: Arc<dyn LocalStore>,
    ) -> Self {
        Self {
            event_id,
            committee_id,
            api,
            store,
            state: Mutex::new(RosterState::new(committee_id, date)),
            in_flight: Mutex::new(HashSet::new()),
            notices: NoticeBoard::default(),
            detached: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> RosterState {
        lock(&self.state).clone()
    }

    pub fn volunteers(&self) -> Vec<VolunteerAttendance> {
        lock(&self.state).volunteers.clone()
    }

    pub fn active_shift(&self) -> Option<ActiveShift> {
        lock(&self.state).active_shift().cloned()
    }

    pub fn is_shift_active(&self) -> bool {
        lock(&self.state).is_shift_active()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notices.current()
    }

    pub fn dismiss_notice(&self) {
        self.notices.dismiss();
    }

    /// Stop applying results; calls still in flight resolve into nothing.
    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    fn apply(&self, event: RosterEvent) -> bool {
        if self.is_detached() {
            debug!(committee_id = %self.committee_id, "tracker detached, dropping result");
            return false;
        }
        let mut state = lock(&self.state);
        let placeholder = RosterState::new(state.committee_id, state.date);
        let current = std::mem::replace(&mut *state, placeholder);
        *state = evolve(current, event);
        true
    }

    fn post(&self, notice: Notice) {
        if !self.is_detached() {
            self.notices.post(notice);
        }
    }

    fn fetch_failed(&self, message: &str, err: ApiError) -> RosterError {
        warn!(committee_id = %self.committee_id, error = %err, "{message}");
        self.post(Notice::error(message));
        RosterError::Fetch(err)
    }

    async fn recall<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match load_json(&*self.store, key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "ignoring unreadable roster state");
                None
            }
        }
    }

    async fn remember<T: Serialize + Sync>(&self, key: &str, value: Option<&T>) {
        let result = match value {
            Some(value) => save_json(&*self.store, key, value).await,
            None => self.store.remove(key).await,
        };
        if let Err(err) = result {
            warn!(key, error = %err, "failed to persist roster state");
        }
    }

    async fn persist_snapshot(&self) {
        if self.is_detached() {
            return;
        }
        let (date, volunteers) = {
            let state = lock(&self.state);
            (state.date, state.volunteers.clone())
        };
        if volunteers.is_empty() {
            return;
        }
        let date_key = keys::snapshot_date(self.committee_id);
        let previous: Option<NaiveDate> = self.recall(&date_key).await;
        if let Some(stale) = previous.filter(|d| *d != date) {
            debug!(committee_id = %self.committee_id, %stale, "pruning old attendance snapshot");
            self.remember::<Vec<VolunteerAttendance>>(
                &keys::attendance_snapshot(self.committee_id, stale),
                None,
            )
            .await;
        }
        self.remember(
            &keys::attendance_snapshot(self.committee_id, date),
            Some(&volunteers),
        )
        .await;
        if previous != Some(date) {
            self.remember(&date_key, Some(&date)).await;
        }
    }

    /// Re-enter the persisted selection and, if a shift was running, the active phase.
    pub async fn restore(&self) -> Result<(), RosterError> {
        let selected: Option<String> = self.recall(&keys::selected_shift(self.committee_id)).await;
        self.apply(RosterEvent::ShiftSelected(selected));

        let active: Option<ActiveShift> = self.recall(&keys::active_shift(self.committee_id)).await;
        let Some(active) = active.filter(|a| a.committee_id == self.committee_id) else {
            return Ok(());
        };
        let snapshot: Vec<VolunteerAttendance> = self
            .recall(&keys::attendance_snapshot(self.committee_id, active.date))
            .await
            .unwrap_or_default();
        info!(
            committee_id = %self.committee_id,
            shift = %active.shift_label,
            placeholder = snapshot.len(),
            "resuming active shift"
        );
        self.apply(RosterEvent::SnapshotRestored {
            active,
            volunteers: snapshot,
        });
        self.load_attendance_view().await.map(|_| ())
    }

    pub async fn load_assignments(&self) -> Result<Vec<Assignment>, RosterError> {
        let assignments = self
            .api
            .assignments_for_committee(self.committee_id, ROSTER_PAGE_SIZE)
            .await
            .map_err(|err| self.fetch_failed("Failed to load assignments", err))?;
        debug!(committee_id = %self.committee_id, count = assignments.len(), "assignments loaded");
        self.apply(RosterEvent::AssignmentsLoaded(assignments.clone()));
        Ok(assignments)
    }

    pub fn catalog(&self) -> ShiftCatalog {
        derive_shift_catalog(&lock(&self.state).assignments)
    }

    /// Refetch assignments and open records and rebuild the roster from them.
    pub async fn load_attendance_view(&self) -> Result<Vec<VolunteerAttendance>, RosterError> {
        let (assignments, records) = tokio::join!(
            self.api
                .assignments_for_committee(self.committee_id, ROSTER_PAGE_SIZE),
            self.api
                .active_in_committee(self.committee_id, ROSTER_PAGE_SIZE),
        );
        let assignments =
            assignments.map_err(|err| self.fetch_failed("Failed to load attendance data", err))?;
        let records =
            records.map_err(|err| self.fetch_failed("Failed to load attendance data", err))?;

        if self.apply(RosterEvent::AttendanceLoaded {
            assignments,
            records,
        }) {
            self.persist_snapshot().await;
            let counts = self.counts();
            debug!(
                committee_id = %self.committee_id,
                total = counts.total_volunteers,
                present = counts.present,
                "attendance view rebuilt"
            );
        }
        Ok(self.volunteers())
    }

    /// Change the dropdown selection. Ignored while a shift runs.
    pub async fn select_shift(&self, shift: Option<String>) {
        if self.is_shift_active() {
            return;
        }
        let shift = shift.filter(|s| !s.trim().is_empty());
        self.apply(RosterEvent::ShiftSelected(shift.clone()));
        self.remember(&keys::selected_shift(self.committee_id), shift.as_ref())
            .await;
    }

    /// Shifts are client-side only: nothing is created on the server.
    pub async fn start_shift(
        &self,
        shift_label: &str,
    ) -> Result<Vec<VolunteerAttendance>, RosterError> {
        let shift_label = shift_label.trim();
        if shift_label.is_empty() {
            return Err(RosterError::ShiftRequired);
        }
        let date = lock(&self.state).date;
        let active = ActiveShift::new(self.committee_id, shift_label, date);
        info!(committee_id = %self.committee_id, shift = shift_label, %date, "shift started");

        self.apply(RosterEvent::ShiftStarted(active.clone()));
        self.remember(&keys::active_shift(self.committee_id), Some(&active))
            .await;
        self.remember(
            &keys::selected_shift(self.committee_id),
            Some(&active.shift_label),
        )
        .await;
        self.load_attendance_view().await
    }

    /// Check out everyone on the active shift. Local state only resets once the server agrees.
    pub async fn end_shift(&self) -> Result<EndedShift, RosterError> {
        let Some(active) = self.active_shift() else {
            return Err(RosterError::NoActiveShift);
        };
        let request = ShiftCheckout {
            event_id: self.event_id,
            committee_id: active.committee_id,
            shift: active.shift_label.clone(),
            date: active.date,
        };
        let receipt = self.api.checkout_shift(&request).await.map_err(|err| {
            warn!(committee_id = %self.committee_id, error = %err, "checkout by shift failed");
            self.post(Notice::error(format!("Failed to end shift: {}", err.detail())));
            RosterError::Checkout(err)
        })?;

        info!(committee_id = %self.committee_id, shift = %active.shift_label, "shift ended");
        self.apply(RosterEvent::ShiftEnded);
        self.remember::<ActiveShift>(&keys::active_shift(self.committee_id), None)
            .await;
        self.remember::<String>(&keys::selected_shift(self.committee_id), None)
            .await;
        self.persist_snapshot().await;
        if let Some(message) = &receipt.message {
            self.post(Notice::info(message.clone()));
        }
        Ok(EndedShift {
            shift: active,
            message: receipt.message,
        })
    }

    pub async fn toggle_attendance(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<ToggleOutcome, RosterError> {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight, volunteer_id) else {
            debug!(%volunteer_id, "toggle already in flight");
            return Ok(ToggleOutcome::Ignored);
        };

        let (shift_active, entry) = {
            let state = lock(&self.state);
            (state.is_shift_active(), state.volunteer(volunteer_id).cloned())
        };
        if !shift_active {
            return Err(RosterError::ShiftInactive);
        }
        let entry = entry.ok_or(RosterError::UnknownVolunteer(volunteer_id))?;

        match (entry.status, entry.attendance_id, entry.assignment_id) {
            (AttendanceStatus::Present, Some(attendance_id), _) => {
                self.check_out(volunteer_id, attendance_id).await
            }
            (AttendanceStatus::Present, None, _) | (_, _, None) => Ok(ToggleOutcome::Unchanged),
            (_, _, Some(assignment_id)) => self.check_in(volunteer_id, assignment_id).await,
        }
    }

    async fn check_out(
        &self,
        volunteer_id: VolunteerId,
        attendance_id: AttendanceId,
    ) -> Result<ToggleOutcome, RosterError> {
        let request = CheckoutRequest {
            attendance_id,
            time: Utc::now(),
        };
        match self.api.checkout(&request).await {
            Ok(()) => {
                info!(%volunteer_id, %attendance_id, "volunteer checked out");
                self.apply(RosterEvent::CheckedOut { volunteer_id });
                self.persist_snapshot().await;
                Ok(ToggleOutcome::CheckedOut)
            }
            Err(err) if err.is_conflict() => {
                info!(%volunteer_id, %attendance_id, "already checked out elsewhere, resyncing");
                self.post(Notice::info(ALREADY_CHECKED_OUT));
                self.load_attendance_view().await?;
                Ok(ToggleOutcome::Resynced)
            }
            Err(err) => {
                warn!(%volunteer_id, error = %err, "checkout failed");
                self.post(Notice::error("Failed to update attendance status"));
                Err(RosterError::Checkout(err))
            }
        }
    }

    async fn check_in(
        &self,
        volunteer_id: VolunteerId,
        assignment_id: AssignmentId,
    ) -> Result<ToggleOutcome, RosterError> {
        let request = CheckinRequest::new(assignment_id, Utc::now());
        match self.api.checkin(&request).await {
            Ok(receipt) => {
                info!(%volunteer_id, attendance_id = %receipt.attendance_id, "volunteer checked in");
                self.apply(RosterEvent::CheckedIn {
                    volunteer_id,
                    attendance_id: receipt.attendance_id,
                });
                self.persist_snapshot().await;
                Ok(ToggleOutcome::CheckedIn(receipt.attendance_id))
            }
            Err(err) if err.is_conflict() => {
                info!(%volunteer_id, "already checked in elsewhere, resyncing");
                self.post(Notice::info(ALREADY_CHECKED_IN));
                self.load_attendance_view().await?;
                Ok(ToggleOutcome::Resynced)
            }
            Err(err) => {
                warn!(%volunteer_id, error = %err, "check-in failed");
                self.post(Notice::error("Failed to update attendance status"));
                Err(RosterError::Checkin(err))
            }
        }
    }

    pub fn filtered(&self, filter: &VolunteerFilter) -> Vec<VolunteerAttendance> {
        let state = lock(&self.state);
        filter_volunteers(&state.volunteers, &state.assignments, filter)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn counts(&self) -> AttendanceCounts {
        tally(&lock(&self.state).volunteers)
    }

    /// `(present, total)` among volunteers on the given shift.
    pub fn shift_counts(&self, shift: &str) -> (usize, usize) {
        let state = lock(&self.state);
        let on_shift = state
            .volunteers
            .iter()
            .filter(|v| v.shift.as_deref() == Some(shift));
        on_shift.fold((0, 0), |(present, total), v| {
            (present + usize::from(v.is_present()), total + 1)
        })
    }

    fn query(&self, shift: Option<&str>) -> AttendanceQuery {
        AttendanceQuery {
            committee_id: self.committee_id,
            date: lock(&self.state).date,
            shift: shift.map(str::to_string),
        }
    }

    /// Mark every volunteer without a check-in today as absent.
    pub async fn missed_checkins(
        &self,
        shift: Option<&str>,
    ) -> Result<Vec<MissedCheckin>, RosterError> {
        let missed = self
            .api
            .shifts_without_checkin(&self.query(shift))
            .await
            .map_err(|err| self.fetch_failed("Failed to load missed check-ins", err))?;
        info!(committee_id = %self.committee_id, missed = missed.len(), "missed check-ins loaded");
        if self.apply(RosterEvent::MissedCheckinsLoaded(missed.clone())) {
            self.persist_snapshot().await;
        }
        Ok(missed)
    }

    pub async fn export_attendance(
        &self,
        shift: Option<&str>,
    ) -> Result<AttendanceExport, RosterError> {
        let query = self.query(shift);
        let bytes = self
            .api
            .export_csv(&query)
            .await
            .map_err(|err| self.fetch_failed("Failed to export attendance data", err))?;
        Ok(AttendanceExport {
            file_name: export_file_name(self.committee_id, shift, query.date),
            bytes,
        })
    }
}
