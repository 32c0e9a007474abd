use crate::modules::attendance::core::ports::AttendanceApi;
use crate::modules::attendance::core::records::{
    AttendanceQuery, AttendanceRecord, CheckinReceipt, CheckinRequest, CheckoutRequest,
    MissedCheckin, ShiftCheckout, ShiftCheckoutReceipt,
};
use crate::modules::volunteers::core::assignment::Assignment;
use crate::shared::core::ids::{AttendanceId, CommitteeId, VolunteerId};
use crate::shared::infrastructure::api_client::ApiError;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Backend double for the attendance endpoints. A check-in conflicts when the
/// volunteer already has an open record, like the real backend.
#[derive(Default)]
pub struct InMemoryAttendanceApi {
    assignments: RwLock<Vec<Assignment>>,
    records: RwLock<Vec<AttendanceRecord>>,
    is_offline: AtomicBool,
    fail_checkout_shift: AtomicBool,
    delay: Option<Duration>,
    active_calls: AtomicUsize,
    checkin_calls: AtomicUsize,
    checkout_calls: AtomicUsize,
    checkout_shift_calls: AtomicUsize,
}

impl InMemoryAttendanceApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assignments(assignments: Vec<Assignment>) -> Self {
        Self {
            assignments: RwLock::new(assignments),
            ..Self::default()
        }
    }

    /// Slows down check-in and check-out so overlapping calls can be observed.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.is_offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_checkout_shift_failure(&self, fail: bool) {
        self.fail_checkout_shift.store(fail, Ordering::SeqCst);
    }

    /// Simulates a check-in made by another client.
    pub async fn checkin_elsewhere(&self, volunteer_id: VolunteerId) -> AttendanceId {
        let assignment_id = self
            .assignments
            .read()
            .await
            .iter()
            .find(|a| a.volunteer_id == volunteer_id)
            .map(|a| a.id);
        let mut records = self.records.write().await;
        let id = AttendanceId(records.iter().map(|r| r.id.0).max().unwrap_or(0) + 1);
        records.push(AttendanceRecord {
            id,
            assignment_id,
            volunteer_id,
            check_in_time: Some(Utc::now()),
            check_out_time: None,
        });
        id
    }

    /// Simulates a check-out made by another client.
    pub async fn checkout_elsewhere(&self, attendance_id: AttendanceId) {
        let mut records = self.records.write().await;
        if let Some(record) = records.iter_mut().find(|r| r.id == attendance_id) {
            record.check_out_time = Some(Utc::now());
        }
    }

    pub async fn open_records(&self) -> Vec<AttendanceRecord> {
        let records = self.records.read().await;
        records.iter().filter(|r| r.is_open()).cloned().collect()
    }

    pub fn active_calls(&self) -> usize {
        self.active_calls.load(Ordering::SeqCst)
    }

    pub fn checkin_calls(&self) -> usize {
        self.checkin_calls.load(Ordering::SeqCst)
    }

    pub fn checkout_calls(&self) -> usize {
        self.checkout_calls.load(Ordering::SeqCst)
    }

    pub fn checkout_shift_calls(&self) -> usize {
        self.checkout_shift_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(ApiError::Network("Attendance backend offline".into()));
        }
        Ok(())
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn committee_assignments(
        &self,
        committee_id: CommitteeId,
        shift: Option<&str>,
    ) -> Vec<Assignment> {
        let assignments = self.assignments.read().await;
        assignments
            .iter()
            .filter(|a| a.committee_id == Some(committee_id))
            .filter(|a| shift.is_none_or(|s| a.shift.as_deref() == Some(s)))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AttendanceApi for InMemoryAttendanceApi {
    async fn assignments_for_committee(
        &self,
        committee_id: CommitteeId,
        limit: u32,
    ) -> Result<Vec<Assignment>, ApiError> {
        self.check_online()?;
        let mut rows = self.committee_assignments(committee_id, None).await;
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn active_in_committee(
        &self,
        committee_id: CommitteeId,
        limit: u32,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.active_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let members: Vec<VolunteerId> = self
            .committee_assignments(committee_id, None)
            .await
            .iter()
            .map(|a| a.volunteer_id)
            .collect();
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.is_open() && members.contains(&r.volunteer_id))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn checkin(&self, request: &CheckinRequest) -> Result<CheckinReceipt, ApiError> {
        self.checkin_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.check_online()?;
        let volunteer_id = self
            .assignments
            .read()
            .await
            .iter()
            .find(|a| a.id == request.assignment_id)
            .map(|a| a.volunteer_id)
            .ok_or_else(|| ApiError::NotFound(format!("assignment {}", request.assignment_id)))?;

        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|r| r.volunteer_id == volunteer_id && r.is_open())
        {
            return Err(ApiError::Conflict("Volunteer is already checked in".into()));
        }
        let attendance_id = AttendanceId(records.iter().map(|r| r.id.0).max().unwrap_or(0) + 1);
        records.push(AttendanceRecord {
            id: attendance_id,
            assignment_id: Some(request.assignment_id),
            volunteer_id,
            check_in_time: Some(request.time),
            check_out_time: None,
        });
        Ok(CheckinReceipt { attendance_id })
    }

    async fn checkout(&self, request: &CheckoutRequest) -> Result<(), ApiError> {
        self.checkout_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.check_online()?;
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == request.attendance_id)
            .ok_or_else(|| ApiError::NotFound(format!("attendance {}", request.attendance_id)))?;
        if !record.is_open() {
            return Err(ApiError::Conflict("Volunteer is already checked out".into()));
        }
        record.check_out_time = Some(request.time);
        Ok(())
    }

    async fn checkout_shift(
        &self,
        request: &ShiftCheckout,
    ) -> Result<ShiftCheckoutReceipt, ApiError> {
        self.checkout_shift_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        if self.fail_checkout_shift.load(Ordering::SeqCst) {
            return Err(ApiError::Server {
                status: 500,
                message: "Failed to end shift".into(),
            });
        }
        let members: Vec<VolunteerId> = self
            .committee_assignments(request.committee_id, Some(&request.shift))
            .await
            .iter()
            .map(|a| a.volunteer_id)
            .collect();
        let now = Utc::now();
        let mut records = self.records.write().await;
        let mut closed = 0;
        for record in records
            .iter_mut()
            .filter(|r| r.is_open() && members.contains(&r.volunteer_id))
        {
            record.check_out_time = Some(now);
            closed += 1;
        }
        Ok(ShiftCheckoutReceipt {
            message: Some(format!("Checked out {closed} volunteers")),
        })
    }

    async fn shifts_without_checkin(
        &self,
        query: &AttendanceQuery,
    ) -> Result<Vec<MissedCheckin>, ApiError> {
        self.check_online()?;
        let assignments = self
            .committee_assignments(query.committee_id, query.shift.as_deref())
            .await;
        let records = self.records.read().await;
        Ok(assignments
            .iter()
            .filter(|a| !records.iter().any(|r| r.volunteer_id == a.volunteer_id))
            .map(|a| MissedCheckin {
                volunteer_id: a.volunteer_id,
                volunteer_name: a.volunteer_name.clone(),
                assignment_id: Some(a.id),
                shift: a.shift.clone(),
            })
            .collect())
    }

    async fn export_csv(&self, query: &AttendanceQuery) -> Result<Vec<u8>, ApiError> {
        self.check_online()?;
        let assignments = self
            .committee_assignments(query.committee_id, query.shift.as_deref())
            .await;
        let records = self.records.read().await;
        let mut csv = String::from("volunteer_id,volunteer_name,shift,check_in_time,check_out_time\n");
        for record in records.iter() {
            let Some(assignment) = assignments.iter().find(|a| a.volunteer_id == record.volunteer_id)
            else {
                continue;
            };
            let stamp = |t: Option<chrono::DateTime<Utc>>| t.map(|t| t.to_rfc3339()).unwrap_or_default();
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                record.volunteer_id,
                assignment.volunteer_name.as_deref().unwrap_or_default(),
                assignment.shift.as_deref().unwrap_or_default(),
                stamp(record.check_in_time),
                stamp(record.check_out_time),
            ));
        }
        Ok(csv.into_bytes())
    }
}
