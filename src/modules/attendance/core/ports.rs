use crate::modules::attendance::core::records::{
    AttendanceQuery, AttendanceRecord, CheckinReceipt, CheckinRequest, CheckoutRequest,
    MissedCheckin, ShiftCheckout, ShiftCheckoutReceipt,
};
use crate::modules::volunteers::core::assignment::Assignment;
use crate::shared::core::ids::CommitteeId;
use crate::shared::infrastructure::api_client::ApiError;
use async_trait::async_trait;

#[async_trait]
pub trait AttendanceApi: Send + Sync {
    async fn assignments_for_committee(
        &self,
        committee_id: CommitteeId,
        limit: u32,
    ) -> Result<Vec<Assignment>, ApiError>;
    /// Open (checked-in, not checked-out) records of a committee.
    async fn active_in_committee(
        &self,
        committee_id: CommitteeId,
        limit: u32,
    ) -> Result<Vec<AttendanceRecord>, ApiError>;
    async fn checkin(&self, request: &CheckinRequest) -> Result<CheckinReceipt, ApiError>;
    async fn checkout(&self, request: &CheckoutRequest) -> Result<(), ApiError>;
    async fn checkout_shift(&self, request: &ShiftCheckout)
    -> Result<ShiftCheckoutReceipt, ApiError>;
    async fn shifts_without_checkin(
        &self,
        query: &AttendanceQuery,
    ) -> Result<Vec<MissedCheckin>, ApiError>;
    async fn export_csv(&self, query: &AttendanceQuery) -> Result<Vec<u8>, ApiError>;
}
