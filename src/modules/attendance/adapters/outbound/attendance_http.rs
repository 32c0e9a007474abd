use crate::modules::attendance::core::ports::AttendanceApi;
use crate::modules::attendance::core::records::{
    AttendanceQuery, AttendanceRecord, CheckinReceipt, CheckinRequest, CheckoutRequest,
    MissedCheckin, ShiftCheckout, ShiftCheckoutReceipt,
};
use crate::modules::volunteers::core::assignment::Assignment;
use crate::shared::core::ids::CommitteeId;
use crate::shared::infrastructure::api_client::{ApiClient, ApiError, ApiRequest};
use async_trait::async_trait;
use std::sync::Arc;

const MISSED_CHECKIN_LIMIT: u32 = 500;

pub struct HttpAttendanceApi {
    client: Arc<ApiClient>,
}

impl HttpAttendanceApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

fn filtered(request: ApiRequest, query: &AttendanceQuery) -> ApiRequest {
    request
        .query("committee_id", query.committee_id)
        .query("date", query.date)
        .query_opt("shift", query.shift.as_deref())
}

#[async_trait]
impl AttendanceApi for HttpAttendanceApi {
    async fn assignments_for_committee(
        &self,
        committee_id: CommitteeId,
        limit: u32,
    ) -> Result<Vec<Assignment>, ApiError> {
        let request = ApiRequest::get("/volunteers/assignments")
            .query("committee_id", committee_id)
            .query("limit", limit);
        self.client.fetch_list(request).await
    }

    async fn active_in_committee(
        &self,
        committee_id: CommitteeId,
        limit: u32,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        let request = ApiRequest::get("/attendance/active-in-committee")
            .query("committee_id", committee_id)
            .query("limit", limit);
        self.client.fetch_list(request).await
    }

    async fn checkin(&self, request: &CheckinRequest) -> Result<CheckinReceipt, ApiError> {
        let request = ApiRequest::post("/attendance/checkin").json(request)?;
        self.client.fetch_json(request).await
    }

    async fn checkout(&self, request: &CheckoutRequest) -> Result<(), ApiError> {
        let request = ApiRequest::post("/attendance/checkout").json(request)?;
        self.client.execute(request).await
    }

    async fn checkout_shift(
        &self,
        request: &ShiftCheckout,
    ) -> Result<ShiftCheckoutReceipt, ApiError> {
        let request = ApiRequest::post("/attendance/checkout-shift")
            .query("event_id", request.event_id)
            .query("committee_id", request.committee_id)
            .query("shift", &request.shift)
            .query("date", request.date);
        let body = self.client.fetch_bytes(request).await?;
        if body.is_empty() {
            return Ok(ShiftCheckoutReceipt::default());
        }
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn shifts_without_checkin(
        &self,
        query: &AttendanceQuery,
    ) -> Result<Vec<MissedCheckin>, ApiError> {
        let request = filtered(ApiRequest::get("/attendance/shifts-without-checkin"), query)
            .query("limit", MISSED_CHECKIN_LIMIT);
        self.client.fetch_list(request).await
    }

    async fn export_csv(&self, query: &AttendanceQuery) -> Result<Vec<u8>, ApiError> {
        let request = filtered(ApiRequest::get("/attendance/export_csv"), query);
        self.client.fetch_bytes(request).await
    }
}

#[cfg(test)]
mod attendance_http_query_tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    #[case(None, 2)]
    #[case(Some("Morning".to_string()), 3)]
    fn it_should_send_the_shift_only_when_selected(
        #[case] shift: Option<String>,
        #[case] pairs: usize,
    ) {
        let query = AttendanceQuery {
            committee_id: CommitteeId(2),
            date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            shift,
        };
        let request = filtered(ApiRequest::get("/attendance/export_csv"), &query);
        assert_eq!(request.query.len(), pairs);
        assert_eq!(request.query[1], ("date".to_string(), "2025-03-15".to_string()));
    }
}
