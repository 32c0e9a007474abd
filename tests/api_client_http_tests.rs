use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use volunteer_roster::modules::attendance::adapters::outbound::attendance_http::HttpAttendanceApi;
use volunteer_roster::modules::attendance::core::ports::AttendanceApi;
use volunteer_roster::modules::attendance::core::records::{CheckinRequest, ShiftCheckout};
use volunteer_roster::modules::committees::adapters::outbound::committees_http::HttpCommitteesApi;
use volunteer_roster::modules::committees::core::ports::CommitteesApi;
use volunteer_roster::modules::volunteers::adapters::outbound::volunteers_http::HttpVolunteersApi;
use volunteer_roster::modules::volunteers::core::ports::VolunteersApi;
use volunteer_roster::shared::core::ids::{AssignmentId, CommitteeId, EventId};
use volunteer_roster::shared::infrastructure::api_client::{ApiClient, ApiError};
use volunteer_roster::shared::infrastructure::local_store::in_memory::InMemoryLocalStore;
use volunteer_roster::shared::infrastructure::local_store::{LocalStore, keys, load_json, save_json};

const FRESH_TOKEN: &str = "fresh-access";
const GOOD_REFRESH: &str = "good-refresh";

#[derive(Default)]
struct Backend {
    committee_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    request_ids: Mutex<Vec<String>>,
    shift_query: Mutex<HashMap<String, String>>,
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn committees(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.committee_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        backend.request_ids.lock().unwrap().push(id.to_string());
    }
    if bearer(&headers) != Some(FRESH_TOKEN) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "token expired" })))
            .into_response();
    }
    Json(json!({
        "data": [
            { "id": 2, "event_id": 1, "name": "Registration", "volunteer_count": 12 },
            { "id": 3, "event_id": 1, "name": "Hospitality" }
        ]
    }))
    .into_response()
}

async fn refresh(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if body["refresh_token"] != GOOD_REFRESH {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "invalid refresh token" })))
            .into_response();
    }
    Json(json!({ "access_token": FRESH_TOKEN, "refresh_token": "rotated-refresh" })).into_response()
}

async fn always_unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "nope" }))).into_response()
}

async fn checkin_conflict() -> Response {
    (
        StatusCode::CONFLICT,
        Json(json!({ "message": "Volunteer is already checked in" })),
    )
        .into_response()
}

async fn checkout_shift(
    State(backend): State<Arc<Backend>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    *backend.shift_query.lock().unwrap() = params;
    Json(json!({ "message": "Checked out 3 volunteers" })).into_response()
}

struct Harness {
    backend: Arc<Backend>,
    store: Arc<InMemoryLocalStore>,
    client: Arc<ApiClient>,
}

async fn start(refresh_token: &str) -> Harness {
    let backend = Arc::new(Backend::default());
    let router = Router::new()
        .route("/api/committees", get(committees))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/volunteers", get(always_unauthorized))
        .route("/api/attendance/checkin", post(checkin_conflict))
        .route("/api/attendance/checkout-shift", post(checkout_shift))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let store = Arc::new(InMemoryLocalStore::new());
    save_json(&*store, keys::ACCESS_TOKEN, "stale-access").await.unwrap();
    save_json(&*store, keys::REFRESH_TOKEN, refresh_token).await.unwrap();
    save_json(&*store, keys::USER, &json!({ "id": 1 })).await.unwrap();

    let shared: Arc<dyn LocalStore> = store.clone();
    let client = ApiClient::new(
        format!("http://{address}/api/"),
        Duration::from_secs(5),
        shared,
    )
    .unwrap();
    Harness {
        backend,
        store,
        client: Arc::new(client),
    }
}

#[tokio::test]
async fn it_should_refresh_once_and_replay_the_rejected_request() {
    let harness = start(GOOD_REFRESH).await;
    let api = HttpCommitteesApi::new(harness.client.clone());

    let committees = api.list(20).await.unwrap();

    assert_eq!(committees.len(), 2);
    assert_eq!(committees[0].id, CommitteeId(2));
    assert_eq!(committees[1].volunteer_count, None);
    assert_eq!(harness.backend.committee_calls.load(Ordering::SeqCst), 2);
    assert_eq!(harness.backend.refresh_calls.load(Ordering::SeqCst), 1);

    let access: Option<String> = load_json(&*harness.store, keys::ACCESS_TOKEN).await.unwrap();
    let refresh: Option<String> = load_json(&*harness.store, keys::REFRESH_TOKEN).await.unwrap();
    assert_eq!(access.as_deref(), Some(FRESH_TOKEN));
    assert_eq!(refresh.as_deref(), Some("rotated-refresh"));
}

#[tokio::test]
async fn it_should_send_a_fresh_request_id_on_every_attempt() {
    let harness = start(GOOD_REFRESH).await;
    HttpCommitteesApi::new(harness.client.clone())
        .list(20)
        .await
        .unwrap();

    let ids = harness.backend.request_ids.lock().unwrap().clone();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn it_should_log_out_when_the_refresh_is_rejected() {
    let harness = start("revoked-refresh").await;
    let api = HttpCommitteesApi::new(harness.client.clone());

    let result = api.list(20).await;

    assert!(matches!(result, Err(ApiError::Auth(_))));
    assert_eq!(harness.backend.committee_calls.load(Ordering::SeqCst), 1);
    assert!(!harness.store.contains(keys::ACCESS_TOKEN).await);
    assert!(!harness.store.contains(keys::REFRESH_TOKEN).await);
    assert!(!harness.store.contains(keys::USER).await);
}

#[tokio::test]
async fn it_should_log_out_when_the_retry_is_rejected_again() {
    let harness = start(GOOD_REFRESH).await;
    let api = HttpVolunteersApi::new(harness.client.clone());

    let result = api.list(100).await;

    assert!(matches!(result, Err(ApiError::Auth(_))));
    assert_eq!(harness.backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert!(!harness.store.contains(keys::ACCESS_TOKEN).await);
    assert!(!harness.store.contains(keys::USER).await);
}

#[tokio::test]
async fn it_should_map_a_409_to_a_conflict_with_the_server_message() {
    let harness = start(GOOD_REFRESH).await;
    save_json(&*harness.store, keys::ACCESS_TOKEN, FRESH_TOKEN)
        .await
        .unwrap();
    let api = HttpAttendanceApi::new(harness.client.clone());

    let err = api
        .checkin(&CheckinRequest::new(AssignmentId(11), Utc::now()))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(err.detail(), "Volunteer is already checked in");
    assert_eq!(harness.backend.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn it_should_pass_the_shift_checkout_as_query_parameters() {
    let harness = start(GOOD_REFRESH).await;
    let api = HttpAttendanceApi::new(harness.client.clone());

    let receipt = api
        .checkout_shift(&ShiftCheckout {
            event_id: EventId(1),
            committee_id: CommitteeId(2),
            shift: "Morning".into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(receipt.message.as_deref(), Some("Checked out 3 volunteers"));
    let query = harness.backend.shift_query.lock().unwrap().clone();
    assert_eq!(query.get("event_id").map(String::as_str), Some("1"));
    assert_eq!(query.get("committee_id").map(String::as_str), Some("2"));
    assert_eq!(query.get("shift").map(String::as_str), Some("Morning"));
    assert_eq!(query.get("date").map(String::as_str), Some("2025-03-15"));
}
