use chrono::NaiveDate;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;
use volunteer_roster::modules::attendance::adapters::outbound::attendance_in_memory::InMemoryAttendanceApi;
use volunteer_roster::modules::attendance::core::filter::VolunteerFilter;
use volunteer_roster::modules::attendance::core::view::AttendanceStatus;
use volunteer_roster::modules::attendance::use_cases::track_attendance::handler::AttendanceTracker;
use volunteer_roster::modules::attendance::use_cases::track_attendance::outcome::ToggleOutcome;
use volunteer_roster::modules::volunteers::core::assignment::Assignment;
use volunteer_roster::modules::volunteers::core::notes::ShiftGroup;
use volunteer_roster::shared::core::ids::{AttendanceId, CommitteeId, EventId, VolunteerId};
use volunteer_roster::shared::infrastructure::local_store::LocalStore;
use volunteer_roster::shared::infrastructure::local_store::json_file::JsonFileStore;

const COMMITTEE: CommitteeId = CommitteeId(2);

fn assignment(id: i64, volunteer_id: i64, name: &str, shift: &str, notes: &str) -> Assignment {
    serde_json::from_value(json!({
        "id": id,
        "event_id": 1,
        "committee_id": COMMITTEE.0,
        "volunteer_id": volunteer_id,
        "volunteer_name": name,
        "volunteer_college_id": format!("C{volunteer_id:03}"),
        "role": "volunteer",
        "shift": shift,
        "notes": notes,
    }))
    .unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
}

fn state_file() -> PathBuf {
    std::env::temp_dir().join(format!("roster-flow-{}.json", Uuid::now_v7()))
}

async fn tracker(
    api: &Arc<InMemoryAttendanceApi>,
    path: &PathBuf,
) -> AttendanceTracker<InMemoryAttendanceApi> {
    let store: Arc<dyn LocalStore> = Arc::new(JsonFileStore::open(path.clone()).await);
    AttendanceTracker::new(EventId(1), COMMITTEE, day(), api.clone(), store)
}

fn status_of(tracker: &AttendanceTracker<InMemoryAttendanceApi>, id: i64) -> AttendanceStatus {
    tracker
        .volunteers()
        .into_iter()
        .find(|v| v.volunteer_id == VolunteerId(id))
        .map(|v| v.status)
        .unwrap()
}

#[tokio::test]
async fn it_should_resume_a_running_shift_after_a_restart() {
    let api = Arc::new(InMemoryAttendanceApi::with_assignments(vec![
        assignment(11, 1, "Asha Rao", "Morning", "Gate, Priya"),
        assignment(12, 2, "Ben Ito", "Morning", "Stage, Omar"),
        assignment(13, 3, "Cleo Park", "Evening", ""),
    ]));
    let path = state_file();

    let first = tracker(&api, &path).await;
    first.load_assignments().await.unwrap();
    let catalog = first.catalog();
    assert_eq!(catalog.shifts, vec!["Morning".to_string(), "Evening".to_string()]);
    assert!(
        catalog
            .groups_for("Morning")
            .unwrap()
            .contains(&ShiftGroup::new("Gate", "Priya"))
    );

    first.start_shift("Morning").await.unwrap();
    assert_eq!(
        first.toggle_attendance(VolunteerId(1)).await.unwrap(),
        ToggleOutcome::CheckedIn(AttendanceId(1))
    );
    assert_eq!(first.shift_counts("Morning"), (1, 2));
    drop(first);

    let second = tracker(&api, &path).await;
    second.restore().await.unwrap();
    assert!(second.is_shift_active());
    assert_eq!(second.active_shift().unwrap().shift_label, "Morning");
    assert_eq!(status_of(&second, 1), AttendanceStatus::Present);
    assert_eq!(status_of(&second, 2), AttendanceStatus::Absent);

    let morning = second.filtered(&VolunteerFilter::default().with_shift("Morning"));
    assert_eq!(morning.len(), 2);

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn it_should_forget_the_shift_once_it_has_ended() {
    let api = Arc::new(InMemoryAttendanceApi::with_assignments(vec![
        assignment(11, 1, "Asha Rao", "Morning", ""),
        assignment(12, 2, "Ben Ito", "Morning", ""),
    ]));
    let path = state_file();

    let first = tracker(&api, &path).await;
    first.start_shift("Morning").await.unwrap();
    first.toggle_attendance(VolunteerId(1)).await.unwrap();
    first.toggle_attendance(VolunteerId(2)).await.unwrap();

    let ended = first.end_shift().await.unwrap();
    assert_eq!(ended.message.as_deref(), Some("Checked out 2 volunteers"));
    assert!(api.open_records().await.is_empty());
    assert!(
        first
            .volunteers()
            .iter()
            .all(|v| v.status == AttendanceStatus::Assigned && v.attendance_id.is_none())
    );
    drop(first);

    let second = tracker(&api, &path).await;
    second.restore().await.unwrap();
    assert!(!second.is_shift_active());
    assert_eq!(second.state().selected_shift(), None);

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn it_should_pick_up_a_checkin_made_on_another_device() {
    let api = Arc::new(InMemoryAttendanceApi::with_assignments(vec![assignment(
        11, 1, "Asha Rao", "Morning", "",
    )]));
    let path = state_file();

    let desk = tracker(&api, &path).await;
    desk.start_shift("Morning").await.unwrap();
    api.checkin_elsewhere(VolunteerId(1)).await;

    let outcome = desk.toggle_attendance(VolunteerId(1)).await.unwrap();

    assert_eq!(outcome, ToggleOutcome::Resynced);
    assert_eq!(status_of(&desk, 1), AttendanceStatus::Present);
    assert_eq!(api.open_records().await.len(), 1);

    let _ = tokio::fs::remove_file(&path).await;
}
