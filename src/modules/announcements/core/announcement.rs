use crate::shared::core::ids::{AnnouncementId, CommitteeId, EventId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: AnnouncementId,
    #[serde(default)]
    pub event_id: Option<EventId>,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub committee_id: Option<CommitteeId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Announcement {
    /// General announcements are not scoped to any committee.
    pub fn is_general(&self) -> bool {
        self.committee_id.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAnnouncement {
    pub event_id: EventId,
    pub title: String,
    pub body: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committee_id: Option<CommitteeId>,
    pub expires_at: DateTime<Utc>,
}

impl NewAnnouncement {
    /// Returns `None` when title or body is blank.
    pub fn new(
        event_id: EventId,
        title: &str,
        body: &str,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let (title, body) = (title.trim(), body.trim());
        if title.is_empty() || body.is_empty() {
            return None;
        }
        Some(Self {
            event_id,
            title: title.to_string(),
            body: body.to_string(),
            priority: Priority::default(),
            committee_id: None,
            expires_at: now + Duration::days(DEFAULT_LIFETIME_DAYS),
        })
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn for_committee(mut self, committee_id: Option<CommitteeId>) -> Self {
        self.committee_id = committee_id;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnnouncementUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnnouncementQuery {
    pub active_only: bool,
    pub limit: Option<u32>,
    pub committee_id: Option<CommitteeId>,
}

#[cfg(test)]
mod announcement_tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap()
    }

    #[rstest]
    fn it_should_expire_a_week_after_creation_with_medium_priority() {
        let announcement = NewAnnouncement::new(EventId(1), "Welcome", "Doors open at 9", now())
            .unwrap();
        assert_eq!(announcement.priority, Priority::Medium);
        assert_eq!(
            announcement.expires_at,
            Utc.with_ymd_and_hms(2025, 3, 22, 10, 0, 0).unwrap()
        );
    }

    #[rstest]
    #[case("", "body")]
    #[case("title", "   ")]
    fn it_should_refuse_blank_title_or_body(#[case] title: &str, #[case] body: &str) {
        assert!(NewAnnouncement::new(EventId(1), title, body, now()).is_none());
    }

    #[rstest]
    fn it_should_omit_the_committee_for_general_announcements() {
        let general = NewAnnouncement::new(EventId(1), "t", "b", now()).unwrap();
        let json = serde_json::to_value(&general).unwrap();
        assert!(json.get("committee_id").is_none());

        let scoped = general
            .for_committee(Some(CommitteeId(4)))
            .priority(Priority::High);
        let json = serde_json::to_value(&scoped).unwrap();
        assert_eq!(json["committee_id"], 4);
        assert_eq!(json["priority"], "high");
    }
}
