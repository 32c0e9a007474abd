use crate::modules::announcements::core::announcement::{
    Announcement, AnnouncementQuery, AnnouncementUpdate, NewAnnouncement,
};
use crate::modules::announcements::core::ports::AnnouncementsApi;
use crate::shared::core::ids::AnnouncementId;
use crate::shared::infrastructure::api_client::ApiError;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryAnnouncementsApi {
    rows: RwLock<Vec<Announcement>>,
    is_offline: bool,
}

impl InMemoryAnnouncementsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.is_offline {
            return Err(ApiError::Network("Announcements backend offline".into()));
        }
        Ok(())
    }

    async fn query(&self, query: AnnouncementQuery) -> Vec<Announcement> {
        let now = Utc::now();
        let rows = self.rows.read().await;
        rows.iter()
            .rev()
            .filter(|a| !query.active_only || a.expires_at.is_none_or(|at| at > now))
            .filter(|a| query.committee_id.is_none() || a.committee_id == query.committee_id)
            .take(query.limit.unwrap_or(u32::MAX) as usize)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AnnouncementsApi for InMemoryAnnouncementsApi {
    async fn list(&self, query: AnnouncementQuery) -> Result<Vec<Announcement>, ApiError> {
        self.check_online()?;
        Ok(self.query(query).await)
    }

    async fn mine(&self, query: AnnouncementQuery) -> Result<Vec<Announcement>, ApiError> {
        self.check_online()?;
        Ok(self.query(query).await)
    }

    async fn create(&self, announcement: &NewAnnouncement) -> Result<Announcement, ApiError> {
        self.check_online()?;
        let mut rows = self.rows.write().await;
        let next = rows.iter().map(|a| a.id.0).max().unwrap_or(0) + 1;
        let created = Announcement {
            id: AnnouncementId(next),
            event_id: Some(announcement.event_id),
            title: announcement.title.clone(),
            body: announcement.body.clone(),
            priority: announcement.priority,
            committee_id: announcement.committee_id,
            created_at: Some(Utc::now()),
            expires_at: Some(announcement.expires_at),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: AnnouncementId,
        update: &AnnouncementUpdate,
    ) -> Result<Announcement, ApiError> {
        self.check_online()?;
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("announcement {id}")))?;
        if let Some(title) = &update.title {
            row.title = title.clone();
        }
        if let Some(body) = &update.body {
            row.body = body.clone();
        }
        if let Some(priority) = update.priority {
            row.priority = priority;
        }
        if update.expires_at.is_some() {
            row.expires_at = update.expires_at;
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: AnnouncementId) -> Result<(), ApiError> {
        self.check_online()?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|a| a.id != id);
        if rows.len() == before {
            return Err(ApiError::NotFound(format!("announcement {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod in_memory_announcements_tests {
    use super::*;
    use crate::shared::core::ids::{CommitteeId, EventId};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_list_newest_first_and_scope_by_committee() {
        let api = InMemoryAnnouncementsApi::new();
        let now = Utc::now();
        for (title, committee) in [("general", None), ("desk", Some(CommitteeId(2)))] {
            let payload = NewAnnouncement::new(EventId(1), title, "body", now)
                .unwrap()
                .for_committee(committee);
            api.create(&payload).await.unwrap();
        }

        let all = api.list(AnnouncementQuery::default()).await.unwrap();
        assert_eq!(all[0].title, "desk");

        let scoped = api
            .list(AnnouncementQuery {
                committee_id: Some(CommitteeId(2)),
                ..AnnouncementQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert!(!scoped[0].is_general());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_report_missing_rows_on_delete() {
        let api = InMemoryAnnouncementsApi::new();
        let result = api.delete(AnnouncementId(99)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
