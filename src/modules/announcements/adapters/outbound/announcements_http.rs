use crate::modules::announcements::core::announcement::{
    Announcement, AnnouncementQuery, AnnouncementUpdate, NewAnnouncement,
};
use crate::modules::announcements::core::ports::AnnouncementsApi;
use crate::shared::core::ids::AnnouncementId;
use crate::shared::infrastructure::api_client::{ApiClient, ApiError, ApiRequest};
use async_trait::async_trait;
use std::sync::Arc;

pub struct HttpAnnouncementsApi {
    client: Arc<ApiClient>,
}

impl HttpAnnouncementsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

fn with_query(request: ApiRequest, query: AnnouncementQuery) -> ApiRequest {
    let request = if query.active_only {
        request.query("active_only", true)
    } else {
        request
    };
    request
        .query_opt("limit", query.limit)
        .query_opt("committee_id", query.committee_id)
}

#[async_trait]
impl AnnouncementsApi for HttpAnnouncementsApi {
    async fn list(&self, query: AnnouncementQuery) -> Result<Vec<Announcement>, ApiError> {
        self.client
            .fetch_list(with_query(ApiRequest::get("/announcements"), query))
            .await
    }

    async fn mine(&self, query: AnnouncementQuery) -> Result<Vec<Announcement>, ApiError> {
        self.client
            .fetch_list(with_query(ApiRequest::get("/announcements/me"), query))
            .await
    }

    async fn create(&self, announcement: &NewAnnouncement) -> Result<Announcement, ApiError> {
        let request = ApiRequest::post("/announcements").json(announcement)?;
        self.client.fetch_json(request).await
    }

    async fn update(
        &self,
        id: AnnouncementId,
        update: &AnnouncementUpdate,
    ) -> Result<Announcement, ApiError> {
        let request = ApiRequest::put(format!("/announcements/{id}")).json(update)?;
        self.client.fetch_json(request).await
    }

    async fn delete(&self, id: AnnouncementId) -> Result<(), ApiError> {
        self.client
            .execute(ApiRequest::delete(format!("/announcements/{id}")))
            .await
    }
}

#[cfg(test)]
mod announcements_http_query_tests {
    use super::*;
    use crate::shared::core::ids::CommitteeId;
    use rstest::rstest;

    #[rstest]
    fn it_should_only_send_the_filters_that_are_set() {
        let request = with_query(
            ApiRequest::get("/announcements"),
            AnnouncementQuery {
                active_only: true,
                limit: Some(20),
                committee_id: Some(CommitteeId(3)),
            },
        );
        assert_eq!(request.query.len(), 3);

        let bare = with_query(ApiRequest::get("/announcements"), AnnouncementQuery::default());
        assert!(bare.query.is_empty());
    }
}
