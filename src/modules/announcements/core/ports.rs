use crate::modules::announcements::core::announcement::{
    Announcement, AnnouncementQuery, AnnouncementUpdate, NewAnnouncement,
};
use crate::shared::core::ids::AnnouncementId;
use crate::shared::infrastructure::api_client::ApiError;
use async_trait::async_trait;

#[async_trait]
pub trait AnnouncementsApi: Send + Sync {
    async fn list(&self, query: AnnouncementQuery) -> Result<Vec<Announcement>, ApiError>;
    /// Announcements addressed to the signed-in volunteer.
    async fn mine(&self, query: AnnouncementQuery) -> Result<Vec<Announcement>, ApiError>;
    async fn create(&self, announcement: &NewAnnouncement) -> Result<Announcement, ApiError>;
    async fn update(
        &self,
        id: AnnouncementId,
        update: &AnnouncementUpdate,
    ) -> Result<Announcement, ApiError>;
    async fn delete(&self, id: AnnouncementId) -> Result<(), ApiError>;
}
