use crate::modules::auth::core::session::{Credentials, Identity, LoginResponse};
use crate::shared::infrastructure::api_client::ApiError;
use async_trait::async_trait;

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
    async fn me(&self) -> Result<Identity, ApiError>;
    async fn logout(&self, refresh_token: &str) -> Result<(), ApiError>;
}
