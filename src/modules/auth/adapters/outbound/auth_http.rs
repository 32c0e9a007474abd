use crate::modules::auth::core::ports::AuthApi;
use crate::modules::auth::core::session::{Credentials, Identity, LoginResponse};
use crate::shared::infrastructure::api_client::{ApiClient, ApiError, ApiRequest};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct HttpAuthApi {
    client: Arc<ApiClient>,
}

impl HttpAuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let request = ApiRequest::post("/auth/login").anonymous().json(credentials)?;
        self.client.fetch_json(request).await
    }

    async fn me(&self) -> Result<Identity, ApiError> {
        self.client.fetch_json(ApiRequest::get("/auth/me")).await
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), ApiError> {
        let request =
            ApiRequest::post("/auth/logout").json(&json!({ "refresh_token": refresh_token }))?;
        self.client.execute(request).await
    }
}
