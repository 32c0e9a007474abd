// API gateway client shared by every outbound HTTP adapter.
//
// Responsibilities
// - Attach `Authorization: Bearer <access_token>` to every call except login and refresh.
// - On a 401, refresh the access token once and replay the original request once.
// - On a second 401 or a failed refresh, clear the stored session (forced logout).
// - Map status codes onto ApiError.

mod error;

pub use error::ApiError;

use crate::shared::infrastructure::local_store::{LocalStore, keys, load_json, save_json};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Csv { file_name: String, bytes: Vec<u8> },
}

/// Replayable description of one call; the retry after a refresh rebuilds the request from it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub anonymous: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            anonymous: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn csv(mut self, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.body = RequestBody::Csv {
            file_name: file_name.into(),
            bytes,
        };
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

/// List endpoints answer with either a bare array or `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}

#[derive(Debug, Serialize)]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    refresh_token: Option<String>,
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<dyn LocalStore>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        store: Arc<dyn LocalStore>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn LocalStore> {
        &self.store
    }

    pub async fn send(&self, request: ApiRequest) -> Result<Response, ApiError> {
        if request.anonymous {
            let response = self.dispatch(&request, None).await?;
            return check_status(response).await;
        }

        let token: Option<String> = load_json(&*self.store, keys::ACCESS_TOKEN).await?;
        let response = self.dispatch(&request, token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return check_status(response).await;
        }

        warn!(path = %request.path, "access token rejected, refreshing");
        let token = match self.refresh_access_token().await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                self.force_logout().await;
                return Err(ApiError::Auth("session expired, please log in again".into()));
            }
        };

        let retried = self.dispatch(&request, Some(&token)).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            warn!(path = %request.path, "retry rejected after refresh");
            self.force_logout().await;
            return Err(ApiError::Auth("session expired, please log in again".into()));
        }
        check_status(retried).await
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Vec<T>, ApiError> {
        let envelope: ListEnvelope<T> = self.fetch_json(request).await?;
        Ok(envelope.into_vec())
    }

    pub async fn fetch_bytes(&self, request: ApiRequest) -> Result<Vec<u8>, ApiError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await.map_err(ApiError::from)?;
        Ok(bytes.to_vec())
    }

    pub async fn execute(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    /// Exchange the stored refresh token for a new access token and persist both.
    pub async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let refresh_token: Option<String> = load_json(&*self.store, keys::REFRESH_TOKEN).await?;
        let Some(refresh_token) = refresh_token else {
            return Err(ApiError::Auth("no refresh token stored".into()));
        };

        let request = ApiRequest::post("/auth/refresh")
            .anonymous()
            .json(&RefreshBody {
                refresh_token: &refresh_token,
            })?;
        let response = check_status(self.dispatch(&request, None).await?).await?;
        let tokens: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        save_json(&*self.store, keys::ACCESS_TOKEN, &tokens.access_token).await?;
        if let Some(rotated) = &tokens.refresh_token {
            save_json(&*self.store, keys::REFRESH_TOKEN, rotated).await?;
        }
        info!("access token refreshed");
        Ok(tokens.access_token)
    }

    pub async fn force_logout(&self) {
        for key in [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER] {
            if let Err(err) = self.store.remove(key).await {
                warn!(key, error = %err, "failed to clear session key");
            }
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let request_id = Uuid::now_v7();
        debug!(method = %request.method, %url, %request_id, "dispatching request");

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Csv { file_name, bytes } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str("text/csv")
                    .map_err(|e| ApiError::Encode(e.to_string()))?;
                builder.multipart(Form::new().part("file", part))
            }
        };

        builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_status(status.as_u16(), &body))
}
