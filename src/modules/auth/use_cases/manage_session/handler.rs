use crate::modules::auth::core::ports::AuthApi;
use crate::modules::auth::core::session::{Credentials, SessionUser};
use crate::shared::infrastructure::api_client::ApiError;
use crate::shared::infrastructure::local_store::{
    LocalStore, StoreError, keys, load_json, save_json,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("login failed: {0}")]
    InvalidCredentials(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct SessionManager<TAuthApi>
where
    TAuthApi: AuthApi + 'static,
{
    api: Arc<TAuthApi>,
    store: Arc<dyn LocalStore>,
    user: RwLock<Option<SessionUser>>,
}

impl<TAuthApi> SessionManager<TAuthApi>
where
    TAuthApi: AuthApi + 'static,
{
    pub fn new(api: Arc<TAuthApi>, store: Arc<dyn LocalStore>) -> Self {
        Self {
            api,
            store,
            user: RwLock::new(None),
        }
    }

    pub async fn current_user(&self) -> Option<SessionUser> {
        self.user.read().await.clone()
    }

    pub async fn is_admin(&self) -> bool {
        self.user
            .read()
            .await
            .as_ref()
            .is_some_and(SessionUser::is_admin)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, SessionError> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&credentials).await.map_err(|e| match e {
            ApiError::Auth(m) | ApiError::Validation(m) => SessionError::InvalidCredentials(m),
            other => SessionError::Api(other),
        })?;

        save_json(&*self.store, keys::ACCESS_TOKEN, &response.access_token).await?;
        if let Some(refresh_token) = &response.refresh_token {
            save_json(&*self.store, keys::REFRESH_TOKEN, refresh_token).await?;
        }
        let user = SessionUser::from_login(email, &response);
        save_json(&*self.store, keys::USER, &user).await?;

        info!(user_id = %user.id, role = user.role.as_str(), "logged in");
        *self.user.write().await = Some(user.clone());
        Ok(user)
    }

    /// Re-enter a stored session if the backend still accepts its token.
    pub async fn restore(&self) -> Result<Option<SessionUser>, SessionError> {
        let saved: Option<SessionUser> = load_json(&*self.store, keys::USER).await?;
        let token: Option<String> = load_json(&*self.store, keys::ACCESS_TOKEN).await?;
        let (Some(saved), Some(_)) = (saved, token) else {
            return Ok(None);
        };

        match self.api.me().await {
            Ok(_) => {
                *self.user.write().await = Some(saved.clone());
                Ok(Some(saved))
            }
            Err(err) => {
                warn!(error = %err, "stored session rejected");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    /// Local state is cleared whatever the backend answers.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let refresh_token: Option<String> = load_json(&*self.store, keys::REFRESH_TOKEN)
            .await
            .unwrap_or_default();
        if let Some(refresh_token) = refresh_token {
            if let Err(err) = self.api.logout(&refresh_token).await {
                warn!(error = %err, "logout call failed");
            }
        }
        self.clear().await?;
        info!("logged out");
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.user.write().await = None;
        for key in [keys::USER, keys::ACCESS_TOKEN, keys::REFRESH_TOKEN] {
            self.store.remove(key).await?;
        }
        Ok(())
    }
}
