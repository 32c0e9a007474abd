// In memory implementation of the AuthApi port.
//
// Purpose
// - Exercise the session manager without a backend.

use crate::modules::auth::core::ports::AuthApi;
use crate::modules::auth::core::session::{Credentials, Identity, LoginResponse, Role};
use crate::shared::core::ids::UserId;
use crate::shared::infrastructure::api_client::ApiError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user_id: UserId,
    role: Role,
}

#[derive(Default)]
pub struct InMemoryAuthApi {
    accounts: HashMap<String, Account>,
    is_offline: bool,
    reject_me: bool,
    logout_calls: AtomicUsize,
}

impl InMemoryAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, email: &str, password: &str, user_id: i64, role: Role) -> Self {
        self.accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user_id: UserId(user_id),
                role,
            },
        );
        self
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub fn reject_identity(&mut self) {
        self.reject_me = true;
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for InMemoryAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        if self.is_offline {
            return Err(ApiError::Network("Auth backend offline".into()));
        }
        match self.accounts.get(&credentials.email) {
            Some(account) if account.password == credentials.password => Ok(LoginResponse {
                access_token: format!("access-{}", account.user_id),
                refresh_token: Some(format!("refresh-{}", account.user_id)),
                role: account.role,
                user_id: account.user_id,
                expires_in: Some(900),
            }),
            _ => Err(ApiError::Auth("Invalid email or password".into())),
        }
    }

    async fn me(&self) -> Result<Identity, ApiError> {
        if self.is_offline {
            return Err(ApiError::Network("Auth backend offline".into()));
        }
        if self.reject_me {
            return Err(ApiError::Auth("token expired".into()));
        }
        Ok(Identity {
            id: UserId(0),
            email: None,
            role: None,
        })
    }

    async fn logout(&self, _refresh_token: &str) -> Result<(), ApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.is_offline {
            return Err(ApiError::Network("Auth backend offline".into()));
        }
        Ok(())
    }
}
