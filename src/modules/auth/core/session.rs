use crate::shared::core::ids::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Volunteer,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Volunteer => "volunteer",
            Role::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub role: Role,
    pub user_id: UserId,
    pub expires_in: Option<i64>,
}

/// Identity reported by `/auth/me`. Only used to validate a restored session.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Identity {
    #[serde(alias = "user_id")]
    pub id: UserId,
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub display_name: String,
}

impl SessionUser {
    pub fn from_login(email: &str, response: &LoginResponse) -> Self {
        Self {
            id: response.user_id,
            email: email.to_string(),
            role: response.role,
            display_name: display_name_for(response.role),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn display_name_for(role: Role) -> String {
    let label = role.as_str();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => format!("{}{} User", first.to_uppercase(), chars.as_str()),
        None => "User".to_string(),
    }
}
