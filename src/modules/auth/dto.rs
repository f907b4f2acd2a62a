use serde::{Deserialize, Serialize};

use super::model::{User, UserRole};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    /// Defaults to `user` when absent.
    pub role: Option<String>,
}

/// Partial update; only the supplied fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub password: Option<String>,
    pub role: Option<String>,
    pub disabled: Option<bool>,
}

/// External-facing copy of a user record with the credential hash left out.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    pub disabled: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            disabled: user.disabled,
        }
    }
}
