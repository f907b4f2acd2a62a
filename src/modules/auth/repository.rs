use serde_json::Value;
use uuid::Uuid;

use super::dto::{CreateUserRequest, UpdateUserRequest};
use super::model::{User, UserRole};
use crate::common::security;
use crate::error::{Result, StoreError};
use crate::state::AppState;

const USERS_FILE: &str = "users/users.json";

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

pub struct AuthRepository;

impl AuthRepository {
    /// Seed the user collection with the default administrator: a document
    /// that is not a list is replaced outright, a list without the admin
    /// account gets one appended, and a healthy collection is left
    /// untouched. Safe to call on every startup.
    pub async fn bootstrap(state: &AppState) -> Result<()> {
        state
            .store
            .update(
                USERS_FILE,
                Some(Value::Array(Vec::new())),
                |current: Option<Value>| {
                    let users = current.unwrap_or_else(|| Value::Array(Vec::new()));
                    let Value::Array(mut users) = users else {
                        return Ok(Value::Array(vec![default_admin()?]));
                    };
                    let has_admin = users.iter().any(|user| {
                        user.get("username").and_then(Value::as_str) == Some(DEFAULT_ADMIN_USERNAME)
                    });
                    if !has_admin {
                        users.push(default_admin()?);
                    }
                    Ok(Value::Array(users))
                },
            )
            .await?;
        Ok(())
    }

    pub async fn list_users(state: &AppState) -> Result<Vec<User>> {
        state.store.read(USERS_FILE, Vec::new()).await
    }

    pub async fn find_user(state: &AppState, username: &str) -> Result<Option<User>> {
        let users = Self::list_users(state).await?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    pub async fn create_user(
        state: &AppState,
        actor: &str,
        req: CreateUserRequest,
    ) -> Result<User> {
        if req.username.is_empty() || req.password.is_empty() {
            return Err(StoreError::InvalidInput(
                "username and password are required".to_string(),
            ));
        }
        let role = match req.role.as_deref() {
            Some(role) => role.parse::<UserRole>()?,
            None => UserRole::User,
        };

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: req.username,
            role,
            pass_hash: security::hash_password(&req.password)?,
            disabled: false,
        };
        let stored = user.clone();
        state
            .store
            .update(USERS_FILE, Some(Vec::new()), |current: Option<Vec<User>>| {
                let mut users = current.unwrap_or_default();
                if users.iter().any(|u| u.username == stored.username) {
                    return Err(StoreError::Conflict(format!(
                        "user {} already exists",
                        stored.username
                    )));
                }
                users.push(stored);
                Ok(users)
            })
            .await?;

        state
            .audit
            .append(actor, &format!("created user {}", user.username))
            .await?;
        Ok(user)
    }

    pub async fn update_user(
        state: &AppState,
        actor: &str,
        username: &str,
        changes: UpdateUserRequest,
    ) -> Result<User> {
        let role = changes
            .role
            .as_deref()
            .filter(|role| !role.is_empty())
            .map(str::parse::<UserRole>)
            .transpose()?;
        let pass_hash = changes
            .password
            .as_deref()
            .filter(|password| !password.is_empty())
            .map(security::hash_password)
            .transpose()?;

        let mut updated = None;
        state
            .store
            .update(USERS_FILE, Some(Vec::new()), |current: Option<Vec<User>>| {
                let mut users = current.unwrap_or_default();
                let idx = users
                    .iter()
                    .position(|u| u.username == username)
                    .ok_or(StoreError::NotFound("user"))?;
                let user = &mut users[idx];
                if let Some(pass_hash) = pass_hash {
                    user.pass_hash = pass_hash;
                }
                if let Some(role) = role {
                    user.role = role;
                }
                if let Some(disabled) = changes.disabled {
                    user.disabled = disabled;
                }
                updated = Some(user.clone());
                Ok(users)
            })
            .await?;

        let user = updated.ok_or(StoreError::NotFound("user"))?;
        state
            .audit
            .append(actor, &format!("updated user {username}"))
            .await?;
        Ok(user)
    }

    pub async fn disable_user(
        state: &AppState,
        actor: &str,
        username: &str,
        disabled: bool,
    ) -> Result<User> {
        Self::update_user(
            state,
            actor,
            username,
            UpdateUserRequest {
                disabled: Some(disabled),
                ..UpdateUserRequest::default()
            },
        )
        .await
    }

    /// Returns `None` uniformly for an unknown username, a disabled account,
    /// or a wrong password, so callers cannot enumerate usernames.
    pub async fn authenticate(
        state: &AppState,
        username: &str,
        password: &str,
    ) -> Result<Option<User>> {
        let users: Vec<User> = state.store.read(USERS_FILE, Vec::new()).await?;
        let Some(user) = users.into_iter().find(|u| u.username == username) else {
            return Ok(None);
        };
        if user.disabled || !security::verify_password(password, &user.pass_hash)? {
            return Ok(None);
        }
        Ok(Some(user))
    }
}

fn default_admin() -> Result<Value> {
    let admin = User {
        id: Uuid::new_v4().to_string(),
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        role: UserRole::Admin,
        pass_hash: security::hash_password(DEFAULT_ADMIN_PASSWORD)?,
        disabled: false,
    };
    serde_json::to_value(admin).map_err(StoreError::Serialize)
}
