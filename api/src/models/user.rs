use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub location: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub read_only: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[serde(default)]
    #[validate(length(min = 3, message = "first name must be at least 3 characters"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[serde(default)]
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "password must be at least 8 characters long"))]
    pub password: String,
    #[serde(default)]
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Profile changes; the password is never updated through this payload.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 3, max = 50, message = "first name must be 3 to 50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "last name must be 1 to 50 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "location cannot be empty"))]
    pub location: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub msg: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct DeletedUserResponse {
    pub user: User,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppStats {
    pub users: i64,
    pub jobs: i64,
}
