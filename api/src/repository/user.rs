//! User Repository

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use crate::models::user::{Role, UpdateUser, User};

pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub location: &'a str,
    pub role: Role,
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, location, role, \
                            avatar, read_only, created_at, updated_at";

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

pub async fn create(pool: &SqlitePool, user: NewUser<'_>) -> Result<User, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, first_name, last_name, email, password_hash, location, role,
                           read_only, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.location)
    .bind(user.role)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users ORDER BY created_at ASC",
        USER_COLUMNS
    ))
    .fetch_all(pool)
    .await
}

pub async fn update(
    pool: &SqlitePool,
    id: Uuid,
    changes: &UpdateUser,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET first_name = COALESCE(?, first_name),
            last_name = COALESCE(?, last_name),
            email = COALESCE(?, email),
            location = COALESCE(?, location),
            avatar = COALESCE(?, avatar),
            updated_at = ?
        WHERE id = ?
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(changes.first_name.as_deref().map(str::trim))
    .bind(changes.last_name.as_deref().map(str::trim))
    .bind(changes.email.as_deref().map(str::trim))
    .bind(changes.location.as_deref().map(str::trim))
    .bind(changes.avatar.as_deref())
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn set_read_only<'e>(
    executor: impl SqliteExecutor<'e>,
    id: Uuid,
    read_only: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET read_only = ?, updated_at = ? WHERE id = ?")
        .bind(read_only)
        .bind(Utc::now())
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("DELETE FROM users WHERE id = ? RETURNING {}", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}
