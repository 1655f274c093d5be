use axum::{extract::State, Extension, Json};
use axum_extra::extract::CookieJar;
use validator::Validate;

use crate::{
    auth::{token, Session},
    error::{AppError, AppResult},
    handlers::AppJson,
    models::user::{AppStats, DeletedUserResponse, UpdateUser, UserResponse, UsersResponse},
    repository::{job_repository, user_repository},
    AppState,
};

fn account_gone() -> AppError {
    AppError::NotFound("user no longer exists".to_string())
}

/// GET /users/current-user
pub async fn current_user(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> AppResult<Json<UserResponse>> {
    let user = user_repository::find_by_id(&state.db, session.user_id)
        .await?
        .ok_or_else(account_gone)?;

    Ok(Json(UserResponse { user }))
}

/// PATCH /users/update-user
pub async fn update_user(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    AppJson(mut changes): AppJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    changes.validate()?;
    if let Some(email) = changes.email.as_mut() {
        *email = email.trim().to_lowercase();
    }

    let user = user_repository::update(&state.db, session.user_id, &changes)
        .await?
        .ok_or_else(account_gone)?;
    tracing::info!(user_id = %user.id, "profile updated");

    Ok(Json(UserResponse { user }))
}

/// DELETE /users/delete-user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<DeletedUserResponse>)> {
    let user = user_repository::delete(&state.db, session.user_id)
        .await?
        .ok_or_else(account_gone)?;
    tracing::info!(user_id = %user.id, "account deleted");

    Ok((
        jar.add(token::removal_cookie()),
        Json(DeletedUserResponse {
            user,
            message: "user deleted".to_string(),
        }),
    ))
}

/// GET /users/admin/users
pub async fn all_users(State(state): State<AppState>) -> AppResult<Json<UsersResponse>> {
    let users = user_repository::list_all(&state.db).await?;
    Ok(Json(UsersResponse { users }))
}

/// GET /users/admin/app-stats
pub async fn app_stats(State(state): State<AppState>) -> AppResult<Json<AppStats>> {
    let users = user_repository::count(&state.db).await?;
    let jobs = job_repository::count_all(&state.db).await?;
    Ok(Json(AppStats { users, jobs }))
}
