use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use validator::Validate;

use crate::{
    auth::{password, token},
    error::{AppError, AppResult},
    handlers::AppJson,
    models::MessageResponse,
    models::user::{AuthResponse, LoginPayload, RegisterPayload, RegisterResponse, Role},
    repository::user_repository::{self, NewUser},
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterPayload>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();
    if user_repository::find_by_email(&state.db, &email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    // First account becomes admin
    let role = if user_repository::count(&state.db).await? == 0 {
        Role::Admin
    } else {
        Role::User
    };

    let password_hash = password::hash(&payload.password)?;

    let user = user_repository::create(
        &state.db,
        NewUser {
            first_name: payload.first_name.trim(),
            last_name: payload.last_name.trim(),
            email: &email,
            password_hash: &password_hash,
            location: payload.location.trim(),
            role,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, role = ?user.role, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            msg: "User was created".to_string(),
            user,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginPayload>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let email = payload.email.trim().to_lowercase();
    let secret = payload.password.trim();
    if email.is_empty() || secret.is_empty() {
        return Err(AppError::BadRequest(
            "Please provide email and password".to_string(),
        ));
    }

    let user = user_repository::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("Invalid credentials".to_string()))?;

    if !password::verify(secret, &user.password_hash)? {
        return Err(AppError::Unauthenticated("Invalid credentials".to_string()));
    }

    let token = token::issue(&user, &state.encoding_key, state.session_ttl())?;
    let cookie = token::session_cookie(
        token.clone(),
        state.config.jwt_expires_hours,
        state.config.cookie_secure,
    );

    tracing::info!(user_id = %user.id, "user logged in");

    Ok((
        jar.add(cookie),
        Json(AuthResponse {
            message: "user logged in".to_string(),
            user,
            token,
        }),
    ))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.add(token::removal_cookie()),
        Json(MessageResponse::new("user logged out")),
    )
}
