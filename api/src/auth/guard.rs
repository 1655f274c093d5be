//! Access guard
//!
//! `authenticate` turns the session cookie into a [`Session`] request
//! extension. The other middlewares are predicates over that session and are
//! layered onto individual routes. `reject_read_only` checks the stored
//! account, so flagging an account takes effect on sessions already issued.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::{
    auth::token::{self, Claims, COOKIE_NAME},
    error::{AppError, AppResult},
    models::user::Role,
    repository::user_repository,
    AppState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
    pub read_only: bool,
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Session {
            user_id: claims.user_id,
            role: claims.role,
            read_only: claims.read_only,
        }
    }
}

impl Session {
    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(&[Role::Admin])
    }
}

/// Session role must be one of `roles`.
pub fn authorize(session: &Session, roles: &[Role]) -> AppResult<()> {
    if session.has_role(roles) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Unauthorized to access this route".to_string(),
        ))
    }
}

/// Read-only accounts may not change anything.
pub fn ensure_writable(session: &Session) -> AppResult<()> {
    if session.read_only {
        Err(AppError::Forbidden(
            "Demo user cannot perform this action".to_string(),
        ))
    } else {
        Ok(())
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let raw = jar
        .get(COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| bearer_token(&request).map(str::to_string));

    let Some(raw) = raw else {
        tracing::warn!("token missing, authentication denied");
        return Err(AppError::Unauthenticated(
            "Authentication invalid".to_string(),
        ));
    };

    let claims = token::verify(&raw, &state.decoding_key).map_err(|e| {
        tracing::warn!("rejected session token: {}", e);
        AppError::Unauthenticated("Authentication invalid".to_string())
    })?;

    request.extensions_mut().insert(Session::from(claims));
    Ok(next.run(request).await)
}

pub async fn reject_read_only(
    State(state): State<AppState>,
    Extension(mut session): Extension<Session>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let account = user_repository::find_by_id(&state.db, session.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user_id = %session.user_id, "session for a deleted account");
            AppError::Unauthenticated("Authentication invalid".to_string())
        })?;
    session.read_only = account.read_only;

    if let Err(e) = ensure_writable(&session) {
        tracing::info!(user_id = %session.user_id, "read-only account blocked from mutation");
        return Err(e);
    }
    Ok(next.run(request).await)
}

pub async fn require_admin(
    Extension(session): Extension<Session>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    authorize(&session, &[Role::Admin])?;
    Ok(next.run(request).await)
}
