use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{Role, User};

pub const COOKIE_NAME: &str = "token";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    pub role: Role,
    #[serde(default)]
    pub read_only: bool,
    pub iat: usize,
    pub exp: usize,
}

pub fn issue(
    user: &User,
    key: &EncodingKey,
    ttl: chrono::Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(ttl)
        .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC);

    let claims = Claims {
        user_id: user.id,
        role: user.role,
        read_only: user.read_only,
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(&Header::default(), &claims, key)
}

/// Checks signature and expiry.
pub fn verify(token: &str, key: &DecodingKey) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(token, key, &Validation::default()).map(|data| data.claims)
}

pub fn session_cookie(token: String, ttl_hours: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(ttl_hours))
        .build()
}

/// Expired, empty cookie that overwrites the session on the client.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((COOKIE_NAME, "")).path("/").http_only(true).build();
    cookie.make_removal();
    cookie
}
