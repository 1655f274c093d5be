pub mod auth;
pub mod jobs;
pub mod users;

use axum::{
    extract::{FromRequest, FromRequestParts},
    Json,
};
use serde::Serialize;

use crate::error::AppError;

/// `Json` whose rejection is reported through [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(Debug, Serialize)]
pub struct Probe {
    pub msg: &'static str,
}

pub async fn test_route() -> Json<Probe> {
    Json(Probe { msg: "test route" })
}
