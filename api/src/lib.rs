pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod rest;
pub mod seed;
pub mod service;

use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};
use sqlx::sqlite::SqlitePool;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub encoding_key: EncodingKey,
    pub decoding_key: DecodingKey,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let secret = config.jwt_secret.as_bytes();
        AppState {
            db,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            config: Arc::new(config),
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.config.jwt_expires_hours)
    }
}
