#![allow(dead_code)]

use api::{
    auth::token,
    config::Config,
    db,
    models::job::{CreateJob, Job, JobStatus, JobType},
    models::user::{Role, User},
    repository::{job_repository, user_repository, user_repository::NewUser},
    rest, AppState,
};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub async fn test_app() -> TestApp {
    let pool = db::memory_pool().await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    let state = AppState::new(pool, Config::for_tests(TEST_SECRET));

    TestApp {
        router: rest::router(state.clone()),
        state,
    }
}

/// Account inserted directly, skipping password hashing. The returned string
/// is a ready `Cookie` header value.
pub async fn create_user(app: &TestApp, email: &str, role: Role, read_only: bool) -> (User, String) {
    let mut user = user_repository::create(
        &app.state.db,
        NewUser {
            first_name: "Test",
            last_name: "User",
            email,
            password_hash: "unused",
            location: "my city",
            role,
        },
    )
    .await
    .unwrap();

    if read_only {
        user_repository::set_read_only(&app.state.db, user.id, true)
            .await
            .unwrap();
        user.read_only = true;
    }

    let jwt = token::issue(&user, &app.state.encoding_key, app.state.session_ttl()).unwrap();
    (user, format!("{}={}", token::COOKIE_NAME, jwt))
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub async fn insert_job(
    app: &TestApp,
    owner: Uuid,
    company: &str,
    position: &str,
    status: JobStatus,
    created_at: DateTime<Utc>,
) -> Job {
    let req = CreateJob {
        company: company.to_string(),
        position: position.to_string(),
        job_status: status,
        job_type: JobType::FullTime,
        job_location: None,
    };
    job_repository::create(&app.state.db, owner, &req, created_at)
        .await
        .unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse {
        status,
        set_cookie,
        body,
    }
}

pub fn urlencode(text: &str) -> String {
    url::form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

pub fn positions(body: &Value) -> Vec<String> {
    body["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["position"].as_str().unwrap().to_string())
        .collect()
}
