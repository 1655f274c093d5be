use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    auth::guard::{authenticate, reject_read_only, require_admin},
    handlers::{self, auth, jobs, users},
    AppState,
};

fn job_routes(state: &AppState) -> Router<AppState> {
    let writable = from_fn_with_state(state.clone(), reject_read_only);

    Router::new()
        .route("/", get(jobs::list))
        .route("/", post(jobs::create).layer(writable.clone()))
        .route("/stats", get(jobs::stats))
        .route("/:id", get(jobs::get))
        .route("/:id", patch(jobs::edit).layer(writable.clone()))
        .route("/:id", delete(jobs::delete).layer(writable))
}

fn user_routes(state: &AppState) -> Router<AppState> {
    let writable = from_fn_with_state(state.clone(), reject_read_only);
    let admin = from_fn(require_admin);

    Router::new()
        .route("/current-user", get(users::current_user))
        .route("/update-user", patch(users::update_user).layer(writable.clone()))
        .route("/delete-user", delete(users::delete_user).layer(writable))
        .route("/admin/users", get(users::all_users).layer(admin.clone()))
        .route("/admin/app-stats", get(users::app_stats).layer(admin))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

fn cors(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            tracing::warn!("invalid FRONTEND_URL {:?}, CORS disabled", frontend_url);
            cors
        }
    }
}

pub fn router(state: AppState) -> Router {
    let session = from_fn_with_state(state.clone(), authenticate);

    let api = Router::new()
        .nest("/jobs", job_routes(&state).layer(session.clone()))
        .nest("/users", user_routes(&state).layer(session))
        .nest("/auth", auth_routes())
        .route("/test", get(handlers::test_route));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors(&state.config.frontend_url)),
        )
        .with_state(state)
}
