use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod dto;
mod error;
mod handlers;
mod models;
mod mood;
mod store;

use auth::rate_limit::RateLimiter;
use config::Config;
use store::{JournalStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub journal: Arc<JournalStore>,
    pub users: Arc<UserStore>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let journal = JournalStore::new(config.journal_dir());
        let users = UserStore::new(config.users_file());
        let rate_limiter = RateLimiter::new(
            config.auth_rate_limit_max,
            Duration::from_secs(config.auth_rate_limit_window_secs),
        );

        Self {
            config: Arc::new(config),
            journal: Arc::new(journal),
            users: Arc::new(users),
            rate_limiter,
        }
    }
}

fn allowed_origins(config: &Config) -> Vec<axum::http::HeaderValue> {
    std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<axum::http::HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

fn cors_layer(config: &Config) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(config))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::HeaderName::from_static(auth::fingerprint::DEVICE_ID_HEADER),
        ])
        .allow_credentials(true)
}

pub fn build_app(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/auth/status", get(handlers::auth::status))
        .merge(auth_routes);

    let session_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let journal_routes = Router::new()
        .route("/api/journal", post(handlers::journal::create_entry))
        .route("/api/journal", get(handlers::journal::list_entries))
        .route("/api/journal/:id", delete(handlers::journal::delete_entry))
        .route("/api/stats", get(handlers::journal::get_stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::resolve_identity,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(journal_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodlog_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env();
    tracing::info!(data_dir = %config.data_dir.display(), "Using flat-file storage");

    let state = AppState::new(config);
    state.rate_limiter.spawn_sweeper();

    let addr = state.config.listen_addr();
    let app = build_app(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    // Client IP feeds anonymous identities and rate limiting
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .expect("Server error");
}
