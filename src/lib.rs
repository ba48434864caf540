pub mod config;
pub mod crawler;
pub mod db;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod schema;
pub mod services;
pub mod validation;

use crate::config::Config;
use crate::db::DbPool;
use crate::middleware::{AccessLogger, REQUEST_ID_HEADER, auth::AuthService};
use axum::{
    Router,
    http::{HeaderName, HeaderValue},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub access_log: AccessLogger,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(
        db: DbPool,
        config: Config,
        access_log: AccessLogger,
        metrics: PrometheusHandle,
    ) -> Self {
        let auth_service = AuthService::new(config.auth());
        Self {
            db,
            config: Arc::new(config),
            auth_service,
            access_log,
            metrics,
        }
    }
}

pub fn init_tracing(config: &Config) {
    let level = config
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_max_level(level)
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_max_level(level).init();
        }
    }
}

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    layer.allow_origin(allowed)
}

/// Full HTTP application: routes, CORS and the request observation layers.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let access_log = state.access_log.clone();
    middleware::observe(routes::create_router(state).layer(cors), access_log)
}
