pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod lookup;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::AppConfig;
use crate::lookup::RemoteLookup;
use crate::services::LecturerService;
use crate::state::AppState;

/// Wires the lecturer routes to a pool and a lookup backend.
pub fn build_app(db: SqlitePool, lookup: Arc<dyn RemoteLookup>, config: &AppConfig) -> Router {
    let lecturers = LecturerService::new(
        db.clone(),
        lookup,
        config.lecturer_match,
        config.query_failure,
    );
    let state = AppState {
        db,
        lecturers: Arc::new(lecturers),
    };

    api::router(state).layer(cors_layer(&config.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    // AppConfig only admits concrete origins, so nothing here is a wildcard.
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring unusable CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(origins))
}
