pub mod config;
pub mod context;
pub mod db;
pub mod entities;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod repo;
pub mod schema;
pub mod service;
pub mod state;

use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;

use crate::{config::Config, openapi::ApiDoc, state::AppState};

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(handler::health::routes(state.clone()))
        .merge(handler::accounts::routes(state))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(axum::middleware::from_fn(middleware::process_time))
}

/// Installs the global subscriber. `RUST_LOG` overrides `LOG_LEVEL`.
pub fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let (json_layer, fmt_layer) = if config.log_json {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(fmt_layer)
        .init();
}
