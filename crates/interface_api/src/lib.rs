//! HTTP API Layer
//!
//! REST surface of the risk pool, shared by the rich UI and the USSD
//! channel. Every mutating request names the acting member explicitly.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for the group, claims, contributions and USSD turns
//! - **Middleware**: Request auditing
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(service, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, delete},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_pool::PoolService;
use interface_ussd::SessionRegistry;

use crate::config::ApiConfig;
use crate::middleware::audit_middleware;
use crate::handlers::{claims, contributions, group, health, ussd};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PoolService>,
    pub sessions: Arc<SessionRegistry>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(service: Arc<PoolService>, config: ApiConfig) -> Self {
        Self {
            sessions: Arc::new(
                SessionRegistry::new(service.clone()).with_idle_timeout(config.ussd_idle_timeout()),
            ),
            service,
            config,
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Claims routes
    let claims_routes = Router::new()
        .route("/", post(claims::file_claim))
        .route("/", get(claims::list_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/votes", post(claims::cast_vote))
        .route("/:id/settlement", post(claims::settle_claim));

    // USSD routes
    let ussd_routes = Router::new()
        .route("/", post(ussd::turn))
        .route("/:session_id", delete(ussd::end_session));

    let api_routes = Router::new()
        .route("/group", get(group::get_group))
        .route("/pool/balance", get(group::get_balance))
        .route("/fund-health", get(group::fund_health))
        .route("/contributions", post(contributions::record_contribution))
        .nest("/claims", claims_routes)
        .nest("/ussd", ussd_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
