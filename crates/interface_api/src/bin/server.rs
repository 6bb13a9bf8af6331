//! Community Risk Pool - API Server Binary
//!
//! Starts the HTTP API for one pool group, held in memory.
//!
//! # Usage
//!
//! ```bash
//! # Run with the demo group and the offline advisory
//! cargo run --bin risk-pool-api
//!
//! # Run against Gemini
//! API_ADVISORY_API_KEY=... API_PORT=8080 cargo run --bin risk-pool-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_GROUP_NAME` - Group name (default: the demo association)
//! * `API_CURRENCY` - ISO 4217 code (default: KES)
//! * `API_ADVISORY_API_KEY` - Gemini API key; unset runs the offline advisory
//! * `API_ADVISORY_MODEL` - Gemini model (default: gemini-2.5-flash)
//! * `API_ADVISORY_BASE_URL` - Gemini endpoint base URL
//! * `API_ADVISORY_TIMEOUT_SECS` - Advisory call bound in seconds (default: 30)
//! * `API_SOLO_CLAIM_POLICY` - auto_deny, auto_approve or remain_pending
//! * `API_SEED_DEMO_GROUP` - Start from the demo group (default: true)
//! * `API_USSD_IDLE_TIMEOUT_SECS` - Idle USSD session lifetime in seconds (default: 180)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{GroupId, RandomIdGenerator};
use domain_pool::seed::demo_group;
use domain_pool::{
    AdvisoryGateway, AdvisoryPort, GeminiAdvisory, GeminiConfig, Group, GroupStore,
    OfflineAdvisory, PoolService,
};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let (config, config_error) = match ApiConfig::from_env() {
        Ok(config) => (config, None),
        Err(err) => (ApiConfig::default(), Some(err)),
    };

    init_tracing(&config.log_level);
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "invalid configuration; using defaults");
    }

    tracing::info!(
        host = %config.host,
        port = %config.port,
        group = %config.group_name,
        "Starting Community Risk Pool API Server"
    );

    let service = Arc::new(build_service(&config)?);
    // First prediction runs while the server starts accepting requests
    service.spawn_health_refresh();
    let app = create_router(AppState::new(service, config.clone()));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

fn build_service(config: &ApiConfig) -> anyhow::Result<PoolService> {
    let advisory: Arc<dyn AdvisoryPort> = match config.advisory_key() {
        Some(key) => {
            let gemini = GeminiAdvisory::new(
                GeminiConfig::new(key)
                    .with_model(config.advisory_model.clone())
                    .with_base_url(config.advisory_base_url.clone())
                    .with_request_timeout(config.advisory_timeout()),
            )
            .context("failed to build the Gemini client")?;
            tracing::info!(model = %gemini.model(), "advisory: gemini");
            Arc::new(gemini)
        }
        None => {
            tracing::warn!("no advisory API key configured; claims go straight to community review");
            Arc::new(OfflineAdvisory)
        }
    };

    let ids = RandomIdGenerator;
    let group = if config.seed_demo_group {
        demo_group(&ids, &config.group_name, config.currency).context("failed to build the demo group")?
    } else {
        tracing::warn!("starting with an empty group");
        Group::new(GroupId::generate(&ids), config.group_name.clone(), config.currency, Vec::new())
    };
    let group = group.with_solo_policy(config.solo_claim_policy);

    tracing::info!(
        group_id = %group.id(),
        members = group.members().len(),
        balance = %group.balance(),
        "group loaded"
    );

    let gateway = AdvisoryGateway::new(advisory, config.advisory_timeout());
    Ok(PoolService::new(GroupStore::new(group), gateway))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
