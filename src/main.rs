use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use antenatal_core::{CoreConfig, SystemClock, config::utc_offset_from_env_value};
use api_rest::AppState;

/// Main entry point for the antenatal dating service
///
/// Serves the REST API (with Swagger UI at `/swagger-ui`) on `ANTENATAL_REST_ADDR`.
///
/// # Environment Variables
/// - `ANTENATAL_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `ANTENATAL_UTC_OFFSET`: offset used for "today" and displayed timestamps (default: "+05:30")
/// - `RUST_LOG`: log filter
///
/// # Errors
/// Returns an error if:
/// - the logging configuration cannot be initialised,
/// - the UTC offset or server address is malformed,
/// - the address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("antenatal_run=info".parse()?)
                .add_directive("antenatal_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let utc_offset = utc_offset_from_env_value(std::env::var("ANTENATAL_UTC_OFFSET").ok())?;
    let cfg = Arc::new(CoreConfig::new(utc_offset));
    let clock = Arc::new(SystemClock::new(cfg.utc_offset()));

    let rest_addr: SocketAddr = std::env::var("ANTENATAL_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;

    tracing::info!("-- Starting antenatal REST API on {} (UTC{})", rest_addr, utc_offset);

    let app = api_rest::router(AppState::new(cfg, clock));
    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
