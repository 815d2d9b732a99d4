use std::process::ExitCode;

use tickerdash_relay::{router, AppState, RelayConfig, RelayServerError};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "relay exited");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), RelayServerError> {
    let config = RelayConfig::from_env()?;
    if !config.key_configured() {
        warn!("no provider API key configured; proxied calls will answer 500");
    }

    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| RelayServerError::Bind { addr, source })?;

    info!(
        %addr,
        upstream = %config.upstream_url,
        quota_per_minute = config.quota_per_minute,
        "relay listening"
    );

    let app = router(AppState::new(config)?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
        .map_err(RelayServerError::Serve)
}
