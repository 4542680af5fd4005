//! wsDispatch Gateway
//!
//! - WebSocket endpoint: `gateway.path` (default `/ws`)
//! - Every text/binary frame: decode envelope -> look up handler by `type` -> invoke
//! - Tracing span per connection and per frame
//! - Heartbeat ping + idle timeout, graceful shutdown on Ctrl-C / SIGTERM
//!
//! Usage: `wsdispatch-gateway [config.yaml]`

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use wsdispatch_gateway::error::Result;
use wsdispatch_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "wsdispatch-gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1);
    let cfg = config::load(path.as_deref())?;
    let listen = cfg.gateway.listen_addr()?;
    let ws_path = cfg.gateway.path.clone();

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!(%listen, path = %ws_path, "wsdispatch-gateway starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
