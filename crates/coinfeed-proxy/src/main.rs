//! 시세 프록시 서버 진입점.

use anyhow::Context;
use coinfeed_core::{init_logging, AppConfig, LogConfig};
use coinfeed_proxy::{create_router, ProxyState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config_path =
        std::env::var("COINFEED_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let config = AppConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;

    init_logging(LogConfig::from_settings(&config.logging))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting coinfeed proxy...");

    let proxy = &config.proxy;
    let addr: SocketAddr = format!("{}:{}", proxy.host, proxy.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", proxy.host, proxy.port))?;

    let state = Arc::new(ProxyState::from_config(proxy)?);
    let app = create_router(state, Duration::from_secs(proxy.request_timeout_secs));

    info!(%addr, upstream = %proxy.upstream_base_url, "Proxy listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Proxy stopped gracefully");
    Ok(())
}

/// Ctrl+C 또는 SIGTERM 시그널을 기다립니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
