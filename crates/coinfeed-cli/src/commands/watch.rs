//! 실시간 시세 감시.

use anyhow::Result;
use coinfeed_core::{AppConfig, PriceSnapshot, SymbolTable};
use coinfeed_stream::{init_shared_client, LivePrices};
use std::time::Duration;
use tracing::{info, warn};

use super::output::{render_snapshot, OutputFormat};

/// 감시 설정.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// 출력 주기
    pub interval: Duration,
    /// 감시 시간 (없으면 Ctrl+C까지)
    pub duration: Option<Duration>,
    /// 출력 형식
    pub format: OutputFormat,
}

/// 공유 클라이언트로 연결해 스냅샷을 주기적으로 출력합니다.
pub async fn watch_prices(app: &AppConfig, config: WatchConfig) -> Result<()> {
    let client = init_shared_client(&app.stream);
    info!(
        symbols = client.symbols().len(),
        url = client.stream_url(),
        "Watching live prices"
    );

    let initial = PriceSnapshot::new().with_images(app.coins.images.clone());
    let live = LivePrices::with_snapshot(client.clone(), SymbolTable::builtin(), initial);

    let mut ticker = tokio::time::interval(config.interval);
    let deadline = async {
        match config.duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                println!("{}\n", render_snapshot(&live.snapshot(), config.format)?);
            }
            _ = &mut deadline => {
                info!("Watch duration elapsed");
                break;
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                }
                info!("Received Ctrl+C, stopping");
                break;
            }
        }
    }

    println!("{}", render_snapshot(&live.snapshot(), config.format)?);
    drop(live);
    client.disconnect();
    Ok(())
}
