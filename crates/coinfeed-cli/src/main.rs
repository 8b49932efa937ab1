//! 코인 실시간 시세 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 5초마다 시세 테이블 출력
//! coinfeed watch --interval 5
//!
//! # 1분 동안 JSON으로 감시
//! coinfeed watch --duration 60 --format json
//!
//! # 내장 심볼 매핑 보기
//! coinfeed symbols
//!
//! # 녹화된 프레임 재생
//! coinfeed replay --file data/frames.jsonl
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use coinfeed_core::{init_logging, AppConfig, LogConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use coinfeed_cli::commands::output::{render_snapshot, OutputFormat};
use coinfeed_cli::commands::replay::replay_file;
use coinfeed_cli::commands::symbols::list_symbols;
use coinfeed_cli::commands::watch::{watch_prices, WatchConfig};

#[derive(Parser)]
#[command(name = "coinfeed")]
#[command(about = "Live coin price feed CLI - 거래소 티커 스트림 기반 실시간 시세", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 실시간 시세 감시
    Watch {
        /// 출력 주기 (초)
        #[arg(short, long, default_value = "5")]
        interval: u64,

        /// 감시 시간 (초, 생략 시 Ctrl+C까지)
        #[arg(short, long)]
        duration: Option<u64>,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 내장 심볼 매핑 보기
    Symbols {
        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 녹화된 스트림 프레임 재생 (한 줄에 프레임 하나)
    Replay {
        /// 프레임 파일 경로
        #[arg(long)]
        file: PathBuf,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config))?;

    init_logging(LogConfig::from_settings(&config.logging))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Watch {
            interval,
            duration,
            format,
        } => {
            if interval == 0 {
                anyhow::bail!("Interval must be at least 1 second");
            }

            let watch_config = WatchConfig {
                interval: Duration::from_secs(interval),
                duration: duration.map(Duration::from_secs),
                format: OutputFormat::parse(&format)?,
            };
            watch_prices(&config, watch_config).await?;
        }

        Commands::Symbols { format } => {
            let count = list_symbols(OutputFormat::parse(&format)?)?;
            info!("Listed {} mappings", count);
        }

        Commands::Replay { file, format } => {
            let format = OutputFormat::parse(&format)?;
            let summary = replay_file(&file).await?;
            println!("{}", render_snapshot(&summary.snapshot, format)?);
            info!(
                "Replayed {} frames ({} ticker events)",
                summary.frames, summary.events
            );
        }
    }

    Ok(())
}
