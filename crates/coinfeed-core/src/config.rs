//! 설정 관리.
//!
//! 기본값 → 설정 파일(TOML) → `COINFEED__*` 환경 변수 순으로 덮어씁니다.
//!
//! ```toml
//! [stream]
//! ws_base_url = "wss://stream.binance.com:9443/stream"
//! max_reconnect_attempts = 5
//! reconnect_base_delay_ms = 3000
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 실시간 스트림 설정
    #[serde(default)]
    pub stream: StreamConfig,
    /// 시세 프록시 서버 설정
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// 코인 메타데이터 설정
    #[serde(default)]
    pub coins: CoinConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 거래소 티커 스트림 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamConfig {
    /// 결합 스트림(combined stream) 기본 URL
    #[serde(default = "default_ws_base_url")]
    pub ws_base_url: String,
    /// 자동 재연결 최대 시도 횟수
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
    /// 재연결 기본 지연 (밀리초). n번째 시도 전 `n × 기본 지연`만큼 대기합니다.
    #[serde(default = "default_reconnect_base_delay_ms")]
    pub reconnect_base_delay_ms: u64,
}

fn default_ws_base_url() -> String {
    "wss://stream.binance.com:9443/stream".to_string()
}
fn default_max_reconnect_attempts() -> u32 {
    5
}
fn default_reconnect_base_delay_ms() -> u64 {
    3000
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            ws_base_url: default_ws_base_url(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            reconnect_base_delay_ms: default_reconnect_base_delay_ms(),
        }
    }
}

impl StreamConfig {
    /// 재연결 기본 지연을 `Duration`으로 반환합니다.
    pub fn reconnect_base_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_base_delay_ms)
    }
}

/// 시세 프록시 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 시세 집계 서비스 API 기본 URL
    pub upstream_base_url: String,
    /// 업스트림 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// 엔드포인트별 캐시 TTL
    pub cache: CacheTtlConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            upstream_base_url: "https://api.coingecko.com/api/v3".to_string(),
            request_timeout_secs: 10,
            cache: CacheTtlConfig::default(),
        }
    }
}

/// 엔드포인트별 서버 측 캐시 TTL (초).
///
/// 변동성이 큰 데이터일수록 짧게 둡니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheTtlConfig {
    /// 코인 시세 목록
    pub markets_secs: u64,
    /// 전체 시장 통계
    pub global_secs: u64,
    /// 코인별 과거 차트
    pub chart_secs: u64,
    /// 인기 코인
    pub trending_secs: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            markets_secs: 30,
            global_secs: 120,
            chart_secs: 300,
            trending_secs: 300,
        }
    }
}

/// 코인 메타데이터 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CoinConfig {
    /// 코인 식별자별 이미지 URL
    #[serde(default)]
    pub images: HashMap<String, String>,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("COINFEED")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 설정 파일이 없으면 기본값에 환경 변수만 적용합니다.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        tracing::warn!(path = %path.display(), "Config file not found, using defaults");
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("COINFEED")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
