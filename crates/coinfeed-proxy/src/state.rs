//! 프록시 공유 상태.

use coinfeed_core::{CacheTtlConfig, ProxyConfig};
use std::time::Duration;

use crate::error::ProxyResult;

/// 핸들러가 공유하는 상태.
#[derive(Debug, Clone)]
pub struct ProxyState {
    /// 업스트림 HTTP 클라이언트 (커넥션 풀 공유)
    pub http: reqwest::Client,
    /// 업스트림 API 기본 URL (끝의 `/` 제거됨)
    pub upstream_base_url: String,
    /// 엔드포인트별 캐시 TTL
    pub cache: CacheTtlConfig,
}

impl ProxyState {
    /// 설정으로부터 상태를 생성합니다.
    pub fn from_config(config: &ProxyConfig) -> ProxyResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("coinfeed-proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            upstream_base_url: config.upstream_base_url.trim_end_matches('/').to_string(),
            cache: config.cache.clone(),
        })
    }

    /// 업스트림 경로의 전체 URL을 생성합니다.
    pub fn upstream_url(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(query) if !query.is_empty() => {
                format!("{}{}?{}", self.upstream_base_url, path, query)
            }
            _ => format!("{}{}", self.upstream_base_url, path),
        }
    }
}
