//! 업스트림 시세 집계 API 호출.

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ProxyError, ProxyResult};
use crate::state::ProxyState;

/// 업스트림 경로를 호출하고 JSON 본문을 반환합니다.
///
/// 쿼리 문자열은 가공 없이 그대로 전달합니다.
pub async fn fetch_json(state: &ProxyState, path: &str, query: Option<&str>) -> ProxyResult<Value> {
    let url = state.upstream_url(path, query);
    debug!(%url, "Forwarding request upstream");

    let response = state
        .http
        .get(&url)
        .header(header::ACCEPT, "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        warn!(endpoint = path, status = status.as_u16(), "Upstream returned error status");
        return Err(ProxyError::UpstreamStatus {
            endpoint: path.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ProxyError::InvalidPayload(e.to_string()))
}

/// 공유 캐시용 `Cache-Control` 헤더를 붙인 JSON 응답을 만듭니다.
pub fn cached_json(body: Value, ttl_secs: u64) -> Response {
    let mut response = Json(body).into_response();
    if let Ok(value) = HeaderValue::from_str(&format!("s-maxage={}, stale-while-revalidate", ttl_secs)) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    response
}
