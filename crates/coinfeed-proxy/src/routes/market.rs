//! 시세 집계 API 패스스루 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /api/coins/markets` - 코인 시세 목록
//! - `GET /api/global` - 전체 시장 통계
//! - `GET /api/coins/{id}/market_chart` - 코인별 과거 차트
//! - `GET /api/trending` - 인기 코인
//!
//! 쿼리 문자열은 그대로 업스트림에 전달하며, 성공 응답에는 엔드포인트별
//! TTL의 `Cache-Control` 헤더를 붙입니다. 경로에 끼워 넣는 코인 ID는
//! 슬러그(영숫자, `-`, `_`)만 허용합니다.

use axum::{
    extract::{Path, RawQuery, State},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::error::{ProxyError, ProxyResult};
use crate::state::ProxyState;
use crate::upstream::{cached_json, fetch_json};

/// 코인 시세 목록.
///
/// GET /api/coins/markets
pub async fn coins_markets(
    State(state): State<Arc<ProxyState>>,
    RawQuery(query): RawQuery,
) -> ProxyResult<Response> {
    let body = fetch_json(&state, "/coins/markets", query.as_deref()).await?;
    Ok(cached_json(body, state.cache.markets_secs))
}

/// 전체 시장 통계.
///
/// GET /api/global
pub async fn global(
    State(state): State<Arc<ProxyState>>,
    RawQuery(query): RawQuery,
) -> ProxyResult<Response> {
    let body = fetch_json(&state, "/global", query.as_deref()).await?;
    Ok(cached_json(body, state.cache.global_secs))
}

/// 코인별 과거 차트.
///
/// GET /api/coins/{id}/market_chart
pub async fn market_chart(
    State(state): State<Arc<ProxyState>>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> ProxyResult<Response> {
    if !is_coin_slug(&id) {
        return Err(ProxyError::InvalidCoinId(id));
    }
    let path = format!("/coins/{}/market_chart", id);
    let body = fetch_json(&state, &path, query.as_deref()).await?;
    Ok(cached_json(body, state.cache.chart_secs))
}

/// 업스트림 경로 세그먼트로 안전한 코인 ID인지 확인합니다.
fn is_coin_slug(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// 인기 코인.
///
/// GET /api/trending
pub async fn trending(
    State(state): State<Arc<ProxyState>>,
    RawQuery(query): RawQuery,
) -> ProxyResult<Response> {
    let body = fetch_json(&state, "/search/trending", query.as_deref()).await?;
    Ok(cached_json(body, state.cache.trending_secs))
}

/// 시세 라우터 생성.
pub fn market_router() -> Router<Arc<ProxyState>> {
    Router::new()
        .route("/coins/markets", get(coins_markets))
        .route("/global", get(global))
        .route("/coins/{id}/market_chart", get(market_chart))
        .route("/trending", get(trending))
}
