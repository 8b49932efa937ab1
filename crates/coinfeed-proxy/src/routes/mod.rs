//! 프록시 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크
//! - `/api/coins/markets` - 코인 시세 목록
//! - `/api/global` - 전체 시장 통계
//! - `/api/coins/{id}/market_chart` - 코인별 과거 차트
//! - `/api/trending` - 인기 코인

pub mod health;
pub mod market;

pub use health::{health_router, HealthResponse};
pub use market::market_router;

use axum::{
    http::{header, Method, StatusCode},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::state::ProxyState;

/// CORS 레이어.
///
/// 브라우저 대시보드에서 직접 호출하므로 모든 origin의 GET/OPTIONS를 허용합니다.
/// preflight 요청은 이 레이어가 직접 응답합니다.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// 전체 프록시 라우터 생성.
pub fn create_router(state: Arc<ProxyState>, request_timeout: Duration) -> Router {
    Router::new()
        .nest("/health", health_router())
        .nest("/api", market_router())
        .layer(TraceLayer::new_for_http())
        // 업스트림 타임아웃보다 약간 길게 두어 업스트림 에러가 먼저 보고되도록 함
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout + Duration::from_secs(5),
        ))
        .layer(cors_layer())
        .with_state(state)
}
