//! 시세 집계 API 패스스루 프록시.
//!
//! 브라우저 대시보드가 업스트림 집계 서비스를 직접 호출하지 않도록 네 개의
//! 엔드포인트를 그대로 중계하고, 공유 캐시용 `Cache-Control` 헤더를 붙입니다.
//!
//! # 모듈 구성
//!
//! - [`state`]: 공유 상태 (HTTP 클라이언트, 캐시 TTL)
//! - [`routes`]: 엔드포인트 및 라우터 구성
//! - [`upstream`]: 업스트림 호출
//! - [`error`]: 에러 응답

pub mod error;
pub mod routes;
pub mod state;
pub mod upstream;

pub use error::{ErrorBody, ProxyError, ProxyResult};
pub use routes::create_router;
pub use state::ProxyState;
