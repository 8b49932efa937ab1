//! # Coinfeed Core
//!
//! 실시간 코인 시세 피드의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 피드 전반에서 사용되는 기본 타입을 제공합니다:
//! - 코인 식별자(`CoinId`)와 거래소 심볼(`ExchangeSymbol`)
//! - 두 네임스페이스 간 양방향 매핑 테이블(`SymbolTable`)
//! - 정규화된 티커 이벤트(`TickerEvent`)
//! - 소비자 측 시세 스냅샷(`PriceSnapshot`)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
