//! 거래소 티커 스트림 클라이언트.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - `TickerStreamClient`: 선형 백오프로 재연결하는 결합 티커 스트림 클라이언트
//! - `ListenerRegistry`: 이벤트 종류별 다중 리스너 분배
//! - 프로세스 공유 클라이언트 (`shared_client`)
//! - `LivePrices`: 소비자별 실시간 가격 스냅샷 핸들
//! - 전송 계층 추상화 (WebSocket, 프로세스 내 채널)

pub mod client;
pub mod error;
pub mod frame;
pub mod live;
pub mod registry;
pub mod simulated;
pub mod singleton;
pub mod transport;

pub use client::{ConnectionState, TickerStreamClient};
pub use error::*;
pub use frame::{combined_stream_url, parse_ticker_frame};
pub use live::LivePrices;
pub use registry::{
    ConnectListener, DisconnectListener, ErrorListener, ListenerId, ListenerRegistry,
    MessageListener,
};
pub use simulated::{ChannelTransport, FrameSender, OpenAttempt};
pub use singleton::{init_shared_client, shared_client};
pub use transport::{FrameStream, TickerTransport, TungsteniteTransport};
