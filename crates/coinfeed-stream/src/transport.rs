//! 스트림 전송 계층.
//!
//! 클라이언트는 `TickerTransport`를 통해서만 연결을 엽니다. 연결은 텍스트 프레임의
//! 스트림으로 표현되며:
//! - 스트림 종료 = 연결 닫힘
//! - `Err` 항목 = 전송 에러 (이후 연결 닫힘으로 처리)

use async_trait::async_trait;
use futures::future;
use futures::stream::{BoxStream, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, info};

use crate::error::{StreamError, StreamResult};

/// 열린 연결에서 수신되는 텍스트 프레임 스트림.
pub type FrameStream = BoxStream<'static, StreamResult<String>>;

/// 스트림 연결을 여는 전송 계층.
#[async_trait]
pub trait TickerTransport: Send + Sync {
    /// 주어진 URL로 연결을 열고 프레임 스트림을 반환합니다.
    async fn open(&self, url: &str) -> StreamResult<FrameStream>;
}

/// tokio-tungstenite 기반 WebSocket 전송 계층.
#[derive(Debug, Clone, Default)]
pub struct TungsteniteTransport;

impl TungsteniteTransport {
    /// 새 전송 계층을 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TickerTransport for TungsteniteTransport {
    async fn open(&self, url: &str) -> StreamResult<FrameStream> {
        info!("Connecting to WebSocket: {}", url);
        let (ws_stream, _) = connect_async(url).await?;

        // Pong은 tungstenite에서 자동으로 처리됨
        let frames = ws_stream
            .take_while(|msg| future::ready(!matches!(msg, Ok(Message::Close(_)))))
            .filter_map(|msg| {
                future::ready(match msg {
                    Ok(Message::Text(text)) => Some(Ok(text)),
                    Ok(Message::Ping(_)) => {
                        debug!("Received ping");
                        None
                    }
                    Ok(_) => None,
                    Err(e) => Some(Err(StreamError::from(e))),
                })
            });

        Ok(frames.boxed())
    }
}
