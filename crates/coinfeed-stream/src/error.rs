//! 스트림 에러 타입.

use thiserror::Error;

/// 티커 스트림 관련 에러.
#[derive(Debug, Clone, Error)]
pub enum StreamError {
    /// 연결 수립 실패
    #[error("Connection error: {0}")]
    Connection(String),

    /// 연결 끊김
    #[error("Disconnected: {0}")]
    Disconnected(String),

    /// WebSocket 프로토콜/전송 에러
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// 프레임 파싱 에러
    #[error("Parse error: {0}")]
    Parse(String),

    /// 알 수 없는 에러
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// 스트림 작업을 위한 Result 타입.
pub type StreamResult<T> = Result<T, StreamError>;

impl StreamError {
    /// 재연결로 회복 가능한 에러인지 확인.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StreamError::Connection(_) | StreamError::Disconnected(_) | StreamError::WebSocket(_)
        )
    }
}

impl From<serde_json::Error> for StreamError {
    fn from(err: serde_json::Error) -> Self {
        StreamError::Parse(err.to_string())
    }
}

impl From<coinfeed_core::FeedError> for StreamError {
    fn from(err: coinfeed_core::FeedError) -> Self {
        match err {
            coinfeed_core::FeedError::Parse(msg) => StreamError::Parse(msg),
            coinfeed_core::FeedError::Network(msg) => StreamError::Connection(msg),
            other => StreamError::Unknown(other.to_string()),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for StreamError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error as WsError;

        match &err {
            WsError::ConnectionClosed | WsError::AlreadyClosed => {
                StreamError::Disconnected(err.to_string())
            }
            WsError::Io(_) | WsError::Url(_) | WsError::Http(_) => {
                StreamError::Connection(err.to_string())
            }
            _ => StreamError::WebSocket(err.to_string()),
        }
    }
}
