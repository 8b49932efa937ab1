//! 프록시 에러 응답.
//!
//! 업스트림 실패의 세부 내용은 로그로만 남기고, 클라이언트에는 항상
//! `500 {"error": "..."}` 형식의 일반 메시지를 반환합니다. 경로의 코인 ID가
//! 형식에 맞지 않으면 업스트림을 호출하지 않고 `400`을 반환합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// 프록시 에러.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// 업스트림 요청 전송 실패 (연결, 타임아웃 등)
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// 업스트림이 2xx가 아닌 상태 코드로 응답
    #[error("Upstream returned status {status} for {endpoint}")]
    UpstreamStatus { endpoint: String, status: u16 },

    /// 업스트림 응답 본문이 JSON이 아님
    #[error("Invalid upstream payload: {0}")]
    InvalidPayload(String),

    /// 경로의 코인 ID가 슬러그 형식이 아님
    #[error("Invalid coin id: {0:?}")]
    InvalidCoinId(String),
}

/// 프록시 결과 타입.
pub type ProxyResult<T> = Result<T, ProxyError>;

/// 에러 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ProxyError {
    /// 클라이언트에 노출할 일반 메시지.
    pub fn public_message(&self) -> &'static str {
        match self {
            ProxyError::Upstream(_) | ProxyError::UpstreamStatus { .. } => {
                "Failed to fetch data from upstream"
            }
            ProxyError::InvalidPayload(_) => "Invalid data received from upstream",
            ProxyError::InvalidCoinId(_) => "Invalid coin id",
        }
    }

    /// 응답 상태 코드.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidCoinId(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error!(error = %self, "Proxy request failed");
        let body = ErrorBody {
            error: self.public_message().to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
