//! 프로세스 내 채널 기반 전송 계층.
//!
//! 실제 네트워크 없이 연결 결과와 프레임을 미리 지정해 클라이언트를 구동합니다.
//! 녹화된 프레임 재생(`coinfeed replay`)과 재연결 정책 검증에 사용됩니다.

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::stream::StreamExt;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::client::lock;
use crate::error::{StreamError, StreamResult};
use crate::transport::{FrameStream, TickerTransport};

/// 예약된 연결 결과.
enum Scripted {
    Accept(mpsc::UnboundedReceiver<StreamResult<String>>),
    Refuse(String),
}

/// 연결 시도 기록.
#[derive(Debug, Clone)]
pub struct OpenAttempt {
    /// 요청된 URL
    pub url: String,
    /// 시도 시각
    pub at: Instant,
}

/// 수락된 연결로 프레임을 밀어 넣는 핸들.
///
/// 핸들을 drop하거나 `close()`하면 연결이 닫힌 것으로 처리됩니다.
#[derive(Debug)]
pub struct FrameSender {
    tx: mpsc::UnboundedSender<StreamResult<String>>,
}

impl FrameSender {
    /// 텍스트 프레임을 전송합니다. 연결이 이미 닫혔으면 `false`.
    pub fn send_text(&self, text: impl Into<String>) -> bool {
        self.tx.unbounded_send(Ok(text.into())).is_ok()
    }

    /// 전송 에러를 주입합니다.
    pub fn send_error(&self, error: StreamError) -> bool {
        self.tx.unbounded_send(Err(error)).is_ok()
    }

    /// 연결을 닫습니다.
    pub fn close(self) {
        self.tx.close_channel();
    }
}

/// 예약된 결과를 순서대로 돌려주는 전송 계층.
///
/// 예약이 비어 있으면 연결을 거부합니다.
#[derive(Default)]
pub struct ChannelTransport {
    script: Mutex<VecDeque<Scripted>>,
    attempts: Mutex<Vec<OpenAttempt>>,
}

impl ChannelTransport {
    /// 새 전송 계층을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 다음 연결 시도를 수락하도록 예약하고 프레임 전송 핸들을 반환합니다.
    pub fn accept(&self) -> FrameSender {
        let (tx, rx) = mpsc::unbounded();
        lock(&self.script).push_back(Scripted::Accept(rx));
        FrameSender { tx }
    }

    /// 다음 연결 시도를 거부하도록 예약합니다.
    pub fn refuse(&self, reason: impl Into<String>) {
        lock(&self.script).push_back(Scripted::Refuse(reason.into()));
    }

    /// 지금까지의 연결 시도 기록을 반환합니다.
    pub fn open_attempts(&self) -> Vec<OpenAttempt> {
        lock(&self.attempts).clone()
    }

    /// 지금까지의 연결 시도 횟수를 반환합니다.
    pub fn open_count(&self) -> usize {
        lock(&self.attempts).len()
    }
}

#[async_trait]
impl TickerTransport for ChannelTransport {
    async fn open(&self, url: &str) -> StreamResult<FrameStream> {
        lock(&self.attempts).push(OpenAttempt {
            url: url.to_string(),
            at: Instant::now(),
        });

        let next = lock(&self.script).pop_front();
        match next {
            Some(Scripted::Accept(rx)) => {
                debug!("Channel transport accepted connection");
                Ok(rx.boxed())
            }
            Some(Scripted::Refuse(reason)) => Err(StreamError::Connection(reason)),
            None => Err(StreamError::Connection("No scripted connection".to_string())),
        }
    }
}
