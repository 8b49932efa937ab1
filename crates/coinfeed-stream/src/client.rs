//! 재연결하는 티커 스트림 클라이언트.
//!
//! 미리 지정된 심볼 전체의 `@ticker` 스트림을 하나의 결합 연결로 수신하고,
//! 수신한 프레임을 정규화해 등록된 리스너들에게 분배합니다.
//!
//! # 상태 전이
//!
//! ```text
//! Disconnected ──connect()──▶ Connecting ──open──▶ Connected
//!      ▲                          │                   │
//!      └────────── close ◀────────┴───────────────────┘
//!      │
//!      └── n × 기본 지연 후 자동 재연결 (최대 시도 횟수까지)
//! ```
//!
//! - 연결 성공 시 재연결 시도 횟수는 0으로 초기화됩니다.
//! - 소켓이 열려 있는 동안의 전송 에러는 일시적인 것으로 보고 무시합니다.
//! - `disconnect()`는 대기 중인 재연결 타이머도 취소합니다.

use coinfeed_core::{ExchangeSymbol, StreamConfig, TickerEvent};
use futures::StreamExt;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::StreamError;
use crate::frame::{combined_stream_url, parse_ticker_frame};
use crate::registry::{ListenerId, ListenerRegistry};
use crate::transport::{FrameStream, TickerTransport, TungsteniteTransport};

/// 뮤텍스를 잠급니다. 리스너 패닉으로 오염된 잠금도 그대로 복구해 사용합니다.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 클라이언트 연결 상태.
///
/// 소켓 수명주기 이벤트와 재연결 타이머로만 전이되며, 소비자가 직접 설정할 수 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// 연결 없음 (초기 상태)
    #[default]
    Disconnected,
    /// 연결 수립 중
    Connecting,
    /// 연결됨
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

/// 하나의 물리 연결 세션.
struct Session {
    cancel: CancellationToken,
    socket_open: Arc<AtomicBool>,
}

#[derive(Default)]
struct ClientState {
    connection: ConnectionState,
    reconnect_attempts: u32,
    /// 세션 세대. 취소된 세션의 늦은 이벤트를 걸러냅니다.
    generation: u64,
    session: Option<Session>,
    pending_reconnect: Option<CancellationToken>,
}

struct ClientInner {
    settings: StreamConfig,
    symbols: Vec<ExchangeSymbol>,
    stream_url: String,
    transport: Arc<dyn TickerTransport>,
    state: Mutex<ClientState>,
    listeners: Mutex<ListenerRegistry>,
}

/// 거래소 티커 스트림 클라이언트.
///
/// 보통 [`crate::shared_client`]로 얻은 프로세스 공유 인스턴스를 사용합니다.
/// `connect()`/`disconnect()`는 즉시 반환하며 실제 연결 작업은 tokio 런타임의
/// 백그라운드 태스크에서 수행되므로, 런타임 컨텍스트 안에서 호출해야 합니다.
pub struct TickerStreamClient {
    inner: Arc<ClientInner>,
}

impl TickerStreamClient {
    /// 새 클라이언트를 생성합니다. 연결은 `connect()` 호출 시 시작됩니다.
    pub fn new(
        settings: StreamConfig,
        symbols: Vec<ExchangeSymbol>,
        transport: Arc<dyn TickerTransport>,
    ) -> Self {
        let stream_url = combined_stream_url(&settings.ws_base_url, &symbols);
        Self {
            inner: Arc::new(ClientInner {
                settings,
                symbols,
                stream_url,
                transport,
                state: Mutex::new(ClientState::default()),
                listeners: Mutex::new(ListenerRegistry::new()),
            }),
        }
    }

    /// 실제 WebSocket 전송 계층을 사용하는 클라이언트를 생성합니다.
    pub fn websocket(settings: StreamConfig, symbols: Vec<ExchangeSymbol>) -> Self {
        Self::new(settings, symbols, Arc::new(TungsteniteTransport::new()))
    }

    /// 연결을 시작합니다.
    ///
    /// - 이미 연결 중이면 아무 것도 하지 않습니다.
    /// - 이미 연결되어 있으면 현재 세션을 아직 통보받지 못한 연결 리스너에게만 알립니다.
    /// - 연결이 없으면 재연결 시도 횟수를 초기화하고 대기 중인 재연결 타이머를
    ///   취소한 뒤 즉시 연결합니다.
    pub fn connect(&self) {
        let mut state = lock(&self.inner.state);
        let connection = state.connection;
        match connection {
            ConnectionState::Connecting => {
                debug!("Connect ignored: already connecting");
            }
            ConnectionState::Connected => {
                let generation = state.generation;
                let pending = lock(&self.inner.listeners).pending_connect_listeners();
                drop(state);
                for listener in pending {
                    if !self.inner.is_current(generation) {
                        break;
                    }
                    listener();
                }
            }
            ConnectionState::Disconnected => {
                if let Some(timer) = state.pending_reconnect.take() {
                    timer.cancel();
                }
                state.reconnect_attempts = 0;
                self.inner.open_session(&mut state);
            }
        }
    }

    /// 연결을 닫고 대기 중인 재연결 타이머를 취소합니다.
    ///
    /// 활성 연결이 있었다면 연결 해제 리스너가 한 번 호출됩니다.
    /// 이후 자동 재연결은 일어나지 않으며, 다시 연결하려면 `connect()`를 호출합니다.
    pub fn disconnect(&self) {
        let was_active = {
            let mut state = lock(&self.inner.state);
            if let Some(timer) = state.pending_reconnect.take() {
                timer.cancel();
            }
            if let Some(session) = state.session.take() {
                session.cancel.cancel();
                session.socket_open.store(false, Ordering::SeqCst);
            }
            state.generation += 1;
            let was_active = state.connection != ConnectionState::Disconnected;
            state.connection = ConnectionState::Disconnected;
            was_active
        };

        if was_active {
            info!("Disconnected from ticker stream");
            self.inner.notify_disconnect();
        }
    }

    /// 하부 소켓이 현재 열려 있는지 확인합니다.
    ///
    /// 내부 `ConnectionState`와 별개로 전송 계층의 실제 상태를 반영합니다.
    pub fn is_connected(&self) -> bool {
        self.inner.socket_is_open()
    }

    /// 현재 연결 상태를 반환합니다.
    pub fn state(&self) -> ConnectionState {
        lock(&self.inner.state).connection
    }

    /// 현재 재연결 시도 횟수를 반환합니다.
    pub fn reconnect_attempts(&self) -> u32 {
        lock(&self.inner.state).reconnect_attempts
    }

    /// 구독 중인 거래소 심볼 목록을 반환합니다.
    pub fn symbols(&self) -> &[ExchangeSymbol] {
        &self.inner.symbols
    }

    /// 결합 스트림 URL을 반환합니다.
    pub fn stream_url(&self) -> &str {
        &self.inner.stream_url
    }

    /// 메시지 리스너를 추가합니다.
    pub fn add_message_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&TickerEvent) + Send + Sync + 'static,
    {
        lock(&self.inner.listeners).add_message_listener(listener)
    }

    /// 연결 리스너를 추가합니다.
    pub fn add_connect_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        lock(&self.inner.listeners).add_connect_listener(listener)
    }

    /// 연결 해제 리스너를 추가합니다.
    pub fn add_disconnect_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        lock(&self.inner.listeners).add_disconnect_listener(listener)
    }

    /// 에러 리스너를 추가합니다.
    pub fn add_error_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&StreamError) + Send + Sync + 'static,
    {
        lock(&self.inner.listeners).add_error_listener(listener)
    }

    /// 메시지 리스너를 제거합니다.
    pub fn remove_message_listener(&self, id: ListenerId) -> bool {
        lock(&self.inner.listeners).remove_message_listener(id)
    }

    /// 연결 리스너를 제거합니다.
    pub fn remove_connect_listener(&self, id: ListenerId) -> bool {
        lock(&self.inner.listeners).remove_connect_listener(id)
    }

    /// 연결 해제 리스너를 제거합니다.
    pub fn remove_disconnect_listener(&self, id: ListenerId) -> bool {
        lock(&self.inner.listeners).remove_disconnect_listener(id)
    }

    /// 에러 리스너를 제거합니다.
    pub fn remove_error_listener(&self, id: ListenerId) -> bool {
        lock(&self.inner.listeners).remove_error_listener(id)
    }

    /// 등록된 리스너 수를 반환합니다.
    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }
}

impl Drop for TickerStreamClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl fmt::Debug for TickerStreamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickerStreamClient")
            .field("state", &self.state())
            .field("symbols", &self.inner.symbols.len())
            .field("stream_url", &self.inner.stream_url)
            .finish()
    }
}

impl ClientInner {
    /// 세션 세대가 여전히 현재 세대인지 확인합니다.
    fn is_current(&self, generation: u64) -> bool {
        lock(&self.state).generation == generation
    }

    fn socket_is_open(&self) -> bool {
        lock(&self.state)
            .session
            .as_ref()
            .is_some_and(|session| session.socket_open.load(Ordering::SeqCst))
    }

    /// 새 세션을 열고 연결 태스크를 시작합니다. 호출자가 상태 잠금을 쥐고 있어야 합니다.
    fn open_session(self: &Arc<Self>, state: &mut ClientState) {
        state.generation += 1;
        state.connection = ConnectionState::Connecting;

        let session = Session {
            cancel: CancellationToken::new(),
            socket_open: Arc::new(AtomicBool::new(false)),
        };

        tokio::spawn(Arc::clone(self).run_session(
            state.generation,
            session.cancel.clone(),
            Arc::clone(&session.socket_open),
        ));
        state.session = Some(session);
    }

    async fn run_session(
        self: Arc<Self>,
        generation: u64,
        cancel: CancellationToken,
        socket_open: Arc<AtomicBool>,
    ) {
        info!(generation, symbols = self.symbols.len(), "Connecting to ticker stream");

        let opened = tokio::select! {
            _ = cancel.cancelled() => return,
            result = self.transport.open(&self.stream_url) => result,
        };

        let mut frames: FrameStream = match opened {
            Ok(frames) => frames,
            Err(e) => {
                self.handle_error(generation, e);
                self.handle_close(generation);
                return;
            }
        };

        socket_open.store(true, Ordering::SeqCst);
        self.handle_open(generation);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    socket_open.store(false, Ordering::SeqCst);
                    debug!(generation, "Session cancelled");
                    return;
                }
                next = frames.next() => match next {
                    Some(Ok(text)) => self.handle_frame(generation, &text),
                    Some(Err(e)) => {
                        self.handle_error(generation, e);
                        break;
                    }
                    None => break,
                },
            }
        }

        socket_open.store(false, Ordering::SeqCst);
        drop(frames);
        self.handle_close(generation);
    }

    /// 연결 성공을 반영하고 연결 리스너를 호출합니다.
    ///
    /// 세대 확인과 리스너 스냅샷은 같은 상태 잠금 안에서 수행되고, 호출 도중
    /// `disconnect()`로 세대가 바뀌면 남은 리스너는 건너뜁니다.
    fn handle_open(&self, generation: u64) {
        let listeners = {
            let mut state = lock(&self.state);
            if state.generation != generation {
                return;
            }
            state.connection = ConnectionState::Connected;
            state.reconnect_attempts = 0;
            lock(&self.listeners).begin_connect_session()
        };

        info!(generation, "Connected to ticker stream");
        for listener in listeners {
            if !self.is_current(generation) {
                debug!(generation, "Session ended during connect dispatch");
                return;
            }
            listener();
        }
    }

    fn handle_frame(&self, generation: u64, text: &str) {
        let event = match parse_ticker_frame(text) {
            Ok(event) => event,
            Err(e) => {
                debug!(error = %e, "Dropping malformed frame");
                return;
            }
        };

        let listeners = {
            let state = lock(&self.state);
            if state.generation != generation {
                return;
            }
            lock(&self.listeners).message_listeners()
        };
        for listener in listeners {
            if !self.is_current(generation) {
                return;
            }
            listener(&event);
        }
    }

    fn handle_error(&self, generation: u64, err: StreamError) {
        {
            let state = lock(&self.state);
            if state.generation != generation {
                return;
            }
        }

        if self.socket_is_open() {
            debug!(error = %err, "Ignoring transport error while socket is open");
            return;
        }

        warn!(error = %err, "Ticker stream error");
        let listeners = lock(&self.listeners).error_listeners();
        for listener in listeners {
            listener(&err);
        }
    }

    fn handle_close(self: &Arc<Self>, generation: u64) {
        {
            let mut state = lock(&self.state);
            if state.generation != generation {
                return;
            }
            state.connection = ConnectionState::Disconnected;
            state.session = None;
        }

        info!(generation, "Ticker stream closed");
        self.notify_disconnect();
        self.schedule_reconnect(generation);
    }

    fn notify_disconnect(&self) {
        let listeners = lock(&self.listeners).disconnect_listeners();
        for listener in listeners {
            listener();
        }
    }

    /// n번째 재연결을 `n × 기본 지연` 후에 예약합니다.
    ///
    /// 닫힌 세션 이후 `disconnect()`나 `connect()`가 끼어들었다면 세대가 바뀌었으므로
    /// 예약하지 않습니다.
    fn schedule_reconnect(self: &Arc<Self>, generation: u64) {
        let mut state = lock(&self.state);

        if state.generation != generation {
            debug!(generation, "Reconnect skipped: session superseded");
            return;
        }
        if state.connection != ConnectionState::Disconnected || state.pending_reconnect.is_some() {
            return;
        }

        let max_attempts = self.settings.max_reconnect_attempts;
        if state.reconnect_attempts >= max_attempts {
            error!(
                max_attempts,
                "Max reconnect attempts reached, giving up automatic reconnect"
            );
            return;
        }

        state.reconnect_attempts += 1;
        let attempt = state.reconnect_attempts;
        let delay = self.settings.reconnect_base_delay() * attempt;
        let timer = CancellationToken::new();
        state.pending_reconnect = Some(timer.clone());
        drop(state);

        warn!(
            delay_ms = delay.as_millis() as u64,
            attempt,
            max_attempts,
            "Scheduling reconnect"
        );

        let inner = Arc::downgrade(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = timer.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if let Some(inner) = inner.upgrade() {
                        inner.reconnect();
                    }
                }
            }
        });
    }

    fn reconnect(self: &Arc<Self>) {
        let mut state = lock(&self.state);
        state.pending_reconnect = None;
        if state.connection != ConnectionState::Disconnected {
            return;
        }

        info!(attempt = state.reconnect_attempts, "Reconnecting to ticker stream");
        self.open_session(&mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::ChannelTransport;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    const ETH_FRAME: &str = r#"{"stream":"ethusdt@ticker","data":{"e":"24hrTicker","s":"ETHUSDT","c":"3500.5","p":"10","P":"0.29","q":"900000"}}"#;

    fn client_with(transport: Arc<ChannelTransport>) -> TickerStreamClient {
        TickerStreamClient::new(
            StreamConfig::default(),
            vec![ExchangeSymbol::new("btcusdt"), ExchangeSymbol::new("ethusdt")],
            transport,
        )
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[test]
    fn test_initial_state() {
        let client = client_with(Arc::new(ChannelTransport::new()));
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert!(!client.is_connected());
        assert_eq!(
            client.stream_url(),
            "wss://stream.binance.com:9443/stream?streams=btcusdt@ticker/ethusdt@ticker"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_sets_connected_and_notifies() {
        let transport = Arc::new(ChannelTransport::new());
        let _sender = transport.accept();
        let client = client_with(Arc::clone(&transport));

        let connects = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&connects);
        client.add_connect_listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        client.connect();
        assert_eq!(client.state(), ConnectionState::Connecting);
        settle().await;

        assert_eq!(client.state(), ConnectionState::Connected);
        assert!(client.is_connected());
        assert_eq!(connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_is_idempotent_while_connecting() {
        let transport = Arc::new(ChannelTransport::new());
        let _sender = transport.accept();
        let client = client_with(Arc::clone(&transport));

        client.connect();
        client.connect();
        settle().await;

        assert_eq!(transport.open_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_connect_listener_notified_once() {
        let transport = Arc::new(ChannelTransport::new());
        let _sender = transport.accept();
        let client = client_with(Arc::clone(&transport));

        let early = Arc::new(AtomicUsize::new(0));
        let early_counter = Arc::clone(&early);
        client.add_connect_listener(move || {
            early_counter.fetch_add(1, Ordering::SeqCst);
        });
        client.connect();
        settle().await;

        let late = Arc::new(AtomicUsize::new(0));
        let late_counter = Arc::clone(&late);
        client.add_connect_listener(move || {
            late_counter.fetch_add(1, Ordering::SeqCst);
        });
        client.connect();
        client.connect();

        assert_eq!(early.load(Ordering::SeqCst), 1);
        assert_eq!(late.load(Ordering::SeqCst), 1);
        assert_eq!(transport.open_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_frame_is_dropped() {
        let transport = Arc::new(ChannelTransport::new());
        let sender = transport.accept();
        let client = client_with(Arc::clone(&transport));

        let messages = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));
        let m = Arc::clone(&messages);
        let e = Arc::clone(&errors);
        client.add_message_listener(move |_| {
            m.fetch_add(1, Ordering::SeqCst);
        });
        client.add_error_listener(move |_| {
            e.fetch_add(1, Ordering::SeqCst);
        });

        client.connect();
        settle().await;

        sender.send_text("not json");
        sender.send_text(r#"{"unexpected":"shape"}"#);
        settle().await;

        assert_eq!(messages.load(Ordering::SeqCst), 0);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
        assert_eq!(client.state(), ConnectionState::Connected);

        sender.send_text(ETH_FRAME);
        settle().await;
        assert_eq!(messages.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_while_open_is_suppressed() {
        let transport = Arc::new(ChannelTransport::new());
        let sender = transport.accept();
        let client = client_with(Arc::clone(&transport));

        let errors = Arc::new(AtomicUsize::new(0));
        let e = Arc::clone(&errors);
        client.add_error_listener(move |_| {
            e.fetch_add(1, Ordering::SeqCst);
        });

        client.connect();
        settle().await;

        sender.send_error(StreamError::WebSocket("reset".to_string()));
        settle().await;

        assert_eq!(errors.load(Ordering::SeqCst), 0);
        // 에러 이후 연결은 닫히고 재연결이 예약됨
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert_eq!(client.reconnect_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refused_open_surfaces_error() {
        let transport = Arc::new(ChannelTransport::new());
        transport.refuse("connection refused");
        let client = client_with(Arc::clone(&transport));

        let errors = Arc::new(Mutex::new(Vec::new()));
        let e = Arc::clone(&errors);
        client.add_error_listener(move |err| {
            e.lock().unwrap().push(err.to_string());
        });

        client.connect();
        settle().await;

        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_cancels_pending_reconnect() {
        let transport = Arc::new(ChannelTransport::new());
        let sender = transport.accept();
        let client = client_with(Arc::clone(&transport));

        client.connect();
        settle().await;
        sender.close();
        settle().await;
        assert_eq!(client.reconnect_attempts(), 1);

        client.disconnect();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(transport.open_count(), 1);
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_disconnect_does_not_reconnect() {
        let transport = Arc::new(ChannelTransport::new());
        let _sender = transport.accept();
        let client = client_with(Arc::clone(&transport));

        let disconnects = Arc::new(AtomicUsize::new(0));
        let d = Arc::clone(&disconnects);
        client.add_disconnect_listener(move || {
            d.fetch_add(1, Ordering::SeqCst);
        });

        client.connect();
        settle().await;
        client.disconnect();
        assert!(!client.is_connected());
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
        assert_eq!(transport.open_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_from_disconnect_listener_stops_reconnect() {
        let transport = Arc::new(ChannelTransport::new());
        let sender = transport.accept();
        let _spare = transport.accept();
        let client = Arc::new(client_with(Arc::clone(&transport)));

        let weak = Arc::downgrade(&client);
        client.add_disconnect_listener(move || {
            if let Some(client) = weak.upgrade() {
                client.disconnect();
            }
        });

        client.connect();
        settle().await;
        sender.close();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(transport.open_count(), 1);
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert_eq!(client.reconnect_attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_during_connect_dispatch_skips_remaining_listeners() {
        let transport = Arc::new(ChannelTransport::new());
        let _sender = transport.accept();
        let client = Arc::new(client_with(Arc::clone(&transport)));

        let weak = Arc::downgrade(&client);
        client.add_connect_listener(move || {
            if let Some(client) = weak.upgrade() {
                client.disconnect();
            }
        });
        let late = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&late);
        client.add_connect_listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let disconnects = Arc::new(AtomicUsize::new(0));
        let d = Arc::clone(&disconnects);
        client.add_disconnect_listener(move || {
            d.fetch_add(1, Ordering::SeqCst);
        });

        client.connect();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(late.load(Ordering::SeqCst), 0);
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert_eq!(transport.open_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_during_message_dispatch_skips_remaining_listeners() {
        let transport = Arc::new(ChannelTransport::new());
        let sender = transport.accept();
        let client = Arc::new(client_with(Arc::clone(&transport)));

        let weak = Arc::downgrade(&client);
        client.add_message_listener(move |_| {
            if let Some(client) = weak.upgrade() {
                client.disconnect();
            }
        });
        let second = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&second);
        client.add_message_listener(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        client.connect();
        settle().await;
        sender.send_text(ETH_FRAME);
        sender.send_text(ETH_FRAME);
        settle().await;

        assert_eq!(second.load(Ordering::SeqCst), 0);
        assert!(!client.is_connected());
    }
}
