//! 실시간 가격 구독 핸들.
//!
//! 소비자 하나가 공유 클라이언트를 구독할 때 사용하는 핸들입니다. 생성 시 네 종류의
//! 리스너를 등록하고 `connect()`를 요청하며, drop 시 자기 리스너만 제거합니다.
//! 연결 자체는 다른 소비자를 위해 유지됩니다.
//!
//! 수신한 티커는 [`PriceSnapshot`]에 반영되고, 변경이 있을 때마다 버전 번호가
//! `watch` 채널로 발행됩니다.

use coinfeed_core::{CoinQuote, PriceSnapshot, SymbolTable};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::debug;

use crate::client::{lock, TickerStreamClient};
use crate::registry::ListenerId;

/// 소비자별 실시간 가격 핸들.
pub struct LivePrices {
    client: Arc<TickerStreamClient>,
    snapshot: Arc<Mutex<PriceSnapshot>>,
    updates: watch::Receiver<u64>,
    message_id: ListenerId,
    connect_id: ListenerId,
    disconnect_id: ListenerId,
    error_id: ListenerId,
}

impl LivePrices {
    /// 내장 심볼 테이블로 구독을 시작합니다.
    pub fn new(client: Arc<TickerStreamClient>) -> Self {
        Self::with_snapshot(client, SymbolTable::builtin(), PriceSnapshot::new())
    }

    /// 지정한 심볼 테이블과 초기 스냅샷으로 구독을 시작합니다.
    pub fn with_snapshot(
        client: Arc<TickerStreamClient>,
        table: &'static SymbolTable,
        initial: PriceSnapshot,
    ) -> Self {
        let snapshot = Arc::new(Mutex::new(initial));
        let (tx, updates) = watch::channel(0u64);
        let tx = Arc::new(tx);

        let message_id = {
            let snapshot = Arc::clone(&snapshot);
            let tx = Arc::clone(&tx);
            client.add_message_listener(move |event| {
                let applied = lock(&snapshot).apply_ticker(table, event).is_some();
                if applied {
                    tx.send_modify(|version| *version += 1);
                } else {
                    debug!(symbol = %event.symbol, "No coin mapped for ticker");
                }
            })
        };

        let connect_id = {
            let snapshot = Arc::clone(&snapshot);
            let tx = Arc::clone(&tx);
            client.add_connect_listener(move || {
                lock(&snapshot).mark_connected();
                tx.send_modify(|version| *version += 1);
            })
        };

        let disconnect_id = {
            let snapshot = Arc::clone(&snapshot);
            let tx = Arc::clone(&tx);
            client.add_disconnect_listener(move || {
                lock(&snapshot).mark_disconnected();
                tx.send_modify(|version| *version += 1);
            })
        };

        let error_id = {
            let snapshot = Arc::clone(&snapshot);
            let tx = Arc::clone(&tx);
            client.add_error_listener(move |err| {
                lock(&snapshot).record_error(err.to_string());
                tx.send_modify(|version| *version += 1);
            })
        };

        client.connect();

        Self {
            client,
            snapshot,
            updates,
            message_id,
            connect_id,
            disconnect_id,
            error_id,
        }
    }

    /// 현재 스냅샷의 복사본을 반환합니다.
    pub fn snapshot(&self) -> PriceSnapshot {
        lock(&self.snapshot).clone()
    }

    /// 코인 하나의 최신 시세를 반환합니다.
    pub fn quote(&self, coin_id: &str) -> Option<CoinQuote> {
        lock(&self.snapshot).get(coin_id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.snapshot).is_loading()
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.snapshot).is_connected()
    }

    /// 마지막 연결 에러 메시지.
    pub fn error(&self) -> Option<String> {
        lock(&self.snapshot).error().map(str::to_string)
    }

    /// 스냅샷 변경 알림을 받는 수신자를 반환합니다.
    pub fn updates(&self) -> watch::Receiver<u64> {
        self.updates.clone()
    }

    /// 구독 중인 클라이언트.
    pub fn client(&self) -> &Arc<TickerStreamClient> {
        &self.client
    }
}

impl Drop for LivePrices {
    fn drop(&mut self) {
        self.client.remove_message_listener(self.message_id);
        self.client.remove_connect_listener(self.connect_id);
        self.client.remove_disconnect_listener(self.disconnect_id);
        self.client.remove_error_listener(self.error_id);
    }
}
