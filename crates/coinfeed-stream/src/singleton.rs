//! 프로세스 공유 스트림 클라이언트.
//!
//! 한 프로세스 안의 모든 소비자가 같은 티커 연결을 공유하도록 최초 접근 시
//! 클라이언트를 한 번만 생성합니다. 생성 직후에는 연결되지 않은 상태이며,
//! 연결은 소비자가 `connect()`를 호출할 때 시작됩니다.

use coinfeed_core::{StreamConfig, SymbolTable};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::info;

use crate::client::TickerStreamClient;

static SHARED_CLIENT: OnceCell<Arc<TickerStreamClient>> = OnceCell::new();

/// 기본 설정으로 공유 클라이언트를 반환합니다.
///
/// 이미 생성되어 있으면 그 인스턴스를 그대로 반환합니다.
pub fn shared_client() -> Arc<TickerStreamClient> {
    init_shared_client(&StreamConfig::default())
}

/// 주어진 설정으로 공유 클라이언트를 초기화하고 반환합니다.
///
/// 최초 호출만 설정을 반영하며, 이후 호출은 기존 인스턴스를 반환합니다.
/// 구독 심볼은 내장 심볼 테이블의 모든 거래소 심볼입니다.
pub fn init_shared_client(settings: &StreamConfig) -> Arc<TickerStreamClient> {
    SHARED_CLIENT
        .get_or_init(|| {
            let symbols = SymbolTable::builtin().exchange_symbols();
            info!(symbols = symbols.len(), "Creating shared ticker stream client");
            Arc::new(TickerStreamClient::websocket(settings.clone(), symbols))
        })
        .clone()
}
