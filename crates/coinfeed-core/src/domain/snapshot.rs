//! 소비자 측 시세 스냅샷.
//!
//! 티커 이벤트를 코인 식별자별 최신 시세로 접어(fold) 보관합니다.
//! 항목은 해당 식별자의 첫 이벤트를 받을 때 생성되며, 스냅샷이 살아 있는
//! 동안 제거되지 않습니다.
//!
//! 연결 상태 플래그는 별도로 저장하지 않고 파생됩니다:
//! - `is_loading()` = 연결되지 않았고 아직 항목이 하나도 없음
//! - `error()` = 마지막 연결 에러, 연결 성공 시 지워짐

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{SymbolTable, TickerEvent};
use crate::types::{CoinId, Percentage, Price, Volume};

/// 코인 하나의 최신 시세.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinQuote {
    /// 코인 식별자
    pub id: CoinId,
    /// 표시용 이름
    pub name: String,
    /// 현재가
    pub price: Price,
    /// 24시간 가격 변동
    pub change_24h: Price,
    /// 24시간 변동률 (%)
    pub change_percent_24h: Percentage,
    /// 근사 시가총액.
    ///
    /// 스트림에는 유통량 정보가 없으므로 `가격 × 24시간 거래대금`으로 근사합니다.
    /// 실제 유통량 기반 시가총액이 아닙니다.
    pub market_cap: Price,
    /// 24시간 거래대금
    pub volume_24h: Volume,
    /// 이미지 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// 마지막 갱신 시각 (거래소 이벤트 시각)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// 코인 식별자별 최신 시세 맵.
#[derive(Debug, Clone, Default)]
pub struct PriceSnapshot {
    quotes: HashMap<CoinId, CoinQuote>,
    images: HashMap<String, String>,
    connected: bool,
    error: Option<String>,
}

impl PriceSnapshot {
    /// 빈 스냅샷을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 코인별 이미지 URL을 설정합니다.
    pub fn with_images(mut self, images: HashMap<String, String>) -> Self {
        self.images = images;
        self
    }

    /// 티커 이벤트 하나를 스냅샷에 반영합니다.
    ///
    /// 거래소 심볼을 역방향 조회해 코인 식별자를 찾고, 매핑이 없으면 이벤트를
    /// 버리고 `None`을 반환합니다.
    pub fn apply_ticker(&mut self, table: &SymbolTable, event: &TickerEvent) -> Option<&CoinQuote> {
        let id = table.reverse_lookup(event.symbol.as_str())?.clone();

        let quote = CoinQuote {
            name: id.display_name(),
            price: event.last_price,
            change_24h: event.price_change_24h,
            change_percent_24h: event.price_change_percent_24h,
            market_cap: event.last_price.saturating_mul(event.quote_volume_24h),
            volume_24h: event.quote_volume_24h,
            image: self.images.get(id.as_str()).cloned(),
            last_updated: event.event_time,
            id: id.clone(),
        };

        self.quotes.insert(id.clone(), quote);
        self.quotes.get(&id)
    }

    /// 연결 성공을 기록합니다. 이전 에러는 지워집니다.
    pub fn mark_connected(&mut self) {
        self.connected = true;
        self.error = None;
    }

    /// 연결 해제를 기록합니다.
    pub fn mark_disconnected(&mut self) {
        self.connected = false;
    }

    /// 연결 에러를 기록합니다.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// 연결 여부를 반환합니다.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// 로딩 중인지 확인합니다 (연결 전이고 시세가 하나도 없음).
    pub fn is_loading(&self) -> bool {
        !self.connected && self.quotes.is_empty()
    }

    /// 마지막 연결 에러를 반환합니다.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 코인 식별자로 시세를 조회합니다.
    pub fn get(&self, id: &str) -> Option<&CoinQuote> {
        self.quotes.get(id)
    }

    /// 보관 중인 시세 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// 시세가 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// 근사 시가총액 내림차순으로 정렬된 시세 목록을 반환합니다.
    pub fn ranked(&self) -> Vec<&CoinQuote> {
        let mut quotes: Vec<&CoinQuote> = self.quotes.values().collect();
        quotes.sort_by(|a, b| b.market_cap.cmp(&a.market_cap).then_with(|| a.id.cmp(&b.id)));
        quotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExchangeSymbol;
    use rust_decimal_macros::dec;

    fn ticker(symbol: &str, price: rust_decimal::Decimal) -> TickerEvent {
        TickerEvent {
            symbol: ExchangeSymbol::new(symbol),
            last_price: price,
            price_change_24h: dec!(120.5),
            price_change_percent_24h: dec!(1.85),
            quote_volume_24h: dec!(1000),
            event_time: None,
        }
    }

    #[test]
    fn test_apply_ticker_creates_entry() {
        let table = SymbolTable::builtin();
        let mut snapshot = PriceSnapshot::new();

        let quote = snapshot.apply_ticker(table, &ticker("ethusdt", dec!(3500))).unwrap();
        assert_eq!(quote.id.as_str(), "ethereum");
        assert_eq!(quote.name, "Ethereum");
        assert_eq!(quote.price, dec!(3500));
        assert_eq!(quote.change_24h, dec!(120.5));
        assert_eq!(quote.change_percent_24h, dec!(1.85));
        assert_eq!(quote.market_cap, dec!(3500000));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_unmapped_symbol_is_dropped() {
        let table = SymbolTable::builtin();
        let mut snapshot = PriceSnapshot::new();

        assert!(snapshot.apply_ticker(table, &ticker("dogeusdt", dec!(0.15))).is_none());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_latest_value_wins() {
        let table = SymbolTable::builtin();
        let mut snapshot = PriceSnapshot::new();

        snapshot.apply_ticker(table, &ticker("solusdt", dec!(150)));
        snapshot.apply_ticker(table, &ticker("SOLUSDT", dec!(151.25)));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("solana").unwrap().price, dec!(151.25));
    }

    #[test]
    fn test_shared_pair_resolves_to_last_alias() {
        let table = SymbolTable::builtin();
        let mut snapshot = PriceSnapshot::new();

        snapshot.apply_ticker(table, &ticker("btcusdt", dec!(67000)));
        assert!(snapshot.get("wrapped-bitcoin").is_some());
        assert!(snapshot.get("bitcoin").is_none());
    }

    #[test]
    fn test_derived_flags() {
        let table = SymbolTable::builtin();
        let mut snapshot = PriceSnapshot::new();
        assert!(snapshot.is_loading());

        snapshot.record_error("connection refused");
        assert_eq!(snapshot.error(), Some("connection refused"));

        snapshot.mark_connected();
        assert!(!snapshot.is_loading());
        assert!(snapshot.error().is_none());

        snapshot.apply_ticker(table, &ticker("adausdt", dec!(0.45)));
        snapshot.mark_disconnected();
        // 시세가 있으면 연결이 끊겨도 로딩 상태가 아님
        assert!(!snapshot.is_loading());
        assert!(!snapshot.is_connected());
    }

    #[test]
    fn test_images_and_ranking() {
        let table = SymbolTable::builtin();
        let images = HashMap::from([(
            "ethereum".to_string(),
            "https://example.com/eth.png".to_string(),
        )]);
        let mut snapshot = PriceSnapshot::new().with_images(images);

        snapshot.apply_ticker(table, &ticker("ethusdt", dec!(3500)));
        snapshot.apply_ticker(table, &ticker("xrpusdt", dec!(0.6)));

        let ranked = snapshot.ranked();
        assert_eq!(ranked[0].id.as_str(), "ethereum");
        assert_eq!(ranked[0].image.as_deref(), Some("https://example.com/eth.png"));
        assert!(ranked[1].image.is_none());
    }
}
