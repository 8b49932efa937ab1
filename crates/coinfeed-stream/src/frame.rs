//! 결합 스트림(combined stream) 와이어 형식.
//!
//! 거래소는 하나의 연결에 여러 심볼의 티커를 섞어 보내며, 각 프레임은
//! `{ "stream": "btcusdt@ticker", "data": { ... } }` 형태의 봉투로 감싸집니다.
//! 숫자 필드는 모두 문자열로 전달되므로 여기서 한 번에 엄격하게 파싱합니다.

use chrono::{DateTime, Utc};
use coinfeed_core::{parse_decimal_field, ExchangeSymbol, TickerEvent};
use serde::Deserialize;

use crate::error::{StreamError, StreamResult};

/// 24시간 티커 이벤트 타입 이름.
const TICKER_EVENT_TYPE: &str = "24hrTicker";

/// 결합 스트림 봉투.
#[derive(Debug, Deserialize)]
struct CombinedFrame {
    stream: String,
    data: WsTicker,
}

/// 거래소 24시간 티커 페이로드 (필요한 필드만).
#[derive(Debug, Deserialize)]
struct WsTicker {
    #[serde(rename = "e")]
    event_type: Option<String>,
    #[serde(rename = "E")]
    event_time: Option<i64>,
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "c")]
    close: String,
    #[serde(rename = "p")]
    price_change: String,
    #[serde(rename = "P")]
    price_change_percent: String,
    #[serde(rename = "q")]
    quote_volume: String,
}

/// 결합 스트림 URL을 생성합니다.
///
/// 예: `wss://host/stream?streams=btcusdt@ticker/ethusdt@ticker`
pub fn combined_stream_url(base_url: &str, symbols: &[ExchangeSymbol]) -> String {
    let streams: Vec<String> = symbols.iter().map(ExchangeSymbol::ticker_stream).collect();
    format!("{}?streams={}", base_url.trim_end_matches('/'), streams.join("/"))
}

/// 텍스트 프레임 하나를 `TickerEvent`로 파싱합니다.
///
/// JSON이 아니거나 봉투 형태가 다르거나 숫자 필드가 유효하지 않으면
/// `StreamError::Parse`를 반환합니다.
pub fn parse_ticker_frame(text: &str) -> StreamResult<TickerEvent> {
    let frame: CombinedFrame = serde_json::from_str(text)?;
    let ticker = frame.data;

    if let Some(event_type) = &ticker.event_type {
        if event_type != TICKER_EVENT_TYPE {
            return Err(StreamError::Parse(format!(
                "Unexpected event type on {}: {}",
                frame.stream, event_type
            )));
        }
    }

    Ok(TickerEvent {
        symbol: ExchangeSymbol::new(&ticker.symbol),
        last_price: parse_decimal_field("c", &ticker.close)?,
        price_change_24h: parse_decimal_field("p", &ticker.price_change)?,
        price_change_percent_24h: parse_decimal_field("P", &ticker.price_change_percent)?,
        quote_volume_24h: parse_decimal_field("q", &ticker.quote_volume)?,
        event_time: ticker.event_time.and_then(DateTime::<Utc>::from_timestamp_millis),
    })
}
