//! 정규화된 24시간 티커 이벤트.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ExchangeSymbol, Percentage, Price, Volume};

/// 거래소 티커 업데이트 한 건의 정규화된 투영.
///
/// 모든 숫자 필드는 와이어의 문자열 값을 파싱한 결과입니다. 저장되지 않는
/// 일시적인 값입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerEvent {
    /// 거래소 심볼
    pub symbol: ExchangeSymbol,
    /// 최근 체결가
    pub last_price: Price,
    /// 24시간 가격 변동 (절대값)
    pub price_change_24h: Price,
    /// 24시간 변동률 (%)
    pub price_change_percent_24h: Percentage,
    /// 24시간 거래대금 (호가 자산 단위)
    pub quote_volume_24h: Volume,
    /// 거래소 이벤트 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_time: Option<DateTime<Utc>>,
}
