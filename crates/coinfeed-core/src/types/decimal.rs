//! 시세 표시를 위한 Decimal 유틸리티.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::{FeedError, FeedResult};

/// 가격 타입.
pub type Price = Decimal;

/// 거래대금/거래량 타입.
pub type Volume = Decimal;

/// 퍼센트 타입 (1.5 = 1.5%).
pub type Percentage = Decimal;

/// 문자열 필드를 Decimal로 엄격하게 파싱합니다.
///
/// 거래소는 모든 숫자 필드를 문자열로 전송하므로, 빈 문자열이나
/// 숫자가 아닌 값은 0으로 대체하지 않고 에러로 처리합니다.
pub fn parse_decimal_field(field: &str, value: &str) -> FeedResult<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FeedError::Parse(format!("{} 필드가 비어 있습니다", field)));
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| FeedError::Parse(format!("{} 필드 파싱 실패 ({}): {}", field, value, e)))
}

/// 표시용 Decimal 확장 트레이트.
pub trait DecimalExt {
    /// 부호가 포함된 퍼센트 문자열로 변환합니다 (예: "+5.25%").
    fn to_change_string(&self) -> String;

    /// 큰 금액을 K/M/B/T 단위로 축약합니다 (예: "1.23B").
    fn to_compact_string(&self) -> String;
}

impl DecimalExt for Decimal {
    fn to_change_string(&self) -> String {
        let rounded = self.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("{:.2}%", rounded)
        } else {
            format!("+{:.2}%", rounded.abs())
        }
    }

    fn to_compact_string(&self) -> String {
        let units = [
            (Decimal::from(1_000_000_000_000u64), "T"),
            (Decimal::from(1_000_000_000u64), "B"),
            (Decimal::from(1_000_000u64), "M"),
            (Decimal::from(1_000u64), "K"),
        ];

        let magnitude = self.abs();
        for (threshold, suffix) in units {
            if magnitude >= threshold {
                let scaled = (*self / threshold)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                return format!("{:.2}{}", scaled, suffix);
            }
        }

        format!(
            "{:.2}",
            self.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        )
    }
}
