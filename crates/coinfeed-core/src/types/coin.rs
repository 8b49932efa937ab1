//! 코인 식별자 및 거래소 심볼 정의.
//!
//! 이 모듈은 두 개의 네임스페이스를 정의합니다:
//! - `CoinId` - 시세 집계 서비스의 코인 식별자 (예: "bitcoin")
//! - `ExchangeSymbol` - 거래소 스트림의 거래쌍 심볼 (예: "btcusdt")
//!
//! 두 타입 모두 소문자로 정규화되어 생성 후 변경되지 않습니다.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// 시세 집계 서비스 네임스페이스의 코인 식별자.
///
/// 시스템 간 키로 사용되는 소문자 슬러그입니다 (예: "bitcoin", "wrapped-bitcoin").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinId(String);

impl CoinId {
    /// 새 코인 식별자를 생성합니다. 입력은 소문자로 정규화됩니다.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_lowercase())
    }

    /// 식별자 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 표시용 이름을 반환합니다.
    ///
    /// 첫 글자만 대문자로 바꾸고 나머지는 그대로 둡니다
    /// (예: "bitcoin" → "Bitcoin", "wrapped-bitcoin" → "Wrapped-bitcoin").
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CoinId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CoinId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CoinId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// 거래소 스트림이 인식하는 거래쌍 심볼.
///
/// 기준 자산과 호가 자산을 이어 붙인 소문자 문자열입니다 (예: "btcusdt").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeSymbol(String);

impl ExchangeSymbol {
    /// 새 거래소 심볼을 생성합니다. 입력은 소문자로 정규화됩니다.
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().trim().to_lowercase())
    }

    /// 심볼 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 이 심볼의 24시간 티커 스트림 이름을 반환합니다 (예: "btcusdt@ticker").
    pub fn ticker_stream(&self) -> String {
        format!("{}@ticker", self.0)
    }
}

impl fmt::Display for ExchangeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ExchangeSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ExchangeSymbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ExchangeSymbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_id_normalization() {
        let id = CoinId::new(" Bitcoin ");
        assert_eq!(id.as_str(), "bitcoin");
        assert_eq!(id.to_string(), "bitcoin");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(CoinId::new("bitcoin").display_name(), "Bitcoin");
        assert_eq!(CoinId::new("wrapped-bitcoin").display_name(), "Wrapped-bitcoin");
        assert_eq!(CoinId::new("").display_name(), "");
    }

    #[test]
    fn test_exchange_symbol() {
        let symbol = ExchangeSymbol::new("BTCUSDT");
        assert_eq!(symbol.as_str(), "btcusdt");
        assert_eq!(symbol.ticker_stream(), "btcusdt@ticker");
    }
}
