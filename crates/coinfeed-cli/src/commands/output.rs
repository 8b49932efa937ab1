//! 출력 형식 공통 처리.

use anyhow::{Context, Result};
use coinfeed_core::{CoinQuote, DecimalExt, PriceSnapshot};

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!("Invalid format: {}. Use: table, json", s)),
        }
    }
}

/// 스냅샷을 지정한 형식의 문자열로 변환합니다.
pub fn render_snapshot(snapshot: &PriceSnapshot, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_snapshot_table(snapshot)),
        OutputFormat::Json => {
            let quotes: Vec<&CoinQuote> = snapshot.ranked();
            serde_json::to_string_pretty(&quotes).context("Failed to serialize to JSON")
        }
    }
}

/// 시세 테이블 (근사 시가총액 내림차순).
pub fn format_snapshot_table(snapshot: &PriceSnapshot) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<18} {:<18} {:>14} {:>12} {:>9} {:>10} {:>10}\n",
        "ID", "NAME", "PRICE", "24H", "24H%", "MCAP~", "VOLUME"
    ));
    output.push_str(&"-".repeat(97));
    output.push('\n');

    for quote in snapshot.ranked() {
        output.push_str(&format!(
            "{:<18} {:<18} {:>14} {:>12} {:>9} {:>10} {:>10}\n",
            quote.id.as_str(),
            truncate(&quote.name, 18),
            quote.price.normalize().to_string(),
            quote.change_24h.normalize().to_string(),
            quote.change_percent_24h.to_change_string(),
            quote.market_cap.to_compact_string(),
            quote.volume_24h.to_compact_string(),
        ));
    }

    output.push('\n');
    let status = if snapshot.is_connected() {
        "connected"
    } else if snapshot.is_loading() {
        "loading"
    } else {
        "disconnected"
    };
    output.push_str(&format!("Total: {} coins ({})", snapshot.len(), status));
    if let Some(error) = snapshot.error() {
        output.push_str(&format!("\nLast error: {}", error));
    }

    output
}

/// 문자열 자르기 (UTF-8 안전).
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinfeed_core::{ExchangeSymbol, SymbolTable, TickerEvent};
    use rust_decimal_macros::dec;

    fn snapshot_with_eth() -> PriceSnapshot {
        let mut snapshot = PriceSnapshot::new();
        snapshot.mark_connected();
        snapshot.apply_ticker(
            SymbolTable::builtin(),
            &TickerEvent {
                symbol: ExchangeSymbol::new("ethusdt"),
                last_price: dec!(3500.50),
                price_change_24h: dec!(-20),
                price_change_percent_24h: dec!(-0.567),
                quote_volume_24h: dec!(2000000),
                event_time: None,
            },
        );
        snapshot
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse("TABLE").unwrap(), OutputFormat::Table);
        assert_eq!(OutputFormat::parse("json").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::parse("csv").is_err());
    }

    #[test]
    fn test_table_contains_quote() {
        let table = format_snapshot_table(&snapshot_with_eth());
        assert!(table.contains("ethereum"));
        assert!(table.contains("3500.5"));
        assert!(table.contains("-0.57%"));
        assert!(table.contains("2.00M"));
        assert!(table.ends_with("Total: 1 coins (connected)"));
    }

    #[test]
    fn test_json_output() {
        let json = render_snapshot(&snapshot_with_eth(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], "ethereum");
        assert_eq!(value[0]["name"], "Ethereum");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("bitcoin", 18), "bitcoin");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }
}
