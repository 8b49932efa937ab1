//! 내장 심볼 매핑 조회.

use anyhow::{Context, Result};
use coinfeed_core::SymbolTable;
use serde::Serialize;

use super::output::OutputFormat;

/// 매핑 한 줄.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolRow {
    /// 코인 식별자
    pub coin_id: String,
    /// 거래소 심볼
    pub exchange_symbol: String,
    /// 거래소 심볼을 역방향 조회한 결과
    pub resolves_to: Option<String>,
}

impl SymbolRow {
    /// 역방향 조회 결과가 자기 자신이 아닌 별칭 매핑인지 확인합니다.
    pub fn is_shadowed(&self) -> bool {
        self.resolves_to.as_deref() != Some(self.coin_id.as_str())
    }
}

/// 등록 순서대로 매핑 목록을 만듭니다.
pub fn symbol_rows(table: &SymbolTable) -> Vec<SymbolRow> {
    table
        .entries()
        .map(|(coin_id, symbol)| SymbolRow {
            coin_id: coin_id.to_string(),
            exchange_symbol: symbol.to_string(),
            resolves_to: table
                .reverse_lookup(symbol.as_str())
                .map(|id| id.to_string()),
        })
        .collect()
}

/// 매핑 목록을 출력합니다.
pub fn list_symbols(format: OutputFormat) -> Result<usize> {
    let rows = symbol_rows(SymbolTable::builtin());
    let content = match format {
        OutputFormat::Table => format_table(&rows),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&rows).context("Failed to serialize to JSON")?
        }
    };
    println!("{}", content);
    Ok(rows.len())
}

fn format_table(rows: &[SymbolRow]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<20} {:<12} {:<20}\n",
        "COIN_ID", "SYMBOL", "REVERSE"
    ));
    output.push_str(&"-".repeat(54));
    output.push('\n');

    for row in rows {
        let reverse = row.resolves_to.as_deref().unwrap_or("-");
        let marker = if row.is_shadowed() { " *" } else { "" };
        output.push_str(&format!(
            "{:<20} {:<12} {:<20}\n",
            row.coin_id,
            row.exchange_symbol,
            format!("{}{}", reverse, marker)
        ));
    }

    output.push('\n');
    output.push_str(&format!("Total: {} mappings", rows.len()));
    if rows.iter().any(SymbolRow::is_shadowed) {
        output.push_str("\n* reverse lookup resolves to a later alias");
    }

    output
}
