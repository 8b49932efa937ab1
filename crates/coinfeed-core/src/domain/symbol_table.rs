//! 코인 식별자 ↔ 거래소 심볼 양방향 매핑.
//!
//! 정방향 테이블은 여러 코인 식별자가 같은 거래쌍을 가리킬 수 있습니다
//! (예: 래핑 자산이 기초 자산의 거래쌍을 공유). 역방향 테이블은 정방향 항목을
//! 작성 순서대로 순회하며 만들어지므로, 같은 거래쌍을 공유하는 항목 중
//! **마지막에 등록된** 식별자가 역방향 조회 결과가 됩니다. 따라서 항목 순서는
//! 작성된 그대로 유지되어야 합니다.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

use crate::types::{CoinId, ExchangeSymbol};

/// 애플리케이션이 아는 코인 전체와 거래쌍 (작성 순서 유지).
const BUILTIN_MAPPINGS: &[(&str, &str)] = &[
    ("bitcoin", "btcusdt"),
    ("ethereum", "ethusdt"),
    ("binancecoin", "bnbusdt"),
    ("ripple", "xrpusdt"),
    ("cardano", "adausdt"),
    ("solana", "solusdt"),
    ("polkadot", "dotusdt"),
    ("avalanche-2", "avaxusdt"),
    ("chainlink", "linkusdt"),
    ("matic-network", "maticusdt"),
    ("litecoin", "ltcusdt"),
    ("uniswap", "uniusdt"),
    ("tron", "trxusdt"),
    ("cosmos", "atomusdt"),
    ("stellar", "xlmusdt"),
    ("wrapped-bitcoin", "btcusdt"),
];

static BUILTIN: Lazy<SymbolTable> =
    Lazy::new(|| SymbolTable::from_pairs(BUILTIN_MAPPINGS.iter().copied()));

/// 정적 양방향 심볼 매핑 테이블.
///
/// 생성 후에는 읽기 전용이며, 조회 실패는 `None`으로만 표현됩니다.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// 작성 순서대로의 정방향 항목
    entries: Vec<(CoinId, ExchangeSymbol)>,
    forward: HashMap<CoinId, ExchangeSymbol>,
    reverse: HashMap<ExchangeSymbol, CoinId>,
}

impl SymbolTable {
    /// (코인 식별자, 거래소 심볼) 쌍 목록으로 테이블을 생성합니다.
    ///
    /// 역방향 테이블은 입력 순서대로 `reverse[symbol] = id`를 덮어쓰며 만들어집니다.
    pub fn from_pairs<I, C, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, S)>,
        C: AsRef<str>,
        S: AsRef<str>,
    {
        let mut table = Self::default();

        for (id, symbol) in pairs {
            let id = CoinId::new(id);
            let symbol = ExchangeSymbol::new(symbol);

            if table.forward.insert(id.clone(), symbol.clone()).is_some() {
                // 같은 식별자가 다시 등록되면 정방향 값만 교체하고 순서는 처음 위치를 유지
                if let Some(entry) = table.entries.iter_mut().find(|entry| entry.0 == id) {
                    entry.1 = symbol.clone();
                }
            } else {
                table.entries.push((id.clone(), symbol.clone()));
            }

            table.reverse.insert(symbol, id);
        }

        table
    }

    /// 애플리케이션 내장 매핑 테이블을 반환합니다.
    pub fn builtin() -> &'static SymbolTable {
        &BUILTIN
    }

    /// 코인 식별자로 거래소 심볼을 조회합니다.
    pub fn forward_lookup(&self, coin_id: &str) -> Option<&ExchangeSymbol> {
        self.forward.get(coin_id)
    }

    /// 거래소 심볼로 코인 식별자를 조회합니다. 입력은 대소문자를 구분하지 않습니다.
    pub fn reverse_lookup(&self, exchange_symbol: &str) -> Option<&CoinId> {
        self.reverse.get(exchange_symbol.to_lowercase().as_str())
    }

    /// 작성 순서대로의 정방향 항목을 반환합니다.
    pub fn entries(&self) -> impl Iterator<Item = (&CoinId, &ExchangeSymbol)> {
        self.entries.iter().map(|(id, symbol)| (id, symbol))
    }

    /// 중복을 제거한 거래소 심볼 목록을 첫 등장 순서대로 반환합니다.
    ///
    /// 스트림 구독 목록으로 사용됩니다.
    pub fn exchange_symbols(&self) -> Vec<ExchangeSymbol> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|(_, symbol)| seen.insert(symbol.clone()))
            .map(|(_, symbol)| symbol.clone())
            .collect()
    }

    /// 등록된 코인 식별자 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 테이블이 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
