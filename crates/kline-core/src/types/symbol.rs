//! 심볼 및 시장 유형 정의.
//!
//! 이 모듈은 캔들 데이터가 속하는 거래 대상 관련 타입을 정의합니다:
//! - `MarketType` - 시장 유형 (현물, 마진, 선물, 무기한)
//! - `Symbol` - 거래 가능한 상품을 나타내는 심볼

use serde::{Deserialize, Serialize};
use std::fmt;

/// 시장 유형 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    /// 현물 시장
    Spot,
    /// 마진 시장
    Margin,
    /// 선물 시장
    Futures,
    /// 무기한 스왑 시장
    Perpetual,
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketType::Spot => write!(f, "spot"),
            MarketType::Margin => write!(f, "margin"),
            MarketType::Futures => write!(f, "futures"),
            MarketType::Perpetual => write!(f, "perpetual"),
        }
    }
}

/// 거래 가능한 상품을 나타내는 트레이딩 심볼.
///
/// 심볼은 기준 자산, 호가 자산, 시장 유형으로 구성됩니다.
/// 예: 현물의 BTC/USDT, 무기한의 ETH/USD.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// 기준 자산 (예: BTC, ETH)
    pub base: String,
    /// 호가 자산 (예: USDT, USD)
    pub quote: String,
    /// 시장 유형
    pub market_type: MarketType,
    /// 거래소별 심볼 형식 (선택)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_symbol: Option<String>,
}

impl Symbol {
    /// 새 심볼을 생성합니다.
    pub fn new(base: impl Into<String>, quote: impl Into<String>, market_type: MarketType) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
            market_type,
            exchange_symbol: None,
        }
    }

    /// 현물 심볼을 생성합니다.
    pub fn spot(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self::new(base, quote, MarketType::Spot)
    }

    /// 선물 심볼을 생성합니다.
    pub fn futures(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self::new(base, quote, MarketType::Futures)
    }

    /// 무기한 스왑 심볼을 생성합니다.
    pub fn perpetual(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self::new(base, quote, MarketType::Perpetual)
    }

    /// 거래소별 심볼 형식을 설정합니다.
    pub fn with_exchange_symbol(mut self, exchange_symbol: impl Into<String>) -> Self {
        self.exchange_symbol = Some(exchange_symbol.into());
        self
    }

    /// "BASE/QUOTE" 형식 문자열에서 심볼을 파싱합니다.
    pub fn from_string(s: &str, market_type: MarketType) -> Option<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
            Some(Self::new(parts[0], parts[1], market_type))
        } else {
            None
        }
    }

    /// 기준 또는 호가 자산이 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() || self.quote.is_empty()
    }

    /// 거래소 요청에 사용할 문자열을 반환합니다.
    ///
    /// `exchange_symbol`이 설정된 경우 이를 우선하고,
    /// 없으면 "BASEQUOTE" 결합 형식을 사용합니다.
    pub fn request_string(&self) -> String {
        match &self.exchange_symbol {
            Some(s) => s.clone(),
            None => format!("{}{}", self.base, self.quote),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_creation() {
        let symbol = Symbol::spot("btc", "usdt");
        assert_eq!(symbol.base, "BTC");
        assert_eq!(symbol.quote, "USDT");
        assert_eq!(symbol.market_type, MarketType::Spot);
    }

    #[test]
    fn test_symbol_display() {
        let symbol = Symbol::spot("BTC", "USDT");
        assert_eq!(symbol.to_string(), "BTC/USDT");
    }

    #[test]
    fn test_symbol_from_string() {
        let symbol = Symbol::from_string("ETH/USDT", MarketType::Spot).unwrap();
        assert_eq!(symbol.base, "ETH");
        assert_eq!(symbol.quote, "USDT");
        assert!(Symbol::from_string("ETHUSDT", MarketType::Spot).is_none());
        assert!(Symbol::from_string("/USDT", MarketType::Spot).is_none());
    }

    #[test]
    fn test_request_string() {
        let symbol = Symbol::spot("BTC", "USDT");
        assert_eq!(symbol.request_string(), "BTCUSDT");
        let custom = symbol.with_exchange_symbol("XBT-USDT");
        assert_eq!(custom.request_string(), "XBT-USDT");
    }
}
