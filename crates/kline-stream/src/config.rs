//! 스트리밍 집계기 설정.

use serde::{Deserialize, Serialize};

use kline_core::{Interval, Symbol};

/// 체결 집계기 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// 거래소 이름
    pub exchange: String,
    /// 집계 대상 심볼
    pub symbol: Symbol,
    /// 캔들 버킷 간격 (기본값: 15초)
    #[serde(default = "default_bucket_interval")]
    pub bucket_interval: Interval,
    /// 집계 주기(초) (기본값: 60)
    #[serde(default = "default_flush_secs")]
    pub flush_secs: u64,
}

impl AggregatorConfig {
    /// 기본 주기 설정으로 새 설정을 생성합니다.
    pub fn new(exchange: impl Into<String>, symbol: Symbol) -> Self {
        Self {
            exchange: exchange.into(),
            symbol,
            bucket_interval: default_bucket_interval(),
            flush_secs: default_flush_secs(),
        }
    }
}

fn default_bucket_interval() -> Interval {
    Interval::FIFTEEN_SECS
}

fn default_flush_secs() -> u64 {
    60
}
