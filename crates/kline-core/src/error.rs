//! 캔들 집계 시스템의 에러 타입.
//!
//! 모든 에러는 호출자에게 즉시 반환됩니다. 이 크레이트의 순수 함수는
//! 내부에서 재시도하거나 에러를 삼키지 않으며, 형식이 맞는 입력에 대해
//! 패닉하지 않습니다.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::MarketType;

/// 핵심 캔들 집계 에러.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KlineError {
    /// 설정되지 않았거나 0 이하인 간격
    #[error("invalid/unset interval")]
    InvalidInterval,

    /// 캔들 생성에 필요한 최소 체결 수 미달
    #[error("insufficient trade data: {0} trades supplied, at least 2 required")]
    InsufficientTradeData(usize),

    /// 체결의 타임스탬프가 설정되지 않음
    #[error("timestamp not set for trade at index {0}")]
    UnsetTimestamp(usize),

    /// 체결의 수량이 설정되지 않음
    #[error("amount not set for trade at index {0}")]
    UnsetAmount(usize),

    /// 체결의 가격이 설정되지 않음
    #[error("price not set for trade at index {0}")]
    UnsetPrice(usize),

    /// 리스케일 대상 간격이 기존 간격보다 크지 않음
    #[error("new interval must be a longer duration to scale")]
    ScaleRequiresLargerInterval,

    /// 기존 간격이 새 간격으로 정수배 분할되지 않음
    #[error("old interval must divide evenly into the new interval")]
    NonWholeNumberScaling,

    /// 지정 시각에 해당하는 캔들이 없음
    #[error("candle not found at {0}")]
    CandleNotFoundAtTime(DateTime<Utc>),

    /// 캔들 데이터가 비어 있음
    #[error("no candle data")]
    NoCandleData,

    /// 변환할 시계열 데이터가 없음
    #[error("no time series data to convert")]
    NoTimeSeriesData,

    /// 거래소 이름이 비어 있음
    #[error("exchange name unset")]
    UnsetExchangeName,

    /// 심볼의 기준 또는 호가 자산이 비어 있음
    #[error("symbol base or quote currency is empty")]
    EmptySymbol,

    /// 요청 심볼과 거래소 형식 심볼의 시장 유형 불일치
    #[error("market types do not match: {0} != {1}")]
    MarketTypeMismatch(MarketType, MarketType),

    /// 시작/종료 시각이 설정되지 않음
    #[error("start and end dates must be set")]
    DateUnset,

    /// 시작 시각이 종료 시각보다 뒤
    #[error("start date after end date: {start} > {end}")]
    StartAfterEnd {
        /// 요청 시작 시각
        start: DateTime<Utc>,
        /// 요청 종료 시각
        end: DateTime<Utc>,
    },

    /// 시작과 종료 시각이 동일함
    #[error("start and end dates are equal")]
    StartEqualsEnd,

    /// 시작 시각이 현재보다 미래
    #[error("start date is after current time")]
    StartAfterNow,

    /// 직렬화/역직렬화 에러
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// 캔들 집계 작업을 위한 Result 타입.
pub type KlineResult<T> = Result<T, KlineError>;

impl From<serde_json::Error> for KlineError {
    fn from(err: serde_json::Error) -> Self {
        KlineError::Serialization(err.to_string())
    }
}
