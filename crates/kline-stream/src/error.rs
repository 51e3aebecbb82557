//! 스트리밍 집계 모듈의 에러 타입.

use thiserror::Error;

use kline_core::KlineError;

/// 스트리밍 집계 에러.
#[derive(Debug, Error)]
pub enum StreamError {
    /// 캔들 저장소 에러
    #[error("candle sink error: {0}")]
    Sink(String),

    /// 핵심 집계 에러
    #[error(transparent)]
    Kline(#[from] KlineError),
}

/// 스트리밍 집계 작업을 위한 Result 타입.
pub type StreamResult<T> = Result<T, StreamError>;
