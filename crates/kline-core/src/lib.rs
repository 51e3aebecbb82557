//! # Kline Core
//!
//! 체결 틱을 고정 간격 OHLCV 캔들로 집계하는 핵심 로직을 제공합니다.
//!
//! 이 크레이트는 거래소 클라이언트와 저장/차트/전략 계층 사이에서
//! 사용되는 순수 동기 연산을 제공합니다:
//! - 시간 간격 및 심볼 타입
//! - 체결 틱 → 캔들 빌더
//! - 캔들 집합 연산 (정렬, 중복 제거, 범위 절삭, 결측 채우기)
//! - 간격 리스케일링
//! - 과거 데이터 요청의 날짜 범위 분할
//! - 요청/응답 파이프라인
//! - 로깅 인프라

pub mod domain;
pub mod error;
pub mod logging;
pub mod ranges;
pub mod request;
pub mod types;

pub use domain::*;
pub use error::*;
pub use logging::*;
pub use ranges::{calculate_candle_date_ranges, IntervalData, IntervalRange, IntervalRangeHolder};
pub use request::*;
pub use types::*;
