//! 체결 틱을 고정 간격 OHLCV 캔들로 변환하는 빌더.
//!
//! 정렬되지 않았거나 중복이 섞인 체결 집합을 받아, 가장 이른 체결의
//! 절삭 시각부터 가장 늦은 체결이 속한 버킷까지 모든 버킷을 커버하는
//! 캔들 시리즈를 만듭니다. 체결이 없는 버킷은 직전 종가로 평탄화합니다.

use crate::domain::candle::Candle;
use crate::domain::trade::TradeTick;
use crate::error::{KlineError, KlineResult};
use crate::types::{Interval, Price, Symbol};

use super::series::CandleSeries;

impl CandleSeries {
    /// 체결 목록을 간격별 캔들로 집계합니다.
    ///
    /// 버킷 소속은 반열린 구간 `[start, start + interval)` 기준입니다.
    /// 입력 검증에 실패하면 부분 집계 없이 전체 호출이 실패합니다.
    pub fn from_trades(
        mut trades: Vec<TradeTick>,
        interval: Interval,
        symbol: Symbol,
        exchange: impl Into<String>,
    ) -> KlineResult<Self> {
        if !interval.is_set() {
            return Err(KlineError::InvalidInterval);
        }
        validate_trades(&trades)?;
        trades.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        let mut series = CandleSeries::new(exchange, symbol, interval);
        let last_timestamp = trades[trades.len() - 1].timestamp;
        let mut bucket_start = interval.truncate(trades[0].timestamp);
        let mut index = 0;
        let mut previous_close = Price::ZERO;

        while bucket_start <= last_timestamp {
            let bucket_end = bucket_start + interval.duration();
            let begin = index;
            while index < trades.len() && trades[index].timestamp < bucket_end {
                index += 1;
            }
            let bucket = &trades[begin..index];
            if bucket.is_empty() {
                series
                    .candles
                    .push(Candle::carry_forward(bucket_start, previous_close));
            } else {
                let candle = Candle::from_bucket(bucket_start, bucket);
                previous_close = candle.close;
                series.candles.push(candle);
            }
            bucket_start = bucket_end;
        }
        Ok(series)
    }
}

/// 집계 전 체결 데이터의 0값 검사.
fn validate_trades(trades: &[TradeTick]) -> KlineResult<()> {
    if trades.len() < 2 {
        return Err(KlineError::InsufficientTradeData(trades.len()));
    }
    for (i, trade) in trades.iter().enumerate() {
        if !trade.has_timestamp() {
            return Err(KlineError::UnsetTimestamp(i));
        }
        if trade.amount.is_zero() {
            return Err(KlineError::UnsetAmount(i));
        }
        if trade.price.is_zero() {
            return Err(KlineError::UnsetPrice(i));
        }
    }
    Ok(())
}
