//! 캔들 간격 리스케일링.
//!
//! 작은 간격의 캔들 시퀀스를 더 큰 간격으로 병합합니다.
//! 예: 일봉 3개 → 3일봉 1개. 새 캔들 하나를 채우지 못하는
//! 후행 그룹은 통째로 버려집니다 (의도된 절삭).

use crate::domain::candle::Candle;
use crate::error::{KlineError, KlineResult};
use crate::types::Interval;

use super::series::CandleSeries;

impl CandleSeries {
    /// 캔들을 더 큰 간격으로 변환합니다.
    ///
    /// 새 간격은 기존 간격보다 크고 정수배여야 합니다.
    pub fn convert_to_new_interval(&self, new_interval: Interval) -> KlineResult<Self> {
        if !new_interval.is_set() || !self.interval.is_set() {
            return Err(KlineError::InvalidInterval);
        }
        if new_interval <= self.interval {
            return Err(KlineError::ScaleRequiresLargerInterval);
        }
        if new_interval.nanos() % self.interval.nanos() != 0 {
            return Err(KlineError::NonWholeNumberScaling);
        }

        let per_candle = (new_interval.nanos() / self.interval.nanos()) as usize;
        let mut candles = Vec::with_capacity(self.candles.len() / per_candle);
        for group in self.candles.chunks_exact(per_candle) {
            let mut merged = Candle {
                time: group[0].time,
                open: group[0].open,
                ..Default::default()
            };
            for old in group {
                merged.close = old.close;
                if old.high > merged.high {
                    merged.high = old.high;
                }
                if merged.low.is_zero() || (!old.low.is_zero() && old.low < merged.low) {
                    merged.low = old.low;
                }
                merged.volume += old.volume;
            }
            candles.push(merged);
        }

        Ok(CandleSeries {
            exchange: self.exchange.clone(),
            symbol: self.symbol.clone(),
            underlying: self.underlying.clone(),
            interval: new_interval,
            candles,
        })
    }
}
