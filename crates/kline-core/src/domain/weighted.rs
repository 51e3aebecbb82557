//! 가중 평균 가격 계산.
//!
//! 캔들과 캔들 시리즈에 대한 평균가, 대표가, TWAP, VWAP 계산을
//! 제공합니다. 최신 캔들이 시퀀스의 끝에 있다고 가정합니다.

use rust_decimal::Decimal;

use crate::domain::candle::Candle;
use crate::error::{KlineError, KlineResult};
use crate::types::Price;

use super::series::CandleSeries;

impl Candle {
    /// 시가/고가/저가/종가의 평균을 반환합니다.
    pub fn average_price(&self) -> Price {
        (self.open + self.high + self.low + self.close) / Decimal::from(4)
    }

    /// 대표가(고가+저가+종가 평균)를 반환합니다.
    pub fn typical_price(&self) -> Price {
        (self.high + self.low + self.close) / Decimal::from(3)
    }
}

impl CandleSeries {
    /// 전체 구간의 시간 가중 평균 가격을 반환합니다.
    pub fn twap(&self) -> KlineResult<Price> {
        if self.candles.is_empty() {
            return Err(KlineError::NoCandleData);
        }
        let total: Decimal = self.candles.iter().map(|c| c.average_price()).sum();
        Ok(total / Decimal::from(self.candles.len() as i64))
    }

    /// 캔들별 누적 거래량 가중 평균 가격 목록을 반환합니다.
    ///
    /// 각 원소는 해당 시점까지의 (대표가 × 거래량) 누적 합을
    /// 거래량 누적 합으로 나눈 값입니다.
    pub fn vwaps(&self) -> KlineResult<Vec<Price>> {
        if self.candles.is_empty() {
            return Err(KlineError::NoCandleData);
        }
        let mut store = Vec::with_capacity(self.candles.len());
        let mut cumulative_total = Decimal::ZERO;
        let mut cumulative_volume = Decimal::ZERO;
        for candle in &self.candles {
            cumulative_total += candle.typical_price() * candle.volume;
            cumulative_volume += candle.volume;
            if cumulative_volume.is_zero() {
                store.push(Decimal::ZERO);
            } else {
                store.push(cumulative_total / cumulative_volume);
            }
        }
        Ok(store)
    }
}
