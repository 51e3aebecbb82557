//! 정렬된 캔들 시퀀스와 그 위의 집합 연산.
//!
//! `CandleSeries`는 하나의 거래소/심볼/간격에 속한 캔들 목록을 담고,
//! 정렬, 중복 제거, 범위 절삭, 결측 구간 채우기 연산을 제공합니다.
//! 각 값은 단일 호출 체인이 소유하며 내부 동기화는 없습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::candle::Candle;
use crate::error::{KlineError, KlineResult};
use crate::ranges::IntervalRangeHolder;
use crate::types::{Interval, Price, Symbol};

/// 하나의 거래소/심볼/간격에 속한 캔들 집합.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleSeries {
    /// 거래소 이름
    pub exchange: String,
    /// 거래 심볼
    pub symbol: Symbol,
    /// 파생 상품의 기초 심볼 (선택)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlying: Option<Symbol>,
    /// 캔들 간격
    pub interval: Interval,
    /// 버킷 시작 시각 순 캔들 목록
    pub candles: Vec<Candle>,
}

impl CandleSeries {
    /// 빈 캔들 시리즈를 생성합니다.
    pub fn new(exchange: impl Into<String>, symbol: Symbol, interval: Interval) -> Self {
        Self {
            exchange: exchange.into(),
            symbol,
            underlying: None,
            interval,
            candles: Vec::new(),
        }
    }

    /// 기초 심볼을 설정합니다.
    pub fn with_underlying(mut self, underlying: Symbol) -> Self {
        self.underlying = Some(underlying);
        self
    }

    /// 캔들을 버킷 시각 기준으로 정렬합니다.
    ///
    /// 안정 정렬이므로 동일 시각 캔들의 상대 순서는 유지됩니다.
    pub fn sort_candles_by_timestamp(&mut self, desc: bool) {
        if desc {
            self.candles.sort_by(|a, b| b.time.cmp(&a.time));
        } else {
            self.candles.sort_by(|a, b| a.time.cmp(&b.time));
        }
    }

    /// 직전 캔들과 버킷 시각이 같은 캔들을 제거합니다.
    ///
    /// 인접 중복만 제거하므로 먼저 정렬되어 있어야 전체 중복이
    /// 제거됩니다.
    pub fn remove_duplicates(&mut self) {
        self.candles.dedup_by(|current, kept| current.time == kept.time);
    }

    /// `start <= time < end` 범위 밖의 캔들을 제거합니다.
    pub fn remove_outside_range(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.candles.retain(|c| c.time >= start && c.time < end);
    }

    /// 데이터가 없는 것으로 표시된 구간마다 0값 캔들을 추가합니다.
    ///
    /// 해당 시각에 이미 캔들이 있으면 건너뜁니다. 하나라도 추가되면
    /// 다시 오름차순으로 정렬합니다.
    pub fn fill_missing_data_with_empty_entries(&mut self, holder: &IntervalRangeHolder) {
        let mut any_changes = false;
        for range in &holder.ranges {
            for data in &range.intervals {
                if data.has_data {
                    continue;
                }
                if self.candles.iter().any(|c| c.time == data.start) {
                    continue;
                }
                self.candles.push(Candle {
                    time: data.start,
                    ..Default::default()
                });
                any_changes = true;
            }
        }
        if any_changes {
            self.sort_candles_by_timestamp(false);
        }
    }

    /// 지정 시각 버킷의 종가를 반환합니다.
    pub fn get_close_price_at_time(&self, t: DateTime<Utc>) -> KlineResult<Price> {
        self.candles
            .iter()
            .find(|c| c.time == t)
            .map(|c| c.close)
            .ok_or(KlineError::CandleNotFoundAtTime(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::calculate_candle_date_ranges;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn series_with_times(hours: &[u32]) -> CandleSeries {
        let mut series = CandleSeries::new(
            "test",
            Symbol::spot("BTC", "USDT"),
            Interval::ONE_HOUR,
        );
        for &h in hours {
            series.candles.push(Candle {
                time: Utc.with_ymd_and_hms(2020, 1, 1, h, 0, 0).unwrap(),
                close: dec!(1) + Price::from(h),
                ..Default::default()
            });
        }
        series
    }

    #[test]
    fn test_sort_candles_by_timestamp() {
        let mut series = series_with_times(&[3, 1, 2]);
        series.sort_candles_by_timestamp(false);
        let hours: Vec<u32> = series
            .candles
            .iter()
            .map(|c| c.time.format("%H").to_string().parse().unwrap())
            .collect();
        assert_eq!(hours, vec![1, 2, 3]);

        series.sort_candles_by_timestamp(true);
        let hours: Vec<u32> = series
            .candles
            .iter()
            .map(|c| c.time.format("%H").to_string().parse().unwrap())
            .collect();
        assert_eq!(hours, vec![3, 2, 1]);
    }

    #[test]
    fn test_remove_duplicates_idempotent() {
        let mut series = series_with_times(&[1, 1, 2, 2, 3]);
        series.remove_duplicates();
        assert_eq!(series.candles.len(), 3);

        let after_first = series.clone();
        series.remove_duplicates();
        assert_eq!(series, after_first);
    }

    #[test]
    fn test_remove_outside_range() {
        let mut series = series_with_times(&[0, 1, 2, 3, 4]);
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 1, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2020, 1, 1, 4, 0, 0).unwrap();
        series.remove_outside_range(start, end);
        // start는 포함, end는 제외
        assert_eq!(series.candles.len(), 3);
        assert_eq!(series.candles[0].time, start);
    }

    #[test]
    fn test_fill_missing_data_with_empty_entries() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2020, 1, 1, 5, 0, 0).unwrap();
        let mut holder =
            calculate_candle_date_ranges(start, end, Interval::ONE_HOUR, 0).unwrap();

        let mut series = series_with_times(&[0, 2, 4]);
        holder.set_has_data_from_candles(&series.candles);
        series.fill_missing_data_with_empty_entries(&holder);

        assert_eq!(series.candles.len(), 5);
        let hours: Vec<u32> = series
            .candles
            .iter()
            .map(|c| c.time.format("%H").to_string().parse().unwrap())
            .collect();
        assert_eq!(hours, vec![0, 1, 2, 3, 4]);
        // 채워진 캔들은 0값
        assert_eq!(series.candles[1].close, Price::ZERO);
        assert_eq!(series.candles[1].volume, Price::ZERO);

        // 이미 채워진 시리즈에 다시 적용해도 변화 없음
        let filled = series.clone();
        series.fill_missing_data_with_empty_entries(&holder);
        assert_eq!(series, filled);
    }

    #[test]
    fn test_get_close_price_at_time() {
        let series = series_with_times(&[1, 2]);
        let t = Utc.with_ymd_and_hms(2020, 1, 1, 2, 0, 0).unwrap();
        assert_eq!(series.get_close_price_at_time(t).unwrap(), dec!(3));

        let missing = Utc.with_ymd_and_hms(2020, 1, 1, 9, 0, 0).unwrap();
        assert_eq!(
            series.get_close_price_at_time(missing),
            Err(KlineError::CandleNotFoundAtTime(missing))
        );
    }
}
