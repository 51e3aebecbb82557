//! OHLCV 캔들 타입.
//!
//! 이 모듈은 단일 버킷의 체결 활동을 요약하는 `Candle`과
//! 거래소 응답에서 디코딩된 `RawCandleRow`를 정의합니다.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::trade::TradeTick;
use crate::types::{Price, Quantity};

/// 아직 버킷이 끝나지 않아 값이 변할 수 있는 캔들에 붙는 마커.
pub const PARTIAL_CANDLE: &str = "partial candle";

/// 단일 버킷의 OHLCV 요약.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// 버킷 시작 시각 (UTC, 간격 경계 정렬)
    pub time: DateTime<Utc>,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Quantity,
    /// 검증 마커 (예: 미완성 캔들)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_issues: Option<String>,
}

impl Candle {
    /// 시각 오름차순으로 정렬된 체결 목록에서 캔들을 만듭니다.
    ///
    /// 시가는 첫 체결, 종가는 마지막 체결의 가격입니다. 저가는 0을
    /// 미설정 시드로 취급해 첫 실제 저가가 항상 반영되도록 합니다.
    pub fn from_bucket(time: DateTime<Utc>, trades: &[TradeTick]) -> Self {
        let mut candle = Candle {
            time,
            ..Default::default()
        };
        let Some(first) = trades.first() else {
            return candle;
        };
        candle.open = first.price;
        for trade in trades {
            candle.close = trade.price;
            if trade.price > candle.high {
                candle.high = trade.price;
            }
            if candle.low.is_zero() || trade.price < candle.low {
                candle.low = trade.price;
            }
            candle.volume += trade.amount;
        }
        candle
    }

    /// 체결이 없는 버킷을 직전 종가로 평탄화한 캔들을 만듭니다.
    pub fn carry_forward(time: DateTime<Utc>, previous_close: Price) -> Self {
        Candle {
            time,
            open: previous_close,
            high: previous_close,
            low: previous_close,
            close: previous_close,
            volume: Quantity::ZERO,
            validation_issues: None,
        }
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 음봉(종가 < 시가)인지 확인합니다.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// 거래소 JSON에서 디코딩된 원시 캔들 행.
///
/// 벤더 타임스탬프는 임의의 오프셋을 가질 수 있으므로
/// `Candle` 변환 시점에 UTC로 정규화됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCandleRow {
    /// 버킷 시작 시각 (벤더 오프셋 포함 가능)
    pub time: DateTime<FixedOffset>,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Quantity,
}

impl From<RawCandleRow> for Candle {
    fn from(row: RawCandleRow) -> Self {
        Candle {
            time: row.time.with_timezone(&Utc),
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            validation_issues: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn tick(secs: i64, price: Price, amount: Quantity) -> TradeTick {
        let t = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::seconds(secs);
        TradeTick::new(t, price, amount)
    }

    #[test]
    fn test_from_bucket() {
        let time = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let trades = vec![
            tick(0, dec!(100), dec!(1)),
            tick(10, dec!(105), dec!(2)),
            tick(20, dec!(95), dec!(1)),
            tick(30, dec!(102), dec!(3)),
        ];
        let candle = Candle::from_bucket(time, &trades);
        assert_eq!(candle.open, dec!(100));
        assert_eq!(candle.high, dec!(105));
        assert_eq!(candle.low, dec!(95));
        assert_eq!(candle.close, dec!(102));
        assert_eq!(candle.volume, dec!(7));
        assert!(candle.is_bullish());
    }

    #[test]
    fn test_from_bucket_empty() {
        let time = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let candle = Candle::from_bucket(time, &[]);
        assert_eq!(candle.open, Price::ZERO);
        assert_eq!(candle.volume, Quantity::ZERO);
    }

    #[test]
    fn test_carry_forward() {
        let time = Utc.with_ymd_and_hms(2020, 1, 1, 1, 0, 0).unwrap();
        let candle = Candle::carry_forward(time, dec!(42));
        assert_eq!(candle.open, dec!(42));
        assert_eq!(candle.high, dec!(42));
        assert_eq!(candle.low, dec!(42));
        assert_eq!(candle.close, dec!(42));
        assert_eq!(candle.volume, Quantity::ZERO);
        assert!(!candle.is_bullish());
        assert!(!candle.is_bearish());
    }

    #[test]
    fn test_raw_row_normalizes_to_utc() {
        let json = r#"{
            "time": "2020-01-01T09:00:00+09:00",
            "open": "100", "high": "110", "low": "90",
            "close": "105", "volume": "12.5"
        }"#;
        let row: RawCandleRow = serde_json::from_str(json).unwrap();
        let candle = Candle::from(row);
        assert_eq!(
            candle.time,
            Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(candle.close, dec!(105));
    }
}
