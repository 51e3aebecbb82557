//! 캔들스틱 데이터를 위한 시간 간격 정의.
//!
//! 이 모듈은 캔들 집계에 사용되는 `Interval` 타입을 정의합니다.
//! 거래소에 요청할 때는 `SUPPORTED` 목록의 간격만 사용하지만,
//! 내부 리스케일링 계산에서는 임의의 양수 간격이 유효합니다.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::KlineError;

const NANOS_PER_SEC: i64 = 1_000_000_000;
const NANOS_PER_MIN: i64 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MIN;

/// 캔들 집계 시간 간격 (나노초 단위).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Interval(i64);

impl Interval {
    /// 15초봉
    pub const FIFTEEN_SECS: Interval = Interval::from_secs(15);
    /// 1분봉
    pub const ONE_MIN: Interval = Interval::from_secs(60);
    /// 3분봉
    pub const THREE_MIN: Interval = Interval::from_secs(3 * 60);
    /// 5분봉
    pub const FIVE_MIN: Interval = Interval::from_secs(5 * 60);
    /// 10분봉
    pub const TEN_MIN: Interval = Interval::from_secs(10 * 60);
    /// 15분봉
    pub const FIFTEEN_MIN: Interval = Interval::from_secs(15 * 60);
    /// 30분봉
    pub const THIRTY_MIN: Interval = Interval::from_secs(30 * 60);
    /// 1시간봉
    pub const ONE_HOUR: Interval = Interval::from_secs(60 * 60);
    /// 2시간봉
    pub const TWO_HOUR: Interval = Interval::from_secs(2 * 60 * 60);
    /// 4시간봉
    pub const FOUR_HOUR: Interval = Interval::from_secs(4 * 60 * 60);
    /// 6시간봉
    pub const SIX_HOUR: Interval = Interval::from_secs(6 * 60 * 60);
    /// 8시간봉
    pub const EIGHT_HOUR: Interval = Interval::from_secs(8 * 60 * 60);
    /// 12시간봉
    pub const TWELVE_HOUR: Interval = Interval::from_secs(12 * 60 * 60);
    /// 일봉
    pub const ONE_DAY: Interval = Interval::from_secs(24 * 60 * 60);
    /// 3일봉
    pub const THREE_DAY: Interval = Interval::from_secs(3 * 24 * 60 * 60);
    /// 15일봉
    pub const FIFTEEN_DAY: Interval = Interval::from_secs(15 * 24 * 60 * 60);
    /// 주봉
    pub const ONE_WEEK: Interval = Interval::from_secs(7 * 24 * 60 * 60);
    /// 2주봉
    pub const TWO_WEEK: Interval = Interval::from_secs(14 * 24 * 60 * 60);
    /// 월봉 (30일 근사값)
    pub const ONE_MONTH: Interval = Interval::from_secs(30 * 24 * 60 * 60);
    /// 연봉 (365일)
    pub const ONE_YEAR: Interval = Interval::from_secs(365 * 24 * 60 * 60);

    /// 거래소에 요청 가능한 전체 간격 목록.
    pub const SUPPORTED: [Interval; 20] = [
        Interval::FIFTEEN_SECS,
        Interval::ONE_MIN,
        Interval::THREE_MIN,
        Interval::FIVE_MIN,
        Interval::TEN_MIN,
        Interval::FIFTEEN_MIN,
        Interval::THIRTY_MIN,
        Interval::ONE_HOUR,
        Interval::TWO_HOUR,
        Interval::FOUR_HOUR,
        Interval::SIX_HOUR,
        Interval::EIGHT_HOUR,
        Interval::TWELVE_HOUR,
        Interval::ONE_DAY,
        Interval::THREE_DAY,
        Interval::FIFTEEN_DAY,
        Interval::ONE_WEEK,
        Interval::TWO_WEEK,
        Interval::ONE_MONTH,
        Interval::ONE_YEAR,
    ];

    /// 초 단위로 간격을 생성합니다.
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs * NANOS_PER_SEC)
    }

    /// 나노초 단위로 간격을 생성합니다.
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// 나노초 값을 반환합니다.
    pub const fn nanos(&self) -> i64 {
        self.0
    }

    /// 이 간격의 기간을 반환합니다.
    pub fn duration(&self) -> Duration {
        Duration::nanoseconds(self.0)
    }

    /// 간격이 설정되어 있는지(양수인지) 확인합니다.
    pub const fn is_set(&self) -> bool {
        self.0 > 0
    }

    /// 거래소 요청에 사용 가능한 간격인지 확인합니다.
    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }

    /// 간격의 영문 명칭을 반환합니다.
    ///
    /// 매핑되지 않은 간격은 에러 대신 `"notfound"`를 반환합니다.
    /// 호출자가 항상 문자열을 받는다고 가정하기 때문입니다.
    pub fn word(&self) -> &'static str {
        match *self {
            Interval::FIFTEEN_SECS => "fifteensecond",
            Interval::ONE_MIN => "onemin",
            Interval::THREE_MIN => "threemin",
            Interval::FIVE_MIN => "fivemin",
            Interval::TEN_MIN => "tenmin",
            Interval::FIFTEEN_MIN => "fifteenmin",
            Interval::THIRTY_MIN => "thirtymin",
            Interval::ONE_HOUR => "onehour",
            Interval::TWO_HOUR => "twohour",
            Interval::FOUR_HOUR => "fourhour",
            Interval::SIX_HOUR => "sixhour",
            Interval::EIGHT_HOUR => "eighthour",
            Interval::TWELVE_HOUR => "twelvehour",
            Interval::ONE_DAY => "oneday",
            Interval::THREE_DAY => "threeday",
            Interval::FIFTEEN_DAY => "fifteenday",
            Interval::ONE_WEEK => "oneweek",
            Interval::TWO_WEEK => "twoweek",
            Interval::ONE_MONTH => "onemonth",
            Interval::ONE_YEAR => "oneyear",
            _ => "notfound",
        }
    }

    /// 거래소 간격 코드 문자열을 반환합니다 (예: "1m", "4h", "1M").
    pub fn code(&self) -> &'static str {
        match *self {
            Interval::FIFTEEN_SECS => "15s",
            Interval::ONE_MIN => "1m",
            Interval::THREE_MIN => "3m",
            Interval::FIVE_MIN => "5m",
            Interval::TEN_MIN => "10m",
            Interval::FIFTEEN_MIN => "15m",
            Interval::THIRTY_MIN => "30m",
            Interval::ONE_HOUR => "1h",
            Interval::TWO_HOUR => "2h",
            Interval::FOUR_HOUR => "4h",
            Interval::SIX_HOUR => "6h",
            Interval::EIGHT_HOUR => "8h",
            Interval::TWELVE_HOUR => "12h",
            Interval::ONE_DAY => "1d",
            Interval::THREE_DAY => "3d",
            Interval::FIFTEEN_DAY => "15d",
            Interval::ONE_WEEK => "1w",
            Interval::TWO_WEEK => "2w",
            Interval::ONE_MONTH => "1M",
            Interval::ONE_YEAR => "1y",
            _ => "notfound",
        }
    }

    /// 축약 문자열을 반환합니다 (후행 0 단위 제거, 예: "1h0m0s" → "1h").
    pub fn short(&self) -> String {
        let mut s = self.to_string();
        if s.ends_with("m0s") {
            s.truncate(s.len() - 2);
        }
        if s.ends_with("h0m") {
            s.truncate(s.len() - 2);
        }
        s
    }

    /// 1년(365일) 안에 이 간격이 몇 번 들어가는지 반환합니다.
    ///
    /// CAGR 계산 등에 사용됩니다. 간격이 0이면 0을 반환해
    /// 0으로 나누기를 방지합니다.
    pub fn intervals_per_year(&self) -> f64 {
        if self.0 == 0 {
            return 0.0;
        }
        Interval::ONE_YEAR.0 as f64 / self.0 as f64
    }

    /// 시각을 간격 경계로 내림(절삭)합니다.
    pub fn truncate(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        if self.0 <= 0 {
            return t;
        }
        let nanos = t.timestamp_nanos_opt().unwrap_or_default();
        Utc.timestamp_nanos(nanos - nanos.rem_euclid(self.0))
    }

    /// 시각을 가장 가까운 간격 경계로 반올림합니다 (절반은 올림).
    pub fn round(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        if self.0 <= 0 {
            return t;
        }
        let nanos = t.timestamp_nanos_opt().unwrap_or_default();
        let rem = nanos.rem_euclid(self.0);
        if rem * 2 >= self.0 {
            Utc.timestamp_nanos(nanos + (self.0 - rem))
        } else {
            Utc.timestamp_nanos(nanos - rem)
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "0s");
        }
        if self.0 < 0 {
            write!(f, "-")?;
        }
        let mut n = self.0.unsigned_abs();
        let hours = n / NANOS_PER_HOUR as u64;
        n %= NANOS_PER_HOUR as u64;
        let mins = n / NANOS_PER_MIN as u64;
        n %= NANOS_PER_MIN as u64;
        let secs = n / NANOS_PER_SEC as u64;
        let frac = n % NANOS_PER_SEC as u64;

        if hours > 0 {
            write!(f, "{}h{}m", hours, mins)?;
        } else if mins > 0 {
            write!(f, "{}m", mins)?;
        }
        if frac == 0 {
            write!(f, "{}s", secs)
        } else {
            let fraction = format!("{:09}", frac);
            write!(f, "{}.{}s", secs, fraction.trim_end_matches('0'))
        }
    }
}

impl FromStr for Interval {
    type Err = KlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::SUPPORTED
            .iter()
            .find(|i| i.code() == s)
            .copied()
            .ok_or(KlineError::InvalidInterval)
    }
}
