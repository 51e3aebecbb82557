//! 과거 데이터 요청을 위한 날짜 범위 분할.
//!
//! 거래소 API는 한 번의 요청으로 반환하는 캔들 수를 제한합니다.
//! 이 모듈은 전체 요청 구간을 간격 단위로 나눈 뒤 API 호출 크기의
//! 범위로 분할하고, 각 구간에 실제로 데이터가 돌아왔는지 추적해
//! 누락 구간을 보고합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Candle;
use crate::error::{KlineError, KlineResult};
use crate::types::Interval;

/// 요약 문자열에 사용하는 시각 형식.
const SIMPLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 요청 전체 구간과 분할된 범위 목록.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRangeHolder {
    /// 전체 구간 시작
    pub start: DateTime<Utc>,
    /// 전체 구간 종료
    pub end: DateTime<Utc>,
    /// API 호출 단위로 분할된 범위 목록
    pub ranges: Vec<IntervalRange>,
    /// 범위당 최대 구간 수 (0이면 무제한)
    pub limit: u32,
}

/// 거래소 API 요청 제한에 맞춘 구간 묶음.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRange {
    /// 범위 시작
    pub start: DateTime<Utc>,
    /// 범위 종료
    pub end: DateTime<Utc>,
    /// 범위에 속한 구간 목록
    pub intervals: Vec<IntervalData>,
}

/// 단일 구간의 데이터 수신 여부 기록.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalData {
    /// 구간 시작
    pub start: DateTime<Utc>,
    /// 구간 종료
    pub end: DateTime<Utc>,
    /// 응답에 이 구간의 캔들이 있었는지 여부
    pub has_data: bool,
}

/// 시작/종료 시각 쌍의 유효성을 검사합니다.
///
/// 미설정, 역순, 동일 시각, 미래 시작을 구분해 보고합니다.
pub(crate) fn start_end_time_check(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> KlineResult<()> {
    if start.timestamp() == 0 || end.timestamp() == 0 {
        return Err(KlineError::DateUnset);
    }
    if start > end {
        return Err(KlineError::StartAfterEnd { start, end });
    }
    if start == end {
        return Err(KlineError::StartEqualsEnd);
    }
    if start > Utc::now() {
        return Err(KlineError::StartAfterNow);
    }
    Ok(())
}

/// 날짜 범위에서 기대되는 캔들 구간을 계산합니다.
///
/// API가 한 번에 만들 수 있는 캔들 수가 제한되어 있으면
/// 범위를 자동으로 제한 크기로 분할합니다. 시작이 미래인 것만
/// 위반인 경우는 허용됩니다.
pub fn calculate_candle_date_ranges(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: Interval,
    limit: u32,
) -> KlineResult<IntervalRangeHolder> {
    match start_end_time_check(start, end) {
        Ok(()) | Err(KlineError::StartAfterNow) => {}
        Err(e) => return Err(e),
    }
    if !interval.is_set() {
        return Err(KlineError::InvalidInterval);
    }

    let start = interval.round(start);
    let end = interval.round(end);
    let step = interval.duration();

    let mut intervals_in_whole_period = Vec::new();
    let mut i = start;
    while i < end {
        intervals_in_whole_period.push(IntervalData {
            start: i,
            end: i + step,
            has_data: false,
        });
        i += step;
    }

    let mut holder = IntervalRangeHolder {
        start,
        end,
        ranges: Vec::new(),
        limit,
    };

    if limit == 0 || intervals_in_whole_period.len() < limit as usize {
        holder.ranges.push(IntervalRange {
            start,
            end,
            intervals: intervals_in_whole_period,
        });
        return Ok(holder);
    }

    for chunk in intervals_in_whole_period.chunks(limit as usize) {
        holder.ranges.push(IntervalRange {
            start: chunk[0].start,
            end: chunk[chunk.len() - 1].end,
            intervals: chunk.to_vec(),
        });
    }
    Ok(holder)
}

impl IntervalRangeHolder {
    /// 반환된 캔들로 각 구간의 데이터 수신 여부를 기록합니다.
    ///
    /// 캔들을 왼쪽에서 오른쪽으로 소비하므로 캔들 하나가 최대 하나의
    /// 구간만 충족하며, 이미 지나간 구간을 나중 캔들이 소급해서
    /// 충족할 수 없습니다.
    pub fn set_has_data_from_candles(&mut self, incoming: &[Candle]) {
        let mut cursor = 0;
        for range in &mut self.ranges {
            for data in &mut range.intervals {
                for z in cursor..incoming.len() {
                    let t = incoming[z].time;
                    if t >= data.start && t < data.end {
                        data.has_data = true;
                        cursor = z + 1;
                        break;
                    }
                }
            }
        }
    }

    /// 지정 시각에 데이터가 있는지 확인합니다.
    pub fn has_data_at_date(&self, t: DateTime<Utc>) -> bool {
        if t < self.start || t > self.end {
            return false;
        }
        for range in &self.ranges {
            if t < range.start || t > range.end {
                continue;
            }
            for (j, data) in range.intervals.iter().enumerate() {
                if t >= data.start && t < data.end {
                    return data.has_data;
                }
                // 단일 구간 범위의 마지막 구간은 범위 시작과 같은
                // 시각도 허용
                if j == range.intervals.len() - 1 && t == range.start {
                    return data.has_data;
                }
            }
        }
        false
    }

    /// 데이터 수신 상태를 사람이 읽을 수 있는 요약으로 만듭니다.
    ///
    /// 같은 상태가 이어지는 구간을 하나로 묶어
    /// "has/missing data between X and Y" 형식 문자열을 만듭니다.
    pub fn data_summary(&self, include_has_data: bool) -> Vec<String> {
        let mut range_start = self.start;
        let mut range_end: Option<DateTime<Utc>> = None;
        let mut prev_start: Option<DateTime<Utc>> = None;
        let mut prev_end: Option<DateTime<Utc>> = None;
        let mut range_has_data = false;
        let mut range_texts = Vec::new();

        for range in &self.ranges {
            for data in &range.intervals {
                if data.has_data {
                    if !range_has_data {
                        if let Some(end) = range_end {
                            range_texts.push(date_summary_range(range_start, end, false));
                            prev_start = Some(range_start);
                            prev_end = Some(end);
                            range_start = data.start;
                        }
                    }
                    range_has_data = true;
                } else {
                    if range_has_data {
                        if let Some(end) = range_end {
                            if include_has_data {
                                range_texts.push(date_summary_range(range_start, end, true));
                            }
                            prev_start = Some(range_start);
                            prev_end = Some(end);
                            range_start = data.start;
                        }
                    }
                    range_has_data = false;
                }
                range_end = Some(data.end);
            }
        }

        if prev_start != Some(range_start) || prev_end != range_end {
            if let Some(end) = range_end {
                if (range_has_data && include_has_data) || !range_has_data {
                    range_texts.push(date_summary_range(range_start, end, range_has_data));
                }
            }
        }
        range_texts
    }
}

fn date_summary_range(start: DateTime<Utc>, end: DateTime<Utc>, has_data: bool) -> String {
    let data_string = if has_data { "has" } else { "missing" };
    format!(
        "{} data between {} and {}",
        data_string,
        start.format(SIMPLE_TIME_FORMAT),
        end.format(SIMPLE_TIME_FORMAT)
    )
}
