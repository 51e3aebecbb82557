//! 캔들 요청 생성과 응답 처리 파이프라인.
//!
//! 클라이언트가 원하는 간격과 거래소가 실제 제공하는 간격이 다를 수
//! 있으므로, 요청 생성 시 종료 시각을 보정하고 응답 처리 시
//! 리스케일링과 정리를 수행합니다. 아직 진행 중인 마지막 캔들에는
//! 미완성 마커를 붙입니다.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Candle, CandleSeries, PARTIAL_CANDLE};
use crate::error::{KlineError, KlineResult};
use crate::ranges::{calculate_candle_date_ranges, start_end_time_check, IntervalRangeHolder};
use crate::types::{Interval, Symbol};

/// 검증된 과거 캔들 데이터 요청.
///
/// 생성 이후에는 읽기 전용이며, 필요 시 날짜 범위 홀더를 파생합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// 거래소 이름
    pub exchange: String,
    /// 클라이언트 형식 심볼
    pub symbol: Symbol,
    /// 거래소 요청 형식 심볼
    pub request_formatted: Symbol,
    /// 클라이언트가 요구한 간격
    pub client_required: Interval,
    /// 거래소가 제공하는 간격
    pub exchange_interval: Interval,
    /// 요청 시작 시각
    pub start: DateTime<Utc>,
    /// 요청 종료 시각 (마지막 캔들을 완성하도록 보정될 수 있음)
    pub end: DateTime<Utc>,
    /// 마지막 캔들이 아직 형성 중일 수 있는지 여부
    pub partial_candle: bool,
}

impl Request {
    /// 새 캔들 요청을 생성합니다.
    ///
    /// 거래소 간격이 요구 간격보다 잘고 종료 시각이 요구 간격
    /// 경계에 맞지 않으면, 마지막 요구 간격 캔들이 완성되도록
    /// 종료 시각을 다음 경계로 밀어냅니다.
    pub fn new(
        exchange: impl Into<String>,
        symbol: Symbol,
        request_formatted: Symbol,
        client_required: Interval,
        exchange_interval: Interval,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> KlineResult<Self> {
        let exchange = exchange.into();
        if exchange.is_empty() {
            return Err(KlineError::UnsetExchangeName);
        }
        if symbol.is_empty() || request_formatted.is_empty() {
            return Err(KlineError::EmptySymbol);
        }
        if symbol.market_type != request_formatted.market_type {
            return Err(KlineError::MarketTypeMismatch(
                symbol.market_type,
                request_formatted.market_type,
            ));
        }
        if !client_required.is_set() || !exchange_interval.is_set() {
            return Err(KlineError::InvalidInterval);
        }
        match start_end_time_check(start, end) {
            Ok(()) | Err(KlineError::StartAfterNow) => {}
            Err(e) => return Err(e),
        }

        let mut end = end;
        if exchange_interval < client_required {
            let window = (end - start).num_nanoseconds().unwrap_or_default();
            let rem = window.rem_euclid(client_required.nanos());
            if rem != 0 {
                end += Duration::nanoseconds(client_required.nanos() - rem);
            }
        }
        let partial_candle = end > client_required.truncate(Utc::now());

        Ok(Self {
            exchange,
            symbol,
            request_formatted,
            client_required,
            exchange_interval,
            start,
            end,
            partial_candle,
        })
    }

    /// 거래소 간격 기준으로 요청 구간을 API 호출 단위로 분할합니다.
    pub fn get_ranges(&self, limit: u32) -> KlineResult<IntervalRangeHolder> {
        calculate_candle_date_ranges(self.start, self.end, self.exchange_interval, limit)
    }

    /// 원시 응답 캔들을 검증된 시리즈로 변환합니다.
    ///
    /// 거래소 간격이 요구 간격과 다르면 리스케일링하고, 정렬/중복
    /// 제거/범위 절삭 후 아직 버킷이 끝나지 않은 마지막 캔들에
    /// 미완성 마커를 붙입니다.
    pub fn process_response(&self, time_series: Vec<Candle>) -> KlineResult<CandleSeries> {
        if time_series.is_empty() {
            return Err(KlineError::NoTimeSeriesData);
        }
        let mut series = CandleSeries {
            exchange: self.exchange.clone(),
            symbol: self.symbol.clone(),
            underlying: None,
            interval: self.exchange_interval,
            candles: time_series,
        };
        if self.client_required != self.exchange_interval {
            series = series.convert_to_new_interval(self.client_required)?;
        }
        series.sort_candles_by_timestamp(false);
        series.remove_duplicates();
        series.remove_outside_range(self.start, self.end);

        if self.partial_candle {
            let required = self.client_required.duration();
            if let Some(last) = series.candles.last_mut() {
                if last.time + required > Utc::now() {
                    last.validation_issues = Some(PARTIAL_CANDLE.to_string());
                }
            }
        }
        Ok(series)
    }
}

/// 날짜 범위 추적이 결합된 확장 요청.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedRequest {
    /// 내부 요청
    pub request: Request,
    /// 요청 구간의 데이터 수신 추적 홀더
    pub range_holder: IntervalRangeHolder,
}

impl ExtendedRequest {
    /// 요청과 범위 홀더로 확장 요청을 생성합니다.
    pub fn new(request: Request, range_holder: IntervalRangeHolder) -> Self {
        Self {
            request,
            range_holder,
        }
    }

    /// 응답 캔들로 수신 여부를 기록한 뒤 내부 요청에 처리를 위임합니다.
    ///
    /// 누락 구간이 있으면 경고 로그로 요약을 남깁니다.
    pub fn process_response(&mut self, time_series: Vec<Candle>) -> KlineResult<CandleSeries> {
        if time_series.is_empty() {
            return Err(KlineError::NoTimeSeriesData);
        }
        self.range_holder.set_has_data_from_candles(&time_series);
        let summary = self.range_holder.data_summary(false);
        if !summary.is_empty() {
            warn!(
                exchange = %self.request.exchange,
                symbol = %self.request.symbol,
                ?summary,
                "incomplete candle data received"
            );
        }
        self.request.process_response(time_series)
    }

    /// 이 요청으로 얻을 수 있는 캔들 수의 상한을 반환합니다.
    ///
    /// 홀더가 무제한(limit 0)이면 0을 반환합니다.
    pub fn size(&self) -> u64 {
        self.range_holder.limit as u64 * self.range_holder.ranges.len() as u64
    }
}
