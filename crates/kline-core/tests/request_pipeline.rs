//! Integration tests for the request/response pipeline.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use kline_core::{Candle, Interval, KlineError, Request, ExtendedRequest, Symbol, PARTIAL_CANDLE};

fn pair() -> Symbol {
    Symbol::spot("BTC", "USDT")
}

fn day_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

/// 1442 one-minute candles (two extra past the requested day).
fn one_minute_candles() -> Vec<Candle> {
    let mut candles = Vec::new();
    let mut start = day_start();
    for x in 0..1442 {
        candles.push(Candle {
            time: start,
            open: dec!(1),
            high: Decimal::from(1 + x),
            low: -Decimal::from(1 + x),
            close: dec!(1),
            volume: dec!(1),
            validation_issues: None,
        });
        start += Interval::ONE_MIN.duration();
    }
    candles
}

fn one_hour_candles() -> Vec<Candle> {
    let mut candles = Vec::new();
    let mut start = day_start();
    for x in 0..24 {
        candles.push(Candle {
            time: start,
            open: dec!(1),
            high: Decimal::from(1 + x),
            low: -Decimal::from(1 + x),
            close: dec!(1),
            volume: dec!(1),
            validation_issues: None,
        });
        start += Interval::ONE_HOUR.duration();
    }
    candles
}

#[test]
fn test_get_ranges_splits_by_limit() {
    let start = day_start();
    let end = start + Interval::ONE_DAY.duration();
    let r = Request::new(
        "exchange",
        pair(),
        pair(),
        Interval::ONE_HOUR,
        Interval::ONE_MIN,
        start,
        end,
    )
    .unwrap();

    // 1440 one-minute buckets at 100 per request -> 15 ranges
    let holder = r.get_ranges(100).unwrap();
    assert_eq!(holder.ranges.len(), 15);
}

#[test]
fn test_process_response_passthrough() {
    let start = day_start();
    let end = start + Interval::ONE_DAY.duration();
    let r = Request::new(
        "exchange",
        pair(),
        pair(),
        Interval::ONE_HOUR,
        Interval::ONE_HOUR,
        start,
        end,
    )
    .unwrap();

    assert_eq!(r.process_response(Vec::new()), Err(KlineError::NoTimeSeriesData));

    let series = r.process_response(one_hour_candles()).unwrap();
    assert_eq!(series.candles.len(), 24);
    assert_eq!(series.interval, Interval::ONE_HOUR);
}

#[test]
fn test_process_response_with_conversion() {
    let start = day_start();
    let end = start + Interval::ONE_DAY.duration();
    let r = Request::new(
        "exchange",
        pair(),
        pair(),
        Interval::ONE_HOUR,
        Interval::ONE_MIN,
        start,
        end,
    )
    .unwrap();

    let series = r.process_response(one_minute_candles()).unwrap();
    assert_eq!(series.candles.len(), 24);
    assert_eq!(series.interval, Interval::ONE_HOUR);

    // each hourly candle aggregates 60 one-minute candles
    assert_eq!(series.candles[0].volume, dec!(60));
    assert_eq!(series.candles[0].high, dec!(60));
    assert_eq!(series.candles[0].low, -dec!(60));
    assert_eq!(series.candles[23].high, dec!(1440));
}

#[test]
fn test_partial_candle_tagging() {
    let end = Utc::now();
    let start = Interval::ONE_DAY.truncate(end - Interval::ONE_DAY.duration() * 5);
    let r = Request::new(
        "exchange",
        pair(),
        pair(),
        Interval::ONE_DAY,
        Interval::ONE_DAY,
        start,
        end,
    )
    .unwrap();
    assert!(r.partial_candle);

    let day = Interval::ONE_DAY.duration();
    let has_incomplete: Vec<Candle> = (0..6)
        .map(|x| Candle {
            time: start + day * x,
            close: Decimal::from(x + 1),
            ..Default::default()
        })
        .collect();

    let series = r.process_response(has_incomplete).unwrap();
    let last = series.candles.last().unwrap();
    assert_eq!(last.validation_issues.as_deref(), Some(PARTIAL_CANDLE));

    // without the still-forming day nothing is tagged
    let complete: Vec<Candle> = (0..5)
        .map(|x| Candle {
            time: start + day * x,
            close: Decimal::from(x + 1),
            ..Default::default()
        })
        .collect();

    let series = r.process_response(complete).unwrap();
    let last = series.candles.last().unwrap();
    assert_eq!(last.validation_issues, None);
}

#[test]
fn test_extended_request_process_response() {
    let start = day_start();
    let end = start + Interval::ONE_DAY.duration();
    let r = Request::new(
        "exchange",
        pair(),
        pair(),
        Interval::ONE_HOUR,
        Interval::ONE_MIN,
        start,
        end,
    )
    .unwrap();
    let holder = r.get_ranges(100).unwrap();
    let mut ext = ExtendedRequest::new(r, holder);

    assert_eq!(ext.process_response(Vec::new()), Err(KlineError::NoTimeSeriesData));

    let series = ext.process_response(one_minute_candles()).unwrap();
    assert_eq!(series.candles.len(), 24);

    // every expected one-minute slot was satisfied by the response
    let marked: usize = ext
        .range_holder
        .ranges
        .iter()
        .flat_map(|r| r.intervals.iter())
        .filter(|d| d.has_data)
        .count();
    assert_eq!(marked, 1440);
}
