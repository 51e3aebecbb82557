//! 주기적 백그라운드 체결 집계기.
//!
//! 외부 피드가 `TradeFeed` 핸들로 체결 틱을 버퍼에 밀어 넣으면,
//! 집계기 태스크가 고정 주기로 깨어나 버퍼 전체를 비우고 버킷별
//! 캔들을 만든 뒤 직전 사이클의 미완성 캔들과 병합합니다.
//!
//! 동작 규칙:
//! - 집계 사이클은 한 번에 하나만 실행됩니다 (`run`이 집계기를
//!   소유하고 매 사이클을 await).
//! - 버퍼는 사이클마다 통째로 비워집니다 (부분 드레인 없음).
//! - 같은 이전 캔들/신규 체결 쌍을 다시 처리해도 결과가 같습니다.
//! - 종료 신호는 다음 깨어남에 처리되며 사이클 중간에 끊지 않습니다.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use kline_core::{Candle, CandleSeries, Interval, TradeTick};

use crate::config::AggregatorConfig;
use crate::error::StreamResult;
use crate::sink::CandleSink;

/// 집계기 버퍼에 체결을 밀어 넣는 핸들.
///
/// 버퍼 자체는 집계기 인스턴스가 소유하며, 이 핸들은 잠금을 통한
/// 추가만 허용합니다.
#[derive(Clone)]
pub struct TradeFeed {
    buffer: Arc<Mutex<Vec<TradeTick>>>,
}

impl TradeFeed {
    /// 체결 틱을 버퍼에 추가합니다.
    pub async fn push_trades(&self, trades: impl IntoIterator<Item = TradeTick>) {
        let mut buffer = self.buffer.lock().await;
        buffer.extend(trades);
    }
}

/// 한 버킷의 캔들과 그 근거가 된 체결 목록.
///
/// 체결 목록을 함께 보관해야 늦게 도착한 체결로 캔들을 전체
/// 재계산(수정)할 수 있습니다.
#[derive(Debug, Clone)]
struct CandleHolder {
    candle: Candle,
    trades: Vec<TradeTick>,
}

impl CandleHolder {
    /// 한 버킷의 체결 목록을 캔들로 분류합니다.
    fn classify(time: DateTime<Utc>, mut trades: Vec<TradeTick>) -> Self {
        normalize_signs(&mut trades);
        trades.sort_by(sort_key);
        let candle = Candle::from_bucket(time, &trades);
        Self { candle, trades }
    }

    /// 늦게 도착한 체결을 반영해 캔들을 수정합니다.
    ///
    /// 체결 집합을 병합하고 완전히 동일한 틱을 제거한 뒤 전체를
    /// 재계산하므로, 같은 체결 묶음을 다시 적용해도 결과가 같습니다.
    fn amend(&mut self, mut new_trades: Vec<TradeTick>) {
        normalize_signs(&mut new_trades);
        self.trades.extend(new_trades);
        self.trades.sort_by(sort_key);
        self.trades.dedup();
        self.candle = Candle::from_bucket(self.candle.time, &self.trades);
    }
}

fn sort_key(a: &TradeTick, b: &TradeTick) -> std::cmp::Ordering {
    a.timestamp
        .cmp(&b.timestamp)
        .then(a.price.cmp(&b.price))
        .then(a.amount.cmp(&b.amount))
}

/// 음수 가격/수량을 정규화합니다. 일부 거래소는 매도를 음수로 보냅니다.
fn normalize_signs(trades: &mut [TradeTick]) {
    for trade in trades {
        if trade.normalize_sign() {
            debug!(timestamp = %trade.timestamp, "negative trade normalized");
        }
    }
}

/// 체결 틱을 버킷 시작 시각별로 묶어 홀더로 만듭니다.
fn group_by_bucket(interval: Interval, ticks: Vec<TradeTick>) -> Vec<CandleHolder> {
    let mut buckets: BTreeMap<DateTime<Utc>, Vec<TradeTick>> = BTreeMap::new();
    for tick in ticks {
        buckets
            .entry(interval.truncate(tick.timestamp))
            .or_default()
            .push(tick);
    }
    buckets
        .into_iter()
        .map(|(time, trades)| CandleHolder::classify(time, trades))
        .collect()
}

/// 주기적으로 체결 버퍼를 캔들로 집계하는 백그라운드 워커.
pub struct TradeAggregator<S: CandleSink> {
    config: AggregatorConfig,
    buffer: Arc<Mutex<Vec<TradeTick>>>,
    sink: S,
    /// 직전 사이클의 아직 열려 있을 수 있는 캔들 (이 태스크만 소유)
    previous: Vec<CandleHolder>,
}

impl<S: CandleSink> TradeAggregator<S> {
    /// 새 집계기를 생성합니다.
    pub fn new(config: AggregatorConfig, sink: S) -> Self {
        Self {
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
            sink,
            previous: Vec::new(),
        }
    }

    /// 버퍼에 체결을 밀어 넣을 핸들을 반환합니다.
    pub fn feed(&self) -> TradeFeed {
        TradeFeed {
            buffer: Arc::clone(&self.buffer),
        }
    }

    /// 집계 루프를 실행합니다.
    ///
    /// 취소 신호는 다음 깨어남에 처리됩니다. 집계기를 소유하고
    /// 사이클을 순차로 await하므로 동시에 두 사이클이 돌 수 없습니다.
    pub async fn run(mut self, shutdown: CancellationToken) {
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(self.config.flush_secs));
        info!(
            exchange = %self.config.exchange,
            symbol = %self.config.symbol,
            interval = %self.config.bucket_interval,
            "trade aggregator started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.flush_cycle().await {
                        error!("aggregation cycle failed: {}", e);
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("trade aggregator stopped");
                    break;
                }
            }
        }
    }

    /// 한 번의 집계 사이클을 수행합니다.
    ///
    /// 버퍼를 통째로 비우고, 버킷별 캔들을 만들고, 직전 사이클과
    /// 겹치는 버킷을 수정한 뒤 직전 사이클 캔들을 싱크에 저장합니다.
    async fn flush_cycle(&mut self) -> StreamResult<()> {
        let drained = {
            let mut buffer = self.buffer.lock().await;
            std::mem::take(&mut *buffer)
        };

        let mut cycle = group_by_bucket(self.config.bucket_interval, drained);

        for holder in &mut cycle {
            if let Some(previous) = self
                .previous
                .iter_mut()
                .find(|p| p.candle.time == holder.candle.time)
            {
                previous.amend(std::mem::take(&mut holder.trades));
                *holder = previous.clone();
            }
        }

        if self.previous.is_empty() {
            self.previous = cycle;
            return Ok(());
        }

        let mut series = CandleSeries::new(
            self.config.exchange.clone(),
            self.config.symbol.clone(),
            self.config.bucket_interval,
        );
        series.candles = self.previous.iter().map(|h| h.candle.clone()).collect();

        match self.sink.save_candles(&series).await {
            Ok(()) => {
                debug!(candles = series.candles.len(), "cycle candles saved");
                self.previous = cycle;
            }
            Err(e) => {
                // 저장에 실패한 캔들은 유지해 다음 사이클에 다시 저장
                for holder in cycle {
                    match self
                        .previous
                        .iter_mut()
                        .find(|p| p.candle.time == holder.candle.time)
                    {
                        Some(existing) => *existing = holder,
                        None => self.previous.push(holder),
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }
}
