//! 집계된 캔들을 내보내는 저장소 seam.
//!
//! 집계기는 저장/차트/전략 계층을 알지 못하고 `CandleSink`
//! 트레이트를 통해서만 캔들을 내보냅니다.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use kline_core::CandleSeries;

use crate::error::StreamResult;

/// 집계 사이클이 완성한 캔들을 받는 소비자.
#[async_trait]
pub trait CandleSink: Send + Sync {
    /// 한 사이클 분량의 캔들 시리즈를 저장합니다.
    async fn save_candles(&self, series: &CandleSeries) -> StreamResult<()>;
}

/// 테스트와 시뮬레이션용 인메모리 싱크.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    saved: Arc<Mutex<Vec<CandleSeries>>>,
}

impl MemorySink {
    /// 새 인메모리 싱크를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 저장된 시리즈 목록을 반환합니다.
    pub async fn saved(&self) -> Vec<CandleSeries> {
        self.saved.lock().await.clone()
    }
}

#[async_trait]
impl CandleSink for MemorySink {
    async fn save_candles(&self, series: &CandleSeries) -> StreamResult<()> {
        self.saved.lock().await.push(series.clone());
        Ok(())
    }
}
