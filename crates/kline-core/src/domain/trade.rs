//! 체결 틱 데이터.
//!
//! 이 모듈은 거래소 피드에서 수신한 개별 체결을 나타내는 타입을 정의합니다:
//! - `Side` - 체결 방향
//! - `TradeTick` - 캔들 집계의 입력이 되는 체결 틱

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Price, Quantity};

/// 체결 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// 캔들 집계의 입력이 되는 체결 틱.
///
/// 외부 피드가 생성하며 캔들 빌더가 소비합니다. 생성 후에는
/// 부호 정규화를 제외하고 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeTick {
    /// 체결 타임스탬프
    pub timestamp: DateTime<Utc>,
    /// 체결 가격
    pub price: Price,
    /// 체결 수량
    pub amount: Quantity,
    /// 체결 방향 (피드에 따라 없을 수 있음)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

impl TradeTick {
    /// 새 체결 틱을 생성합니다.
    pub fn new(timestamp: DateTime<Utc>, price: Price, amount: Quantity) -> Self {
        Self {
            timestamp,
            price,
            amount,
            side: None,
        }
    }

    /// 체결 방향을 설정합니다.
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// 타임스탬프가 설정되어 있는지 확인합니다.
    ///
    /// 유닉스 에포크 0초는 미설정으로 간주합니다.
    pub fn has_timestamp(&self) -> bool {
        self.timestamp.timestamp() != 0
    }

    /// 음수 가격/수량을 양수로 정규화합니다.
    ///
    /// 일부 거래소는 매도 체결을 음수로 보냅니다. 값이 하나라도
    /// 뒤집힌 경우 true를 반환합니다.
    pub fn normalize_sign(&mut self) -> bool {
        let mut flipped = false;
        if self.price.is_sign_negative() {
            self.price = -self.price;
            flipped = true;
        }
        if self.amount.is_sign_negative() {
            self.amount = -self.amount;
            flipped = true;
        }
        flipped
    }
}
