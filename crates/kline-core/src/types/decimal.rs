//! 정밀한 금융 계산을 위한 Decimal 타입 별칭.

use rust_decimal::Decimal;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 체결/거래량 수량을 위한 타입.
pub type Quantity = Decimal;
