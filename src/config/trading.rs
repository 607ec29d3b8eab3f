use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::{Side, TimeInForce};

/// What one cycle quotes: side and size, and how far from the touch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    pub side: Side,
    pub base_quantity: Decimal,
    /// Added to the best bid for sells, subtracted from the best ask for buys.
    pub price_offset: Decimal,
    pub time_in_force: TimeInForce,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            side: Side::Sell,
            base_quantity: dec!(0.1),
            price_offset: dec!(10),
            time_in_force: TimeInForce::Gtc,
        }
    }
}
