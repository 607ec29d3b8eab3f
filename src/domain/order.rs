use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    /// Discriminant used by the CLOB contract.
    pub fn as_u8(&self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Good-till-cancelled.
    Gtc,
    PostOnly,
    /// Immediate-or-cancel.
    Ioc,
    /// Fill-or-kill.
    Fok,
}

impl TimeInForce {
    pub fn as_u8(&self) -> u8 {
        match self {
            TimeInForce::Gtc => 0,
            TimeInForce::PostOnly => 1,
            TimeInForce::Ioc => 2,
            TimeInForce::Fok => 3,
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::PostOnly => "POST_ONLY",
            TimeInForce::Ioc => "IOC",
            TimeInForce::Fok => "FOK",
        };
        f.write_str(s)
    }
}

impl FromStr for TimeInForce {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GTC" => Ok(TimeInForce::Gtc),
            "POST_ONLY" | "POSTONLY" => Ok(TimeInForce::PostOnly),
            "IOC" => Ok(TimeInForce::Ioc),
            "FOK" => Ok(TimeInForce::Fok),
            other => Err(format!("unknown time-in-force '{}'", other)),
        }
    }
}

/// What the caller wants to trade. Quantities are human decimals; the
/// execution core converts them exactly once before anything reaches the
/// gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingIntent {
    pub side: Side,
    pub base_quantity: Decimal,
    pub target_price: Decimal,
    pub time_in_force: TimeInForce,
}

impl TradingIntent {
    pub fn new(
        side: Side,
        base_quantity: Decimal,
        target_price: Decimal,
        time_in_force: TimeInForce,
    ) -> Self {
        Self {
            side,
            base_quantity,
            target_price,
            time_in_force,
        }
    }
}
