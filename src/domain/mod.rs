use chrono::{DateTime, Utc};
use ethers::types::{Address, H256, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod order;
pub mod time;

pub use order::{Side, TimeInForce, TradingIntent};

// ==================================================
// MARKET + ASSETS
// ==================================================

/// One side of a trading pair. `decimals` is the fixed-point scale used to
/// turn quantities into on-chain amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub address: Address,
    pub decimals: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    pub address: Address,
    pub base: Asset,
    pub quote: Asset,
}

impl Market {
    pub fn pair(&self) -> String {
        format!("{}/{}", self.base.symbol, self.quote.symbol)
    }

    pub fn asset(&self, leg: AssetLeg) -> &Asset {
        match leg {
            AssetLeg::Base => &self.base,
            AssetLeg::Quote => &self.quote,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetLeg {
    Base,
    Quote,
}

impl fmt::Display for AssetLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetLeg::Base => write!(f, "base"),
            AssetLeg::Quote => write!(f, "quote"),
        }
    }
}

// ==================================================
// ORDER BOOK
// ==================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub size: Decimal,
}

/// Depth-bounded view of the book. Bids best-first (descending), asks
/// best-first (ascending). Never mutated; fetch a new one for fresh data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
    pub fetched_at: DateTime<Utc>,
}

impl OrderBookSnapshot {
    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.bids.first().copied()
    }

    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.asks.first().copied()
    }
}

// ==================================================
// ORDERS
// ==================================================

pub type OrderId = U256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Open,
    Filled,
    Cancelled,
    Rejected,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Open => "OPEN",
            OrderStatus::Filled => "FILLED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// An order as reported by the gateway. `price` and `amount` are on-chain
/// integers (quote-scaled and base-scaled respectively). The status is only
/// ever what the chain last told us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub market: Address,
    pub side: Side,
    pub price: U256,
    pub amount: U256,
    pub status: OrderStatus,
}

// ==================================================
// DEPOSITS
// ==================================================

/// Collateral needed for one attempt, already converted and padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositRequirement {
    pub base_amount: U256,
    pub quote_amount: U256,
}

impl DepositRequirement {
    pub fn amount(&self, leg: AssetLeg) -> U256 {
        match leg {
            AssetLeg::Base => self.base_amount,
            AssetLeg::Quote => self.quote_amount,
        }
    }
}

/// Result of one `ensure_deposit` call.
///
/// `amount` is the custodied balance the call guarantees; `deposited` is what
/// its transaction actually moved, the shortfall. When the balance already
/// covered `amount`, `deposited` is zero and `tx_hash` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositReceipt {
    pub token: Address,
    pub amount: U256,
    pub deposited: U256,
    pub tx_hash: Option<H256>,
}
