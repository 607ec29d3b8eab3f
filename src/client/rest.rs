use chrono::{TimeZone, Utc};
use ethers::types::Address;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::domain::{Asset, Market, OrderBookSnapshot, PriceLevel};
use crate::gateway::GatewayError;

/// Maps an API response onto the gateway taxonomy: 404 is `NotFound`,
/// any other non-2xx is `Transport`, an unreadable body is `Decode`.
pub fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    what: &str,
    url: &Url,
) -> Result<T, GatewayError> {
    if status == StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound(format!("{} ({})", what, url)));
    }
    if !status.is_success() {
        return Err(GatewayError::Transport(format!(
            "{} failed: HTTP {} {}",
            what, status, body
        )));
    }

    serde_json::from_str(body).map_err(|e| GatewayError::Decode(format!("{}: {}", what, e)))
}

// ==================================================
// MARKET METADATA
// ==================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketResponse {
    pub address: Address,
    pub base_token: TokenResponse,
    pub quote_token: TokenResponse,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub address: Address,
    pub symbol: String,
    pub decimals: u32,
}

impl From<TokenResponse> for Asset {
    fn from(t: TokenResponse) -> Self {
        Asset {
            symbol: t.symbol,
            address: t.address,
            decimals: t.decimals,
        }
    }
}

impl From<MarketResponse> for Market {
    fn from(m: MarketResponse) -> Self {
        Market {
            address: m.address,
            base: m.base_token.into(),
            quote: m.quote_token.into(),
        }
    }
}

// ==================================================
// ORDER BOOK
// ==================================================

/// Levels come either as objects or as `[price, size]` pairs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LevelResponse {
    Object { price: Decimal, size: Decimal },
    Pair(Decimal, Decimal),
}

impl LevelResponse {
    fn into_level(self) -> PriceLevel {
        match self {
            LevelResponse::Object { price, size } | LevelResponse::Pair(price, size) => {
                PriceLevel { price, size }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BookResponse {
    #[serde(default)]
    pub bids: Vec<LevelResponse>,
    #[serde(default)]
    pub asks: Vec<LevelResponse>,
    /// Milliseconds since epoch.
    pub timestamp: Option<i64>,
}

impl BookResponse {
    /// Best-first on both sides, empty levels dropped, cut to `depth`.
    pub fn into_snapshot(self, depth: usize) -> OrderBookSnapshot {
        let mut bids = levels(self.bids);
        let mut asks = levels(self.asks);

        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        bids.truncate(depth);
        asks.truncate(depth);

        OrderBookSnapshot {
            bids,
            asks,
            fetched_at: self
                .timestamp
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
                .unwrap_or_else(Utc::now),
        }
    }
}

fn levels(raw: Vec<LevelResponse>) -> Vec<PriceLevel> {
    raw.into_iter()
        .map(LevelResponse::into_level)
        .filter(|l| l.size > Decimal::ZERO && l.price > Decimal::ZERO)
        .collect()
}
