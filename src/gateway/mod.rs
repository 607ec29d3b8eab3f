//! The boundary between the execution core and the chain.
//!
//! Everything behind [`ChainGateway`] is slow and may fail: RPC calls,
//! transaction broadcast, the exchange's REST API. Implementations must be
//! safe to share between concurrently running pipelines and must serialise
//! transaction submission per account so nonces never collide.

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use thiserror::Error;

use crate::domain::{
    DepositReceipt, Market, Order, OrderBookSnapshot, OrderId, Side, TimeInForce,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("gas too low: {0}")]
    GasTooLow(String),

    #[error("network timeout: {0}")]
    NetworkTimeout(String),

    /// Broadcast, but no receipt arrived in time. The transaction may still
    /// be mined.
    #[error("tx {tx_hash:?} unconfirmed: {reason}")]
    Unconfirmed { tx_hash: H256, reason: String },

    #[error("rejected: {reason}")]
    Rejected { reason: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Network-level failures that may succeed on a later attempt. Anything
    /// the contract or the node deliberately refused is not transient.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::NetworkTimeout(_)
                | GatewayError::Unconfirmed { .. }
                | GatewayError::Transport(_)
        )
    }

    /// Hash of a transaction that reached the node before the failure.
    pub fn broadcast_tx(&self) -> Option<H256> {
        match self {
            GatewayError::Unconfirmed { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainGateway: Send + Sync {
    async fn get_market(&self, address: Address) -> Result<Market, GatewayError>;

    async fn get_order_book_snapshot(
        &self,
        market: &Market,
        depth: usize,
    ) -> Result<OrderBookSnapshot, GatewayError>;

    /// Make sure at least `amount` of `token` is custodied by the exchange
    /// for this account. Sends nothing when the balance already suffices.
    async fn ensure_deposit(
        &self,
        token: Address,
        amount: U256,
        gas_ceiling: U256,
    ) -> Result<DepositReceipt, GatewayError>;

    async fn place_limit_order(
        &self,
        market: &Market,
        side: Side,
        amount: U256,
        price: U256,
        time_in_force: TimeInForce,
        gas_ceiling: U256,
    ) -> Result<Order, GatewayError>;

    async fn get_order(&self, market: &Market, order_id: OrderId) -> Result<Order, GatewayError>;
}
