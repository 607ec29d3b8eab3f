use ethers::types::{Address, H256};
use thiserror::Error;

use crate::domain::{AssetLeg, DepositReceipt};
use crate::gateway::GatewayError;

/// Terminal failures of one execution. A placed order never ends up here:
/// once the gateway has returned an order handle the execution is reported
/// as an outcome, even if its status could not be read back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Local validation failed. Never retried.
    #[error("invalid intent: {0}")]
    InvalidIntent(String),

    #[error("market data unavailable: {0}")]
    MarketData(GatewayError),

    /// `completed` holds the legs that did go through, so a caller can
    /// retry just the missing one.
    #[error("{leg} deposit ({asset:?}) failed: {cause}")]
    DepositFailed {
        leg: AssetLeg,
        asset: Address,
        cause: GatewayError,
        completed: Vec<DepositReceipt>,
    },

    /// `broadcast` lists order txs from earlier attempts that reached the
    /// node unconfirmed; any of them may still have placed an order.
    #[error("order rejected: {reason}")]
    SubmissionRejected { reason: String, broadcast: Vec<H256> },

    #[error("order submission timed out after {attempts} attempt(s): {last_error}")]
    SubmissionTimeout {
        attempts: u32,
        last_error: GatewayError,
        broadcast: Vec<H256>,
    },
}

impl ExecutionError {
    /// True when some deposit transaction landed before the failure.
    pub fn is_partial_deposit(&self) -> bool {
        matches!(self, ExecutionError::DepositFailed { completed, .. } if !completed.is_empty())
    }
}
