use ethers::contract::ContractError;
use ethers::providers::{Middleware, ProviderError};
use ethers::types::{TransactionReceipt, U64};

use crate::gateway::GatewayError;

// ==================================================
// RPC ERROR CLASSIFICATION
// ==================================================

/// Sort a node/RPC error message into the gateway taxonomy. Nodes do not
/// agree on error codes, so this goes by the well-known message fragments.
pub fn classify_rpc_message(message: &str) -> GatewayError {
    let lower = message.to_lowercase();

    if lower.contains("insufficient funds") || lower.contains("exceeds balance") {
        GatewayError::InsufficientFunds(message.to_string())
    } else if lower.contains("underpriced")
        || lower.contains("intrinsic gas too low")
        || lower.contains("gas too low")
        || lower.contains("max fee per gas less than")
        || lower.contains("out of gas")
    {
        GatewayError::GasTooLow(message.to_string())
    } else if lower.contains("execution reverted") || lower.contains("revert") {
        GatewayError::Rejected {
            reason: message.to_string(),
        }
    } else if lower.contains("timed out") || lower.contains("timeout") {
        GatewayError::NetworkTimeout(message.to_string())
    } else {
        GatewayError::Transport(message.to_string())
    }
}

impl<M: Middleware> From<ContractError<M>> for GatewayError {
    fn from(err: ContractError<M>) -> Self {
        if let Some(reason) = err.decode_revert::<String>() {
            return GatewayError::Rejected { reason };
        }
        if err.is_revert() {
            return GatewayError::Rejected {
                reason: "execution reverted".to_string(),
            };
        }
        classify_rpc_message(&err.to_string())
    }
}

impl From<ProviderError> for GatewayError {
    fn from(err: ProviderError) -> Self {
        classify_rpc_message(&err.to_string())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::NetworkTimeout(err.to_string())
        } else if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

/// A mined, successful receipt or the reason there isn't one.
pub fn confirmed(
    receipt: Option<TransactionReceipt>,
    what: &str,
) -> Result<TransactionReceipt, GatewayError> {
    let receipt = receipt
        .ok_or_else(|| GatewayError::Transport(format!("{} dropped from mempool", what)))?;

    if receipt.status != Some(U64::from(1)) {
        return Err(GatewayError::Rejected {
            reason: format!("{} reverted in tx {:?}", what, receipt.transaction_hash),
        });
    }

    Ok(receipt)
}
