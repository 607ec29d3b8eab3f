use ethers::providers::Middleware;
use ethers::types::{Address, H256, U256};
use log::{info, warn};

use crate::client::contracts::Erc20;
use crate::client::timed;
use crate::client::tx::TxSender;
use crate::gateway::GatewayError;

/// Approves `spender` for an unlimited amount when the sender's allowance
/// is below `required`. Returns the approval tx hash, or `None` when the
/// allowance was already enough.
pub async fn ensure_allowance<M: Middleware + 'static>(
    token: &Erc20<M>,
    spender: Address,
    required: U256,
    gas_ceiling: U256,
    sender: &TxSender<'_, M>,
) -> Result<Option<H256>, GatewayError> {
    let allowance = timed(
        sender.rpc_timeout,
        "allowance",
        token.allowance(sender.account, spender).call(),
    )
    .await?;

    if allowance >= required {
        info!("✅ Allowance OK for {:?}", token.address());
        return Ok(None);
    }

    warn!(
        "⚠️  Approving {:?} to spend {:?}...",
        spender,
        token.address()
    );

    let call = token.approve(spender, U256::MAX).gas(gas_ceiling);
    let receipt = sender.send(call, "approve").await?;

    info!("✅ Approved. Tx: {:?}", receipt.transaction_hash);
    Ok(Some(receipt.transaction_hash))
}
