use ethers::abi::Detokenize;
use ethers::contract::ContractCall;
use ethers::providers::Middleware;
use ethers::types::{Address, BlockNumber, TransactionReceipt, U256};
use log::{info, warn};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::client::errors::{classify_rpc_message, confirmed};
use crate::client::timed;
use crate::gateway::GatewayError;

/// Sends contract calls for one account, one broadcast at a time.
pub struct TxSender<'a, M> {
    pub client: &'a M,
    pub account: Address,
    pub rpc_timeout: Duration,
    pub confirm_timeout: Duration,
    pub lock: &'a Mutex<()>,
}

impl<M: Middleware + 'static> TxSender<'_, M> {
    /// Next nonce as the node sees it, pending transactions included.
    async fn pending_nonce(&self) -> Result<U256, GatewayError> {
        timed(self.rpc_timeout, "pending nonce", async {
            self.client
                .get_transaction_count(self.account, Some(BlockNumber::Pending.into()))
                .await
                .map_err(|e| classify_rpc_message(&e.to_string()))
        })
        .await
    }

    /// Broadcasts `call` and waits for a successful receipt.
    ///
    /// The nonce is read from the node and the transaction handed over under
    /// one lock. A broadcast that times out leaves no gap behind: if the node
    /// never got it, the next send reuses its nonce.
    ///
    /// Once the node has the transaction, a missing receipt is reported as
    /// [`GatewayError::Unconfirmed`] with the hash, since it may still land.
    pub async fn send<D: Detokenize>(
        &self,
        call: ContractCall<M, D>,
        what: &str,
    ) -> Result<TransactionReceipt, GatewayError> {
        let guard = self.lock.lock().await;
        let nonce = self.pending_nonce().await?;
        let call = call.nonce(nonce);
        let pending = timed(self.rpc_timeout, what, call.send()).await?;
        drop(guard);

        let tx_hash = pending.tx_hash();
        info!("📤 {} sent: {:?} (nonce {})", what, tx_hash, nonce);

        let waiting = format!("{} confirmation", what);
        let receipt = timed(self.confirm_timeout, &waiting, pending)
            .await
            .and_then(|receipt| confirmed(receipt, what));
        match receipt {
            Err(e) if e.is_transient() => {
                warn!("⚠️  {} tx {:?} unconfirmed: {}", what, tx_hash, e);
                Err(GatewayError::Unconfirmed {
                    tx_hash,
                    reason: e.to_string(),
                })
            }
            other => other,
        }
    }
}
