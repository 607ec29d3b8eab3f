use ethers::providers::Middleware;
use ethers::types::{Address, U256};
use std::time::Duration;

use crate::client::contracts::Erc20;
use crate::client::timed;
use crate::gateway::GatewayError;

/// Wallet-held (not yet deposited) balance of `token`, which must cover
/// `required` before a deposit is attempted.
pub async fn require_wallet_balance<M: Middleware + 'static>(
    token: &Erc20<M>,
    owner: Address,
    required: U256,
    rpc_timeout: Duration,
) -> Result<U256, GatewayError> {
    let balance = timed(rpc_timeout, "balanceOf", token.balance_of(owner).call()).await?;

    if balance < required {
        return Err(GatewayError::InsufficientFunds(format!(
            "token {:?}: wallet holds {}, deposit needs {}",
            token.address(),
            balance,
            required
        )));
    }

    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock_chain::{script, uint};
    use ethers::providers::{MockProvider, Provider};
    use std::sync::Arc;

    fn token(provider: Provider<MockProvider>) -> Erc20<Provider<MockProvider>> {
        Erc20::new(Address::repeat_byte(0x01), Arc::new(provider))
    }

    #[tokio::test]
    async fn covering_balance_is_returned() {
        let (provider, mock) = Provider::mocked();
        script(&mock, vec![uint(U256::from(50u64))]);

        let held = require_wallet_balance(
            &token(provider),
            Address::repeat_byte(0x11),
            U256::from(10u64),
            Duration::from_secs(2),
        )
        .await
        .unwrap();
        assert_eq!(held, U256::from(50u64));
    }

    #[tokio::test]
    async fn short_wallet_is_insufficient_funds() {
        let (provider, mock) = Provider::mocked();
        script(&mock, vec![uint(U256::from(5u64))]);

        let err = require_wallet_balance(
            &token(provider),
            Address::repeat_byte(0x11),
            U256::from(10u64),
            Duration::from_secs(2),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GatewayError::InsufficientFunds(_)), "{err:?}");
        assert!(!err.is_transient());
    }
}
