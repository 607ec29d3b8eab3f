use anyhow::{bail, Result};
use ethers::prelude::*;

#[derive(Debug, Clone)]
pub struct WalletSigner {
    wallet: LocalWallet,
}

impl WalletSigner {
    pub fn new(private_key: &str, chain_id: u64) -> Result<Self> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        let wallet: LocalWallet = key.parse()?;
        Ok(Self {
            wallet: wallet.with_chain_id(chain_id),
        })
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn wallet(&self) -> &LocalWallet {
        &self.wallet
    }

    /// The configured account must be the one the key signs for.
    pub fn verify_address(&self, expected: Address) -> Result<()> {
        if self.address() != expected {
            bail!(
                "WALLET_ADDRESS {:?} does not match the private key's address {:?}",
                expected,
                self.address()
            );
        }
        Ok(())
    }
}
