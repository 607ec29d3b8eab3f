pub mod allowance;
pub mod balance;
pub mod signer;

pub use signer::WalletSigner;
