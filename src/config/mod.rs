use anyhow::{anyhow, bail, Context};
use clap::Parser;
use ethers::types::{Address, U256};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::domain::TimeInForce;

pub mod trading;

pub use trading::TradingConfig;

/* =======================
CLI ARGS
======================= */

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Print the deposit plan and order amounts without sending transactions
    #[arg(long)]
    pub dry_run: bool,
}

/* =======================
MAIN CONFIG
======================= */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub market: MarketConfig,
    #[serde(default)]
    pub trading: TradingConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
}

/* =======================
NETWORK CONFIG
======================= */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub api_url: String,
    pub chain_id: u64,
    /// Exchange contract that custodies deposited balances.
    pub account_manager: Address,
    #[serde(default = "default_rpc_timeout_ms")]
    pub rpc_timeout_ms: u64,
    /// How long to wait for a sent transaction to be mined.
    #[serde(default = "default_confirm_timeout_ms")]
    pub confirm_timeout_ms: u64,
}

fn default_rpc_timeout_ms() -> u64 {
    15_000
}

fn default_confirm_timeout_ms() -> u64 {
    60_000
}

/* =======================
MARKET CONFIG
======================= */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    pub address: Address,
    #[serde(default = "default_book_depth")]
    pub book_depth: usize,
}

fn default_book_depth() -> usize {
    10
}

/* =======================
EXECUTION CONFIG
======================= */

/// Knobs of the execution core. Everything the core needs is passed in
/// here; it reads no environment of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Gas limit attached to every deposit, approval and order transaction.
    pub gas_ceiling: u64,
    /// Base collateral is deposited at `quantity * multiplier` so a run of
    /// orders does not need a deposit each.
    pub base_deposit_multiplier: Decimal,
    pub max_submit_attempts: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
    pub allowed_time_in_force: Vec<TimeInForce>,
}

impl ExecutionConfig {
    pub fn gas_ceiling(&self) -> U256 {
        U256::from(self.gas_ceiling)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            gas_ceiling: 50_000_000,
            base_deposit_multiplier: dec!(2),
            max_submit_attempts: 3,
            backoff_base_ms: 500,
            backoff_max_ms: 5_000,
            allowed_time_in_force: vec![TimeInForce::Gtc, TimeInForce::PostOnly],
        }
    }
}

/* =======================
DEFAULT CONFIG
======================= */

const DEFAULT_MARKET: &str = "0x0F3642714B9516e3d17a936bAced4de47A6FFa5F";

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig {
                rpc_url: "https://carrot.megaeth.com/rpc".to_string(),
                api_url: "https://api-testnet.gte.xyz".to_string(),
                chain_id: 6342,
                account_manager: Address::zero(),
                rpc_timeout_ms: default_rpc_timeout_ms(),
                confirm_timeout_ms: default_confirm_timeout_ms(),
            },
            market: MarketConfig {
                address: Address::from_str(DEFAULT_MARKET).unwrap_or_default(),
                book_depth: default_book_depth(),
            },
            trading: TradingConfig::default(),
            execution: ExecutionConfig::default(),
        }
    }
}

/* =======================
LOAD / CREATE CONFIG
======================= */

impl Config {
    pub fn load(path: &PathBuf) -> anyhow::Result<Self> {
        let mut cfg = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            let cfg = Config::default();
            let content = serde_json::to_string_pretty(&cfg)?;
            std::fs::write(path, content)?;
            cfg
        };

        if let Ok(rpc_url) = env::var("RPC_URL") {
            cfg.network.rpc_url = rpc_url;
        }

        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        Url::parse(&self.network.rpc_url).context("network.rpc_url")?;
        Url::parse(&self.network.api_url).context("network.api_url")?;

        if self.network.account_manager.is_zero() {
            bail!("network.account_manager must be set");
        }
        if self.market.address.is_zero() {
            bail!("market.address must be set");
        }
        if self.market.book_depth == 0 {
            bail!("market.book_depth must be at least 1");
        }
        if self.trading.base_quantity <= Decimal::ZERO {
            bail!("trading.base_quantity must be positive");
        }
        if self.trading.price_offset < Decimal::ZERO {
            bail!("trading.price_offset must not be negative");
        }
        if self.execution.base_deposit_multiplier < Decimal::ONE {
            bail!("execution.base_deposit_multiplier must be at least 1");
        }
        if self.execution.max_submit_attempts == 0 {
            bail!("execution.max_submit_attempts must be at least 1");
        }
        if self.execution.gas_ceiling == 0 {
            bail!("execution.gas_ceiling must be positive");
        }
        if !self
            .execution
            .allowed_time_in_force
            .contains(&self.trading.time_in_force)
        {
            bail!(
                "trading.time_in_force {} is not in execution.allowed_time_in_force",
                self.trading.time_in_force
            );
        }

        Ok(())
    }
}

/* =======================
CREDENTIALS (.env)
======================= */

/// Wallet credentials. Never written to the config file.
pub struct Credentials {
    pub address: Address,
    pub private_key: String,
}

impl Credentials {
    pub fn from_env() -> anyhow::Result<Self> {
        let address = env::var("WALLET_ADDRESS")
            .map_err(|_| anyhow!("WALLET_ADDRESS missing in environment / .env"))?;
        let private_key = env::var("WALLET_PRIVATE_KEY")
            .map_err(|_| anyhow!("WALLET_PRIVATE_KEY missing in environment / .env"))?;

        if private_key.trim().is_empty() {
            bail!("WALLET_PRIVATE_KEY is empty");
        }

        Ok(Self {
            address: Address::from_str(address.trim())
                .with_context(|| format!("WALLET_ADDRESS '{}' is not an address", address))?,
            private_key,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
