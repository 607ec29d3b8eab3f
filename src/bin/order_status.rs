use anyhow::{anyhow, Context, Result};
use clap::Parser;
use ethers::types::{Address, U256};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use gte_market_maker::client::GteClient;
use gte_market_maker::config::{Config, Credentials};
use gte_market_maker::execution::Trader;
use gte_market_maker::gateway::ChainGateway;
use gte_market_maker::report::render_order;
use gte_market_maker::wallet::WalletSigner;

/// Look up an order placed by an earlier run.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Order id, decimal or 0x-prefixed hex
    order_id: String,

    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Market address, if not the configured one
    #[arg(short, long)]
    market: Option<Address>,
}

fn parse_order_id(raw: &str) -> Result<U256> {
    let raw = raw.trim();
    match raw.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| anyhow!("bad hex order id: {}", e)),
        None => U256::from_dec_str(raw).map_err(|e| anyhow!("bad order id: {}", e)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    let args = Args::parse();
    let order_id = parse_order_id(&args.order_id)?;

    let config = Config::load(&args.config)?;
    let credentials = Credentials::from_env()?;
    let signer = WalletSigner::new(&credentials.private_key, config.network.chain_id)?;

    let gateway = Arc::new(GteClient::connect(&config.network, &signer).await?);

    let address = args.market.unwrap_or(config.market.address);
    let market = gateway
        .get_market(address)
        .await
        .with_context(|| format!("loading market {:?}", address))?;

    info!("🔍 Looking up order {} on {}", order_id, market.pair());

    let trader = Trader::new(gateway, config.execution.clone(), config.market.book_depth);
    let order = trader
        .refresh_status(&market, order_id)
        .await
        .with_context(|| format!("order {}", order_id))?;

    println!("{}", render_order(&market, &order));

    Ok(())
}
