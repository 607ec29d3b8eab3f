use gte_market_maker::*;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{Args, Config, Credentials};
use log::{info, warn};
use std::sync::Arc;

use client::GteClient;
use domain::time::age;
use domain::TradingIntent;
use execution::orderbook::target_price;
use execution::Trader;
use gateway::ChainGateway;
use wallet::WalletSigner;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    info!("🚀 Starting GTE market maker");

    let args = Args::parse();
    let config = Config::load(&args.config)?;
    config.validate().context("invalid configuration")?;

    // ===============================
    // WALLET SIGNER - READ FROM .ENV
    // ===============================
    let credentials = Credentials::from_env()?;
    let signer = WalletSigner::new(&credentials.private_key, config.network.chain_id)
        .context("WALLET_PRIVATE_KEY is not a valid key")?;
    signer.verify_address(credentials.address)?;

    info!("🔑 Signer loaded: {:?}", signer.address());

    // ===============================
    // GATEWAY
    // ===============================
    let gateway = Arc::new(GteClient::connect(&config.network, &signer).await?);

    let market = gateway
        .get_market(config.market.address)
        .await
        .with_context(|| format!("loading market {:?}", config.market.address))?;

    info!(
        "📊 Market {} ({:?}): base {} decimals, quote {} decimals",
        market.pair(),
        market.address,
        market.base.decimals,
        market.quote.decimals
    );

    // ===============================
    // ORDER BOOK
    // ===============================
    let snapshot = gateway
        .get_order_book_snapshot(&market, config.market.book_depth)
        .await
        .context("fetching order book")?;

    match (snapshot.best_bid(), snapshot.best_ask()) {
        (Some(bid), Some(ask)) => info!(
            "📖 Book {} old: bid {} x {} | ask {} x {}",
            age(snapshot.fetched_at),
            bid.price,
            bid.size,
            ask.price,
            ask.size
        ),
        (bid, ask) => warn!(
            "⚠️  One-sided book ({} old): bid {:?} | ask {:?}",
            age(snapshot.fetched_at),
            bid.map(|l| l.price),
            ask.map(|l| l.price)
        ),
    }

    let side = config.trading.side;
    let price = match target_price(&snapshot, side, config.trading.price_offset) {
        Some(price) => price,
        None => bail!(
            "cannot price a {} order {} away from the book",
            side,
            config.trading.price_offset
        ),
    };

    let intent = TradingIntent::new(
        side,
        config.trading.base_quantity,
        price,
        config.trading.time_in_force,
    );

    info!(
        "🎯 Intent: {} {} {} @ {} {} ({})",
        intent.side,
        intent.base_quantity,
        market.base.symbol,
        intent.target_price,
        market.quote.symbol,
        intent.time_in_force
    );

    let trader = Trader::new(
        gateway.clone(),
        config.execution.clone(),
        config.market.book_depth,
    );

    // ===============================
    // DRY RUN
    // ===============================
    if args.dry_run {
        let plan = trader.plan(&market, &intent, &snapshot)?;
        println!("{}", report::render_plan(&market, &plan));
        info!("🧪 Dry run, nothing sent");
        return Ok(());
    }

    // ===============================
    // EXECUTE
    // ===============================
    match trader.execute_with_snapshot(&market, &intent, &snapshot).await {
        Ok(outcome) => {
            println!("{}", report::render_report(&market, &outcome));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", report::render_failure(&e));
            Err(e.into())
        }
    }
}
