//! [`ChainGateway`] for the GTE exchange.
//!
//! Market metadata and book snapshots come from the exchange's REST API;
//! deposits, orders and order lookups go straight to the contracts.

use anyhow::{bail, Context};
use async_trait::async_trait;
use ethers::contract::parse_log;
use ethers::prelude::*;
use ethers::utils::to_checksum;
use log::info;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

use crate::config::NetworkConfig;
use crate::domain::{
    DepositReceipt, Market, Order, OrderBookSnapshot, OrderId, OrderStatus, Side, TimeInForce,
};
use crate::gateway::{ChainGateway, GatewayError};
use crate::wallet::allowance::ensure_allowance;
use crate::wallet::balance::require_wallet_balance;
use crate::wallet::WalletSigner;

pub mod contracts;
pub mod errors;
#[cfg(test)]
pub(crate) mod mock_chain;
pub mod rest;
pub mod tx;

use contracts::{order_status_from_u8, AccountManager, Clob, Erc20, LimitOrderSubmittedFilter};
use rest::{BookResponse, MarketResponse};
use tx::TxSender;

/// Signing client. Nonces are pinned per send by [`TxSender`].
pub type SignedProvider = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Awaits `fut` for at most `limit`; expiry is a `NetworkTimeout`.
pub async fn timed<T, E, F>(limit: Duration, what: &str, fut: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<GatewayError>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(GatewayError::NetworkTimeout(format!(
            "{} exceeded {}ms",
            what,
            limit.as_millis()
        ))),
    }
}

pub struct GteClient<M = SignedProvider> {
    http: Client,
    api_url: Url,
    provider: Arc<M>,
    account: Address,
    account_manager: Address,
    rpc_timeout: Duration,
    confirm_timeout: Duration,
    // broadcasts go out one at a time so nonces stay in submission order
    tx_lock: Mutex<()>,
}

impl GteClient<SignedProvider> {
    pub async fn connect(network: &NetworkConfig, signer: &WalletSigner) -> anyhow::Result<Self> {
        let provider = Provider::<Http>::try_from(network.rpc_url.as_str())
            .with_context(|| format!("invalid rpc_url {}", network.rpc_url))?
            .interval(Duration::from_millis(250));

        let chain_id = provider
            .get_chainid()
            .await
            .context("RPC endpoint unreachable")?
            .as_u64();
        if chain_id != network.chain_id {
            bail!(
                "RPC reports chain id {}, config expects {}",
                chain_id,
                network.chain_id
            );
        }

        let wallet = signer.wallet().clone().with_chain_id(chain_id);
        let account = wallet.address();

        info!("🔗 Connected to chain {} as {}", chain_id, to_checksum(&account, None));

        Self::new(Arc::new(SignerMiddleware::new(provider, wallet)), account, network)
    }
}

impl<M: Middleware + 'static> GteClient<M> {
    /// Gateway over an already connected middleware that signs for `account`.
    pub fn new(
        provider: Arc<M>,
        account: Address,
        network: &NetworkConfig,
    ) -> anyhow::Result<Self> {
        let mut api_url = network.api_url.clone();
        if !api_url.ends_with('/') {
            api_url.push('/');
        }

        let rpc_timeout = Duration::from_millis(network.rpc_timeout_ms);

        Ok(Self {
            http: Client::builder().timeout(rpc_timeout).build()?,
            api_url: Url::parse(&api_url).context("invalid api_url")?,
            provider,
            account,
            account_manager: network.account_manager,
            rpc_timeout,
            confirm_timeout: Duration::from_millis(network.confirm_timeout_ms),
            tx_lock: Mutex::new(()),
        })
    }

    // ==================================================
    // REST HELPERS
    // ==================================================

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.api_url
            .join(path)
            .map_err(|e| GatewayError::Transport(format!("bad endpoint {}: {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T, GatewayError> {
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        rest::decode_response(status, &body, what, &url)
    }

    // ==================================================
    // CONTRACT HELPERS
    // ==================================================

    fn sender(&self) -> TxSender<'_, M> {
        TxSender {
            client: self.provider.as_ref(),
            account: self.account,
            rpc_timeout: self.rpc_timeout,
            confirm_timeout: self.confirm_timeout,
            lock: &self.tx_lock,
        }
    }

    fn erc20(&self, token: Address) -> Erc20<M> {
        Erc20::new(token, self.provider.clone())
    }

    fn accounts(&self) -> AccountManager<M> {
        AccountManager::new(self.account_manager, self.provider.clone())
    }

    fn clob(&self, market: &Market) -> Clob<M> {
        Clob::new(market.address, self.provider.clone())
    }
}

#[async_trait]
impl<M: Middleware + 'static> ChainGateway for GteClient<M> {
    async fn get_market(&self, address: Address) -> Result<Market, GatewayError> {
        let url = self.endpoint(&format!("v1/markets/{}", to_checksum(&address, None)))?;
        let market: MarketResponse = self.get_json(url, "market").await?;
        Ok(market.into())
    }

    async fn get_order_book_snapshot(
        &self,
        market: &Market,
        depth: usize,
    ) -> Result<OrderBookSnapshot, GatewayError> {
        let mut url = self.endpoint(&format!(
            "v1/markets/{}/book",
            to_checksum(&market.address, None)
        ))?;
        url.query_pairs_mut().append_pair("limit", &depth.to_string());

        let book: BookResponse = self.get_json(url, "order book").await?;
        Ok(book.into_snapshot(depth))
    }

    async fn ensure_deposit(
        &self,
        token: Address,
        amount: U256,
        gas_ceiling: U256,
    ) -> Result<DepositReceipt, GatewayError> {
        let accounts = self.accounts();

        let custodied = timed(
            self.rpc_timeout,
            "getAccountBalance",
            accounts.get_account_balance(self.account, token).call(),
        )
        .await?;

        if custodied >= amount {
            return Ok(DepositReceipt {
                token,
                amount,
                deposited: U256::zero(),
                tx_hash: None,
            });
        }

        let shortfall = amount - custodied;
        let erc20 = self.erc20(token);
        let sender = self.sender();

        require_wallet_balance(&erc20, self.account, shortfall, self.rpc_timeout).await?;
        ensure_allowance(&erc20, self.account_manager, shortfall, gas_ceiling, &sender).await?;

        let call = accounts
            .deposit(self.account, token, shortfall)
            .gas(gas_ceiling);
        let receipt = sender.send(call, "deposit").await?;

        Ok(DepositReceipt {
            token,
            amount,
            deposited: shortfall,
            tx_hash: Some(receipt.transaction_hash),
        })
    }

    async fn place_limit_order(
        &self,
        market: &Market,
        side: Side,
        amount: U256,
        price: U256,
        time_in_force: TimeInForce,
        gas_ceiling: U256,
    ) -> Result<Order, GatewayError> {
        let clob = self.clob(market);
        let call = clob
            .post_limit_order(
                self.account,
                side.as_u8(),
                amount,
                price,
                time_in_force.as_u8(),
            )
            .gas(gas_ceiling);

        let receipt = self.sender().send(call, "postLimitOrder").await?;

        let submitted = receipt
            .logs
            .into_iter()
            .filter(|log| log.address == market.address)
            .find_map(|log| parse_log::<LimitOrderSubmittedFilter>(log).ok())
            .ok_or_else(|| {
                GatewayError::Decode(format!(
                    "no LimitOrderSubmitted event in tx {:?}",
                    receipt.transaction_hash
                ))
            })?;

        Ok(Order {
            order_id: submitted.order_id,
            market: market.address,
            side,
            price,
            amount,
            status: OrderStatus::Pending,
        })
    }

    async fn get_order(&self, market: &Market, order_id: OrderId) -> Result<Order, GatewayError> {
        let clob = self.clob(market);
        let (owner, side, price, amount, status) =
            timed(self.rpc_timeout, "getOrder", clob.get_order(order_id).call()).await?;

        if owner.is_zero() {
            return Err(GatewayError::NotFound(format!("order {}", order_id)));
        }

        Ok(Order {
            order_id,
            market: market.address,
            side: Side::from_u8(side)
                .ok_or_else(|| GatewayError::Decode(format!("unknown side {}", side)))?,
            price,
            amount,
            status: order_status_from_u8(status)
                .ok_or_else(|| GatewayError::Decode(format!("unknown order status {}", status)))?,
        })
    }
}
