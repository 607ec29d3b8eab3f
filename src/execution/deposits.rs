//! Deposit assurance: make sure the exchange custodies enough of both assets
//! before an order goes out.
//!
//! Deposits and order placement are not atomic. A deposit that landed stays
//! landed even if the order is never sent (cancellation, rejection, crash);
//! the next cycle's `ensure_deposit` then finds the balance already there.

use ethers::types::U256;
use log::info;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::{AssetLeg, DepositReceipt, DepositRequirement, Market};
use crate::execution::errors::ExecutionError;
use crate::gateway::ChainGateway;
use crate::logging::log_partial_deposit;
use crate::units;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositReport {
    pub base: DepositReceipt,
    pub quote: DepositReceipt,
}

impl DepositReport {
    /// Number of legs that actually needed a transaction.
    pub fn transactions(&self) -> usize {
        [&self.base, &self.quote]
            .iter()
            .filter(|r| r.tx_hash.is_some())
            .count()
    }
}

pub struct DepositAssurance<G: ?Sized> {
    gateway: Arc<G>,
    base_multiplier: Decimal,
    gas_ceiling: U256,
}

impl<G: ChainGateway + ?Sized> DepositAssurance<G> {
    pub fn new(gateway: Arc<G>, base_multiplier: Decimal, gas_ceiling: U256) -> Self {
        Self {
            gateway,
            base_multiplier,
            gas_ceiling,
        }
    }

    /// Converted collateral for `base_quantity` at `reference_price`. Base is
    /// padded by the multiplier, quote is not. Both round up to the asset's
    /// precision.
    pub fn requirement(
        &self,
        market: &Market,
        base_quantity: Decimal,
        reference_price: Decimal,
    ) -> Result<DepositRequirement, ExecutionError> {
        if reference_price <= Decimal::ZERO {
            return Err(ExecutionError::InvalidIntent(format!(
                "reference price {} is not positive; refusing to size a zero-cost deposit",
                reference_price
            )));
        }
        if base_quantity <= Decimal::ZERO {
            return Err(ExecutionError::InvalidIntent(format!(
                "base quantity {} is not positive",
                base_quantity
            )));
        }

        let padded_base = base_quantity
            .checked_mul(self.base_multiplier)
            .ok_or_else(|| ExecutionError::InvalidIntent("padded base quantity overflows".into()))?;
        let notional = reference_price
            .checked_mul(base_quantity)
            .ok_or_else(|| ExecutionError::InvalidIntent("quote notional overflows".into()))?;

        let invalid = |e: units::PrecisionError| ExecutionError::InvalidIntent(e.to_string());

        Ok(DepositRequirement {
            base_amount: units::to_amount_rounded_up(&market.base, padded_base).map_err(invalid)?,
            quote_amount: units::to_amount_rounded_up(&market.quote, notional).map_err(invalid)?,
        })
    }

    /// Base leg first, then quote. Stops at the first failure; a quote
    /// failure after a good base deposit is reported with the base receipt.
    pub async fn ensure(
        &self,
        market: &Market,
        requirement: &DepositRequirement,
    ) -> Result<DepositReport, ExecutionError> {
        let base = self
            .ensure_leg(market, AssetLeg::Base, requirement.amount(AssetLeg::Base), &[])
            .await?;
        let quote = self
            .ensure_leg(
                market,
                AssetLeg::Quote,
                requirement.amount(AssetLeg::Quote),
                std::slice::from_ref(&base),
            )
            .await?;

        Ok(DepositReport { base, quote })
    }

    /// One leg on its own, e.g. to retry only the leg that failed.
    pub async fn ensure_leg(
        &self,
        market: &Market,
        leg: AssetLeg,
        amount: U256,
        completed: &[DepositReceipt],
    ) -> Result<DepositReceipt, ExecutionError> {
        let asset = market.asset(leg);

        match self
            .gateway
            .ensure_deposit(asset.address, amount, self.gas_ceiling)
            .await
        {
            Ok(receipt) => {
                match receipt.tx_hash {
                    Some(tx) => info!(
                        "🏦 {} deposit {} {} (sent {}) → tx {:?}",
                        leg, amount, asset.symbol, receipt.deposited, tx
                    ),
                    None => info!(
                        "🏦 {} deposit {} {} already covered",
                        leg, amount, asset.symbol
                    ),
                }
                Ok(receipt)
            }
            Err(cause) => {
                if !completed.is_empty() {
                    log_partial_deposit(leg, &cause);
                }
                Err(ExecutionError::DepositFailed {
                    leg,
                    asset: asset.address,
                    cause,
                    completed: completed.to_vec(),
                })
            }
        }
    }
}
