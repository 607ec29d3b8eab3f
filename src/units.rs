//! Quantity ↔ amount conversion.
//!
//! A *quantity* is the human decimal (`0.1` ETH), an *amount* is the integer
//! the contracts see (`100000000000000000` wei). Conversion is exact: a
//! quantity carrying more fractional digits than the asset supports is an
//! error, never silently truncated.

use ethers::types::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::domain::Asset;

/// `rust_decimal` cannot represent more than 28 fractional digits.
const MAX_DECIMALS: u32 = 28;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrecisionError {
    #[error("{symbol}: {value} has more than {decimals} fractional digits")]
    TooPrecise {
        symbol: String,
        value: Decimal,
        decimals: u32,
    },

    #[error("{symbol}: negative quantity {value}")]
    Negative { symbol: String, value: Decimal },

    #[error("{symbol}: amount {amount} does not fit a decimal quantity")]
    Overflow { symbol: String, amount: U256 },

    #[error("{symbol}: {decimals} decimals is not supported")]
    UnsupportedDecimals { symbol: String, decimals: u32 },
}

pub fn to_amount(asset: &Asset, quantity: Decimal) -> Result<U256, PrecisionError> {
    check_decimals(asset)?;

    if quantity.is_sign_negative() && !quantity.is_zero() {
        return Err(PrecisionError::Negative {
            symbol: asset.symbol.clone(),
            value: quantity,
        });
    }

    let normalized = quantity.normalize();
    if normalized.scale() > asset.decimals {
        return Err(PrecisionError::TooPrecise {
            symbol: asset.symbol.clone(),
            value: quantity,
            decimals: asset.decimals,
        });
    }

    // mantissa * 10^(decimals - scale) is the integer amount
    let mantissa = U256::from(normalized.mantissa().unsigned_abs());
    let shift = U256::exp10((asset.decimals - normalized.scale()) as usize);

    mantissa
        .checked_mul(shift)
        .ok_or_else(|| PrecisionError::Overflow {
            symbol: asset.symbol.clone(),
            amount: mantissa,
        })
}

/// Like [`to_amount`] but rounds up to the asset's precision first. Used for
/// collateral, where under-depositing by one unit would fail the order.
pub fn to_amount_rounded_up(asset: &Asset, quantity: Decimal) -> Result<U256, PrecisionError> {
    check_decimals(asset)?;
    let rounded = quantity.round_dp_with_strategy(asset.decimals, RoundingStrategy::AwayFromZero);
    to_amount(asset, rounded)
}

pub fn to_quantity(asset: &Asset, amount: U256) -> Result<Decimal, PrecisionError> {
    check_decimals(asset)?;

    let overflow = || PrecisionError::Overflow {
        symbol: asset.symbol.clone(),
        amount,
    };

    if amount.bits() > 127 {
        return Err(overflow());
    }

    Decimal::try_from_i128_with_scale(amount.as_u128() as i128, asset.decimals)
        .map(|q| q.normalize())
        .map_err(|_| overflow())
}

fn check_decimals(asset: &Asset) -> Result<(), PrecisionError> {
    if asset.decimals > MAX_DECIMALS {
        return Err(PrecisionError::UnsupportedDecimals {
            symbol: asset.symbol.clone(),
            decimals: asset.decimals,
        });
    }
    Ok(())
}
