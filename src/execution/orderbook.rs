use rust_decimal::Decimal;

use crate::domain::{OrderBookSnapshot, Side};

/// Price used to size collateral: best bid for a sell, best ask for a buy.
/// `None` when that side of the book is empty or quotes a non-positive price.
pub fn reference_price(snapshot: &OrderBookSnapshot, side: Side) -> Option<Decimal> {
    let level = match side {
        Side::Sell => snapshot.best_bid(),
        Side::Buy => snapshot.best_ask(),
    }?;

    (level.price > Decimal::ZERO).then_some(level.price)
}

/// Quote away from the touch: `best_bid + offset` for a sell,
/// `best_ask - offset` for a buy.
pub fn target_price(snapshot: &OrderBookSnapshot, side: Side, offset: Decimal) -> Option<Decimal> {
    let reference = reference_price(snapshot, side)?;
    let price = match side {
        Side::Sell => reference + offset,
        Side::Buy => reference - offset,
    };

    (price > Decimal::ZERO).then_some(price)
}
