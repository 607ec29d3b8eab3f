use colored::{ColoredString, Colorize};
use std::fmt::Write;

use ethers::types::U256;

use crate::domain::{Asset, Market, Order, OrderStatus};
use crate::execution::{ExecutionError, ExecutionOutcome, ExecutionPlan, ExecutionReport};
use crate::units;

fn status_label(status: OrderStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        OrderStatus::Filled => label.green().bold(),
        OrderStatus::Open | OrderStatus::Pending => label.cyan(),
        OrderStatus::Cancelled => label.yellow(),
        OrderStatus::Rejected => label.red().bold(),
    }
}

/// Human quantity when the amount converts cleanly, raw integer otherwise.
fn human(asset: &Asset, amount: U256) -> String {
    match units::to_quantity(asset, amount) {
        Ok(q) => format!("{} {}", q, asset.symbol),
        Err(_) => format!("{} (raw)", amount),
    }
}

pub fn render_order(market: &Market, order: &Order) -> String {
    render_order_as(market, order, status_label(order.status))
}

fn render_order_as(market: &Market, order: &Order, status: ColoredString) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order ID: {}", order.order_id);
    let _ = writeln!(out, "Market: {}", market.pair());
    let _ = writeln!(out, "Side: {}", order.side);
    let _ = writeln!(out, "Price: {}", human(&market.quote, order.price));
    let _ = writeln!(out, "Amount: {}", human(&market.base, order.amount));
    let _ = write!(out, "Status: {}", status);
    out
}

pub fn render_report(market: &Market, report: &ExecutionReport) -> String {
    let mut out = String::new();

    for (leg, receipt) in [("base", &report.deposits.base), ("quote", &report.deposits.quote)] {
        let asset = if leg == "base" { &market.base } else { &market.quote };
        let _ = writeln!(
            out,
            "Deposit {}: {} {}",
            leg,
            human(asset, receipt.amount),
            match receipt.tx_hash {
                Some(tx) => format!("(sent {}, tx {:?})", human(asset, receipt.deposited), tx),
                None => "(already custodied)".to_string(),
            }
        );
    }
    let _ = writeln!(out, "Submit attempts: {}", report.submit_attempts);
    for tx in &report.unconfirmed {
        let _ = writeln!(out, "{} earlier order tx {:?} unconfirmed", "WARN".yellow(), tx);
    }

    match &report.outcome {
        ExecutionOutcome::Confirmed(order) => {
            out.push_str(&render_order(market, order));
        }
        ExecutionOutcome::Unknown { placed, error } => {
            out.push_str(&render_order_as(market, placed, "UNKNOWN".red().bold()));
            let _ = write!(
                out,
                "\nCouldn't fetch on-chain order status: {}; retry with `order_status {}`",
                error, placed.order_id
            );
        }
    }

    out
}

pub fn render_plan(market: &Market, plan: &ExecutionPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Reference price: {}", plan.reference_price);
    let _ = writeln!(out, "Deposit base: {}", human(&market.base, plan.deposits.base_amount));
    let _ = writeln!(out, "Deposit quote: {}", human(&market.quote, plan.deposits.quote_amount));
    let _ = writeln!(out, "Order amount: {}", human(&market.base, plan.order.amount));
    let _ = write!(out, "Order price: {}", human(&market.quote, plan.order.price));
    out
}

pub fn render_failure(error: &ExecutionError) -> String {
    let mut out = format!("{} {}", "FAILED".red().bold(), error);
    match error {
        ExecutionError::DepositFailed { completed, .. } => {
            for receipt in completed {
                let _ = write!(
                    out,
                    "\n  landed: {} of {:?} (tx {:?})",
                    receipt.deposited, receipt.token, receipt.tx_hash
                );
            }
        }
        ExecutionError::SubmissionRejected { broadcast, .. }
        | ExecutionError::SubmissionTimeout { broadcast, .. } => {
            for tx in broadcast {
                let _ = write!(out, "\n  unconfirmed order tx: {:?}", tx);
            }
        }
        _ => {}
    }
    out
}
