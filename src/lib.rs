//! Single-market maker for the GTE exchange.
//!
//! The interesting part is [`execution`]: it turns a [`domain::TradingIntent`]
//! into deposits, a limit order and a confirmed on-chain status through any
//! [`gateway::ChainGateway`]. [`client::GteClient`] is the production gateway.

pub mod client;
pub mod config;
pub mod domain;
pub mod execution;
pub mod gateway;
pub mod logging;
pub mod report;
pub mod units;
pub mod wallet;
