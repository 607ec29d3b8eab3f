use ethers::types::{H256, U256};
use log::{error, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::time::sleep;

use crate::config::ExecutionConfig;
use crate::domain::{
    DepositRequirement, Market, Order, OrderBookSnapshot, OrderId, Side, TradingIntent,
};
use crate::execution::deposits::{DepositAssurance, DepositReport};
use crate::execution::errors::ExecutionError;
use crate::execution::orderbook::reference_price;
use crate::execution::retry::RetryPolicy;
use crate::execution::state::{ExecutionState, StateTrail};
use crate::gateway::{ChainGateway, GatewayError};
use crate::logging::{log_rejection, log_retry, log_success};
use crate::units;

/// Intent converted to on-chain integers. Computed once per execution and
/// reused verbatim by every submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderAmounts {
    /// Base-scaled.
    pub amount: U256,
    /// Quote-scaled.
    pub price: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub reference_price: Decimal,
    pub deposits: DepositRequirement,
    pub order: OrderAmounts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Status read back successfully. Says nothing about fills: the order
    /// may well still be pending or open.
    Confirmed(Order),
    /// The order was placed but its status could not be read. `placed` is
    /// the handle the gateway returned; look it up again later.
    Unknown { placed: Order, error: GatewayError },
}

impl ExecutionOutcome {
    pub fn order(&self) -> &Order {
        match self {
            ExecutionOutcome::Confirmed(order) => order,
            ExecutionOutcome::Unknown { placed, .. } => placed,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order().order_id
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub outcome: ExecutionOutcome,
    pub deposits: DepositReport,
    pub submit_attempts: u32,
    /// Order txs from failed attempts that reached the node unconfirmed.
    /// Non-empty means the book may hold more than one order.
    pub unconfirmed: Vec<H256>,
    pub states: Vec<ExecutionState>,
}

struct Submission {
    attempts: u32,
    unconfirmed: Vec<H256>,
}

struct Run {
    outcome: ExecutionOutcome,
    deposits: DepositReport,
    submission: Submission,
}

/// Runs one trading intent end to end:
/// validate → ensure deposits → submit (with retries) → read status back.
///
/// Holds no mutable state, so one `Trader` can serve any number of
/// concurrent executions over a shared gateway. Dropping an execution's
/// future between the deposit and the order leaves the deposit in place.
pub struct Trader<G: ?Sized> {
    gateway: Arc<G>,
    deposits: DepositAssurance<G>,
    config: ExecutionConfig,
    retry: RetryPolicy,
    book_depth: usize,
}

impl<G: ChainGateway + ?Sized> Trader<G> {
    pub fn new(gateway: Arc<G>, config: ExecutionConfig, book_depth: usize) -> Self {
        Self {
            deposits: DepositAssurance::new(
                gateway.clone(),
                config.base_deposit_multiplier,
                config.gas_ceiling(),
            ),
            retry: RetryPolicy::from_config(&config),
            gateway,
            config,
            book_depth,
        }
    }

    // ==================================================
    // VALIDATION / PLANNING
    // ==================================================

    /// Everything the execution would send, without sending anything.
    pub fn plan(
        &self,
        market: &Market,
        intent: &TradingIntent,
        snapshot: &OrderBookSnapshot,
    ) -> Result<ExecutionPlan, ExecutionError> {
        let order = self.validate(market, intent)?;

        let reference = reference_price(snapshot, intent.side).ok_or_else(|| {
            ExecutionError::InvalidIntent(format!(
                "no {} side in the order book to price a {} against",
                match intent.side {
                    Side::Sell => "bid",
                    Side::Buy => "ask",
                },
                intent.side
            ))
        })?;

        let deposits = self
            .deposits
            .requirement(market, intent.base_quantity, reference)?;

        Ok(ExecutionPlan {
            reference_price: reference,
            deposits,
            order,
        })
    }

    fn validate(
        &self,
        market: &Market,
        intent: &TradingIntent,
    ) -> Result<OrderAmounts, ExecutionError> {
        if intent.base_quantity <= Decimal::ZERO {
            return Err(ExecutionError::InvalidIntent(format!(
                "quantity {} must be positive",
                intent.base_quantity
            )));
        }
        if intent.target_price <= Decimal::ZERO {
            return Err(ExecutionError::InvalidIntent(format!(
                "price {} must be positive",
                intent.target_price
            )));
        }
        if !self
            .config
            .allowed_time_in_force
            .contains(&intent.time_in_force)
        {
            return Err(ExecutionError::InvalidIntent(format!(
                "time-in-force {} is not supported",
                intent.time_in_force
            )));
        }

        let invalid = |e: units::PrecisionError| ExecutionError::InvalidIntent(e.to_string());

        Ok(OrderAmounts {
            amount: units::to_amount(&market.base, intent.base_quantity).map_err(invalid)?,
            price: units::to_amount(&market.quote, intent.target_price).map_err(invalid)?,
        })
    }

    // ==================================================
    // EXECUTION
    // ==================================================

    pub async fn execute(
        &self,
        market: &Market,
        intent: &TradingIntent,
    ) -> Result<ExecutionReport, ExecutionError> {
        let snapshot = self
            .gateway
            .get_order_book_snapshot(market, self.book_depth)
            .await
            .map_err(ExecutionError::MarketData)?;

        self.execute_with_snapshot(market, intent, &snapshot).await
    }

    pub async fn execute_with_snapshot(
        &self,
        market: &Market,
        intent: &TradingIntent,
        snapshot: &OrderBookSnapshot,
    ) -> Result<ExecutionReport, ExecutionError> {
        let mut trail = StateTrail::new();

        match self.run(market, intent, snapshot, &mut trail).await {
            Ok(run) => Ok(ExecutionReport {
                outcome: run.outcome,
                deposits: run.deposits,
                submit_attempts: run.submission.attempts,
                unconfirmed: run.submission.unconfirmed,
                states: trail.into_states(),
            }),
            Err(e) => {
                trail.advance(ExecutionState::Failed);
                log_rejection(&e.to_string());
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        market: &Market,
        intent: &TradingIntent,
        snapshot: &OrderBookSnapshot,
        trail: &mut StateTrail,
    ) -> Result<Run, ExecutionError> {
        info!(
            "🎯 {} {} {} @ {} ({})",
            intent.side,
            intent.base_quantity,
            market.pair(),
            intent.target_price,
            intent.time_in_force
        );

        let plan = self.plan(market, intent, snapshot)?;

        trail.advance(ExecutionState::DepositPending);
        let deposits = self.deposits.ensure(market, &plan.deposits).await?;

        trail.advance(ExecutionState::Submitting);
        let (placed, submission) = self.submit(market, intent, plan.order).await?;
        trail.advance(ExecutionState::Submitted);
        log_success(&format!("Order posted: id={}", placed.order_id));
        if !submission.unconfirmed.is_empty() {
            warn!(
                "⚠️  Earlier order txs {:?} were never confirmed; check for duplicates",
                submission.unconfirmed
            );
        }

        trail.advance(ExecutionState::Confirming);
        let outcome = self.confirm(market, placed).await;
        trail.advance(match outcome {
            ExecutionOutcome::Confirmed(_) => ExecutionState::Confirmed,
            ExecutionOutcome::Unknown { .. } => ExecutionState::Unknown,
        });

        Ok(Run {
            outcome,
            deposits,
            submission,
        })
    }

    async fn submit(
        &self,
        market: &Market,
        intent: &TradingIntent,
        amounts: OrderAmounts,
    ) -> Result<(Order, Submission), ExecutionError> {
        let gas_ceiling = self.config.gas_ceiling();
        let mut unconfirmed = Vec::new();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result = self
                .gateway
                .place_limit_order(
                    market,
                    intent.side,
                    amounts.amount,
                    amounts.price,
                    intent.time_in_force,
                    gas_ceiling,
                )
                .await;

            let e = match result {
                Ok(order) => {
                    let submission = Submission {
                        attempts: attempt,
                        unconfirmed,
                    };
                    return Ok((order, submission));
                }
                Err(e) => e,
            };
            unconfirmed.extend(e.broadcast_tx());

            if e.is_transient() {
                if !self.retry.allows_another(attempt) {
                    error!("Order submission failed after {} attempts: {}", attempt, e);
                    return Err(ExecutionError::SubmissionTimeout {
                        attempts: attempt,
                        last_error: e,
                        broadcast: unconfirmed,
                    });
                }
                log_retry(attempt, self.retry.max_attempts, &e.to_string());
                sleep(self.retry.delay_after(attempt)).await;
                continue;
            }

            let reason = match e {
                GatewayError::Rejected { reason } => reason,
                other => other.to_string(),
            };
            return Err(ExecutionError::SubmissionRejected {
                reason,
                broadcast: unconfirmed,
            });
        }
    }

    async fn confirm(&self, market: &Market, placed: Order) -> ExecutionOutcome {
        match self.gateway.get_order(market, placed.order_id).await {
            Ok(order) => {
                info!("📋 Order {} status: {}", order.order_id, order.status);
                ExecutionOutcome::Confirmed(order)
            }
            Err(error) => {
                warn!(
                    "Couldn't fetch on-chain status of order {}: {}",
                    placed.order_id, error
                );
                ExecutionOutcome::Unknown { placed, error }
            }
        }
    }

    /// Status lookup on its own, retried on transient errors. The follow-up
    /// for an [`ExecutionOutcome::Unknown`].
    pub async fn refresh_status(
        &self,
        market: &Market,
        order_id: OrderId,
    ) -> Result<Order, GatewayError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.gateway.get_order(market, order_id).await {
                Err(e) if e.is_transient() && self.retry.allows_another(attempt) => {
                    log_retry(attempt, self.retry.max_attempts, &e.to_string());
                    sleep(self.retry.delay_after(attempt)).await;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Asset, OrderStatus, PriceLevel, TimeInForce};
    use crate::domain::{AssetLeg, DepositReceipt};
    use crate::gateway::MockChainGateway;
    use chrono::Utc;
    use ethers::types::{Address, H256};
    use mockall::predicate::eq;
    use mockall::Sequence;
    use rust_decimal_macros::dec;

    const WETH: u64 = 1_000_000_000_000_000_000;

    fn market() -> Market {
        Market {
            address: Address::repeat_byte(0xaa),
            base: Asset {
                symbol: "WETH".into(),
                address: Address::repeat_byte(0x01),
                decimals: 18,
            },
            quote: Asset {
                symbol: "USDC".into(),
                address: Address::repeat_byte(0x02),
                decimals: 6,
            },
        }
    }

    fn book(best_bid: Option<Decimal>) -> OrderBookSnapshot {
        OrderBookSnapshot {
            bids: best_bid
                .map(|p| {
                    vec![
                        PriceLevel { price: p, size: dec!(1) },
                        PriceLevel { price: p - dec!(1), size: dec!(2) },
                    ]
                })
                .unwrap_or_default(),
            asks: vec![PriceLevel {
                price: dec!(120),
                size: dec!(1),
            }],
            fetched_at: Utc::now(),
        }
    }

    fn sell(qty: Decimal, price: Decimal) -> TradingIntent {
        TradingIntent::new(Side::Sell, qty, price, TimeInForce::Gtc)
    }

    fn gas() -> U256 {
        U256::from(50_000_000u64)
    }

    fn placed(amount: U256, price: U256) -> Order {
        Order {
            order_id: U256::from(77u64),
            market: Address::repeat_byte(0xaa),
            side: Side::Sell,
            price,
            amount,
            status: OrderStatus::Pending,
        }
    }

    fn ok_deposits(gw: &mut MockChainGateway) {
        gw.expect_ensure_deposit().times(2).returning(|t, a, _| {
            Ok(DepositReceipt {
                token: t,
                amount: a,
                deposited: a,
                tx_hash: Some(H256::repeat_byte(0x01)),
            })
        });
    }

    fn trader(gw: MockChainGateway) -> Trader<MockChainGateway> {
        Trader::new(Arc::new(gw), ExecutionConfig::default(), 10)
    }

    // best bid 100, sell 0.1 at bid + 10
    #[tokio::test]
    async fn sells_above_the_best_bid_end_to_end() {
        let m = market();
        let amount = U256::from(WETH / 10);
        let price = U256::from(110_000_000u64);
        let mut gw = MockChainGateway::new();
        let mut seq = Sequence::new();

        gw.expect_ensure_deposit()
            .with(eq(m.base.address), eq(U256::from(WETH / 5)), eq(gas()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|t, a, _| {
                Ok(DepositReceipt {
                    token: t,
                    amount: a,
                    deposited: a,
                    tx_hash: Some(H256::repeat_byte(0x01)),
                })
            });
        gw.expect_ensure_deposit()
            .with(eq(m.quote.address), eq(U256::from(10_000_000u64)), eq(gas()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|t, a, _| {
                Ok(DepositReceipt {
                    token: t,
                    amount: a,
                    deposited: U256::zero(),
                    tx_hash: None,
                })
            });
        gw.expect_place_limit_order()
            .withf(move |mk, side, a, p, tif, g| {
                mk.address == Address::repeat_byte(0xaa)
                    && *side == Side::Sell
                    && *a == amount
                    && *p == price
                    && *tif == TimeInForce::Gtc
                    && *g == U256::from(50_000_000u64)
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, a, p, _, _| Ok(placed(a, p)));
        gw.expect_get_order()
            .with(mockall::predicate::always(), eq(U256::from(77u64)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, id| {
                Ok(Order {
                    order_id: id,
                    status: OrderStatus::Open,
                    ..placed(U256::from(WETH / 10), U256::from(110_000_000u64))
                })
            });

        let report = trader(gw)
            .execute_with_snapshot(
                &m,
                &sell(dec!(0.1), dec!(100) + dec!(10)),
                &book(Some(dec!(100))),
            )
            .await
            .unwrap();

        match &report.outcome {
            ExecutionOutcome::Confirmed(order) => {
                assert_eq!(order.status, OrderStatus::Open);
                assert_eq!(order.amount, amount);
                assert_eq!(order.price, price);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(report.submit_attempts, 1);
        assert_eq!(report.deposits.transactions(), 1);
        assert_eq!(
            report.states,
            vec![
                ExecutionState::Validating,
                ExecutionState::DepositPending,
                ExecutionState::Submitting,
                ExecutionState::Submitted,
                ExecutionState::Confirming,
                ExecutionState::Confirmed,
            ]
        );
    }

    #[tokio::test]
    async fn empty_bid_side_fails_before_any_deposit() {
        let mut gw = MockChainGateway::new();
        gw.expect_ensure_deposit().times(0);
        gw.expect_place_limit_order().times(0);

        let err = trader(gw)
            .execute_with_snapshot(&market(), &sell(dec!(0.1), dec!(10)), &book(None))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::InvalidIntent(_)));
    }

    #[tokio::test]
    async fn rejects_invalid_intents_locally() {
        let t = trader(MockChainGateway::new());
        let m = market();
        let b = book(Some(dec!(100)));

        let cases = [
            sell(dec!(0), dec!(110)),
            sell(dec!(-1), dec!(110)),
            sell(dec!(0.1), dec!(0)),
            // more precision than USDC's 6 decimals
            sell(dec!(0.1), dec!(110.0000001)),
            TradingIntent::new(Side::Sell, dec!(0.1), dec!(110), TimeInForce::Fok),
        ];
        for intent in cases {
            let err = t.execute_with_snapshot(&m, &intent, &b).await.unwrap_err();
            assert!(
                matches!(err, ExecutionError::InvalidIntent(_)),
                "{intent:?} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn quote_deposit_failure_never_submits() {
        let m = market();
        let base = m.base.address;
        let mut gw = MockChainGateway::new();
        gw.expect_ensure_deposit()
            .withf(move |t, _, _| *t == base)
            .times(1)
            .returning(|t, a, _| {
                Ok(DepositReceipt {
                    token: t,
                    amount: a,
                    deposited: a,
                    tx_hash: Some(H256::repeat_byte(0x01)),
                })
            });
        gw.expect_ensure_deposit()
            .withf(move |t, _, _| *t != base)
            .times(1)
            .returning(|_, _, _| Err(GatewayError::NetworkTimeout("rpc".into())));
        gw.expect_place_limit_order().times(0);

        let err = trader(gw)
            .execute_with_snapshot(&m, &sell(dec!(0.1), dec!(110)), &book(Some(dec!(100))))
            .await
            .unwrap_err();

        match err {
            ExecutionError::DepositFailed { leg, completed, .. } => {
                assert_eq!(leg, AssetLeg::Quote);
                assert_eq!(completed.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn submission_timeouts_retry_with_identical_amounts() {
        let mut gw = MockChainGateway::new();
        ok_deposits(&mut gw);
        gw.expect_place_limit_order()
            .withf(|_, _, a, p, _, _| {
                *a == U256::from(WETH / 10) && *p == U256::from(110_000_000u64)
            })
            .times(3)
            .returning(|_, _, _, _, _, _| Err(GatewayError::NetworkTimeout("rpc".into())));
        gw.expect_get_order().times(0);

        let err = trader(gw)
            .execute_with_snapshot(&market(), &sell(dec!(0.1), dec!(110)), &book(Some(dec!(100))))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ExecutionError::SubmissionTimeout {
                attempts: 3,
                last_error: GatewayError::NetworkTimeout("rpc".into()),
                broadcast: vec![],
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unconfirmed_order_txs_survive_retry_exhaustion() {
        let mut gw = MockChainGateway::new();
        ok_deposits(&mut gw);
        let mut n = 0u8;
        gw.expect_place_limit_order()
            .times(3)
            .returning(move |_, _, _, _, _, _| {
                n += 1;
                Err(GatewayError::Unconfirmed {
                    tx_hash: H256::repeat_byte(n),
                    reason: "no receipt after 60000ms".into(),
                })
            });
        gw.expect_get_order().times(0);

        let err = trader(gw)
            .execute_with_snapshot(&market(), &sell(dec!(0.1), dec!(110)), &book(Some(dec!(100))))
            .await
            .unwrap_err();

        match err {
            ExecutionError::SubmissionTimeout {
                attempts,
                broadcast,
                ..
            } => {
                assert_eq!(attempts, 3);
                assert_eq!(
                    broadcast,
                    vec![
                        H256::repeat_byte(1),
                        H256::repeat_byte(2),
                        H256::repeat_byte(3)
                    ]
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unconfirmed_attempt_before_a_rejection_is_reported() {
        let mut gw = MockChainGateway::new();
        ok_deposits(&mut gw);
        let mut seq = Sequence::new();
        gw.expect_place_limit_order()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _, _, _| {
                Err(GatewayError::Unconfirmed {
                    tx_hash: H256::repeat_byte(0x0c),
                    reason: "no receipt".into(),
                })
            });
        gw.expect_place_limit_order()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _, _, _| {
                Err(GatewayError::Rejected {
                    reason: "duplicate client order".into(),
                })
            });

        let err = trader(gw)
            .execute_with_snapshot(&market(), &sell(dec!(0.1), dec!(110)), &book(Some(dec!(100))))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ExecutionError::SubmissionRejected {
                reason: "duplicate client order".into(),
                broadcast: vec![H256::repeat_byte(0x0c)],
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn transient_submission_failure_recovers() {
        let mut gw = MockChainGateway::new();
        ok_deposits(&mut gw);
        let mut seq = Sequence::new();
        gw.expect_place_limit_order()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _, _, _| Err(GatewayError::Transport("connection reset".into())));
        gw.expect_place_limit_order()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, a, p, _, _| Ok(placed(a, p)));
        gw.expect_get_order()
            .times(1)
            .returning(|_, _| Ok(placed(U256::from(WETH / 10), U256::from(110_000_000u64))));

        let report = trader(gw)
            .execute_with_snapshot(&market(), &sell(dec!(0.1), dec!(110)), &book(Some(dec!(100))))
            .await
            .unwrap();
        assert_eq!(report.submit_attempts, 3);
        assert!(report.unconfirmed.is_empty());
        assert!(matches!(report.outcome, ExecutionOutcome::Confirmed(_)));
    }

    #[tokio::test]
    async fn contract_rejection_is_terminal() {
        let mut gw = MockChainGateway::new();
        ok_deposits(&mut gw);
        gw.expect_place_limit_order()
            .times(1)
            .returning(|_, _, _, _, _, _| {
                Err(GatewayError::Rejected {
                    reason: "price out of band".into(),
                })
            });

        let err = trader(gw)
            .execute_with_snapshot(&market(), &sell(dec!(0.1), dec!(110)), &book(Some(dec!(100))))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ExecutionError::SubmissionRejected {
                reason: "price out of band".into(),
                broadcast: vec![],
            }
        );
    }

    #[tokio::test]
    async fn status_failure_keeps_the_order_handle() {
        let mut gw = MockChainGateway::new();
        ok_deposits(&mut gw);
        gw.expect_place_limit_order()
            .times(1)
            .returning(|_, _, a, p, _, _| Ok(placed(a, p)));
        gw.expect_get_order()
            .times(1)
            .returning(|_, _| Err(GatewayError::NetworkTimeout("rpc".into())));

        let report = trader(gw)
            .execute_with_snapshot(&market(), &sell(dec!(0.1), dec!(110)), &book(Some(dec!(100))))
            .await
            .unwrap();

        match &report.outcome {
            ExecutionOutcome::Unknown { placed, error } => {
                assert_eq!(placed.order_id, U256::from(77u64));
                assert!(error.is_transient());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(report.outcome.order_id(), U256::from(77u64));
        assert_eq!(report.states.last(), Some(&ExecutionState::Unknown));
    }

    #[tokio::test]
    async fn execute_fetches_the_book_itself() {
        let mut gw = MockChainGateway::new();
        gw.expect_get_order_book_snapshot()
            .withf(|_, depth| *depth == 10)
            .times(1)
            .returning(|_, _| Err(GatewayError::NotFound("market".into())));
        gw.expect_ensure_deposit().times(0);

        let err = trader(gw)
            .execute(&market(), &sell(dec!(0.1), dec!(110)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ExecutionError::MarketData(GatewayError::NotFound("market".into()))
        );
    }

    #[test]
    fn plan_matches_the_reference_cycle() {
        let plan = trader(MockChainGateway::new())
            .plan(&market(), &sell(dec!(0.1), dec!(110)), &book(Some(dec!(100))))
            .unwrap();
        assert_eq!(plan.reference_price, dec!(100));
        assert_eq!(plan.deposits.base_amount, U256::from(WETH / 5));
        assert_eq!(plan.deposits.quote_amount, U256::from(10_000_000u64));
        assert_eq!(plan.order.amount, U256::from(WETH / 10));
        assert_eq!(plan.order.price, U256::from(110_000_000u64));
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_status_retries_transient_errors_only() {
        let mut gw = MockChainGateway::new();
        let mut seq = Sequence::new();
        gw.expect_get_order()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(GatewayError::NetworkTimeout("rpc".into())));
        gw.expect_get_order()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(GatewayError::NotFound("order 5".into())));

        let err = trader(gw)
            .refresh_status(&market(), U256::from(5u64))
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::NotFound("order 5".into()));
    }
}
