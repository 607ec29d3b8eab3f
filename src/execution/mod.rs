//! The order execution core: deposit assurance, submission with bounded
//! retries and best-effort status confirmation.

pub mod deposits;
pub mod errors;
pub mod orderbook;
pub mod retry;
pub mod state;
pub mod trader;

pub use deposits::{DepositAssurance, DepositReport};
pub use errors::ExecutionError;
pub use retry::RetryPolicy;
pub use state::ExecutionState;
pub use trader::{ExecutionOutcome, ExecutionPlan, ExecutionReport, OrderAmounts, Trader};
