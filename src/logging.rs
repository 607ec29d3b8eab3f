use log::{debug, error, info, warn};

use crate::domain::AssetLeg;
use crate::execution::state::ExecutionState;
use crate::gateway::GatewayError;

pub fn log_rejection(reason: &str) {
    error!("❌ Rejected: {}", reason);
}

pub fn log_retry(attempt: u32, max_attempts: u32, reason: &str) {
    warn!("🔁 Retry {}/{}: {}", attempt, max_attempts, reason);
}

pub fn log_partial_deposit(failed: AssetLeg, cause: &GatewayError) {
    warn!(
        "⚠️ Partial deposit: {} leg failed after the other landed: {}",
        failed, cause
    );
}

pub fn log_transition(from: ExecutionState, to: ExecutionState) {
    debug!("🔀 {} → {}", from, to);
}

pub fn log_success(msg: &str) {
    info!("✅ {}", msg);
}
