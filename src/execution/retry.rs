use rand::Rng;
use std::time::Duration;

use crate::config::ExecutionConfig;

/// Bounded exponential backoff: `base * 2^(attempt-1)`, capped, plus up to
/// 25% random jitter so concurrent pipelines do not retry in lockstep.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base: Duration,
    pub max: Duration,
    pub jitter: bool,
}

impl RetryPolicy {
    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self {
            max_attempts: config.max_submit_attempts.max(1),
            base: Duration::from_millis(config.backoff_base_ms),
            max: Duration::from_millis(config.backoff_max_ms),
            jitter: true,
        }
    }

    /// Delay to wait after `attempt` (1-based) failed.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        let delay = self.base.saturating_mul(1u32 << exp).min(self.max);

        if !self.jitter || delay.is_zero() {
            return delay;
        }

        let jitter_ms = (delay.as_millis() as u64) / 4;
        if jitter_ms == 0 {
            return delay;
        }
        delay + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }

    pub fn allows_another(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(jitter: bool) -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base: Duration::from_millis(100),
            max: Duration::from_millis(350),
            jitter,
        }
    }

    #[test]
    fn doubles_until_capped() {
        let p = policy(false);
        assert_eq!(p.delay_after(1), Duration::from_millis(100));
        assert_eq!(p.delay_after(2), Duration::from_millis(200));
        assert_eq!(p.delay_after(3), Duration::from_millis(350));
        assert_eq!(p.delay_after(40), Duration::from_millis(350));
    }

    #[test]
    fn jitter_stays_within_a_quarter() {
        let p = policy(true);
        for _ in 0..100 {
            let d = p.delay_after(2);
            assert!(d >= Duration::from_millis(200) && d <= Duration::from_millis(250));
        }
    }

    #[test]
    fn attempt_budget() {
        let p = policy(false);
        assert!(p.allows_another(1));
        assert!(p.allows_another(2));
        assert!(!p.allows_another(3));
    }

    #[test]
    fn zero_attempts_in_config_still_tries_once() {
        let cfg = ExecutionConfig {
            max_submit_attempts: 0,
            ..ExecutionConfig::default()
        };
        assert_eq!(RetryPolicy::from_config(&cfg).max_attempts, 1);
    }
}
