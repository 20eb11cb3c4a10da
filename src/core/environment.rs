//! core::environment
//!
//! Sources of identity and time for the simulator.
//!
//! The interpreter never calls the clock or a random generator directly.
//! It asks an [`Environment`], so production sessions get random tokens and
//! wall-clock time while tests get fully deterministic ids and timestamps.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use super::types::UtcTimestamp;

/// Length of generated commit and stash tokens.
pub const TOKEN_LEN: usize = 7;

/// Supplies fresh ids and the current time.
pub trait Environment: Debug + Send + Sync {
    /// A fresh opaque token for commit and stash ids.
    fn fresh_token(&self) -> String;

    /// The current time.
    fn now(&self) -> UtcTimestamp;
}

/// Random tokens from UUID v4, wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn fresh_token(&self) -> String {
        let mut token = Uuid::new_v4().simple().to_string();
        token.truncate(TOKEN_LEN);
        token
    }

    fn now(&self) -> UtcTimestamp {
        UtcTimestamp::now()
    }
}

/// Sequential tokens (`c000001`, `c000002`, ...) and a clock that advances
/// one second per reading.
///
/// # Example
///
/// ```
/// use git_playground::core::environment::{Environment, FixedEnvironment};
///
/// let env = FixedEnvironment::new();
/// assert_eq!(env.fresh_token(), "c000001");
/// assert_eq!(env.fresh_token(), "c000002");
/// assert!(env.now() < env.now());
/// ```
#[derive(Debug)]
pub struct FixedEnvironment {
    next_token: AtomicU64,
    ticks: AtomicU64,
    epoch_millis: i64,
}

impl FixedEnvironment {
    /// Clock starts at 2024-01-01T00:00:00Z.
    pub fn new() -> Self {
        Self::starting_at(1_704_067_200_000)
    }

    pub fn starting_at(epoch_millis: i64) -> Self {
        Self {
            next_token: AtomicU64::new(1),
            ticks: AtomicU64::new(0),
            epoch_millis,
        }
    }
}

impl Default for FixedEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for FixedEnvironment {
    fn fresh_token(&self) -> String {
        let n = self.next_token.fetch_add(1, Ordering::Relaxed);
        format!("c{n:06}")
    }

    fn now(&self) -> UtcTimestamp {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        let millis = self
            .epoch_millis
            .saturating_add(i64::try_from(tick).unwrap_or(i64::MAX).saturating_mul(1000));
        UtcTimestamp::from_millis(millis).unwrap_or_else(UtcTimestamp::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_tokens_have_fixed_length() {
        let env = SystemEnvironment;
        let token = env.fresh_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn system_tokens_differ() {
        let env = SystemEnvironment;
        assert_ne!(env.fresh_token(), env.fresh_token());
    }

    #[test]
    fn fixed_tokens_are_sequential() {
        let env = FixedEnvironment::new();
        let tokens: Vec<_> = (0..3).map(|_| env.fresh_token()).collect();
        assert_eq!(tokens, ["c000001", "c000002", "c000003"]);
    }

    #[test]
    fn fixed_clock_advances_by_a_second() {
        let env = FixedEnvironment::starting_at(0);
        assert_eq!(env.now().as_millis(), 0);
        assert_eq!(env.now().as_millis(), 1000);
    }
}
