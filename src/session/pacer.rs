//! session::pacer
//!
//! Simulated latency.
//!
//! Plans carry their delays as data; a [`Pacer`] decides what waiting
//! means. [`TokioPacer`] really sleeps (scaled by a speed multiplier) and
//! [`InstantPacer`] only yields to the scheduler, so tests run at full
//! speed while still interleaving with other tasks.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

/// Waits out a simulated delay.
#[async_trait]
pub trait Pacer: Debug + Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Sleeps on the tokio timer.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use git_playground::session::pacer::TokioPacer;
///
/// let pacer = TokioPacer::new(0.5);
/// assert_eq!(pacer.scaled(Duration::from_millis(800)), Duration::from_millis(400));
/// assert_eq!(TokioPacer::new(0.0).scaled(Duration::from_secs(1)), Duration::ZERO);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TokioPacer {
    speed: f64,
}

impl TokioPacer {
    /// `speed` multiplies every delay. Negative or non-finite values fall
    /// back to real time.
    pub fn new(speed: f64) -> Self {
        let speed = if speed.is_finite() && speed >= 0.0 {
            speed
        } else {
            1.0
        };
        Self { speed }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The delay actually slept for `delay`.
    pub fn scaled(&self, delay: Duration) -> Duration {
        Duration::try_from_secs_f64(delay.as_secs_f64() * self.speed).unwrap_or(Duration::MAX)
    }
}

impl Default for TokioPacer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        let scaled = self.scaled(delay);
        if scaled.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(scaled).await;
        }
    }
}

/// Never sleeps.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantPacer;

#[async_trait]
impl Pacer for InstantPacer {
    async fn pause(&self, _delay: Duration) {
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_speed_falls_back() {
        assert_eq!(TokioPacer::new(-1.0).speed(), 1.0);
        assert_eq!(TokioPacer::new(f64::NAN).speed(), 1.0);
        assert_eq!(TokioPacer::new(2.0).speed(), 2.0);
    }

    #[test]
    fn huge_speed_saturates() {
        let pacer = TokioPacer::new(f64::MAX);
        assert_eq!(pacer.scaled(Duration::from_secs(1)), Duration::MAX);
    }

    #[tokio::test]
    async fn instant_pacer_returns() {
        InstantPacer.pause(Duration::from_secs(3600)).await;
    }

    #[tokio::test]
    async fn zero_speed_does_not_sleep() {
        let start = std::time::Instant::now();
        TokioPacer::new(0.0).pause(Duration::from_secs(3600)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
