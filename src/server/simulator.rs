//! # Response Simulator
//!
//! Makes image fetches behave like a real, imperfect network service. Every
//! fetch draws one of three equally likely outcomes:
//!
//! | Outcome    | Behaviour                                   |
//! |------------|---------------------------------------------|
//! | `Standard` | image returned immediately                  |
//! | `Delayed`  | image returned after a fixed delay (3 s)    |
//! | `Error`    | fetch fails at once with a server fault     |
//!
//! The image is never modified: callers get either the exact stored image or
//! an error. Outcome selection goes through the [`OutcomeStrategy`] trait so
//! tests can force each branch.

use log::{info, warn};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::common::config::RESPONSE_DELAY;
use crate::common::messages::Image;
use crate::server::error::{ApiError, ApiResult};
use crate::server::metrics::CatalogMetrics;

/// How a single fetch is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    Standard,
    Delayed,
    Error,
}

/// Picks the outcome of each fetch.
pub trait OutcomeStrategy: Send + Sync {
    fn next_outcome(&self) -> ResponseOutcome;
}

/// Uniform choice between the three outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOutcome;

impl OutcomeStrategy for RandomOutcome {
    fn next_outcome(&self) -> ResponseOutcome {
        match rand::thread_rng().gen_range(1..=3) {
            1 => ResponseOutcome::Standard,
            2 => ResponseOutcome::Delayed,
            _ => ResponseOutcome::Error,
        }
    }
}

/// Always answers with the same outcome.
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcome(pub ResponseOutcome);

impl OutcomeStrategy for FixedOutcome {
    fn next_outcome(&self) -> ResponseOutcome {
        self.0
    }
}

/// Wraps reads of stored images with randomized delay and failure.
#[derive(Clone)]
pub struct ResponseSimulator {
    strategy: Arc<dyn OutcomeStrategy>,
    delay: Duration,
    metrics: CatalogMetrics,
}

impl ResponseSimulator {
    /// Simulator with uniform random outcomes and the fixed 3-second delay.
    pub fn new(metrics: CatalogMetrics) -> Self {
        Self::with_strategy(Arc::new(RandomOutcome), RESPONSE_DELAY, metrics)
    }

    /// Simulator with an explicit outcome strategy and delay.
    ///
    /// # Example
    /// ```ignore
    /// let always_slow = ResponseSimulator::with_strategy(
    ///     Arc::new(FixedOutcome(ResponseOutcome::Delayed)),
    ///     Duration::from_millis(10),
    ///     CatalogMetrics::new(),
    /// );
    /// ```
    pub fn with_strategy(
        strategy: Arc<dyn OutcomeStrategy>,
        delay: Duration,
        metrics: CatalogMetrics,
    ) -> Self {
        Self {
            strategy,
            delay,
            metrics,
        }
    }

    #[cfg(test)]
    fn delay(&self) -> Duration {
        self.delay
    }

    /// Answer a fetch of `image` according to the next drawn outcome.
    ///
    /// # Returns
    /// - `Ok(Image)`: the image, untouched (possibly after the delay)
    /// - `Err(ApiError::ServerFault)`: injected failure
    pub async fn respond(&self, image: Image) -> ApiResult<Image> {
        match self.strategy.next_outcome() {
            ResponseOutcome::Standard => {
                self.metrics.increment_standard_fetches();
            }
            ResponseOutcome::Delayed => {
                info!("⏳ Delaying response by {:?}", self.delay);
                self.metrics.increment_delayed_fetches();
                tokio::time::sleep(self.delay).await;
            }
            ResponseOutcome::Error => {
                warn!("💥 Injecting simulated server fault");
                self.metrics.increment_failed_fetches();
                return Err(ApiError::ServerFault);
            }
        }

        Ok(image)
    }
}
