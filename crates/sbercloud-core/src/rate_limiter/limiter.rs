//! Token bucket rate limiter implementation

use super::types::{BucketState, RateLimitConfig, Reservation};
use crate::context::{ContextError, RequestContext};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace};

/// Rate limiter using token bucket algorithm
///
/// The bucket holds up to `burst_size` tokens and refills at
/// `requests_per_second`. Callers that find it empty reserve a future token,
/// driving the count negative, so concurrent waiters queue up behind each
/// other instead of all waking at the same refill instant.
///
/// Accounting happens under a short synchronous lock; waiting happens
/// outside it.
#[derive(Debug)]
pub struct RateLimiter {
    /// Configuration
    config: RateLimitConfig,
    /// Token count and timestamps
    state: Mutex<BucketState>,
}

impl RateLimiter {
    /// Create a new rate limiter with custom configuration
    ///
    /// The bucket starts full.
    pub fn with_config(config: RateLimitConfig) -> Self {
        let tokens = f64::from(config.burst_size);
        Self {
            config,
            state: Mutex::new(BucketState::new(tokens)),
        }
    }

    /// `limit` requests per second with a burst of `limit`
    pub fn per_second(limit: u32) -> Self {
        Self::with_config(RateLimitConfig::per_second(limit))
    }

    /// Get configuration
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Wait until one token is available or `ctx` is done
    ///
    /// Fails immediately, without consuming a token, when the context is
    /// already done or when the next token would only arrive after the
    /// context's deadline. If the context is canceled mid-wait the reserved
    /// token is handed back to the bucket.
    pub async fn wait(&self, ctx: &RequestContext) -> Result<(), ContextError> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }

        let now = Instant::now();
        let max_wait = ctx
            .deadline()
            .map(|deadline| deadline.saturating_duration_since(now));

        let Some(reservation) = self.reserve(now, max_wait) else {
            debug!(
                "Rate limiter: next token would arrive after the context deadline ({:?} left)",
                max_wait.unwrap_or_default()
            );
            return Err(ContextError::DeadlineExceeded);
        };

        let delay = reservation.time_to_act.saturating_duration_since(now);
        if delay.is_zero() {
            trace!("Rate limiter: token available immediately");
            return Ok(());
        }

        debug!("Rate limiter: waiting {:.3}s for token", delay.as_secs_f64());

        tokio::select! {
            biased;
            _ = sleep_until(reservation.time_to_act) => Ok(()),
            err = ctx.done() => {
                self.cancel_reservation(reservation, Instant::now());
                debug!("Rate limiter: wait aborted: {}", err);
                Err(err)
            }
        }
    }

    /// Take a token only if one is available right now
    pub fn try_acquire(&self) -> bool {
        self.reserve(Instant::now(), Some(Duration::ZERO)).is_some()
    }

    /// Tokens in the bucket as of now
    ///
    /// Negative while reservations are waiting for refill.
    pub fn available_tokens(&self) -> f64 {
        let state = self.state.lock();
        self.advance(&state, Instant::now())
    }

    /// Reserve one token, refusing if it would take longer than `max_wait`
    fn reserve(&self, now: Instant, max_wait: Option<Duration>) -> Option<Reservation> {
        let mut state = self.state.lock();

        let tokens = self.advance(&state, now) - 1.0;
        let wait = self.duration_from_tokens(-tokens);
        if max_wait.is_some_and(|max| wait > max) {
            return None;
        }
        let time_to_act = now.checked_add(wait)?;

        state.last = now;
        state.tokens = tokens;
        state.last_event = time_to_act;

        Some(Reservation { time_to_act })
    }

    /// Return an unused reservation to the bucket
    ///
    /// Tokens already promised to reservations made after this one are not
    /// restored.
    fn cancel_reservation(&self, reservation: Reservation, now: Instant) {
        let mut state = self.state.lock();

        if reservation.time_to_act < now {
            return;
        }

        let promised_later = state
            .last_event
            .saturating_duration_since(reservation.time_to_act);
        let restore = 1.0 - self.tokens_from_duration(promised_later);
        if restore <= 0.0 {
            return;
        }

        let tokens = (self.advance(&state, now) + restore).min(f64::from(self.config.burst_size));
        state.last = now;
        state.tokens = tokens;

        if reservation.time_to_act == state.last_event {
            let previous = reservation
                .time_to_act
                .checked_sub(self.duration_from_tokens(1.0));
            if let Some(previous) = previous.filter(|previous| *previous >= now) {
                state.last_event = previous;
            }
        }
    }

    /// Token count after refilling for the time elapsed since the last update
    fn advance(&self, state: &BucketState, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(state.last);
        let refilled = state.tokens + self.tokens_from_duration(elapsed);
        refilled.min(f64::from(self.config.burst_size))
    }

    fn duration_from_tokens(&self, tokens: f64) -> Duration {
        if tokens <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(tokens / self.config.requests_per_second)
            .unwrap_or(Duration::MAX)
    }

    fn tokens_from_duration(&self, duration: Duration) -> f64 {
        duration.as_secs_f64() * self.config.requests_per_second
    }
}
