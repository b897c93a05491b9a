//! enrich::queue
//!
//! Serialized request execution with a minimum inter-request delay.
//!
//! Upstream APIs and relays apply per-IP rate limits and ban bursts, so
//! all outbound calls for one client instance are funneled through this
//! gate: at most one request in flight, and after each completion the
//! next request waits out a configured delay before starting.
//!
//! The gate is an async mutex around the earliest-next-start instant.
//! Holding the lock across the request future serializes execution;
//! waiters queue on the mutex, so enqueueing never blocks a producer and
//! one request's failure resolves only its own caller. There is no
//! cancellation: once a caller reaches the gate its request runs to
//! completion.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Concurrency-1 request gate with a per-request cooldown.
#[derive(Debug)]
pub struct RequestQueue {
    /// Earliest instant the next request may start.
    next_start: Mutex<Instant>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self {
            next_start: Mutex::new(Instant::now()),
        }
    }

    /// Run `request` exclusively, then impose `cooldown` before whatever
    /// runs next.
    ///
    /// The cooldown is measured from completion, so two back-to-back
    /// calls with a 100ms cooldown start at least 100ms apart regardless
    /// of how long the first one ran.
    pub async fn run<T, Fut>(&self, cooldown: Duration, request: Fut) -> T
    where
        Fut: Future<Output = T>,
    {
        let mut next_start = self.next_start.lock().await;
        tokio::time::sleep_until(*next_start).await;
        let output = request.await;
        *next_start = Instant::now() + cooldown;
        output
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}
