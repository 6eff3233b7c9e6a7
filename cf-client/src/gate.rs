//! Request spacing gate.
//!
//! Every outbound request passes through [`RequestGate::wait`], which holds
//! callers back until a randomly chosen spacing has elapsed since the
//! previous request. Callers are released one at a time, so concurrent syncs
//! sharing a client still produce a single, evenly spaced request stream.

use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Serialises request start times with a jittered minimum spacing.
#[derive(Debug)]
pub struct RequestGate {
    delay_ms: (u64, u64),
    last_request: Mutex<Option<Instant>>,
}

impl RequestGate {
    /// Create a gate with a `(min, max)` spacing range in milliseconds.
    pub fn new(delay_ms: (u64, u64)) -> Self {
        let (min, max) = delay_ms;
        Self {
            delay_ms: (min.min(max), max.max(min)),
            last_request: Mutex::new(None),
        }
    }

    /// Wait until the next request may start, then claim the slot.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let spacing = self.pick_spacing();
            let elapsed = previous.elapsed();
            if elapsed < spacing {
                let pause = spacing - elapsed;
                tracing::trace!(pause_ms = pause.as_millis() as u64, "spacing request");
                tokio::time::sleep(pause).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn pick_spacing(&self) -> Duration {
        let (min, max) = self.delay_ms;
        if max == 0 {
            return Duration::ZERO;
        }
        let ms = if min == max {
            min
        } else {
            rand::thread_rng().gen_range(min..=max)
        };
        Duration::from_millis(ms)
    }
}
