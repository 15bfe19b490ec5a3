//! Fixed-window request-rate admission control.
//!
//! Each caller key owns a counter and a window-start timestamp. The first
//! request in a key (or the first after the window elapses) resets the
//! counter; requests beyond the budget inside one window are denied
//! without growing any state. Coarse by design: a caller can burst up to
//! twice the budget across a window boundary in exchange for O(1) memory
//! per key.
//!
//! Instances own their state — construct one per application (or per test
//! case) instead of sharing globals.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::warn;

/// Window substituted when a configured duration overflows the chrono
/// range.
const FALLBACK_WINDOW_SECS: i64 = 60;

/// Convert a configured window, falling back loudly when the value is
/// unrepresentable so a misconfiguration shows up in logs instead of
/// silently changing the admission rate.
fn window_or_fallback(window: Duration) -> chrono::Duration {
    chrono::Duration::from_std(window).unwrap_or_else(|_| {
        warn!(
            window_secs = window.as_secs(),
            fallback_secs = FALLBACK_WINDOW_SECS,
            "rate-limit window out of range, substituting fallback"
        );
        chrono::Duration::seconds(FALLBACK_WINDOW_SECS)
    })
}

/// Admission decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request may proceed to the consistency layer.
    Allowed,
    /// The caller exhausted its budget; retry after the window resets.
    Denied {
        /// Seconds until the caller's window elapses.
        retry_after_secs: u64,
    },
}

#[derive(Debug, Clone, Copy)]
struct WindowState {
    count: u32,
    started_at: DateTime<Utc>,
}

/// Fixed-window rate limiter keyed by an opaque caller identifier.
pub struct FixedWindowLimiter {
    budget: u32,
    window: chrono::Duration,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<String, WindowState>>,
}

impl FixedWindowLimiter {
    /// Create a limiter allowing `budget` requests per `window`.
    pub fn new(budget: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            budget,
            window: window_or_fallback(window),
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Evaluate one request for `key`, updating window state under the
    /// limiter's lock so racing workers cannot lose counter updates.
    pub fn check(&self, key: &str) -> Admission {
        let now = self.clock.utc();
        let mut windows = self.lock_windows();

        let state = windows
            .entry(key.to_owned())
            .or_insert_with(|| WindowState {
                count: 0,
                started_at: now,
            });

        if now - state.started_at >= self.window {
            state.count = 1;
            state.started_at = now;
            return Admission::Allowed;
        }

        if state.count < self.budget {
            state.count += 1;
            return Admission::Allowed;
        }

        let remaining = self.window - (now - state.started_at);
        Admission::Denied {
            retry_after_secs: remaining.num_seconds().max(0) as u64,
        }
    }

    fn lock_windows(&self) -> MutexGuard<'_, HashMap<String, WindowState>> {
        // A poisoned lock only means another worker panicked mid-check;
        // the window map itself is still structurally sound.
        match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
