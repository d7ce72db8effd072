//! Per-client quota contract and its in-memory implementation.
//!
//! Handlers only ever see an `Arc<dyn QuotaStore>`, so a persistent or
//! differently-windowed store can be swapped in without touching them.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Result of a [`QuotaStore::try_consume`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// The request was counted; `used` includes it.
    Allowed { used: u64 },
    /// The caller already used `used >= max` requests; nothing was counted.
    Exceeded { used: u64 },
}

impl QuotaDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Storage for per-client request counts.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Requests counted for `client` in the current window (0 if unknown).
    async fn count(&self, client: &str) -> u64;

    /// Count one more request for `client` and return the new total.
    async fn increment(&self, client: &str) -> u64;

    /// Check `client` against `max` and count the request if it fits.
    ///
    /// The default is a plain read-compare-increment, which is not atomic:
    /// concurrent callers for the same client may slip past `max`. Stores
    /// that can do better should override it.
    async fn try_consume(&self, client: &str, max: u64) -> QuotaDecision {
        let used = self.count(client).await;
        if used >= max {
            return QuotaDecision::Exceeded { used };
        }
        QuotaDecision::Allowed {
            used: self.increment(client).await,
        }
    }
}

/// When counters reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuotaWindow {
    /// Counters reset at 00:00 UTC.
    #[default]
    UtcDay,
    /// Counters never reset while the process lives.
    Lifetime,
}

impl fmt::Display for QuotaWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UtcDay => f.write_str("utc-day"),
            Self::Lifetime => f.write_str("lifetime"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown quota window '{0}' (expected 'utc-day' or 'lifetime')")]
pub struct UnknownQuotaWindow(pub String);

impl FromStr for QuotaWindow {
    type Err = UnknownQuotaWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc-day" | "day" | "daily" => Ok(Self::UtcDay),
            "lifetime" | "process" => Ok(Self::Lifetime),
            _ => Err(UnknownQuotaWindow(s.to_string())),
        }
    }
}

/// Source of "now" for window bookkeeping.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Count for one client, tagged with the window it belongs to.
struct Tally {
    count: u64,
    /// `None` for [`QuotaWindow::Lifetime`].
    window: Option<NaiveDate>,
}

/// [`QuotaStore`] backed by a `DashMap` keyed by client identifier.
///
/// `try_consume` runs under the client's entry lock, so it is atomic per
/// client.
pub struct InMemoryQuotaStore {
    tallies: DashMap<String, Tally>,
    window: QuotaWindow,
    clock: Clock,
}

impl InMemoryQuotaStore {
    pub fn new(window: QuotaWindow) -> Self {
        Self::with_clock(window, Arc::new(Utc::now))
    }

    /// Create a store reading time from `clock`.
    pub fn with_clock(window: QuotaWindow, clock: Clock) -> Self {
        Self {
            tallies: DashMap::new(),
            window,
            clock,
        }
    }

    fn current_window(&self) -> Option<NaiveDate> {
        match self.window {
            QuotaWindow::UtcDay => Some((self.clock)().date_naive()),
            QuotaWindow::Lifetime => None,
        }
    }

    /// Apply `f` to the client's tally, resetting it first if it belongs to
    /// an older window.
    fn with_tally<R>(&self, client: &str, f: impl FnOnce(&mut Tally) -> R) -> R {
        let current = self.current_window();
        let mut entry = self
            .tallies
            .entry(client.to_string())
            .or_insert_with(|| Tally {
                count: 0,
                window: current,
            });
        if entry.window != current {
            entry.count = 0;
            entry.window = current;
        }
        f(entry.value_mut())
    }

    /// Drop tallies left over from previous windows.
    ///
    /// Call this periodically from a background task.
    pub fn gc(&self) {
        let current = self.current_window();
        self.tallies.retain(|_, tally| tally.window == current);
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.tallies.len()
    }
}

#[async_trait]
impl QuotaStore for InMemoryQuotaStore {
    async fn count(&self, client: &str) -> u64 {
        let current = self.current_window();
        self.tallies
            .get(client)
            .filter(|tally| tally.window == current)
            .map_or(0, |tally| tally.count)
    }

    async fn increment(&self, client: &str) -> u64 {
        self.with_tally(client, |tally| {
            tally.count += 1;
            tally.count
        })
    }

    async fn try_consume(&self, client: &str, max: u64) -> QuotaDecision {
        self.with_tally(client, |tally| {
            if tally.count >= max {
                QuotaDecision::Exceeded { used: tally.count }
            } else {
                tally.count += 1;
                QuotaDecision::Allowed { used: tally.count }
            }
        })
    }
}
