//! Fixed-epoch request governor keyed by client IP or origin.
//!
//! Counters live in a single table that is swapped out wholesale at every
//! epoch boundary. The cut is a hard edge, not a sliding window: a caller
//! that spent its budget at the end of one epoch gets the full budget again
//! at the start of the next.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::security::origin::is_local_origin;

type CounterTable = DashMap<String, u32>;

/// Which identity a request was counted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Ip,
    Origin,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Ip => "ip",
            Scope::Origin => "origin",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Admitted { count: u32, limit: u32, scope: Scope },
    Rejected { count: u32, limit: u32, scope: Scope },
}

impl Verdict {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Verdict::Admitted { .. })
    }

    /// The limit that governed this request.
    pub fn limit(&self) -> u32 {
        match self {
            Verdict::Admitted { limit, .. } | Verdict::Rejected { limit, .. } => *limit,
        }
    }

    pub fn scope(&self) -> Scope {
        match self {
            Verdict::Admitted { scope, .. } | Verdict::Rejected { scope, .. } => *scope,
        }
    }
}

/// Per-identity hit counter with periodic wholesale reset.
pub struct RateGovernor {
    counters: ArcSwap<CounterTable>,
    default_limit: u32,
    origin_limit: u32,
    epochs: AtomicU64,
}

impl RateGovernor {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            counters: ArcSwap::from_pointee(CounterTable::new()),
            default_limit: config.default_limit,
            origin_limit: config.origin_limit,
            epochs: AtomicU64::new(0),
        }
    }

    /// The scope and limit that apply to a caller presenting `origin`.
    ///
    /// An empty origin is always counted by IP.
    pub fn limit_for(&self, origin: &str) -> (Scope, u32) {
        if self.origin_limit > 0 && !origin.is_empty() && !is_local_origin(origin) {
            (Scope::Origin, self.origin_limit)
        } else {
            (Scope::Ip, self.default_limit)
        }
    }

    /// Count one request and decide whether it may proceed.
    ///
    /// The Nth request of an epoch for a key is admitted iff N < limit.
    pub fn evaluate(&self, ip: &str, origin: &str) -> Verdict {
        let (scope, limit) = self.limit_for(origin);
        let key = match scope {
            Scope::Origin => origin,
            Scope::Ip => ip,
        };

        let count = self.increment(key);
        if count < limit {
            Verdict::Admitted { count, limit, scope }
        } else {
            Verdict::Rejected { count, limit, scope }
        }
    }

    fn increment(&self, key: &str) -> u32 {
        let table = self.counters.load();
        // The shard write lock is held until `entry` drops.
        let mut entry = table.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }

    /// Replace the counter table with an empty one.
    ///
    /// Returns the number of keys that were being tracked.
    pub fn reset(&self) -> usize {
        let previous = self.counters.swap(Arc::new(CounterTable::new()));
        self.epochs.fetch_add(1, Ordering::SeqCst);
        previous.len()
    }

    /// Number of distinct keys seen in the current epoch.
    pub fn tracked_keys(&self) -> usize {
        self.counters.load().len()
    }

    /// Number of resets performed since construction.
    pub fn epoch(&self) -> u64 {
        self.epochs.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for RateGovernor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateGovernor")
            .field("default_limit", &self.default_limit)
            .field("origin_limit", &self.origin_limit)
            .field("tracked_keys", &self.tracked_keys())
            .field("epoch", &self.epoch())
            .finish()
    }
}
