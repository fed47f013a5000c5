//! TTL cache for slow lookups
//!
//! Memoizes the result of expensive external lookups (token metadata,
//! token lists, NFT assets) keyed by an arbitrary string.
//! - An entry is visible only while `now < expires_at`
//! - Stale entries are evicted lazily on the next read
//! - Default TTL: 5 minutes, overridable per write
//! - Unbounded by default; `with_capacity` adds LRU eviction

use crate::config::CacheConfig;
use crate::metrics::Metrics;
use chrono::{DateTime, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

/// Default time-to-live for cache writes
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
/// Time-to-live used for token and NFT metadata
pub const METADATA_TTL: Duration = Duration::from_secs(10 * 60);
/// Time-to-live used for the verified token list
pub const TOKEN_LIST_TTL: Duration = Duration::from_secs(30 * 60);

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = add_saturating(*now, by);
    }

    /// Jump to an absolute instant
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

fn add_saturating(at: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(by)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Cache entry with creation and expiry timestamps
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Key/value store with per-entry expiry
pub struct TtlCache<V> {
    /// Underlying store, recency-ordered
    entries: Mutex<LruCache<String, CacheEntry<V>>>,
    /// TTL applied by `set`
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
    /// Name used as the metrics label
    name: &'static str,
    metrics: Option<Arc<Metrics>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create an unbounded cache using the wall clock and [`DEFAULT_TTL`]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an unbounded cache reading time from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(LruCache::unbounded()),
            default_ttl: DEFAULT_TTL,
            clock,
            name: "default",
            metrics: None,
        }
    }

    /// Create a cache holding at most `capacity` entries
    ///
    /// When full, the least recently used entry is dropped to make room,
    /// even if it has not expired yet.
    pub fn with_capacity(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(cap)),
            default_ttl: DEFAULT_TTL,
            clock,
            name: "default",
            metrics: None,
        }
    }

    /// Create a wall-clock cache sized and timed by `config`
    pub fn from_config(config: &CacheConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache = match config.capacity {
            Some(capacity) => Self::with_capacity(capacity, clock),
            None => Self::with_clock(clock),
        };
        cache.default_ttl(config.default_ttl())
    }

    /// Override the TTL applied by [`set`](Self::set)
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Report hits and misses under `name`
    pub fn instrumented(mut self, name: &'static str, metrics: Arc<Metrics>) -> Self {
        self.name = name;
        self.metrics = Some(metrics);
        self
    }

    /// Get a value if it exists and hasn't expired
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let lookup = entries.get(key).map(|entry| {
            (now < entry.expires_at).then(|| (entry.value.clone(), entry.created_at))
        });

        let hit = match lookup {
            Some(Some((value, created_at))) => {
                tracing::trace!(
                    cache = self.name,
                    key = key,
                    age_ms = (now - created_at).num_milliseconds(),
                    "Cache hit"
                );
                Some(value)
            }
            Some(None) => {
                tracing::trace!(cache = self.name, key = key, "Cache entry expired");
                entries.pop(key);
                None
            }
            None => None,
        };
        drop(entries);

        if let Some(metrics) = &self.metrics {
            metrics.record_cache_lookup(self.name, hit.is_some());
        }
        hit
    }

    /// Store a value with the default TTL
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Store a value that expires `ttl` from now
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let created_at = self.clock.now();
        let entry = CacheEntry {
            value,
            created_at,
            expires_at: add_saturating(created_at, ttl),
        };

        tracing::trace!(cache = self.name, key = %key, ttl_ms = ttl.as_millis() as u64, "Cache insert");
        self.entries.lock().put(key, entry);
    }

    /// Remove an entry
    pub fn delete(&self, key: &str) {
        self.entries.lock().pop(key);
        tracing::trace!(cache = self.name, key = key, "Cache delete");
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.entries.lock().clear();
        tracing::debug!(cache = self.name, "Cache cleared");
    }

    /// Number of stored entries, including stale ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        let now = self.clock.now();
        CacheStats {
            entries: entries.len(),
            expired: entries.iter().filter(|(_, e)| now >= e.expires_at).count(),
            capacity: Some(entries.cap().get()).filter(|cap| *cap != usize::MAX),
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of stored entries
    pub entries: usize,
    /// Entries past their expiry still awaiting lazy eviction
    pub expired: usize,
    /// Maximum capacity, `None` when unbounded
    pub capacity: Option<usize>,
}
