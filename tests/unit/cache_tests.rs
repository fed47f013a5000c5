//! TTL Cache Unit Tests
//!
//! Expiry is driven by a manual clock so no test sleeps.

use solkit::cache::{ManualClock, TtlCache, DEFAULT_TTL};
use solkit::metrics::Metrics;
use std::sync::Arc;
use std::time::Duration;

fn cache_with_clock<V: Clone>() -> (Arc<TtlCache<V>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    (Arc::new(TtlCache::with_clock(clock.clone())), clock)
}

#[test]
fn test_set_then_get_before_expiry() {
    let (cache, clock) = cache_with_clock();
    cache.set_with_ttl("k", 42, Duration::from_millis(1000));

    assert_eq!(cache.get("k"), Some(42));
    clock.advance(Duration::from_millis(500));
    assert_eq!(cache.get("k"), Some(42));
}

#[test]
fn test_absent_after_expiry() {
    let (cache, clock) = cache_with_clock();
    cache.set_with_ttl("k", 42, Duration::from_millis(1000));

    clock.advance(Duration::from_millis(1001));
    assert_eq!(cache.get("k"), None);
    assert!(cache.is_empty(), "Stale entry evicted on read");
}

#[test]
fn test_default_ttl_is_five_minutes() {
    assert_eq!(DEFAULT_TTL, Duration::from_secs(300));

    let (cache, clock) = cache_with_clock();
    cache.set("token", "USDC".to_string());

    clock.advance(Duration::from_secs(299));
    assert_eq!(cache.get("token").as_deref(), Some("USDC"));

    clock.advance(Duration::from_secs(2));
    assert_eq!(cache.get("token"), None);
}

#[test]
fn test_shared_between_owners() {
    let (cache, _clock) = cache_with_clock::<u64>();
    let writer = cache.clone();
    let reader = cache.clone();

    writer.set("nft-abc", 7);
    assert_eq!(reader.get("nft-abc"), Some(7));

    reader.delete("nft-abc");
    assert_eq!(writer.get("nft-abc"), None);
}

#[test]
fn test_concurrent_writers() {
    let (cache, _clock) = cache_with_clock::<usize>();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cache = cache.clone();
            std::thread::spawn(move || {
                for j in 0..100 {
                    cache.set(format!("{}-{}", i, j), j);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 800);
    assert_eq!(cache.get("3-42"), Some(42));
}

#[test]
fn test_lookups_are_counted() {
    let metrics = Arc::new(Metrics::new());
    let clock = Arc::new(ManualClock::default());
    let cache = TtlCache::with_clock(clock).instrumented("nft", metrics.clone());

    cache.set("nft-1", 1u8);
    cache.get("nft-1");
    cache.get("nft-2");

    let hits = metrics.cache_lookups.with_label_values(&["nft", "hit"]).get();
    let misses = metrics.cache_lookups.with_label_values(&["nft", "miss"]).get();
    assert_eq!((hits, misses), (1, 1));
}

#[test]
fn test_bounded_cache_reports_capacity() {
    let clock = Arc::new(ManualClock::default());
    let cache = TtlCache::with_capacity(2, clock.clone());
    cache.set("a", 1);
    cache.set("b", 2);
    cache.set("c", 3);

    let stats = cache.stats();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.capacity, Some(2));
    assert_eq!(cache.get("a"), None, "Least recently used dropped");

    clock.advance(DEFAULT_TTL);
    assert_eq!(cache.stats().expired, 2);
}
