//! TTL cache for travel-time bundles.
//!
//! The cache is keyed by origin/destination coordinate pairs and backed
//! by a [`KeyValueStore`] through write-through persistence: every
//! mutation of the entry map is persisted immediately, so a crash never
//! loses more than in-flight statistics. Persistence failures degrade
//! the cache to memory-only operation rather than failing lookups.

use std::collections::HashMap;

use geo::Coord;
use log::{debug, warn};
use nestwise_core::{Clock, KeyValueStore, SystemClock, TravelTimeBundle};
use serde::{Deserialize, Serialize};

/// Entry lifetime in milliseconds (24 hours).
///
/// Expiry is soft: an expired entry reads as a miss but is only removed
/// by [`TravelTimeCache::cleanup`], so a read never mutates the entry
/// map.
pub const CACHE_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Upper bound on stored entries. Exceeding it evicts the oldest
/// entries in a batch.
pub const MAX_CACHE_ENTRIES: usize = 100;

/// Minimum number of entries removed per eviction pass, so eviction
/// does not run on every insert once the cache is full.
const EVICTION_BATCH: usize = MAX_CACHE_ENTRIES / 5;

/// Key under which the payload is persisted.
const STORE_KEY: &str = "nestwise.travel-cache";

/// Persisted payload format version.
const PAYLOAD_VERSION: &str = "1";

/// Coordinates closer than this are considered the same origin, in
/// degrees. Roughly 10 cm at the equator.
const ORIGIN_TOLERANCE_DEG: f64 = 1e-6;

/// One cached origin/destination travel-time result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Cached per-mode estimates.
    pub bundle: TravelTimeBundle,
    /// Insertion time in milliseconds since the Unix epoch.
    pub created_at_ms: u64,
    /// Origin latitude at insertion time.
    pub origin_lat: f64,
    /// Origin longitude at insertion time.
    pub origin_lng: f64,
}

/// Hit/miss/eviction counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheStats {
    /// Reads answered from the cache.
    pub hits: u64,
    /// Reads that found nothing usable.
    pub misses: u64,
    /// Entries removed by capacity eviction.
    pub evictions: u64,
}

/// Owned persisted payload, read at startup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachePayload {
    entries: HashMap<String, CacheEntry>,
    #[serde(default)]
    stats: CacheStats,
    version: String,
}

/// Borrowed view of the payload, written on every persist.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CachePayloadRef<'a> {
    entries: &'a HashMap<String, CacheEntry>,
    stats: &'a CacheStats,
    version: &'a str,
    last_updated: u64,
}

/// Capacity-bounded TTL cache with write-through persistence.
pub struct TravelTimeCache {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for TravelTimeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelTimeCache")
            .field("entries", &self.entries.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl TravelTimeCache {
    /// Create a cache backed by `store`, timed by `clock`.
    ///
    /// Previously persisted entries are restored; a missing, corrupt or
    /// incompatible payload starts the cache empty. Expired entries are
    /// removed immediately after loading.
    pub fn new(store: impl KeyValueStore + 'static, clock: impl Clock + 'static) -> Self {
        let store: Box<dyn KeyValueStore> = Box::new(store);
        let (entries, stats) = Self::load(store.as_ref());
        let mut cache = Self {
            entries,
            stats,
            store,
            clock: Box::new(clock),
        };
        cache.cleanup();
        cache
    }

    /// Create a cache backed by `store`, timed by the system clock.
    pub fn with_system_clock(store: impl KeyValueStore + 'static) -> Self {
        Self::new(store, SystemClock)
    }

    fn load(store: &dyn KeyValueStore) -> (HashMap<String, CacheEntry>, CacheStats) {
        let raw = match store.get_item(STORE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return (HashMap::new(), CacheStats::default()),
            Err(err) => {
                warn!("travel cache load failed, starting empty: {err}");
                return (HashMap::new(), CacheStats::default());
            }
        };
        match serde_json::from_str::<CachePayload>(&raw) {
            Ok(payload) if payload.version == PAYLOAD_VERSION => (payload.entries, payload.stats),
            Ok(payload) => {
                warn!(
                    "travel cache version {} is not {PAYLOAD_VERSION}, starting empty",
                    payload.version
                );
                (HashMap::new(), CacheStats::default())
            }
            Err(err) => {
                warn!("travel cache payload is corrupt, starting empty: {err}");
                (HashMap::new(), CacheStats::default())
            }
        }
    }

    /// Key for one origin/destination pair, latitude first, rounded to
    /// six decimal places so near-identical coordinates share an entry.
    fn cache_key(origin: Coord<f64>, destination: Coord<f64>) -> String {
        format!(
            "{:.6},{:.6}_{:.6},{:.6}",
            origin.y, origin.x, destination.y, destination.x
        )
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.clock.now_ms().saturating_sub(entry.created_at_ms) > CACHE_TTL_MS
    }

    /// Look up the bundle for one origin/destination pair.
    ///
    /// Expired entries read as misses but stay in place until
    /// [`Self::cleanup`]. Statistics are updated on every call; they
    /// are only persisted alongside the next entry mutation.
    pub fn get(&mut self, origin: Coord<f64>, destination: Coord<f64>) -> Option<TravelTimeBundle> {
        let key = Self::cache_key(origin, destination);
        match self.entries.get(&key) {
            Some(entry) if !self.is_expired(entry) => {
                self.stats.hits += 1;
                Some(entry.bundle)
            }
            _ => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Insert or replace the bundle for one origin/destination pair,
    /// evicting the oldest entries if the capacity bound is exceeded.
    pub fn set(&mut self, origin: Coord<f64>, destination: Coord<f64>, bundle: TravelTimeBundle) {
        let key = Self::cache_key(origin, destination);
        self.entries.insert(
            key,
            CacheEntry {
                bundle,
                created_at_ms: self.clock.now_ms(),
                origin_lat: origin.y,
                origin_lng: origin.x,
            },
        );
        self.evict_overflow();
        self.persist();
    }

    /// Remove oldest entries when over capacity.
    ///
    /// Removes at least [`EVICTION_BATCH`] entries per pass so a full
    /// cache does not evict on every single insert.
    fn evict_overflow(&mut self) {
        if self.entries.len() <= MAX_CACHE_ENTRIES {
            return;
        }
        let excess = self.entries.len() - MAX_CACHE_ENTRIES;
        let target = excess.max(EVICTION_BATCH);

        let mut by_age: Vec<(String, u64)> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.created_at_ms))
            .collect();
        by_age.sort_by_key(|&(_, created_at_ms)| created_at_ms);

        for (key, _) in by_age.into_iter().take(target) {
            self.entries.remove(&key);
            self.stats.evictions += 1;
        }
        debug!("travel cache evicted {target} entries");
    }

    /// Remove entries whose stored origin matches `origin` within the
    /// coordinate tolerance. Returns the number removed.
    ///
    /// Called with the outgoing origin when the work location changes;
    /// its entries would otherwise be served for up to a day.
    pub fn invalidate_by_origin(&mut self, origin: Coord<f64>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            (entry.origin_lat - origin.y).abs() > ORIGIN_TOLERANCE_DEG
                || (entry.origin_lng - origin.x).abs() > ORIGIN_TOLERANCE_DEG
        });
        let removed = before - self.entries.len();
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Remove every expired entry. Returns the number removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_sub(entry.created_at_ms) <= CACHE_TTL_MS);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Drop every entry and reset statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
        if let Err(err) = self.store.remove_item(STORE_KEY) {
            warn!("travel cache clear could not remove persisted payload: {err}");
        }
    }

    /// Number of stored entries, including expired ones awaiting
    /// cleanup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the hit/miss/eviction counters.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Persist the full payload, degrading to memory-only on failure.
    fn persist(&mut self) {
        let payload = CachePayloadRef {
            entries: &self.entries,
            stats: &self.stats,
            version: PAYLOAD_VERSION,
            last_updated: self.clock.now_ms(),
        };
        let raw = match serde_json::to_string(&payload) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("travel cache payload could not be serialised: {err}");
                return;
            }
        };
        if let Err(err) = self.store.set_item(STORE_KEY, &raw) {
            warn!("travel cache persistence failed, continuing in memory: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use nestwise_core::test_support::ManualClock;
    use nestwise_core::{LegEstimate, MemoryStore, StoreError, TravelMode};
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    use super::*;

    /// Store handle that can outlive the cache owning it, for
    /// persistence round-trip tests.
    #[derive(Debug, Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.borrow().get_item(key)
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.borrow_mut().set_item(key, value)
        }

        fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
            self.0.borrow_mut().remove_item(key)
        }
    }

    fn bundle(duration_min: f64) -> TravelTimeBundle {
        TravelTimeBundle::default().with_leg(
            TravelMode::Driving,
            LegEstimate::new(duration_min * 1000.0, duration_min).unwrap(),
        )
    }

    fn origin() -> Coord<f64> {
        Coord { x: -0.1, y: 51.5 }
    }

    #[expect(clippy::cast_precision_loss, reason = "small test indices")]
    fn destination(i: usize) -> Coord<f64> {
        Coord {
            x: -0.2 - (i as f64) * 0.01,
            y: 51.6,
        }
    }

    #[fixture]
    fn cache() -> TravelTimeCache {
        TravelTimeCache::new(MemoryStore::new(), ManualClock::at(1_000))
    }

    #[rstest]
    fn set_then_get_hits(mut cache: TravelTimeCache) {
        cache.set(origin(), destination(0), bundle(12.0));

        let found = cache.get(origin(), destination(0));

        assert_eq!(found, Some(bundle(12.0)));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 0);
    }

    #[rstest]
    fn absent_pair_is_a_miss(mut cache: TravelTimeCache) {
        assert_eq!(cache.get(origin(), destination(0)), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[rstest]
    fn near_identical_coordinates_share_an_entry(mut cache: TravelTimeCache) {
        cache.set(origin(), destination(0), bundle(12.0));

        // Perturbation below the sixth decimal place rounds to the
        // same key.
        let nudged = Coord {
            x: destination(0).x + 4e-8,
            y: destination(0).y - 4e-8,
        };

        assert_eq!(cache.get(origin(), nudged), Some(bundle(12.0)));
    }

    #[rstest]
    fn expired_entry_reads_as_miss_but_stays_until_cleanup() {
        let clock = ManualClock::at(1_000);
        let mut cache = TravelTimeCache::new(MemoryStore::new(), clock.clone());
        cache.set(origin(), destination(0), bundle(12.0));

        clock.advance(CACHE_TTL_MS + 1);

        assert_eq!(cache.get(origin(), destination(0)), None);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.cleanup(), 1);
        assert!(cache.is_empty());
    }

    #[rstest]
    fn entry_at_exact_ttl_is_still_fresh() {
        let clock = ManualClock::at(1_000);
        let mut cache = TravelTimeCache::new(MemoryStore::new(), clock.clone());
        cache.set(origin(), destination(0), bundle(12.0));

        clock.advance(CACHE_TTL_MS);

        assert_eq!(cache.get(origin(), destination(0)), Some(bundle(12.0)));
    }

    #[rstest]
    fn reads_are_idempotent(mut cache: TravelTimeCache) {
        cache.set(origin(), destination(0), bundle(12.0));

        let first = cache.get(origin(), destination(0));
        let second = cache.get(origin(), destination(0));

        assert_eq!(first, second);
        assert_eq!(cache.stats().hits, 2);
        assert_eq!(cache.len(), 1);
    }

    #[rstest]
    fn eviction_keeps_the_newest_entries() {
        let clock = ManualClock::at(1_000);
        let mut cache = TravelTimeCache::new(MemoryStore::new(), clock.clone());

        for i in 0..150 {
            cache.set(origin(), destination(i), bundle(12.0));
            clock.advance(1);
        }

        assert!(cache.len() <= MAX_CACHE_ENTRIES);
        assert!(cache.stats().evictions >= 50);
        // Newest survives, oldest went first.
        assert!(cache.get(origin(), destination(149)).is_some());
        assert!(cache.get(origin(), destination(0)).is_none());
    }

    #[rstest]
    fn persisted_entries_survive_a_reload() {
        let store = SharedStore::default();
        let clock = ManualClock::at(1_000);
        {
            let mut cache = TravelTimeCache::new(store.clone(), clock.clone());
            cache.set(origin(), destination(0), bundle(12.0));
        }

        let mut reloaded = TravelTimeCache::new(store, clock);

        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get(origin(), destination(0)), Some(bundle(12.0)));
    }

    #[rstest]
    fn reload_drops_entries_that_expired_while_away() {
        let store = SharedStore::default();
        let clock = ManualClock::at(1_000);
        {
            let mut cache = TravelTimeCache::new(store.clone(), clock.clone());
            cache.set(origin(), destination(0), bundle(12.0));
        }

        clock.advance(CACHE_TTL_MS + 1);
        let reloaded = TravelTimeCache::new(store, clock);

        assert!(reloaded.is_empty());
    }

    #[rstest]
    #[case::corrupt_json("not json{")]
    #[case::wrong_version(r#"{"entries":{},"stats":{},"version":"0","lastUpdated":0}"#)]
    fn unusable_payload_starts_empty(#[case] raw: &str) {
        let mut store = MemoryStore::new();
        store.set_item(STORE_KEY, raw).unwrap();

        let cache = TravelTimeCache::new(store, ManualClock::at(1_000));

        assert!(cache.is_empty());
    }

    #[rstest]
    fn quota_exhaustion_degrades_to_memory_only() {
        let mut cache =
            TravelTimeCache::new(MemoryStore::with_capacity_bytes(4), ManualClock::at(1_000));

        cache.set(origin(), destination(0), bundle(12.0));

        assert_eq!(cache.get(origin(), destination(0)), Some(bundle(12.0)));
    }

    #[rstest]
    fn origin_change_invalidates_that_origins_entries() {
        let clock = ManualClock::at(1_000);
        let mut cache = TravelTimeCache::new(MemoryStore::new(), clock);
        cache.set(origin(), destination(0), bundle(12.0));
        cache.set(origin(), destination(1), bundle(20.0));
        let moved = Coord { x: -0.5, y: 51.5 };
        cache.set(moved, destination(2), bundle(8.0));

        // The old work location is passed; only its entries go.
        let removed = cache.invalidate_by_origin(origin());

        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(origin(), destination(0)).is_none());
        assert!(cache.get(moved, destination(2)).is_some());
    }

    #[rstest]
    fn origin_within_tolerance_counts_as_a_match(mut cache: TravelTimeCache) {
        cache.set(origin(), destination(0), bundle(12.0));

        let nudged = Coord {
            x: origin().x + 5e-7,
            y: origin().y - 5e-7,
        };

        assert_eq!(cache.invalidate_by_origin(nudged), 1);
        assert!(cache.is_empty());
    }

    #[rstest]
    fn unrelated_origin_invalidates_nothing(mut cache: TravelTimeCache) {
        cache.set(origin(), destination(0), bundle(12.0));

        assert_eq!(
            cache.invalidate_by_origin(Coord { x: -0.5, y: 51.5 }),
            0
        );
        assert_eq!(cache.len(), 1);
    }

    #[rstest]
    fn clear_resets_entries_and_stats() {
        let store = SharedStore::default();
        let mut cache = TravelTimeCache::new(store.clone(), ManualClock::at(1_000));
        cache.set(origin(), destination(0), bundle(12.0));
        let _ = cache.get(origin(), destination(0));

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
        assert_eq!(store.get_item(STORE_KEY).unwrap(), None);
    }

    proptest! {
        #[test]
        fn capacity_bound_holds_for_any_insert_count(inserts in 0usize..400) {
            let clock = ManualClock::at(1_000);
            let mut cache = TravelTimeCache::new(MemoryStore::new(), clock.clone());
            for i in 0..inserts {
                cache.set(origin(), destination(i), bundle(10.0));
                clock.advance(1);
            }
            prop_assert!(cache.len() <= MAX_CACHE_ENTRIES);
            prop_assert!(cache.len() <= inserts);
            if inserts <= MAX_CACHE_ENTRIES {
                prop_assert_eq!(cache.len(), inserts);
            }
        }
    }
}
