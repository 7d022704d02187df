use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use zone_core::Location;

/// Paths between endpoints closer than this (Manhattan) are not cached.
pub const CACHE_MIN_DISTANCE: i32 = 2;

/// Default number of entries kept by a [`PathCache`].
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

type Key = (Location, Location);

#[derive(Debug)]
struct CachedPath {
    path: Vec<Location>,
    last_used: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<Key, CachedPath>,
    clock: u64,
}

impl CacheState {
    fn tick(&mut self) -> u64 {
        self.clock = self.clock.wrapping_add(1);
        self.clock
    }
}

/// Completed orthogonal paths keyed by `(start, goal)`.
///
/// Holds at most `capacity` entries; inserting into a full cache evicts the
/// least recently used one. A capacity of zero disables caching. The cache
/// is internally locked so a planner can be shared between threads.
#[derive(Debug)]
pub struct PathCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl PathCache {
    /// Create an empty cache holding at most `capacity` paths.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Maximum number of stored paths.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored paths.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every stored path.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// The stored path from `start` to `goal`, excluding `start`.
    pub fn get(&self, start: Location, goal: Location) -> Option<Vec<Location>> {
        self.get_if(start, goal, |_| true)
    }

    /// Like [`get`](Self::get), but only returns the path when `keep` accepts
    /// it. A rejected entry stays in the cache untouched.
    pub fn get_if(
        &self,
        start: Location,
        goal: Location,
        keep: impl Fn(&[Location]) -> bool,
    ) -> Option<Vec<Location>> {
        let mut state = self.lock();
        let now = state.tick();
        let cached = state.entries.get_mut(&(start, goal))?;
        if !keep(&cached.path) {
            return None;
        }
        cached.last_used = now;
        Some(cached.path.clone())
    }

    /// Store `path` for `(start, goal)` unless an entry already exists.
    pub fn insert(&self, start: Location, goal: Location, path: Vec<Location>) {
        if self.capacity == 0 {
            return;
        }
        let mut state = self.lock();
        if state.entries.contains_key(&(start, goal)) {
            return;
        }
        if state.entries.len() >= self.capacity {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, cached)| cached.last_used)
                .map(|(&key, _)| key);
            if let Some(key) = oldest {
                state.entries.remove(&key);
            }
        }
        let now = state.tick();
        state.entries.insert(
            (start, goal),
            CachedPath {
                path,
                last_used: now,
            },
        );
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // A panic while holding the lock cannot leave an entry half-written.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(x: i32, y: i32) -> Location {
        Location::new(x, y)
    }

    #[test]
    fn insert_and_get() {
        let cache = PathCache::new(4);
        assert!(cache.is_empty());
        cache.insert(loc(0, 0), loc(0, 3), vec![loc(0, 1), loc(0, 2), loc(0, 3)]);
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get(loc(0, 0), loc(0, 3)),
            Some(vec![loc(0, 1), loc(0, 2), loc(0, 3)])
        );
        assert_eq!(cache.get(loc(0, 3), loc(0, 0)), None);
    }

    #[test]
    fn first_insert_wins() {
        let cache = PathCache::new(4);
        cache.insert(loc(0, 0), loc(3, 0), vec![loc(1, 0), loc(2, 0), loc(3, 0)]);
        cache.insert(loc(0, 0), loc(3, 0), vec![loc(3, 0)]);
        assert_eq!(cache.get(loc(0, 0), loc(3, 0)).map(|p| p.len()), Some(3));
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = PathCache::new(2);
        cache.insert(loc(0, 0), loc(5, 0), vec![loc(5, 0)]);
        cache.insert(loc(1, 0), loc(5, 0), vec![loc(5, 0)]);
        // Touch the older entry so the newer one becomes the eviction victim.
        assert!(cache.get(loc(0, 0), loc(5, 0)).is_some());
        cache.insert(loc(2, 0), loc(5, 0), vec![loc(5, 0)]);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(loc(0, 0), loc(5, 0)).is_some());
        assert!(cache.get(loc(1, 0), loc(5, 0)).is_none());
        assert!(cache.get(loc(2, 0), loc(5, 0)).is_some());
    }

    #[test]
    fn zero_capacity_disables() {
        let cache = PathCache::new(0);
        cache.insert(loc(0, 0), loc(5, 0), vec![loc(5, 0)]);
        assert!(cache.is_empty());
    }

    #[test]
    fn rejected_entry_is_kept() {
        let cache = PathCache::new(2);
        cache.insert(loc(0, 0), loc(0, 4), vec![loc(0, 4)]);
        assert_eq!(cache.get_if(loc(0, 0), loc(0, 4), |_| false), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_empties() {
        let cache = PathCache::new(2);
        cache.insert(loc(0, 0), loc(0, 4), vec![loc(0, 4)]);
        cache.clear();
        assert!(cache.is_empty());
    }
}
