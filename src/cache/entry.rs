//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with age tracking.

use tokio::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and timing metadata.
///
/// Timestamps come from `tokio::time::Instant`, so a paused test runtime
/// controls entry age deterministically.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the value was written (reset on overwrite)
    pub stored_at: Instant,
    /// When the entry was last read or written
    pub last_accessed: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stored at `now`.
    pub fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            stored_at: now,
            last_accessed: now,
        }
    }

    // == Age ==
    /// Time elapsed since the value was stored.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry whose age equals the TTL exactly is still
    /// fresh; it expires once its age is strictly greater than the TTL.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) > ttl
    }

    // == Touch ==
    /// Records a read at `now`. Does not extend the entry's lifetime.
    pub fn touch(&mut self, now: Instant) {
        self.last_accessed = now;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn test_entry_creation() {
        let now = Instant::now();
        let entry = CacheEntry::new("test_value", now);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.stored_at, now);
        assert_eq!(entry.last_accessed, now);
        assert!(!entry.is_expired(TTL, now));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::new("test", now);

        assert!(!entry.is_expired(TTL, now + TTL), "age == ttl is still fresh");
        assert!(entry.is_expired(TTL, now + TTL + Duration::from_millis(1)));
    }

    #[test]
    fn test_touch_does_not_extend_lifetime() {
        let now = Instant::now();
        let mut entry = CacheEntry::new("test", now);

        let later = now + Duration::from_secs(30);
        entry.touch(later);

        assert_eq!(entry.last_accessed, later);
        assert_eq!(entry.stored_at, now);
        assert!(entry.is_expired(TTL, now + Duration::from_secs(61)));
    }

    #[test]
    fn test_age_saturates_for_earlier_instant() {
        let now = Instant::now();
        let entry = CacheEntry::new("test", now + Duration::from_secs(5));

        assert_eq!(entry.age(now), Duration::ZERO);
    }
}
