//! TTL caches for backend snapshots.

use crate::content::Course;
use crate::enrollment::EnrollmentSnapshot;
use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::hash::Hash;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Hashed form of a bearer token, safe to keep as a map key and to log.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn from_token(token: &str) -> Self {
        let digest = Sha256::digest(token.as_bytes());
        Self(hex::encode(&digest[..16]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}...", &self.0[..8.min(self.0.len())])
    }
}

struct Entry<V> {
    value: V,
    cached_at: Instant,
}

/// Concurrent map whose entries expire after a fixed TTL.
pub struct TtlCache<K, V> {
    entries: DashMap<K, Entry<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Returns a live entry, evicting it if it has expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.cached_at.elapsed() < self.ttl {
            return Some(entry.value.clone());
        }
        drop(entry);
        self.entries.remove(key);
        None
    }

    /// Stores `value`, restarting its TTL.
    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                cached_at: Instant::now(),
            },
        );
    }

    /// Removes one entry; true if it was present.
    pub fn invalidate(&self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drops every entry matching `pred`, returning how many were removed.
    pub fn invalidate_where<F>(&self, pred: F) -> usize
    where
        F: Fn(&K) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pred(key));
        before - self.entries.len()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cleanup_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.cached_at.elapsed() < ttl);
    }

    pub fn stats(&self) -> CacheStats {
        let total = self.entries.len();
        let expired = self
            .entries
            .iter()
            .filter(|entry| entry.cached_at.elapsed() >= self.ttl)
            .count();
        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total.saturating_sub(expired),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Stops hammering the backend after repeated transient failures.
pub struct CircuitBreaker {
    failures: AtomicU32,
    opened_at: Mutex<Option<Instant>>,
    threshold: u32,
    recovery_time: Duration,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, recovery_time: Duration) -> Self {
        Self {
            failures: AtomicU32::new(0),
            opened_at: Mutex::new(None),
            threshold,
            recovery_time,
        }
    }

    /// Open once `threshold` failures accumulate; closes again after `recovery_time`.
    pub fn is_open(&self) -> bool {
        if self.failures.load(Ordering::Relaxed) < self.threshold {
            return false;
        }
        let recovered = match self.opened_at.lock() {
            Ok(guard) => guard.map_or(true, |at| at.elapsed() > self.recovery_time),
            Err(_) => true,
        };
        if recovered {
            self.record_success();
        }
        !recovered
    }

    pub fn record_success(&self) {
        self.failures.store(0, Ordering::Relaxed);
        if let Ok(mut guard) = self.opened_at.lock() {
            *guard = None;
        }
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut guard) = self.opened_at.lock() {
            *guard = Some(Instant::now());
        }
    }

    pub fn failure_count(&self) -> u32 {
        self.failures.load(Ordering::Relaxed)
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(30))
    }
}

/// Key of a cached enrollment: whose token, which course.
pub type EnrollmentKey = (SessionKey, String);

/// Course and enrollment caches shared by the client and the HTTP layer.
pub struct SnapshotCacheState {
    pub courses: TtlCache<String, Course>,
    pub enrollments: TtlCache<EnrollmentKey, EnrollmentSnapshot>,
    pub circuit_breaker: CircuitBreaker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCacheStats {
    pub courses: CacheStats,
    pub enrollments: CacheStats,
    pub circuit_failures: u32,
}

impl SnapshotCacheState {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            courses: TtlCache::new(ttl),
            enrollments: TtlCache::new(ttl),
            circuit_breaker: CircuitBreaker::default(),
        }
    }

    pub fn stats(&self) -> SnapshotCacheStats {
        SnapshotCacheStats {
            courses: self.courses.stats(),
            enrollments: self.enrollments.stats(),
            circuit_failures: self.circuit_breaker.failure_count(),
        }
    }

    /// Forgets a course tree and every enrollment cached against it.
    /// Returns the number of entries removed.
    pub fn invalidate_course(&self, course_id: &str) -> usize {
        let course = usize::from(self.courses.invalidate(&course_id.to_string()));
        course + self.enrollments.invalidate_where(|(_, id)| id == course_id)
    }

    /// Empties both caches.
    pub fn clear(&self) {
        self.courses.clear();
        self.enrollments.clear();
    }
}

impl Default for SnapshotCacheState {
    fn default() -> Self {
        Self::with_ttl(Duration::from_secs(5 * 60))
    }
}
