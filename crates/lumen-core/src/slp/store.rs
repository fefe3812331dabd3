//! Time-indexed, scope-aware SLP service/URL store.

use std::time::Duration;

use indexmap::IndexMap;

use crate::{error::SlpError, slp::scope::ScopeSet};

/// A service advertisement to insert or remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEntry {
    /// Scopes this advertisement is valid under. Must be non-empty.
    pub scopes: ScopeSet,
    /// Full URL, including the `service-type://` prefix.
    pub url: String,
    /// Seconds this entry remains valid from insertion.
    pub lifetime_seconds: u32,
}

/// One URL returned from a lookup, with its remaining lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    /// The URL.
    pub url: String,
    /// Time remaining before this entry expires.
    pub lifetime: Duration,
}

struct UrlRecord<I> {
    expires_at: I,
    lifetime: Duration,
}

struct Bucket<I> {
    scopes: ScopeSet,
    urls: IndexMap<String, UrlRecord<I>>,
}

/// Time-indexed SLP directory: service-type -> scope-locked bucket of URLs.
///
/// Insertion order within a bucket is preserved via `IndexMap` so `lookup`
/// yields deterministic results.
pub struct SlpStore<I> {
    buckets: IndexMap<String, Bucket<I>>,
}

impl<I> Default for SlpStore<I> {
    fn default() -> Self {
        Self { buckets: IndexMap::new() }
    }
}

impl<I: Copy + Ord + std::ops::Sub<Output = Duration> + AddDuration> SlpStore<I> {
    /// Construct an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn service_type_of(url: &str) -> Result<String, SlpError> {
        url.split_once("://")
            .map(|(prefix, _)| prefix.to_string())
            .ok_or_else(|| SlpError::MissingServiceType { url: url.to_string() })
    }

    /// Insert or refresh a service entry at time `now`.
    ///
    /// Returns `Err(ScopeMismatch)` if the bucket already exists with a
    /// different scope set; the store is left unchanged in that case. If
    /// the URL already exists, the longer of the existing and new
    /// expiration wins — a shorter lifetime never shrinks an entry.
    pub fn insert(&mut self, now: I, entry: &ServiceEntry) -> Result<(), SlpError> {
        let service_type = Self::service_type_of(&entry.url)?;
        let lifetime = Duration::from_secs(u64::from(entry.lifetime_seconds));

        let bucket = self
            .buckets
            .entry(service_type.clone())
            .or_insert_with(|| Bucket { scopes: entry.scopes.clone(), urls: IndexMap::new() });

        if bucket.scopes != entry.scopes {
            return Err(SlpError::ScopeMismatch { service_type });
        }

        match bucket.urls.get_mut(&entry.url) {
            Some(existing) => {
                let candidate_expires_at = now.add_duration(lifetime);
                if candidate_expires_at > existing.expires_at {
                    existing.expires_at = candidate_expires_at;
                    existing.lifetime = lifetime;
                }
            },
            None => {
                bucket.urls.insert(
                    entry.url.clone(),
                    UrlRecord { expires_at: now.add_duration(lifetime), lifetime },
                );
            },
        }

        Ok(())
    }

    /// Remove a service entry.
    ///
    /// Returns `Err(ScopeMismatch)` if the bucket's scopes differ from
    /// `entry.scopes`. Removing an absent URL, or a URL under an absent
    /// bucket, is a no-op success. The bucket is dropped once empty.
    pub fn remove(&mut self, entry: &ServiceEntry) -> Result<(), SlpError> {
        let service_type = Self::service_type_of(&entry.url)?;

        let Some(bucket) = self.buckets.get_mut(&service_type) else {
            return Ok(());
        };
        if bucket.scopes != entry.scopes {
            return Err(SlpError::ScopeMismatch { service_type });
        }

        bucket.urls.shift_remove(&entry.url);
        if bucket.urls.is_empty() {
            self.buckets.shift_remove(&service_type);
        }
        Ok(())
    }

    /// Look up all live URLs for `service_type` intersecting `scopes` at
    /// time `now`. Lazily discards expired entries as it walks the bucket.
    pub fn lookup(&mut self, now: I, scopes: &ScopeSet, service_type: &str) -> Vec<UrlEntry> {
        let Some(bucket) = self.buckets.get_mut(service_type) else {
            return Vec::new();
        };
        if !bucket.scopes.intersects(scopes) {
            return Vec::new();
        }

        bucket.urls.retain(|_, record| record.expires_at > now);

        let mut out = Vec::with_capacity(bucket.urls.len());
        for (url, record) in &bucket.urls {
            out.push(UrlEntry { url: url.clone(), lifetime: record.expires_at - now });
        }

        if bucket.urls.is_empty() {
            self.buckets.shift_remove(service_type);
        }

        out
    }

    /// Number of non-empty buckets, after discarding fully-expired buckets.
    pub fn service_count(&mut self, now: I) -> usize {
        self.buckets.retain(|_, bucket| {
            bucket.urls.retain(|_, record| record.expires_at > now);
            !bucket.urls.is_empty()
        });
        self.buckets.len()
    }

    /// Clear all buckets.
    pub fn reset(&mut self) {
        self.buckets.clear();
    }
}

/// Adds a `Duration` to an instant type. `std::time::Instant` implements
/// `Add<Duration>` natively; this trait lets `SlpStore` stay generic over
/// any monotonic instant type that supports the same arithmetic.
pub trait AddDuration {
    /// Return `self + duration`.
    fn add_duration(self, duration: Duration) -> Self;
}

impl AddDuration for std::time::Instant {
    fn add_duration(self, duration: Duration) -> Self {
        self + duration
    }
}
