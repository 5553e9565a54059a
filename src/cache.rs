//! Optional similarity cache collaborator.
//!
//! Raw cosine over a multi-thousand-component pair is the expensive step of
//! a scan, and repeated queries against a stable catalogue recompute the
//! same pairs. Callers that want memoization inject a [`SimilarityCache`]
//! via [`crate::engine::OverlapEngine::with_cache`]; the engine itself owns
//! no cross-call state. Cached values are raw cosines, not calibrated
//! scores, so changing policy or threshold never invalidates an entry.

use std::hash::Hasher;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use fxhash::FxHasher64;
use lru::LruCache;

/// Content-addressed cache of raw cosine similarities.
///
/// Keys are produced by [`pair_key`] from the two vectors' contents, so a
/// re-fetched corpus snapshot with identical embeddings hits the same
/// entries.
pub trait SimilarityCache: Send + Sync {
    fn get(&self, key: u64) -> Option<f32>;
    fn put(&self, key: u64, raw: f32);
}

/// [`SimilarityCache`] with least-recently-used eviction.
pub struct LruSimilarityCache {
    inner: Mutex<LruCache<u64, f32>>,
}

impl LruSimilarityCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl SimilarityCache for LruSimilarityCache {
    fn get(&self, key: u64) -> Option<f32> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .copied()
    }

    fn put(&self, key: u64, raw: f32) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(key, raw);
    }
}

/// Content-hash key for an ordered vector pair.
pub fn pair_key(query: &[f32], candidate: &[f32]) -> u64 {
    let mut hasher = FxHasher64::default();
    hasher.write_usize(query.len());
    for value in query {
        hasher.write_u32(value.to_bits());
    }
    // Separator keeps (a ++ b) splits from colliding across the boundary.
    hasher.write_u8(0xFF);
    for value in candidate {
        hasher.write_u32(value.to_bits());
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> LruSimilarityCache {
        LruSimilarityCache::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[test]
    fn put_then_get() {
        let cache = cache(4);
        cache.put(42, 0.93);
        assert_eq!(cache.get(42), Some(0.93));
        assert_eq!(cache.get(7), None);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = cache(2);
        cache.put(1, 0.1);
        cache.put(2, 0.2);
        // Touch 1 so 2 becomes the eviction candidate.
        assert_eq!(cache.get(1), Some(0.1));
        cache.put(3, 0.3);

        assert_eq!(cache.get(1), Some(0.1));
        assert_eq!(cache.get(2), None);
        assert_eq!(cache.get(3), Some(0.3));
    }

    #[test]
    fn pair_key_depends_on_content() {
        let a = vec![0.1_f32, 0.2];
        let b = vec![0.3_f32, 0.4];
        let c = vec![0.3_f32, 0.5];
        assert_ne!(pair_key(&a, &b), pair_key(&a, &c));
    }

    #[test]
    fn pair_key_is_order_sensitive() {
        let a = vec![0.1_f32, 0.2];
        let b = vec![0.3_f32, 0.4];
        assert_ne!(pair_key(&a, &b), pair_key(&b, &a));
    }

    #[test]
    fn pair_key_is_boundary_sensitive() {
        let key_a = pair_key(&[0.1, 0.2], &[0.3]);
        let key_b = pair_key(&[0.1], &[0.2, 0.3]);
        assert_ne!(key_a, key_b);
    }

    #[test]
    fn pair_key_is_stable() {
        let a = vec![0.5_f32; 16];
        let b = vec![-0.5_f32; 16];
        assert_eq!(pair_key(&a, &b), pair_key(&a, &b));
    }
}
