#![forbid(unsafe_code)]

//! Memoized glyph runs.
//!
//! Encoding is a pure function of `(bitmap, scale)`, so text painting keeps
//! the last few thousand results in an LRU and reuses them. Entries are keyed
//! by a deterministic FNV-1a id; the full key is kept alongside so a hash
//! collision degrades to a miss instead of a wrong glyph.

use std::num::NonZeroUsize;
use std::rc::Rc;

use lru::LruCache;

use crate::bitmap::{GlyphBitmap, GlyphSize};
use crate::glyph_runs::{self, GlyphRun};

/// Default number of cached runs.
pub const DEFAULT_RUN_CACHE_CAPACITY: usize = 1024;

/// Stable glyph-run identifier.
pub type RunId = u64;

/// Cache key: the bitmap and the scale it was encoded at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunKey {
    pub bitmap: GlyphBitmap,
    pub scale: u32,
}

impl RunKey {
    #[inline]
    pub const fn new(bitmap: GlyphBitmap, scale: u32) -> Self {
        Self { bitmap, scale }
    }

    /// Deterministic id, independent of insertion order and platform.
    #[must_use]
    pub fn id(&self) -> RunId {
        run_id(&self.bitmap, self.scale)
    }
}

/// FNV-1a over `(size, scale, rows)`.
#[must_use]
pub fn run_id(bitmap: &GlyphBitmap, scale: u32) -> RunId {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001B3;

    let mut h = FNV_OFFSET;
    let mut feed = |byte: u8| {
        h ^= u64::from(byte);
        h = h.wrapping_mul(FNV_PRIME);
    };
    feed(match bitmap.size() {
        GlyphSize::Eight => 8,
        GlyphSize::Sixteen => 16,
    });
    scale.to_le_bytes().into_iter().for_each(&mut feed);
    for row in bitmap.rows() {
        row.to_le_bytes().into_iter().for_each(&mut feed);
    }
    h
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphRunCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: usize,
    pub capacity: usize,
}

impl GlyphRunCacheStats {
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Bounded LRU of encoded glyph runs.
#[derive(Debug)]
pub struct GlyphRunCache {
    cache: LruCache<RunId, (RunKey, Rc<GlyphRun>)>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Default for GlyphRunCache {
    fn default() -> Self {
        Self::new(DEFAULT_RUN_CACHE_CAPACITY)
    }
}

impl GlyphRunCache {
    /// A zero capacity is bumped to 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Cached run for `(bitmap, scale)`, encoding it on a miss.
    ///
    /// # Panics
    ///
    /// Panics if `scale` exceeds [`glyph_runs::MAX_SCALE`].
    pub fn get_or_encode(&mut self, bitmap: &GlyphBitmap, scale: u32) -> Rc<GlyphRun> {
        let key = RunKey::new(*bitmap, scale);
        let id = key.id();
        if let Some((stored, run)) = self.cache.get(&id)
            && *stored == key
        {
            self.hits += 1;
            return Rc::clone(run);
        }

        self.misses += 1;
        let run = Rc::new(glyph_runs::encode(bitmap, scale));
        if let Some((evicted, _)) = self.cache.push(id, (key, Rc::clone(&run)))
            && evicted != id
        {
            self.evictions += 1;
        }
        run
    }

    #[must_use]
    pub fn contains(&self, bitmap: &GlyphBitmap, scale: u32) -> bool {
        let key = RunKey::new(*bitmap, scale);
        self.cache
            .peek(&key.id())
            .is_some_and(|(stored, _)| *stored == key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn stats(&self) -> GlyphRunCacheStats {
        GlyphRunCacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            size: self.cache.len(),
            capacity: self.cache.cap().get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bar(row: usize) -> GlyphBitmap {
        let mut rows = [0u8; 8];
        rows[row] = 0xFF;
        GlyphBitmap::from_rows8(rows)
    }

    #[test]
    fn run_ids_are_deterministic_and_scale_sensitive() {
        let b = bar(0);
        assert_eq!(run_id(&b, 1), run_id(&b, 1));
        assert_ne!(run_id(&b, 0), run_id(&b, 1));
        assert_ne!(run_id(&b, 0), run_id(&bar(1), 0));
    }

    #[test]
    fn sizes_hash_apart_even_with_equal_rows() {
        let eight = GlyphBitmap::from_rows8([0; 8]);
        let sixteen = GlyphBitmap::from_rows16([0; 16]);
        assert_ne!(run_id(&eight, 0), run_id(&sixteen, 0));
    }

    #[test]
    fn second_lookup_is_a_hit_with_the_same_run() {
        let mut cache = GlyphRunCache::new(8);
        let b = bar(3);
        let first = cache.get_or_encode(&b, 1);
        let second = cache.get_or_encode(&b, 1);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(*first, glyph_runs::encode(&b, 1));

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert!(cache.contains(&b, 1));
        assert!(!cache.contains(&b, 0));
    }

    #[test]
    fn capacity_bound_evicts_least_recent() {
        let mut cache = GlyphRunCache::new(2);
        cache.get_or_encode(&bar(0), 0);
        cache.get_or_encode(&bar(1), 0);
        cache.get_or_encode(&bar(0), 0);
        cache.get_or_encode(&bar(2), 0);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
        assert!(cache.contains(&bar(0), 0));
        assert!(!cache.contains(&bar(1), 0));
    }

    #[test]
    fn zero_capacity_still_caches_one_entry() {
        let mut cache = GlyphRunCache::new(0);
        cache.get_or_encode(&bar(0), 0);
        assert_eq!(cache.stats().capacity, 1);
        assert_eq!(cache.len(), 1);
    }
}
