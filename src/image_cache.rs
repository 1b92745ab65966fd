//! Decoded image cache.
//!
//! Caches decoded RGB8 pixel data using an LRU policy. One instance holds
//! full-size images for the fullscreen viewer, another holds grid thumbnails.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Cached RGB8 pixel data.
#[derive(Clone)]
pub struct CachedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CachedImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }
}

/// LRU cache for storing decoded images.
pub struct ImageCache {
    cache: LruCache<PathBuf, CachedImage>,
}

impl ImageCache {
    /// Creates a new image cache with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).expect("Capacity must be non-zero")),
        }
    }

    /// Retrieves an image from the cache if it exists.
    pub fn get(&mut self, path: &Path) -> Option<CachedImage> {
        let result = self.cache.get(path).cloned();
        if result.is_some() {
            log::debug!("Cache HIT: {}", path.display());
        } else {
            log::debug!("Cache MISS: {}", path.display());
        }
        result
    }

    /// Stores an image in the cache.
    pub fn put(&mut self, path: PathBuf, cached_image: CachedImage) {
        log::debug!(
            "Cache PUT: {} ({}x{})",
            path.display(),
            cached_image.width,
            cached_image.height
        );
        self.cache.put(path, cached_image);
    }

    /// Checks if an image is in the cache.
    pub fn contains(&self, path: &Path) -> bool {
        self.cache.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel() -> CachedImage {
        CachedImage::new(vec![0, 0, 0], 1, 1)
    }

    #[test]
    fn least_recently_used_entry_is_evicted() {
        let mut cache = ImageCache::new(2);
        cache.put(PathBuf::from("a.png"), pixel());
        cache.put(PathBuf::from("b.png"), pixel());

        // Touch "a" so "b" becomes the eviction candidate.
        assert!(cache.get(Path::new("a.png")).is_some());
        cache.put(PathBuf::from("c.png"), pixel());

        assert!(cache.contains(Path::new("a.png")));
        assert!(!cache.contains(Path::new("b.png")));
        assert!(cache.contains(Path::new("c.png")));
    }
}
