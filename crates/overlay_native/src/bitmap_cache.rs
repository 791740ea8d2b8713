//! Path-keyed bitmap cache for native hosts.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use overlay_host::{BitmapHandle, IconBitmapCache};

#[derive(Debug, Default)]
struct CacheState {
    generation: u64,
    next_id: u64,
    entries: HashMap<String, BitmapHandle>,
}

#[derive(Debug, Default)]
/// Issues handles for paths that exist on disk.
///
/// Decoding belongs to the renderer; this cache only tracks which paths have a live handle in
/// the current surface generation. Missing files resolve to `None` so the renderer draws a
/// placeholder.
pub struct FileIconBitmapCache {
    state: RefCell<CacheState>,
}

impl FileIconBitmapCache {
    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// Whether no handle is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IconBitmapCache for FileIconBitmapCache {
    fn resolve_bitmap(&self, path: &str) -> Option<BitmapHandle> {
        if let Some(handle) = self.state.borrow().entries.get(path) {
            return Some(*handle);
        }
        if path.is_empty() || !Path::new(path).exists() {
            tracing::debug!(path, "icon source missing; placeholder used");
            return None;
        }
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let handle = BitmapHandle {
            id: state.next_id,
            generation: state.generation,
        };
        state.entries.insert(path.to_string(), handle);
        Some(handle)
    }

    fn invalidate_all(&self) {
        let mut state = self.state.borrow_mut();
        let dropped = state.entries.len();
        state.entries.clear();
        state.generation += 1;
        tracing::debug!(dropped, generation = state.generation, "icon bitmap cache invalidated");
    }

    fn generation(&self) -> u64 {
        self.state.borrow().generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_paths_get_stable_handles_until_invalidated() {
        let cache = FileIconBitmapCache::default();
        let existing = std::env::temp_dir();
        let existing = existing.to_string_lossy();

        let first = cache.resolve_bitmap(&existing).expect("handle");
        assert_eq!(cache.resolve_bitmap(&existing), Some(first));
        assert_eq!(cache.resolve_bitmap("/definitely/not/here.ico"), None);
        assert_eq!(cache.len(), 1);

        cache.invalidate_all();

        assert!(!cache.is_current(first));
        assert!(cache.is_empty());
        let second = cache.resolve_bitmap(&existing).expect("handle");
        assert_eq!(second.generation, 1);
    }
}
