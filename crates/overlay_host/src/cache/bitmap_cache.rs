//! Icon bitmap cache capability.
//!
//! The overlay core only ever stores icon target paths (or custom icon image paths). Turning a
//! path into something drawable belongs to the rendering backend, which owns a cache keyed by
//! that path. The cache is tied to one rendering surface: when the surface is recreated every
//! handle it issued becomes stale, so the cache is invalidated wholesale and its generation
//! advances before any repaint is attempted.

use std::{cell::RefCell, collections::HashMap, collections::HashSet, rc::Rc};

/// Opaque handle to a decoded bitmap, valid only for the generation that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitmapHandle {
    /// Backend-specific bitmap identifier.
    pub id: u64,
    /// Cache generation in which this handle was issued.
    pub generation: u64,
}

/// Rendering-side cache resolving paths to bitmap handles.
pub trait IconBitmapCache {
    /// Resolves `path` to a bitmap handle, decoding on first use.
    ///
    /// Returns `None` when the image cannot be decoded; callers draw a placeholder instead.
    fn resolve_bitmap(&self, path: &str) -> Option<BitmapHandle>;

    /// Drops every cached handle and advances the generation.
    fn invalidate_all(&self);

    /// Returns the current cache generation.
    fn generation(&self) -> u64;

    /// Returns whether `handle` was issued by the current generation.
    fn is_current(&self, handle: BitmapHandle) -> bool {
        handle.generation == self.generation()
    }
}

#[derive(Debug, Default)]
struct BitmapCacheState {
    generation: u64,
    next_id: u64,
    entries: HashMap<String, BitmapHandle>,
    undecodable: HashSet<String>,
}

#[derive(Debug, Clone, Default)]
/// In-memory cache adapter that issues synthetic handles per path.
pub struct MemoryIconBitmapCache {
    inner: Rc<RefCell<BitmapCacheState>>,
}

impl MemoryIconBitmapCache {
    /// Marks `path` as undecodable so lookups return `None`.
    pub fn mark_undecodable(&self, path: impl Into<String>) {
        self.inner.borrow_mut().undecodable.insert(path.into());
    }

    /// Returns the number of live cache entries.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Returns whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IconBitmapCache for MemoryIconBitmapCache {
    fn resolve_bitmap(&self, path: &str) -> Option<BitmapHandle> {
        let mut state = self.inner.borrow_mut();
        if state.undecodable.contains(path) {
            return None;
        }
        if let Some(handle) = state.entries.get(path) {
            return Some(*handle);
        }
        state.next_id += 1;
        let handle = BitmapHandle {
            id: state.next_id,
            generation: state.generation,
        };
        state.entries.insert(path.to_string(), handle);
        Some(handle)
    }

    fn invalidate_all(&self) {
        let mut state = self.inner.borrow_mut();
        let dropped = state.entries.len();
        state.entries.clear();
        state.generation += 1;
        tracing::debug!(
            dropped,
            generation = state.generation,
            "icon bitmap cache invalidated"
        );
    }

    fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }
}
