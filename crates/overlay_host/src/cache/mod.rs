//! Render-side cache contracts and lightweight test adapters.

mod bitmap_cache;

pub use bitmap_cache::{BitmapHandle, IconBitmapCache, MemoryIconBitmapCache};
