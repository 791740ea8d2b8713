//! Preference storage: raw JSON text per key, read and written through typed [`PrefKey`]s.

use std::{cell::RefCell, collections::BTreeMap, fmt, future::Future, marker::PhantomData, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Key-value store for small settings, each value kept as JSON text.
pub trait PrefsStore {
    /// Loads the JSON text stored under `key`.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>>;

    /// Replaces the JSON text stored under `key`.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store. Clones share the same map.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<BTreeMap<String, String>>>,
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().get(key).cloned()) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_owned(), raw_json.to_owned());
            Ok(())
        })
    }
}

/// A preference key bound to the type stored under it.
///
/// ```
/// use overlay_host::PrefKey;
///
/// const GRID_HINT: PrefKey<u32> = PrefKey::new("overlay.grid_hint");
/// assert_eq!(GRID_HINT.name(), "overlay.grid_hint");
/// ```
pub struct PrefKey<T> {
    name: &'static str,
    value: PhantomData<fn() -> T>,
}

impl<T> PrefKey<T> {
    /// Binds `name` to `T`.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            value: PhantomData,
        }
    }

    /// Raw key under which the value is stored.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> fmt::Debug for PrefKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrefKey").field(&self.name).finish()
    }
}

impl<T: Serialize + DeserializeOwned> PrefKey<T> {
    /// Loads and decodes the value.
    ///
    /// # Errors
    ///
    /// Returns an error naming the key when the store fails or the stored JSON does not decode.
    pub async fn load<S: PrefsStore + ?Sized>(&self, store: &S) -> Result<Option<T>, String> {
        let Some(raw) = store.load_pref(self.name).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| format!("preference `{}` is malformed: {err}", self.name))
    }

    /// Encodes and saves `value`.
    ///
    /// # Errors
    ///
    /// Returns an error when encoding fails or the store rejects the write.
    pub async fn save<S: PrefsStore + ?Sized>(&self, store: &S, value: &T) -> Result<(), String> {
        let raw = serde_json::to_string(value)
            .map_err(|err| format!("preference `{}` does not encode: {err}", self.name))?;
        store.save_pref(self.name, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Autosave {
        enabled: bool,
    }

    const AUTOSAVE: PrefKey<Autosave> = PrefKey::new("overlay.autosave");

    #[test]
    fn typed_keys_round_trip_through_raw_json() {
        let store = MemoryPrefsStore::default();
        block_on(AUTOSAVE.save(&store, &Autosave { enabled: false })).expect("save");

        assert_eq!(
            block_on(store.load_pref("overlay.autosave")).expect("raw"),
            Some(r#"{"enabled":false}"#.to_string())
        );
        assert_eq!(
            block_on(AUTOSAVE.load(&store)).expect("typed"),
            Some(Autosave { enabled: false })
        );
    }

    #[test]
    fn malformed_value_reports_the_key() {
        let store = MemoryPrefsStore::default();
        block_on(store.save_pref("overlay.autosave", "{not json")).expect("save raw");

        let err = block_on(AUTOSAVE.load(&store)).expect_err("malformed");

        assert!(err.starts_with("preference `overlay.autosave` is malformed"), "{err}");
    }

    #[test]
    fn clones_share_one_map() {
        let store = MemoryPrefsStore::default();
        let view = store.clone();
        block_on(store.save_pref("k", "1")).expect("save");
        assert_eq!(block_on(view.load_pref("k")).expect("load"), Some("1".to_string()));
        assert_eq!(block_on(AUTOSAVE.load(&view)).expect("absent"), None);
    }
}
