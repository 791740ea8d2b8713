//! Durable snapshot storage: revisioned envelopes, the store contract, and typed state codecs.
//!
//! Every snapshot travels inside an [`AppStateEnvelope`] whose `updated_at_unix_ms` acts as a
//! revision. Stores only accept an envelope that supersedes what they hold, and reading an
//! envelope back folds its revision into the process clock so the next save supersedes it.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::time::{next_monotonic_timestamp_ms, observe_timestamp_ms};

/// Version for [`AppStateEnvelope`] metadata serialization.
pub const APP_STATE_ENVELOPE_VERSION: u32 = 1;
/// Namespace used by the durable workspace snapshot (pages, zones, icons, theme).
pub const WORKSPACE_STATE_NAMESPACE: &str = "overlay.workspace";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Versioned, revision-stamped wrapper around one persisted snapshot.
pub struct AppStateEnvelope {
    /// Envelope schema version.
    pub envelope_version: u32,
    /// Namespace identifying the snapshot kind.
    pub namespace: String,
    /// Schema version of `payload`.
    pub schema_version: u32,
    /// Revision, in unix milliseconds from the monotonic clock.
    pub updated_at_unix_ms: u64,
    /// Serialized snapshot.
    pub payload: Value,
}

impl AppStateEnvelope {
    /// Wraps `payload` and stamps it with the next monotonic revision.
    pub fn new(namespace: impl Into<String>, schema_version: u32, payload: Value) -> Self {
        Self {
            envelope_version: APP_STATE_ENVELOPE_VERSION,
            namespace: namespace.into(),
            schema_version,
            updated_at_unix_ms: next_monotonic_timestamp_ms(),
            payload,
        }
    }
}

/// What a store should do with an incoming envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionCheck {
    /// Nothing newer is stored; write the envelope.
    Write,
    /// The exact same envelope is already stored.
    AlreadyStored,
}

/// Compares `incoming` with the envelope a store currently holds.
///
/// # Errors
///
/// Returns an error when `stored` is a different snapshot at the same or a later revision. The
/// stored revision is folded into the clock first, so a retry with a freshly stamped envelope
/// succeeds.
pub fn check_revision(
    stored: Option<&AppStateEnvelope>,
    incoming: &AppStateEnvelope,
) -> Result<RevisionCheck, String> {
    let Some(stored) = stored else {
        return Ok(RevisionCheck::Write);
    };
    if incoming.updated_at_unix_ms > stored.updated_at_unix_ms {
        return Ok(RevisionCheck::Write);
    }
    if stored == incoming {
        return Ok(RevisionCheck::AlreadyStored);
    }
    observe_timestamp_ms(stored.updated_at_unix_ms);
    Err(format!(
        "stored `{}` snapshot is newer (revision {} >= {}); save rejected",
        incoming.namespace, stored.updated_at_unix_ms, incoming.updated_at_unix_ms
    ))
}

/// Object-safe boxed future used by [`AppStateStore`] async methods.
pub type AppStateStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Durable snapshot store keyed by namespace.
///
/// Saving is a full replace guarded by [`check_revision`]: implementations either persist the
/// whole envelope or leave the stored one untouched and report why.
pub trait AppStateStore {
    /// Loads the envelope stored under `namespace`.
    fn load_app_state_envelope<'a>(
        &'a self,
        namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<Option<AppStateEnvelope>, String>>;

    /// Replaces the envelope stored under `envelope.namespace`.
    fn save_app_state_envelope<'a>(
        &'a self,
        envelope: &'a AppStateEnvelope,
    ) -> AppStateStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Default)]
/// In-memory snapshot store. Clones share the same map.
pub struct MemoryAppStateStore {
    inner: Rc<RefCell<HashMap<String, AppStateEnvelope>>>,
}

impl MemoryAppStateStore {
    /// Returns a clone of the stored envelope for `namespace` without touching the clock.
    pub fn peek(&self, namespace: &str) -> Option<AppStateEnvelope> {
        self.inner.borrow().get(namespace).cloned()
    }
}

impl AppStateStore for MemoryAppStateStore {
    fn load_app_state_envelope<'a>(
        &'a self,
        namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<Option<AppStateEnvelope>, String>> {
        Box::pin(async move { Ok(self.peek(namespace)) })
    }

    fn save_app_state_envelope<'a>(
        &'a self,
        envelope: &'a AppStateEnvelope,
    ) -> AppStateStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            if check_revision(inner.get(&envelope.namespace), envelope)? == RevisionCheck::Write {
                inner.insert(envelope.namespace.clone(), envelope.clone());
            }
            Ok(())
        })
    }
}

/// A snapshot type persisted under one namespace with a schema version.
pub trait VersionedState: Serialize + DeserializeOwned {
    /// Namespace the snapshot is stored under.
    const NAMESPACE: &'static str;
    /// Schema version written by [`encode_state`].
    const SCHEMA_VERSION: u32;

    /// Decodes a payload written with another schema version. `Ok(None)` marks the version as
    /// unsupported.
    ///
    /// # Errors
    ///
    /// Returns an error when a supported older payload does not decode.
    fn migrate(schema_version: u32, payload: &Value) -> Result<Option<Self>, String> {
        let _ = (schema_version, payload);
        Ok(None)
    }
}

/// Wraps `state` in a freshly stamped envelope.
///
/// # Errors
///
/// Returns an error when `state` cannot be converted to JSON.
pub fn encode_state<T: VersionedState>(state: &T) -> Result<AppStateEnvelope, String> {
    let payload = serde_json::to_value(state).map_err(|err| err.to_string())?;
    Ok(AppStateEnvelope::new(T::NAMESPACE, T::SCHEMA_VERSION, payload))
}

/// Decodes an envelope, routing other schema versions through [`VersionedState::migrate`].
///
/// # Errors
///
/// Returns an error for a foreign namespace, an unsupported schema version, or a payload that
/// does not decode.
pub fn decode_state<T: VersionedState>(envelope: &AppStateEnvelope) -> Result<T, String> {
    if envelope.namespace != T::NAMESPACE {
        return Err(format!(
            "envelope namespace `{}` does not match `{}`",
            envelope.namespace,
            T::NAMESPACE
        ));
    }
    if envelope.schema_version == T::SCHEMA_VERSION {
        return serde_json::from_value(envelope.payload.clone()).map_err(|err| err.to_string());
    }
    T::migrate(envelope.schema_version, &envelope.payload)?.ok_or_else(|| {
        format!(
            "unsupported schema version {} for namespace `{}`",
            envelope.schema_version,
            T::NAMESPACE
        )
    })
}

/// Loads and decodes the stored snapshot of `T`.
///
/// The stored revision reaches the clock even when decoding fails, so whatever replaces an
/// unreadable snapshot supersedes it.
///
/// # Errors
///
/// Returns an error when the store fails or [`decode_state`] does.
pub async fn load_state<T, S>(store: &S) -> Result<Option<T>, String>
where
    T: VersionedState,
    S: AppStateStore + ?Sized,
{
    let Some(envelope) = store.load_app_state_envelope(T::NAMESPACE).await? else {
        return Ok(None);
    };
    observe_timestamp_ms(envelope.updated_at_unix_ms);
    decode_state(&envelope).map(Some)
}

/// Encodes `state` and saves it through `store`.
///
/// # Errors
///
/// Returns an error when encoding fails or the store rejects the write.
pub async fn save_state<T, S>(store: &S, state: &T) -> Result<(), String>
where
    T: VersionedState,
    S: AppStateStore + ?Sized,
{
    let envelope = encode_state(state)?;
    store.save_app_state_envelope(&envelope).await
}
