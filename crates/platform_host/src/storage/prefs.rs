//! Durable preference storage contracts and in-process adapters.
//!
//! Values are stored as raw JSON text per key. Writers are last-writer-wins; the desktop runtime is
//! the only writer and it runs on a single UI thread, so no locking is involved.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for durable preference values (JSON stored as text per key).
pub trait PrefsStore {
    /// Loads a raw JSON string for a preference key.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>>;

    /// Saves a raw JSON string for a preference key, replacing any previous value.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>>;

    /// Deletes a preference key. Deleting a missing key succeeds.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op preference store for stubbed hosts. Nothing survives a reload.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store keyed by string.
///
/// Clones share the same backing map, which lets tests simulate a page reload by handing a clone
/// to a freshly constructed runtime.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Returns the raw JSON stored for `key`, bypassing the async contract.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.raw(key)) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

#[derive(Debug, Clone, Default)]
/// Preference store whose every operation fails, standing in for a full or disabled
/// browser storage area.
pub struct UnavailablePrefsStore {
    reason: Option<String>,
}

impl UnavailablePrefsStore {
    /// Creates a failing store that reports `reason` from every call.
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }

    fn error(&self) -> String {
        self.reason
            .clone()
            .unwrap_or_else(|| "storage unavailable".to_string())
    }
}

impl PrefsStore for UnavailablePrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        let err = self.error();
        Box::pin(async move { Err(err) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        let err = self.error();
        Box::pin(async move { Err(err) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        let err = self.error();
        Box::pin(async move { Err(err) })
    }
}

/// Loads and deserializes a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub async fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_pref(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| format!("decode `{key}`: {e}"))?;
    Ok(Some(value))
}

/// Serializes and saves a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or store save fails.
pub async fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| format!("encode `{key}`: {e}"))?;
    store.save_pref(key, &raw).await
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Spot {
        x: i32,
        y: i32,
    }

    #[test]
    fn memory_store_clones_share_backing_map() {
        let store = MemoryPrefsStore::default();
        let reloaded = store.clone();
        let store_obj: &dyn PrefsStore = &store;

        block_on(store_obj.save_pref("icons", "{\"about\":{\"x\":1,\"y\":2}}")).expect("save");
        assert_eq!(
            block_on(reloaded.load_pref("icons")).expect("load"),
            Some("{\"about\":{\"x\":1,\"y\":2}}".to_string())
        );

        block_on(store_obj.delete_pref("icons")).expect("delete");
        assert!(reloaded.is_empty());
    }

    #[test]
    fn typed_helpers_round_trip_maps() {
        let store = MemoryPrefsStore::default();
        let mut spots = BTreeMap::new();
        spots.insert("terminal".to_string(), Spot { x: 16, y: 216 });

        block_on(save_pref_with(&store, "spots", &spots)).expect("save typed");
        let loaded: Option<BTreeMap<String, Spot>> =
            block_on(load_pref_with(&store, "spots")).expect("load typed");

        assert_eq!(loaded, Some(spots));
    }

    #[test]
    fn typed_load_reports_corrupt_json() {
        let store = MemoryPrefsStore::default();
        block_on(store.save_pref("spots", "{not json")).expect("save raw");

        let err = block_on(load_pref_with::<_, Spot>(&store, "spots")).expect_err("corrupt");
        assert!(err.starts_with("decode `spots`"), "{err}");
    }

    #[test]
    fn unavailable_store_fails_every_call() {
        let store = UnavailablePrefsStore::with_reason("quota exceeded");
        assert_eq!(
            block_on(store.save_pref("k", "{}")),
            Err("quota exceeded".to_string())
        );
        assert!(block_on(store.load_pref("k")).is_err());
        assert!(block_on(store.delete_pref("k")).is_err());
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store = NoopPrefsStore;
        assert_eq!(block_on(store.load_pref("k")).expect("load"), None);
        block_on(store.save_pref("k", "{}")).expect("save");
        block_on(store.delete_pref("k")).expect("delete");
    }
}
