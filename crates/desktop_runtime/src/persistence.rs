//! Durable storage for the window placement cache, icon position cache, and config override.

use std::collections::BTreeMap;

use leptos::logging;
use platform_host::{load_pref_with, save_pref_with, PrefsStore};
use thiserror::Error;

use crate::model::{DesktopConfig, DesktopState, Position, WindowPlacement};

pub const WINDOW_CACHE_KEY: &str = "webos.window_cache.v1";
pub const ICON_CACHE_KEY: &str = "webos.icon_cache.v1";
pub const CONFIG_KEY: &str = "webos.config.v1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("failed to load `{key}`: {message}")]
    Load { key: &'static str, message: String },
    #[error("failed to save `{key}`: {message}")]
    Save { key: &'static str, message: String },
    #[error("failed to delete `{key}`: {message}")]
    Delete { key: &'static str, message: String },
}

/// Everything read from durable storage before the first render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootSnapshot {
    pub config: Option<DesktopConfig>,
    pub windows: BTreeMap<String, WindowPlacement>,
    pub icons: BTreeMap<String, Position>,
}

async fn load_or_default<S, T>(store: &S, key: &'static str) -> Option<T>
where
    S: PrefsStore + ?Sized,
    T: serde::de::DeserializeOwned,
{
    match load_pref_with::<S, T>(store, key).await {
        Ok(value) => value,
        Err(message) => {
            logging::warn!("{}", PersistenceError::Load { key, message });
            None
        }
    }
}

/// Loads the caches and config override. Unreadable or corrupt entries are logged and treated as
/// empty.
pub async fn load_boot_snapshot<S: PrefsStore + ?Sized>(store: &S) -> BootSnapshot {
    BootSnapshot {
        config: load_or_default(store, CONFIG_KEY).await,
        windows: load_or_default(store, WINDOW_CACHE_KEY)
            .await
            .unwrap_or_default(),
        icons: load_or_default(store, ICON_CACHE_KEY)
            .await
            .unwrap_or_default(),
    }
}

/// Writes the whole window placement map.
pub async fn persist_window_cache<S: PrefsStore + ?Sized>(
    store: &S,
    state: &DesktopState,
) -> Result<(), PersistenceError> {
    save_pref_with(store, WINDOW_CACHE_KEY, state.window_cache.snapshot())
        .await
        .map_err(|message| PersistenceError::Save {
            key: WINDOW_CACHE_KEY,
            message,
        })
}

/// Writes the whole icon position map.
pub async fn persist_icon_cache<S: PrefsStore + ?Sized>(
    store: &S,
    state: &DesktopState,
) -> Result<(), PersistenceError> {
    save_pref_with(store, ICON_CACHE_KEY, state.icon_cache.snapshot())
        .await
        .map_err(|message| PersistenceError::Save {
            key: ICON_CACHE_KEY,
            message,
        })
}

pub async fn clear_icon_cache<S: PrefsStore + ?Sized>(store: &S) -> Result<(), PersistenceError> {
    store
        .delete_pref(ICON_CACHE_KEY)
        .await
        .map_err(|message| PersistenceError::Delete {
            key: ICON_CACHE_KEY,
            message,
        })
}

/// Writes the desktop config override read back at boot.
pub async fn persist_config<S: PrefsStore + ?Sized>(
    store: &S,
    config: &DesktopConfig,
) -> Result<(), PersistenceError> {
    save_pref_with(store, CONFIG_KEY, config)
        .await
        .map_err(|message| PersistenceError::Save {
            key: CONFIG_KEY,
            message,
        })
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{MemoryPrefsStore, UnavailablePrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Size;

    #[test]
    fn caches_round_trip_through_prefs_store() {
        let store = MemoryPrefsStore::default();
        let mut state = DesktopState::default();
        let placement = WindowPlacement {
            position: Position::new(40, 60),
            size: Size::new(500, 320),
        };
        state.window_cache.save("about", placement);
        state.icon_cache.save("terminal", Position::new(200, 16));

        block_on(persist_window_cache(&store, &state)).expect("save windows");
        block_on(persist_icon_cache(&store, &state)).expect("save icons");
        let boot = block_on(load_boot_snapshot(&store));

        assert_eq!(boot.windows.get("about"), Some(&placement));
        assert_eq!(boot.icons.get("terminal"), Some(&Position::new(200, 16)));
        assert_eq!(boot.config, None);
    }

    #[test]
    fn corrupt_cache_boots_empty() {
        let store = MemoryPrefsStore::default();
        block_on(store.save_pref(WINDOW_CACHE_KEY, "{not json")).expect("raw save");
        block_on(store.save_pref(ICON_CACHE_KEY, "[1,2,3]")).expect("raw save");

        let boot = block_on(load_boot_snapshot(&store));

        assert!(boot.windows.is_empty());
        assert!(boot.icons.is_empty());
    }

    #[test]
    fn partial_config_override_fills_defaults() {
        let store = MemoryPrefsStore::default();
        block_on(store.save_pref(CONFIG_KEY, r#"{"drag_threshold_px": 12}"#)).expect("raw save");

        let config = block_on(load_boot_snapshot(&store)).config.expect("config");

        assert_eq!(config.drag_threshold_px, 12);
        assert_eq!(config.icon_spacing, 100);
    }

    #[test]
    fn unavailable_store_reports_typed_errors() {
        let store = UnavailablePrefsStore::with_reason("quota exceeded");
        let state = DesktopState::default();

        let err = block_on(persist_window_cache(&store, &state)).expect_err("save fails");
        assert!(matches!(err, PersistenceError::Save { key: WINDOW_CACHE_KEY, .. }));
        assert!(err.to_string().contains("quota exceeded"));

        assert!(matches!(
            block_on(clear_icon_cache(&store)),
            Err(PersistenceError::Delete { .. })
        ));
        assert_eq!(block_on(load_boot_snapshot(&store)), BootSnapshot::default());
    }

    #[test]
    fn clearing_icon_cache_removes_key() {
        let store = MemoryPrefsStore::default();
        let mut state = DesktopState::default();
        state.icon_cache.save("about", Position::new(1, 2));
        block_on(persist_icon_cache(&store, &state)).expect("save");

        block_on(clear_icon_cache(&store)).expect("clear");

        assert_eq!(store.raw(ICON_CACHE_KEY), None);
    }
}
