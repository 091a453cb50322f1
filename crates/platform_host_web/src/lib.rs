//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! On native targets every adapter degrades to an in-process fallback so the desktop runtime can
//! be exercised headlessly.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod notifications;
pub mod storage;

pub use adapters::{
    host_strategy_name, notification_service, prefs_store, selected_host_strategy, HostStrategy,
    NotificationServiceAdapter, PrefsStoreAdapter,
};
pub use notifications::{WebNotificationService, TOAST_EVENT_NAME};
pub use storage::local_prefs::WebPrefsStore;
