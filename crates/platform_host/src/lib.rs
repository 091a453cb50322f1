//! Typed host contracts shared by the desktop runtime, the widget grid, and browser adapters.
//!
//! This crate is the API boundary for everything the window manager consumes but does not own:
//! durable key/value storage for window and icon placement, the remote content collaborator, and
//! toast presentation. Concrete browser adapters live in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod content;
pub mod notifications;
pub mod storage;
pub mod time;

pub use content::{
    BlogPostSummary, ContentFuture, ContentService, MemoryContentService, NoopContentService,
    ProfileRecord,
};
pub use notifications::{
    MemoryNotificationService, NoopNotificationService, NotificationFuture, NotificationService,
};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore,
    PrefsStoreFuture, UnavailablePrefsStore,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
