//! Window manager core for the web desktop: window registry, placement caches, desktop icon
//! layout, frame rendering state, and the Leptos runtime provider that wires them to host
//! services.

pub mod apps;
pub mod blog_search;
pub mod components;
pub mod host;
pub mod icons;
pub mod model;
pub mod persistence;
pub mod position_cache;
pub mod reducer;
pub mod runtime_context;
pub mod taskbar;
pub mod window_frame;
pub mod window_manager;

pub use blog_search::{filter_posts, matches_query, BlogSearch, SEARCH_DEBOUNCE_MS};
pub use components::{DesktopShell, ProfileWidgetGrid};
pub use host::DesktopHostContext;
pub use model::*;
pub use persistence::{
    load_boot_snapshot, persist_config, persist_icon_cache, persist_window_cache, BootSnapshot,
    PersistenceError,
};
pub use position_cache::{IconPositionCache, WindowPlacementCache};
pub use reducer::{reduce_desktop, DesktopAction, RuntimeEffect};
pub use runtime_context::{
    apply_action, use_desktop_runtime, DesktopProvider, DesktopRuntimeContext,
};
pub use taskbar::{taskbar_entries, TaskbarEntry};
pub use window_frame::{
    frame_geometry, frame_views, FrameControl, FrameGeometry, FramePhase, FrameView,
    WindowFrameRenderer,
};
