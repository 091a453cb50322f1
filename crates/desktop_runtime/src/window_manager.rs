//! Window registry transitions used by the desktop reducer.
//!
//! Every function here is total over window ids: an id that is not registered leaves the state
//! untouched and reports `false`. Focus is re-derived by [`normalize_focus`] after each
//! transition so the active window is always the highest-stacked visible window.

use leptos::logging;

use crate::model::{
    DesktopState, Position, Size, WindowConfig, WindowId, WindowLifecycle, WindowPlacement,
    WindowRecord,
};

/// Hands out the next z-index. Values are strictly increasing for the lifetime of the state.
pub fn allocate_z_index(state: &mut DesktopState) -> u32 {
    let highest_live = state.windows.iter().map(|w| w.z_index).max().unwrap_or(0);
    let next = state.top_z_index.max(highest_live).saturating_add(1);
    state.top_z_index = next;
    next
}

/// Picks the highest-stacked open, unminimized window as the active window (or none).
pub fn normalize_focus(state: &mut DesktopState) {
    state.active_window_id = state
        .windows
        .iter()
        .filter(|w| w.is_visible())
        .max_by_key(|w| w.z_index)
        .map(|w| w.id.clone());
}

/// Raises `window_id` to the top of the stack and makes it active.
///
/// Focusing a minimized window restores it. Closing windows cannot take focus. Focusing the
/// window that is already active at the top of the stack allocates nothing.
pub fn focus_window(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let highest = state.windows.iter().map(|w| w.z_index).max().unwrap_or(0);
    let already_top = state.active_window_id.as_ref() == Some(window_id);
    let Some(window) = state.window(window_id) else {
        logging::debug_warn!("focus ignored for unknown window `{window_id}`");
        return false;
    };
    if !window.is_open() {
        return false;
    }
    if already_top && window.is_visible() && window.z_index == highest {
        return true;
    }

    let z_index = allocate_z_index(state);
    if let Some(window) = state.window_mut(window_id) {
        window.z_index = z_index;
        window.minimized = false;
    }
    state.active_window_id = Some(window_id.clone());
    true
}

/// Opens `config.id`, creating the window on first use and reviving it otherwise.
///
/// Placement precedence for a new window is cache, then the request's initial values, then the
/// configured defaults. A revived window that was closing or minimized snaps back to its cached
/// placement; the request's initial values are ignored for existing windows.
pub fn open_window(state: &mut DesktopState, config: WindowConfig) -> WindowId {
    let window_id = config.id.clone();
    let cached = state.window_cache.get(window_id.as_str());

    if let Some(window) = state.window_mut(&window_id) {
        let reviving = !window.is_open() || window.minimized;
        if reviving {
            if let Some(placement) = cached {
                window.position = placement.position;
                window.size = placement.size;
            }
            window.lifecycle = WindowLifecycle::Open;
            window.minimized = false;
        }
        focus_window(state, &window_id);
        return window_id;
    }

    let placement = cached.unwrap_or_else(|| WindowPlacement {
        position: config
            .initial_position
            .unwrap_or(state.config.default_window_position),
        size: config
            .initial_size
            .unwrap_or(state.config.default_window_size),
    });
    let z_index = allocate_z_index(state);
    state.windows.push(WindowRecord {
        id: window_id.clone(),
        title: config.title,
        icon: config.icon,
        content: config.content,
        lifecycle: WindowLifecycle::Open,
        minimized: false,
        maximized: false,
        z_index,
        position: placement.position,
        size: placement.size,
    });
    state.active_window_id = Some(window_id.clone());
    window_id
}

/// Marks a window as closing. The record stays registered until [`finalize_close`].
pub fn close_window(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(window) = state.window_mut(window_id) else {
        logging::debug_warn!("close ignored for unknown window `{window_id}`");
        return false;
    };
    window.lifecycle = WindowLifecycle::Closing;
    normalize_focus(state);
    true
}

/// Writes the closing window's placement to the cache and removes it from the registry.
///
/// Returns `true` when the cache changed. A window that was re-opened while its exit animation
/// was still running is left alone.
pub fn finalize_close(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(index) = state.windows.iter().position(|w| &w.id == window_id) else {
        return false;
    };
    if state.windows[index].is_open() {
        logging::debug_warn!("finalize ignored for re-opened window `{window_id}`");
        return false;
    }

    let window = state.windows.remove(index);
    state
        .window_cache
        .save(window.id.as_str(), window.placement());
    normalize_focus(state);
    true
}

pub fn minimize_window(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(window) = state.window_mut(window_id) else {
        logging::debug_warn!("minimize ignored for unknown window `{window_id}`");
        return false;
    };
    if !window.is_open() {
        return false;
    }
    window.minimized = true;
    normalize_focus(state);
    true
}

/// Flips the maximized flag. The stored position and size are kept for when it is restored.
pub fn toggle_maximize(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(window) = state.window_mut(window_id) else {
        logging::debug_warn!("maximize ignored for unknown window `{window_id}`");
        return false;
    };
    window.maximized = !window.maximized;
    true
}

/// Moves a window and mirrors its placement into the cache. Returns `true` when persisted state
/// changed.
pub fn update_position(
    state: &mut DesktopState,
    window_id: &WindowId,
    position: Position,
) -> bool {
    let Some(window) = state.window_mut(window_id) else {
        return false;
    };
    window.position = position;
    let placement = window.placement();
    state.window_cache.save(window_id.as_str(), placement);
    true
}

/// Resizes a window and mirrors its placement into the cache.
pub fn update_size(state: &mut DesktopState, window_id: &WindowId, size: Size) -> bool {
    let Some(window) = state.window_mut(window_id) else {
        return false;
    };
    window.size = size;
    let placement = window.placement();
    state.window_cache.save(window_id.as_str(), placement);
    true
}

/// Minimizes every open window.
pub fn show_desktop(state: &mut DesktopState) -> bool {
    let mut changed = false;
    for window in state.windows.iter_mut().filter(|w| w.is_visible()) {
        window.minimized = true;
        changed = true;
    }
    normalize_focus(state);
    changed
}
