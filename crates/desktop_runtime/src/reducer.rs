//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use std::collections::BTreeMap;

use crate::{
    icons,
    model::{
        DesktopConfig, DesktopIconEntry, DesktopState, DragSession, InteractionState,
        PointerPosition, Position, ResizeEdge, ResizeSession, Size, WindowConfig, WindowId,
        WindowPlacement,
    },
    window_manager,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window, or revive and focus an existing one with the same id.
    OpenWindow(WindowConfig),
    /// Start closing a window. The record stays until [`DesktopAction::FinalizeClose`].
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// The close animation finished: cache the placement and drop the record.
    FinalizeClose {
        /// Window whose exit animation completed.
        window_id: WindowId,
    },
    /// Raise a window and make it active.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Flip a window between maximized and its stored placement.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Move a window and persist the new placement.
    UpdatePosition {
        /// Window to move.
        window_id: WindowId,
        /// New top-left corner.
        position: Position,
    },
    /// Resize a window and persist the new placement.
    UpdateSize {
        /// Window to resize.
        window_id: WindowId,
        /// New size.
        size: Size,
    },
    /// Taskbar button press: restore, minimize, or focus depending on the window's state.
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Minimize every open window.
    ShowDesktop,
    /// Begin dragging a window by its title bar.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag.
    EndMove,
    /// Begin resizing a window from one of its trailing edges.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Handle being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window resize.
    EndResize,
    /// Replace the ordered list of desktop icons.
    SetDesktopIcons {
        /// Icons in display order.
        icons: Vec<DesktopIconEntry>,
    },
    /// Pointer pressed on a desktop icon.
    BeginIconDrag {
        /// Icon under the pointer.
        icon_id: String,
        /// Pointer position at press.
        pointer: PointerPosition,
    },
    /// Pointer moved while an icon is pressed.
    UpdateIconDrag {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Pointer released after an icon press. Opens the icon when it was not dragged.
    EndIconDrag,
    /// Pointer pressed on empty desktop background.
    BeginMarquee {
        /// Anchor corner of the selection rectangle.
        pointer: PointerPosition,
    },
    /// Pointer moved while the marquee is live.
    UpdateMarquee {
        /// Live corner of the selection rectangle.
        pointer: PointerPosition,
    },
    /// Pointer released after a marquee gesture.
    EndMarquee,
    /// "Sort icons": forget every cached icon position.
    ResetIconPositions,
    /// Load cache mirrors from durable storage at boot.
    HydrateCaches {
        /// Window placements keyed by window id.
        windows: BTreeMap<String, WindowPlacement>,
        /// Icon positions keyed by icon id.
        icons: BTreeMap<String, Position>,
    },
    /// Replace the runtime configuration.
    SetConfig {
        /// New configuration.
        config: DesktopConfig,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host to execute.
pub enum RuntimeEffect {
    /// Write the window placement cache to durable storage.
    PersistWindowCache,
    /// Write the icon position cache to durable storage.
    PersistIconCache,
    /// Remove the icon position cache from durable storage.
    ClearIconCache,
    /// Write the desktop config override to durable storage.
    PersistConfig,
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// This is the only place window, icon, and cache state changes. Actions that reference an
/// unknown window or icon leave the state untouched and emit nothing.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(config) => {
            window_manager::open_window(state, config);
        }
        DesktopAction::CloseWindow { window_id } => {
            if window_manager::close_window(state, &window_id) {
                release_window_gestures(interaction, &window_id);
            }
        }
        DesktopAction::FinalizeClose { window_id } => {
            if window_manager::finalize_close(state, &window_id) {
                release_window_gestures(interaction, &window_id);
                effects.push(RuntimeEffect::PersistWindowCache);
            }
        }
        DesktopAction::FocusWindow { window_id } => {
            window_manager::focus_window(state, &window_id);
        }
        DesktopAction::MinimizeWindow { window_id } => {
            if window_manager::minimize_window(state, &window_id) {
                release_window_gestures(interaction, &window_id);
            }
        }
        DesktopAction::ToggleMaximize { window_id } => {
            if window_manager::toggle_maximize(state, &window_id) {
                release_window_gestures(interaction, &window_id);
            }
        }
        DesktopAction::UpdatePosition {
            window_id,
            position,
        } => {
            if window_manager::update_position(state, &window_id, position) {
                effects.push(RuntimeEffect::PersistWindowCache);
            }
        }
        DesktopAction::UpdateSize { window_id, size } => {
            if window_manager::update_size(state, &window_id, size) {
                effects.push(RuntimeEffect::PersistWindowCache);
            }
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            toggle_taskbar_window(state, interaction, &window_id);
        }
        DesktopAction::ShowDesktop => {
            window_manager::show_desktop(state);
            interaction.dragging = None;
            interaction.resizing = None;
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            window_manager::focus_window(state, &window_id);
            if let Some(window) = state.window(&window_id) {
                if window.is_visible() && !window.maximized {
                    interaction.dragging = Some(DragSession {
                        window_id,
                        pointer_start: pointer,
                        position_start: window.position,
                    });
                }
            }
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let (dx, dy) = pointer.delta_from(session.pointer_start);
                // Windows may leave the viewport sideways or downwards, never above the top edge.
                let mut position = session.position_start.offset(dx, dy);
                position.y = position.y.max(0);
                let window_id = session.window_id.clone();
                let movable = state
                    .window(&window_id)
                    .map(|w| !w.maximized)
                    .unwrap_or(false);
                if movable && window_manager::update_position(state, &window_id, position) {
                    effects.push(RuntimeEffect::PersistWindowCache);
                }
            }
        }
        DesktopAction::EndMove => {
            interaction.dragging = None;
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            window_manager::focus_window(state, &window_id);
            if let Some(window) = state.window(&window_id) {
                if window.is_visible() && !window.maximized {
                    interaction.resizing = Some(ResizeSession {
                        window_id,
                        edge,
                        pointer_start: pointer,
                        size_start: window.size,
                    });
                }
            }
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref() {
                let (dx, dy) = pointer.delta_from(session.pointer_start);
                let size = resize_size(session.size_start, session.edge, dx, dy)
                    .clamped_min(state.config.min_window_size);
                let window_id = session.window_id.clone();
                let resizable = state
                    .window(&window_id)
                    .map(|w| !w.maximized)
                    .unwrap_or(false);
                if resizable && window_manager::update_size(state, &window_id, size) {
                    effects.push(RuntimeEffect::PersistWindowCache);
                }
            }
        }
        DesktopAction::EndResize => {
            interaction.resizing = None;
        }
        DesktopAction::SetDesktopIcons { icons } => {
            icons::set_desktop_icons(state, icons);
        }
        DesktopAction::BeginIconDrag { icon_id, pointer } => {
            icons::begin_icon_drag(state, interaction, &icon_id, pointer);
        }
        DesktopAction::UpdateIconDrag { pointer } => {
            if icons::update_icon_drag(state, interaction, pointer) {
                effects.push(RuntimeEffect::PersistIconCache);
            }
        }
        DesktopAction::EndIconDrag => {
            if let Some(icon) = icons::end_icon_drag(state, interaction) {
                window_manager::open_window(state, icon.open_config());
            }
        }
        DesktopAction::BeginMarquee { pointer } => {
            icons::begin_marquee(state, interaction, pointer);
        }
        DesktopAction::UpdateMarquee { pointer } => {
            icons::update_marquee(state, interaction, pointer);
        }
        DesktopAction::EndMarquee => {
            icons::end_marquee(interaction);
        }
        DesktopAction::ResetIconPositions => {
            icons::reset_icon_positions(state);
            effects.push(RuntimeEffect::ClearIconCache);
        }
        DesktopAction::HydrateCaches { windows, icons } => {
            state.window_cache.hydrate(windows);
            state.icon_cache.hydrate(icons);
        }
        DesktopAction::SetConfig { config } => {
            state.top_z_index = state.top_z_index.max(config.base_z_index);
            if state.config != config {
                state.config = config;
                effects.push(RuntimeEffect::PersistConfig);
            }
        }
    }

    effects
}

/// Taskbar semantics: a closing or minimized window is restored, the active window is
/// minimized, any other window is focused.
fn toggle_taskbar_window(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    window_id: &WindowId,
) {
    let Some(window) = state.window(window_id) else {
        return;
    };

    if !window.is_visible() {
        let config = WindowConfig {
            id: window.id.clone(),
            title: window.title.clone(),
            icon: window.icon.clone(),
            content: window.content.clone(),
            initial_position: Some(window.position),
            initial_size: Some(window.size),
        };
        window_manager::open_window(state, config);
    } else if state.active_window_id.as_ref() == Some(window_id) {
        window_manager::minimize_window(state, window_id);
        release_window_gestures(interaction, window_id);
    } else {
        window_manager::focus_window(state, window_id);
    }
}

fn release_window_gestures(interaction: &mut InteractionState, window_id: &WindowId) {
    if interaction
        .dragging
        .as_ref()
        .is_some_and(|s| &s.window_id == window_id)
    {
        interaction.dragging = None;
    }
    if interaction
        .resizing
        .as_ref()
        .is_some_and(|s| &s.window_id == window_id)
    {
        interaction.resizing = None;
    }
}

fn resize_size(start: Size, edge: ResizeEdge, dx: i32, dy: i32) -> Size {
    match edge {
        ResizeEdge::East => Size {
            width: start.width.saturating_add(dx),
            ..start
        },
        ResizeEdge::South => Size {
            height: start.height.saturating_add(dy),
            ..start
        },
        ResizeEdge::SouthEast => Size {
            width: start.width.saturating_add(dx),
            height: start.height.saturating_add(dy),
        },
    }
}
