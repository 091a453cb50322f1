//! Window frame rendering state: mount/exit-animation phases, frame geometry, and the pointer
//! gestures a frame translates into reducer actions.

use std::collections::BTreeMap;

use crate::{
    model::{
        DesktopState, InteractionState, PointerPosition, ResizeEdge, Size, WindowId, WindowRecord,
    },
    reducer::DesktopAction,
};

/// Render phase of a window frame. A window without a phase is not rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    /// Mounted with its content live.
    Visible,
    /// Playing the close/minimize animation; content is still mounted.
    ExitAnimating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameTransition {
    Mounted(WindowId),
    ExitStarted(WindowId),
    /// Restored while its exit animation was still running.
    Restored(WindowId),
    /// The window left the registry while its frame was mounted.
    Unmounted(WindowId),
}

/// Result of reconciling frame phases with the registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSync {
    pub transitions: Vec<FrameTransition>,
    /// Closing windows that have no frame to animate and can be finalized right away.
    pub finalize: Vec<DesktopAction>,
}

/// Tracks which window frames are mounted and which are animating out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowFrameRenderer {
    phases: BTreeMap<WindowId, FramePhase>,
}

impl WindowFrameRenderer {
    pub fn phase(&self, window_id: &WindowId) -> Option<FramePhase> {
        self.phases.get(window_id).copied()
    }

    /// Whether the window's content is currently mounted.
    pub fn is_mounted(&self, window_id: &WindowId) -> bool {
        self.phases.contains_key(window_id)
    }

    /// Reconciles frame phases with the registry after a state change.
    pub fn sync(&mut self, state: &DesktopState) -> FrameSync {
        let mut sync = FrameSync::default();

        let removed: Vec<WindowId> = self
            .phases
            .keys()
            .filter(|id| state.window(id).is_none())
            .cloned()
            .collect();
        for window_id in removed {
            self.phases.remove(&window_id);
            sync.transitions.push(FrameTransition::Unmounted(window_id));
        }

        for window in &state.windows {
            let current = self.phases.get(&window.id).copied();
            match (current, window.is_visible()) {
                (None, true) => {
                    self.phases.insert(window.id.clone(), FramePhase::Visible);
                    sync.transitions
                        .push(FrameTransition::Mounted(window.id.clone()));
                }
                (Some(FramePhase::Visible), false) => {
                    self.phases
                        .insert(window.id.clone(), FramePhase::ExitAnimating);
                    sync.transitions
                        .push(FrameTransition::ExitStarted(window.id.clone()));
                }
                (Some(FramePhase::ExitAnimating), true) => {
                    self.phases.insert(window.id.clone(), FramePhase::Visible);
                    sync.transitions
                        .push(FrameTransition::Restored(window.id.clone()));
                }
                (None, false) if !window.is_open() => {
                    sync.finalize.push(DesktopAction::FinalizeClose {
                        window_id: window.id.clone(),
                    });
                }
                _ => {}
            }
        }

        sync
    }

    /// Handles the end of a frame's exit animation.
    ///
    /// The frame unmounts (a minimized window loses its app state). Returns the finalize action
    /// when the window was closing.
    pub fn animation_complete(
        &mut self,
        window_id: &WindowId,
        state: &DesktopState,
    ) -> Option<DesktopAction> {
        if self.phase(window_id) != Some(FramePhase::ExitAnimating) {
            return None;
        }
        self.phases.remove(window_id);

        match state.window(window_id) {
            Some(window) if !window.is_open() => Some(DesktopAction::FinalizeClose {
                window_id: window_id.clone(),
            }),
            _ => None,
        }
    }
}

/// Pixel box of a frame in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub z_index: u32,
}

/// Maximized windows fill the viewport; everything else uses its stored placement.
pub fn frame_geometry(window: &WindowRecord, viewport: Size) -> FrameGeometry {
    if window.maximized {
        FrameGeometry {
            x: 0,
            y: 0,
            width: viewport.width,
            height: viewport.height,
            z_index: window.z_index,
        }
    } else {
        FrameGeometry {
            x: window.position.x,
            y: window.position.y,
            width: window.size.width,
            height: window.size.height,
            z_index: window.z_index,
        }
    }
}

/// Everything a view needs to draw one mounted frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameView {
    pub id: WindowId,
    pub title: String,
    pub icon: String,
    pub geometry: FrameGeometry,
    pub phase: FramePhase,
    pub focused: bool,
    pub maximized: bool,
    pub padded: bool,
}

/// Mounted frames in paint order (lowest `z_index` first).
pub fn frame_views(
    state: &DesktopState,
    renderer: &WindowFrameRenderer,
    viewport: Size,
) -> Vec<FrameView> {
    let mut views: Vec<FrameView> = state
        .windows
        .iter()
        .filter_map(|window| {
            let phase = renderer.phase(&window.id)?;
            Some(FrameView {
                id: window.id.clone(),
                title: window.title.clone(),
                icon: window.icon.clone(),
                geometry: frame_geometry(window, viewport),
                phase,
                focused: state.active_window_id.as_ref() == Some(&window.id),
                maximized: window.maximized,
                padded: window.content.uses_padded_body(),
            })
        })
        .collect();
    views.sort_by_key(|view| view.geometry.z_index);
    views
}

/// Title-bar buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Minimize,
    ToggleMaximize,
    Close,
}

impl FrameControl {
    pub fn action(self, window_id: WindowId) -> DesktopAction {
        match self {
            Self::Minimize => DesktopAction::MinimizeWindow { window_id },
            Self::ToggleMaximize => DesktopAction::ToggleMaximize { window_id },
            Self::Close => DesktopAction::CloseWindow { window_id },
        }
    }
}

/// Frames playing their exit animation ignore pointer input, so a click cannot resurrect a
/// window that is minimizing or closing.
fn accepts_input(renderer: &WindowFrameRenderer, window_id: &WindowId) -> bool {
    renderer.phase(window_id) == Some(FramePhase::Visible)
}

/// Pointer-down anywhere inside a frame.
pub fn frame_pointer_down(
    renderer: &WindowFrameRenderer,
    window_id: WindowId,
) -> Vec<DesktopAction> {
    if !accepts_input(renderer, &window_id) {
        return Vec::new();
    }
    vec![DesktopAction::FocusWindow { window_id }]
}

/// Pointer-down on the title bar: focus, then start a move.
pub fn title_bar_pointer_down(
    renderer: &WindowFrameRenderer,
    window_id: WindowId,
    pointer: PointerPosition,
) -> Vec<DesktopAction> {
    if !accepts_input(renderer, &window_id) {
        return Vec::new();
    }
    vec![
        DesktopAction::FocusWindow {
            window_id: window_id.clone(),
        },
        DesktopAction::BeginMove { window_id, pointer },
    ]
}

/// Pointer-down on a resize handle: focus, then start a resize.
pub fn resize_handle_pointer_down(
    renderer: &WindowFrameRenderer,
    window_id: WindowId,
    edge: ResizeEdge,
    pointer: PointerPosition,
) -> Vec<DesktopAction> {
    if !accepts_input(renderer, &window_id) {
        return Vec::new();
    }
    vec![
        DesktopAction::FocusWindow {
            window_id: window_id.clone(),
        },
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        },
    ]
}

/// Document-level pointer move while a frame gesture is live.
pub fn frame_pointer_move(
    interaction: &InteractionState,
    pointer: PointerPosition,
) -> Option<DesktopAction> {
    if interaction.dragging.is_some() {
        Some(DesktopAction::UpdateMove { pointer })
    } else if interaction.resizing.is_some() {
        Some(DesktopAction::UpdateResize { pointer })
    } else {
        None
    }
}

pub fn frame_pointer_up(interaction: &InteractionState) -> Option<DesktopAction> {
    if interaction.dragging.is_some() {
        Some(DesktopAction::EndMove)
    } else if interaction.resizing.is_some() {
        Some(DesktopAction::EndResize)
    } else {
        None
    }
}
