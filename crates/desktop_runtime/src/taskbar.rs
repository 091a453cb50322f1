//! Taskbar projection of the window registry.

use crate::{
    model::{DesktopState, WindowId},
    reducer::DesktopAction,
};

/// One taskbar button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub window_id: WindowId,
    pub title: String,
    pub icon: String,
    pub focused: bool,
    pub minimized: bool,
}

impl TaskbarEntry {
    /// Action dispatched when the button is pressed.
    pub fn press(&self) -> DesktopAction {
        DesktopAction::ToggleTaskbarWindow {
            window_id: self.window_id.clone(),
        }
    }
}

/// Open windows in registry order. Closing windows have already left the taskbar.
pub fn taskbar_entries(state: &DesktopState) -> Vec<TaskbarEntry> {
    state
        .windows
        .iter()
        .filter(|window| window.is_open())
        .map(|window| TaskbarEntry {
            window_id: window.id.clone(),
            title: window.title.clone(),
            icon: window.icon.clone(),
            focused: state.active_window_id.as_ref() == Some(&window.id),
            minimized: window.minimized,
        })
        .collect()
}
