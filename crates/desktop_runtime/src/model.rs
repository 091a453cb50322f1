use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::position_cache::{IconPositionCache, WindowPlacementCache};

pub const DEFAULT_BASE_Z_INDEX: u32 = 100;

/// Caller-chosen window identity. Also the correlation key between a desktop icon and the window
/// it opens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Saturates at the `i32` bounds instead of overflowing on extreme pointer deltas.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    pub fn clamped_non_negative(self) -> Self {
        Self {
            x: self.x.max(0),
            y: self.y.max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn clamped_min(self, min: Size) -> Self {
        Self {
            width: self.width.max(min.width),
            height: self.height.max(min.height),
        }
    }
}

/// Last known placement of a window, as stored in the durable window cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPlacement {
    pub position: Position,
    pub size: Size,
}

/// Axis-aligned pixel rectangle used for hit-testing and viewport geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    /// Builds a normalised rectangle from two arbitrary corners.
    pub fn from_corners(a: Position, b: Position) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn from_origin_size(origin: Position, size: Size) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x + size.width,
            bottom: origin.y + size.height,
        }
    }

    /// Open-interval overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Content mounted inside a window. The registry and frame renderer never look inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "app", rename_all = "kebab-case")]
pub enum WindowContent {
    About,
    Projects,
    Terminal,
    Clock,
    Blogs,
    BlogPost { slug: String },
    Profile { profile_id: String },
    NewProfile,
}

impl WindowContent {
    /// Profile surfaces keep the padded window body; every other app renders edge to edge.
    pub fn uses_padded_body(&self) -> bool {
        matches!(self, Self::Profile { .. } | Self::NewProfile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowLifecycle {
    Open,
    /// Closed by the user; stays registered until the exit animation reports completion.
    Closing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub icon: String,
    pub content: WindowContent,
    pub lifecycle: WindowLifecycle,
    pub minimized: bool,
    pub maximized: bool,
    pub z_index: u32,
    pub position: Position,
    pub size: Size,
}

impl WindowRecord {
    pub fn is_open(&self) -> bool {
        self.lifecycle == WindowLifecycle::Open
    }

    /// Open and not minimized: eligible for focus and rendering.
    pub fn is_visible(&self) -> bool {
        self.is_open() && !self.minimized
    }

    pub fn placement(&self) -> WindowPlacement {
        WindowPlacement {
            position: self.position,
            size: self.size,
        }
    }
}

/// Request to open (or re-open) a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub id: WindowId,
    pub title: String,
    pub icon: String,
    pub content: WindowContent,
    pub initial_position: Option<Position>,
    pub initial_size: Option<Size>,
}

impl WindowConfig {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        icon: impl Into<String>,
        content: WindowContent,
    ) -> Self {
        Self {
            id: WindowId::new(id),
            title: title.into(),
            icon: icon.into(),
            content,
            initial_position: None,
            initial_size: None,
        }
    }

    pub fn with_initial_position(mut self, position: Position) -> Self {
        self.initial_position = Some(position);
        self
    }

    pub fn with_initial_size(mut self, size: Size) -> Self {
        self.initial_size = Some(size);
        self
    }
}

/// A launchable icon on the desktop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopIconEntry {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub content: WindowContent,
    pub initial_size: Option<Size>,
}

impl DesktopIconEntry {
    pub fn open_config(&self) -> WindowConfig {
        WindowConfig {
            id: WindowId::new(self.id.clone()),
            title: self.title.clone(),
            icon: self.icon.clone(),
            content: self.content.clone(),
            initial_position: None,
            initial_size: self.initial_size,
        }
    }
}

/// Tunables for the window manager and icon engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    /// Pointer travel (px, either axis) before an icon press becomes a drag.
    pub drag_threshold_px: i32,
    pub icon_size: Size,
    /// Top-left of the first icon in the default column.
    pub icon_origin: Position,
    /// Vertical distance between icons in the default column.
    pub icon_spacing: i32,
    pub default_window_position: Position,
    pub default_window_size: Size,
    pub min_window_size: Size,
    pub base_z_index: u32,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: 5,
            icon_size: Size::new(80, 76),
            icon_origin: Position::new(16, 16),
            icon_spacing: 100,
            default_window_position: Position::new(100, 100),
            default_window_size: Size::new(600, 400),
            min_window_size: Size::new(300, 200),
            base_z_index: DEFAULT_BASE_Z_INDEX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub config: DesktopConfig,
    pub windows: Vec<WindowRecord>,
    pub active_window_id: Option<WindowId>,
    /// Highest z-index handed out so far. Allocation is strictly increasing.
    pub top_z_index: u32,
    pub window_cache: WindowPlacementCache,
    pub icons: Vec<DesktopIconEntry>,
    pub icon_cache: IconPositionCache,
    pub selected_icons: BTreeSet<String>,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::with_config(DesktopConfig::default())
    }
}

impl DesktopState {
    pub fn with_config(config: DesktopConfig) -> Self {
        Self {
            top_z_index: config.base_z_index,
            config,
            windows: Vec::new(),
            active_window_id: None,
            window_cache: WindowPlacementCache::default(),
            icons: Vec::new(),
            icon_cache: IconPositionCache::default(),
            selected_icons: BTreeSet::new(),
        }
    }

    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.id == window_id)
    }

    pub fn window_mut(&mut self, window_id: &WindowId) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| &w.id == window_id)
    }

    pub fn active_window(&self) -> Option<&WindowRecord> {
        self.active_window_id
            .as_ref()
            .and_then(|id| self.window(id))
    }

    pub fn is_icon_selected(&self, icon_id: &str) -> bool {
        self.selected_icons.contains(icon_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn delta_from(self, origin: PointerPosition) -> (i32, i32) {
        (
            self.x.saturating_sub(origin.x),
            self.y.saturating_sub(origin.y),
        )
    }
}

impl From<PointerPosition> for Position {
    fn from(value: PointerPosition) -> Self {
        Position::new(value.x, value.y)
    }
}

/// Resize handles exposed by a window frame. Only the trailing edges resize, so the window's
/// position never changes during a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    East,
    South,
    SouthEast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub position_start: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub size_start: Size,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDragSession {
    pub icon_id: String,
    pub pointer_start: PointerPosition,
    pub position_start: Position,
    /// Latched once the pointer travels past the drag threshold.
    pub dragging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarqueeSession {
    pub origin: PointerPosition,
    pub current: PointerPosition,
}

impl MarqueeSession {
    pub fn rect(&self) -> PixelRect {
        PixelRect::from_corners(self.origin.into(), self.current.into())
    }
}

/// Transient pointer-gesture state. Only one gesture can be live at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
    pub icon_drag: Option<IconDragSession>,
    pub marquee: Option<MarqueeSession>,
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        self.dragging.is_none()
            && self.resizing.is_none()
            && self.icon_drag.is_none()
            && self.marquee.is_none()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn extreme_pointer_deltas_saturate() {
        let far = PointerPosition::new(i32::MAX, i32::MIN);
        let (dx, dy) = far.delta_from(PointerPosition::new(-10, 10));

        assert_eq!((dx, dy), (i32::MAX, i32::MIN));
        assert_eq!(
            Position::new(100, -100).offset(dx, dy),
            Position::new(i32::MAX, i32::MIN)
        );
    }
}
