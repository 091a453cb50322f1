//! Grid layout engine for profile widgets.
//!
//! Widgets live on a fixed-column grid measured in cells. While a profile is being edited, a
//! dragged widget can hover over another one without reflowing it; only a sustained hover (see
//! [`GridConfig::displacement_delay_ms`]) pushes the hovered widget out of the way.

pub mod displacement;
pub mod editor;
pub mod grid;
pub mod model;
pub mod timer;

pub use displacement::{DragDisplacement, PreviewListener};
pub use editor::{EditorError, GridConfig, ProfileEditor};
pub use grid::{find_collision, GridMetrics, PixelBox};
pub use model::{
    GridRect, LinkVariant, ProfileContent, ProfileLayout, Widget, WidgetKind, WidgetType,
};
pub use timer::{Debouncer, ManualScheduler, TimerHandle, TimerScheduler};
#[cfg(target_arch = "wasm32")]
pub use timer::WebTimerScheduler;
