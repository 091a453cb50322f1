//! Profile editing session: the draft widget list, drag/resize gestures, and saving.

use std::rc::Rc;

use platform_host::{next_monotonic_timestamp_ms, ContentService, ProfileRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    displacement::{DragDisplacement, PreviewListener},
    grid::GridMetrics,
    model::{GridRect, ProfileContent, ProfileLayout, Widget, WidgetKind, WidgetType},
    timer::TimerScheduler,
};

/// Tunables for the widget grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// How long a dragged widget must hover another before the hovered one is pushed aside.
    pub displacement_delay_ms: u32,
    /// Pixel gap between cells on both axes.
    pub margin: i32,
    pub min_widget_width: i32,
    pub min_widget_height: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            displacement_delay_ms: 2000,
            margin: 8,
            min_widget_width: 2,
            min_widget_height: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("profile content is not valid: {0}")]
    Decode(String),
    #[error("profile content could not be encoded: {0}")]
    Encode(String),
    #[error("no widget `{0}` in this profile")]
    UnknownWidget(String),
    #[error("widget `{id}` is a {expected:?} widget, not {found:?}")]
    KindMismatch {
        id: String,
        expected: WidgetType,
        found: WidgetType,
    },
    #[error("saving profile `{profile_id}` failed: {message}")]
    Save { profile_id: String, message: String },
}

/// Draft of one profile's widgets while its owner edits it.
pub struct ProfileEditor {
    profile_id: String,
    widgets: Vec<Widget>,
    layout: ProfileLayout,
    config: GridConfig,
    editing: bool,
    drag: Option<DragDisplacement>,
    scheduler: Rc<dyn TimerScheduler>,
    listener: Option<PreviewListener>,
}

impl ProfileEditor {
    pub fn new(
        profile_id: impl Into<String>,
        content: ProfileContent,
        config: GridConfig,
        scheduler: Rc<dyn TimerScheduler>,
    ) -> Self {
        Self {
            profile_id: profile_id.into(),
            widgets: content.widgets,
            layout: content.layout,
            config,
            editing: false,
            drag: None,
            scheduler,
            listener: None,
        }
    }

    /// Starts a draft from a fetched profile row.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Decode`] when the stored content does not match the widget model.
    pub fn from_profile(
        profile: &ProfileRecord,
        config: GridConfig,
        scheduler: Rc<dyn TimerScheduler>,
    ) -> Result<Self, EditorError> {
        let content = ProfileContent::from_value(&profile.content)
            .map_err(|e| EditorError::Decode(e.to_string()))?;
        Ok(Self::new(profile.id.clone(), content, config, scheduler))
    }

    /// Registers a callback run whenever a displacement timer changes the drag preview.
    pub fn on_preview_change(&mut self, listener: impl Fn() + 'static) {
        self.listener = Some(Rc::new(listener));
    }

    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    pub fn layout(&self) -> ProfileLayout {
        self.layout
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget(&self, widget_id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == widget_id)
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Leaving edit mode abandons any drag in progress.
    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
        if !editing {
            if let Some(drag) = self.drag.take() {
                drag.cancel();
            }
        }
    }

    pub fn metrics(&self, container_width: i32) -> GridMetrics {
        GridMetrics::new(self.layout, self.config.margin, container_width)
    }

    /// Appends a widget of `widget_type` below everything else, at its default size.
    pub fn add_widget(&mut self, widget_type: WidgetType) -> String {
        let (width, height) = widget_type.default_size();
        let y = self
            .widgets
            .iter()
            .map(|w| w.position.bottom())
            .max()
            .unwrap_or(0);
        let id = format!("widget-{}", next_monotonic_timestamp_ms());
        self.widgets.push(Widget {
            id: id.clone(),
            position: GridRect::new(0, y, width, height),
            kind: widget_type.blank(),
        });
        id
    }

    /// Replaces a widget's payload. The widget keeps its type.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown id or a payload of another widget type.
    pub fn update_widget(&mut self, widget_id: &str, kind: WidgetKind) -> Result<(), EditorError> {
        let widget = self
            .widgets
            .iter_mut()
            .find(|w| w.id == widget_id)
            .ok_or_else(|| EditorError::UnknownWidget(widget_id.to_string()))?;
        let expected = widget.kind.widget_type();
        let found = kind.widget_type();
        if expected != found {
            return Err(EditorError::KindMismatch {
                id: widget_id.to_string(),
                expected,
                found,
            });
        }
        widget.kind = kind;
        Ok(())
    }

    pub fn delete_widget(&mut self, widget_id: &str) -> bool {
        let before = self.widgets.len();
        self.widgets.retain(|w| w.id != widget_id);
        if self
            .drag
            .as_ref()
            .is_some_and(|drag| drag.dragged_id() == widget_id)
        {
            if let Some(drag) = self.drag.take() {
                drag.cancel();
            }
        }
        self.widgets.len() != before
    }

    /// Resizes a widget in edit mode, keeping it at least the minimum size and inside the
    /// columns.
    pub fn resize_widget(&mut self, widget_id: &str, width: i32, height: i32) -> bool {
        if !self.editing {
            return false;
        }
        let columns = self.layout.columns;
        let config = self.config;
        let Some(widget) = self.widgets.iter_mut().find(|w| w.id == widget_id) else {
            return false;
        };
        let max_width = (columns - widget.position.x).max(config.min_widget_width);
        widget.position.width = width.clamp(config.min_widget_width, max_width);
        widget.position.height = height.max(config.min_widget_height);
        true
    }

    /// Starts dragging a widget in edit mode.
    pub fn begin_drag(&mut self, widget_id: &str) -> bool {
        if !self.editing {
            return false;
        }
        if let Some(previous) = self.drag.take() {
            previous.cancel();
        }
        let layout = self
            .widgets
            .iter()
            .map(|w| (w.id.clone(), w.position))
            .collect();
        self.drag = DragDisplacement::begin(widget_id, layout, self.config.displacement_delay_ms)
            .map(|drag| drag.with_listener(self.listener.clone()));
        self.drag.is_some()
    }

    /// Moves the dragged widget to `rect` (grid cells).
    pub fn drag_move(&mut self, rect: GridRect) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        drag.drag_move(rect, self.scheduler.as_ref());
        true
    }

    /// Moves the dragged widget by a pixel offset from where the drag started.
    pub fn drag_by_pixels(&mut self, container_width: i32, dx_px: i32, dy_px: i32) -> bool {
        let metrics = self.metrics(container_width);
        let Some(start) = self
            .drag
            .as_ref()
            .and_then(|drag| self.widget(drag.dragged_id()))
            .map(|w| w.position)
        else {
            return false;
        };
        self.drag_move(metrics.drag_target(start, dx_px, dy_px))
    }

    /// Commits the drag preview as the new layout.
    pub fn end_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        for (id, rect) in drag.end() {
            if let Some(widget) = self.widgets.iter_mut().find(|w| w.id == id) {
                widget.position = rect;
            }
        }
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Widgets as they should be drawn right now, including any live drag preview.
    pub fn preview(&self) -> Vec<Widget> {
        let Some(drag) = &self.drag else {
            return self.widgets.clone();
        };
        let preview = drag.preview();
        self.widgets
            .iter()
            .map(|widget| {
                let position = preview
                    .iter()
                    .find(|(id, _)| *id == widget.id)
                    .map(|(_, rect)| *rect)
                    .unwrap_or(widget.position);
                Widget {
                    position,
                    ..widget.clone()
                }
            })
            .collect()
    }

    /// Committed draft in its wire shape.
    pub fn content(&self) -> ProfileContent {
        ProfileContent {
            widgets: self.widgets.clone(),
            layout: self.layout,
        }
    }

    /// Writes the draft through the content collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Save`] with the collaborator's message when the update fails.
    pub async fn save<C: ContentService + ?Sized>(&self, service: &C) -> Result<(), EditorError> {
        let value = self
            .content()
            .to_value()
            .map_err(|e| EditorError::Encode(e.to_string()))?;
        service
            .update_profile_content(&self.profile_id, value)
            .await
            .map_err(|message| EditorError::Save {
                profile_id: self.profile_id.clone(),
                message,
            })
    }
}
