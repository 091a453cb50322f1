//! Profile content wire model: widgets, their grid cells, and the grid layout.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Axis-aligned rectangle in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl GridRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Open-interval overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &GridRect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn moved_to(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
}

/// Type-specific widget payload, discriminated by `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WidgetKind {
    Text {
        /// Markdown source.
        content: String,
    },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    LinkButton {
        label: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variant: Option<LinkVariant>,
    },
}

impl WidgetKind {
    pub fn widget_type(&self) -> WidgetType {
        match self {
            Self::Text { .. } => WidgetType::Text,
            Self::Image { .. } => WidgetType::Image,
            Self::LinkButton { .. } => WidgetType::LinkButton,
        }
    }
}

/// Widget discriminant, used when adding a widget of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetType {
    Text,
    Image,
    LinkButton,
}

impl WidgetType {
    /// Default footprint `(width, height)` in grid cells.
    pub fn default_size(self) -> (i32, i32) {
        match self {
            Self::Text => (12, 4),
            Self::Image => (6, 6),
            Self::LinkButton => (4, 2),
        }
    }

    /// Payload for a freshly added widget.
    pub fn blank(self) -> WidgetKind {
        match self {
            Self::Text => WidgetKind::Text {
                content: String::new(),
            },
            Self::Image => WidgetKind::Image {
                url: String::new(),
                alt: Some(String::new()),
                caption: None,
            },
            Self::LinkButton => WidgetKind::LinkButton {
                label: "Link".to_string(),
                url: String::new(),
                icon: None,
                variant: Some(LinkVariant::Primary),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub position: GridRect,
    #[serde(flatten)]
    pub kind: WidgetKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLayout {
    pub columns: i32,
    /// Row height in pixels.
    pub row_height: i32,
}

impl Default for ProfileLayout {
    fn default() -> Self {
        Self {
            columns: 12,
            row_height: 30,
        }
    }
}

/// `{"widgets": [...], "layout": {"columns", "rowHeight"}}`. Older rows name the list
/// `gadgets`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileContent {
    #[serde(default, alias = "gadgets")]
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub layout: ProfileLayout,
}

impl ProfileContent {
    /// Decodes a stored content payload. `null` is an empty profile.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Self::deserialize(value)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
