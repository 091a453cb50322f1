//! Pixel geometry of the widget grid and collision lookup.

use crate::model::{GridRect, ProfileLayout};

/// Pixel box of a widget inside the grid container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

/// Column/row geometry for a container of a given width. There is no container padding; the
/// margin separates adjacent cells on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub columns: i32,
    pub row_height: i32,
    pub margin: i32,
    pub container_width: i32,
}

impl GridMetrics {
    pub fn new(layout: ProfileLayout, margin: i32, container_width: i32) -> Self {
        Self {
            columns: layout.columns.max(1),
            row_height: layout.row_height,
            margin,
            container_width,
        }
    }

    pub fn column_width(&self) -> f64 {
        let gutters = f64::from(self.margin) * f64::from(self.columns - 1);
        ((f64::from(self.container_width) - gutters) / f64::from(self.columns)).max(0.0)
    }

    fn column_pitch(&self) -> f64 {
        self.column_width() + f64::from(self.margin)
    }

    fn row_pitch(&self) -> f64 {
        f64::from(self.row_height + self.margin)
    }

    pub fn to_pixels(&self, rect: GridRect) -> PixelBox {
        let column_width = self.column_width();
        let margin = f64::from(self.margin);
        PixelBox {
            left: (f64::from(rect.x) * self.column_pitch()).round() as i32,
            top: (f64::from(rect.y) * self.row_pitch()).round() as i32,
            width: (f64::from(rect.width) * column_width
                + f64::from((rect.width - 1).max(0)) * margin)
                .round() as i32,
            height: rect.height * self.row_height + (rect.height - 1).max(0) * self.margin,
        }
    }

    /// Grid cell reached by dragging `start` by a pixel offset. The result stays inside the
    /// columns and never goes above the first row.
    pub fn drag_target(&self, start: GridRect, dx_px: i32, dy_px: i32) -> GridRect {
        let origin = self.to_pixels(start);
        let left = f64::from(origin.left + dx_px);
        let top = f64::from(origin.top + dy_px);

        let pitch = self.column_pitch();
        let x = if pitch > 0.0 {
            (left / pitch).round() as i32
        } else {
            start.x
        };
        let y = (top / self.row_pitch()).round() as i32;

        let max_x = (self.columns - start.width).max(0);
        start.moved_to(x.clamp(0, max_x), y.max(0))
    }

    /// Container height needed to show every rect.
    pub fn content_height<'a>(&self, rects: impl IntoIterator<Item = &'a GridRect>) -> i32 {
        let rows = rects.into_iter().map(GridRect::bottom).max().unwrap_or(0);
        if rows == 0 {
            return 0;
        }
        rows * self.row_height + (rows - 1) * self.margin
    }
}

/// First item, in order, whose rect overlaps `rect`, skipping `exclude_id`.
pub fn find_collision<'a, I>(rect: &GridRect, exclude_id: &str, items: I) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, &'a GridRect)>,
{
    items
        .into_iter()
        .find(|(id, other)| *id != exclude_id && rect.overlaps(other))
        .map(|(id, _)| id)
}
