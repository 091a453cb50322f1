//! In-memory mirrors of the durable window and icon placement caches.
//!
//! Reads during `open` and icon layout come from these mirrors, which are hydrated once at boot.
//! Every mutation is followed by a persistence effect that writes the whole map back to the host
//! prefs store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Position, WindowPlacement};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowPlacementCache {
    entries: BTreeMap<String, WindowPlacement>,
}

impl WindowPlacementCache {
    pub fn get(&self, window_id: &str) -> Option<WindowPlacement> {
        self.entries.get(window_id).copied()
    }

    pub fn save(&mut self, window_id: &str, placement: WindowPlacement) {
        self.entries.insert(window_id.to_string(), placement);
    }

    /// Replaces the mirror with a snapshot read from durable storage.
    pub fn hydrate(&mut self, entries: BTreeMap<String, WindowPlacement>) {
        self.entries = entries;
    }

    pub fn snapshot(&self) -> &BTreeMap<String, WindowPlacement> {
        &self.entries
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconPositionCache {
    entries: BTreeMap<String, Position>,
}

impl IconPositionCache {
    pub fn get(&self, icon_id: &str) -> Option<Position> {
        self.entries.get(icon_id).copied()
    }

    pub fn save(&mut self, icon_id: &str, position: Position) {
        self.entries.insert(icon_id.to_string(), position);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Cached position for `icon_id`, or its slot in the default column when nothing is cached.
    pub fn position_for(
        &self,
        icon_id: &str,
        index: usize,
        origin: Position,
        spacing: i32,
    ) -> Position {
        self.get(icon_id)
            .unwrap_or_else(|| default_icon_position(index, origin, spacing))
    }

    pub fn hydrate(&mut self, entries: BTreeMap<String, Position>) {
        self.entries = entries;
    }

    pub fn snapshot(&self) -> &BTreeMap<String, Position> {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Single-column stacking: `(origin.x, origin.y + index * spacing)`.
pub fn default_icon_position(index: usize, origin: Position, spacing: i32) -> Position {
    let index = i32::try_from(index).unwrap_or(i32::MAX);
    Position::new(origin.x, origin.y.saturating_add(index.saturating_mul(spacing)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Size;

    const ORIGIN: Position = Position::new(16, 16);

    #[test]
    fn default_column_stacks_by_index() {
        assert_eq!(default_icon_position(0, ORIGIN, 100), Position::new(16, 16));
        assert_eq!(default_icon_position(1, ORIGIN, 100), Position::new(16, 116));
        assert_eq!(default_icon_position(4, ORIGIN, 100), Position::new(16, 416));
    }

    #[test]
    fn cached_icon_position_wins_over_default_slot() {
        let mut cache = IconPositionCache::default();
        cache.save("terminal", Position::new(300, 40));

        assert_eq!(
            cache.position_for("terminal", 2, ORIGIN, 100),
            Position::new(300, 40)
        );
        assert_eq!(
            cache.position_for("about", 0, ORIGIN, 100),
            Position::new(16, 16)
        );

        cache.clear();
        assert_eq!(
            cache.position_for("terminal", 2, ORIGIN, 100),
            Position::new(16, 216)
        );
    }

    #[test]
    fn window_cache_serializes_as_plain_map() {
        let mut cache = WindowPlacementCache::default();
        cache.save(
            "about",
            WindowPlacement {
                position: Position::new(10, 20),
                size: Size::new(640, 480),
            },
        );

        let json = serde_json::to_value(&cache).expect("encode");
        assert_eq!(
            json,
            serde_json::json!({
                "about": {
                    "position": { "x": 10, "y": 20 },
                    "size": { "width": 640, "height": 480 }
                }
            })
        );
    }
}
