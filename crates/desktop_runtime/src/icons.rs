//! Desktop icon layout engine: default column layout, threshold-gated drag, and marquee
//! selection.

use std::collections::BTreeSet;

use crate::model::{
    DesktopIconEntry, DesktopState, IconDragSession, InteractionState, MarqueeSession, PixelRect,
    PointerPosition, Position,
};

/// Resolved placement of one desktop icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconLayout {
    pub id: String,
    pub position: Position,
    pub selected: bool,
}

/// Current position of `icon_id`: cached, or its slot in the default column.
pub fn icon_position(state: &DesktopState, icon_id: &str) -> Option<Position> {
    let index = state.icons.iter().position(|icon| icon.id == icon_id)?;
    Some(state.icon_cache.position_for(
        icon_id,
        index,
        state.config.icon_origin,
        state.config.icon_spacing,
    ))
}

/// Positions and selection flags for every icon, in declaration order.
pub fn icon_layout(state: &DesktopState) -> Vec<IconLayout> {
    state
        .icons
        .iter()
        .enumerate()
        .map(|(index, icon)| IconLayout {
            id: icon.id.clone(),
            position: state.icon_cache.position_for(
                &icon.id,
                index,
                state.config.icon_origin,
                state.config.icon_spacing,
            ),
            selected: state.is_icon_selected(&icon.id),
        })
        .collect()
}

/// Bounding box of an icon anchored at `position`.
pub fn icon_bounds(state: &DesktopState, position: Position) -> PixelRect {
    PixelRect::from_origin_size(position, state.config.icon_size)
}

/// Replaces the ordered icon list, dropping selections for icons that no longer exist.
pub fn set_desktop_icons(state: &mut DesktopState, icons: Vec<DesktopIconEntry>) {
    state
        .selected_icons
        .retain(|id| icons.iter().any(|icon| &icon.id == id));
    state.icons = icons;
}

/// Clears every cached icon position; all icons fall back to the default column.
pub fn reset_icon_positions(state: &mut DesktopState) {
    state.icon_cache.clear();
}

/// Captures the press on an icon. Nothing moves until the pointer passes the drag threshold.
pub fn begin_icon_drag(
    state: &DesktopState,
    interaction: &mut InteractionState,
    icon_id: &str,
    pointer: PointerPosition,
) -> bool {
    let Some(position_start) = icon_position(state, icon_id) else {
        return false;
    };
    interaction.marquee = None;
    interaction.icon_drag = Some(IconDragSession {
        icon_id: icon_id.to_string(),
        pointer_start: pointer,
        position_start,
        dragging: false,
    });
    true
}

/// Applies a pointer move to the pressed icon. Returns `true` when the icon's cached position
/// changed.
pub fn update_icon_drag(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    pointer: PointerPosition,
) -> bool {
    let Some(session) = interaction.icon_drag.as_mut() else {
        return false;
    };
    let (dx, dy) = pointer.delta_from(session.pointer_start);
    let threshold = state.config.drag_threshold_px;
    if !session.dragging && (dx.abs() > threshold || dy.abs() > threshold) {
        session.dragging = true;
    }
    if !session.dragging {
        return false;
    }

    let position = session.position_start.offset(dx, dy).clamped_non_negative();
    if state.icon_cache.get(&session.icon_id) == Some(position) {
        return false;
    }
    state.icon_cache.save(&session.icon_id, position);
    true
}

/// Releases the pressed icon. Returns the icon to open when the press never became a drag.
pub fn end_icon_drag(
    state: &DesktopState,
    interaction: &mut InteractionState,
) -> Option<DesktopIconEntry> {
    let session = interaction.icon_drag.take()?;
    if session.dragging {
        return None;
    }
    state
        .icons
        .iter()
        .find(|icon| icon.id == session.icon_id)
        .cloned()
}

/// Starts a marquee on empty desktop background and clears the current selection.
pub fn begin_marquee(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    pointer: PointerPosition,
) {
    interaction.icon_drag = None;
    interaction.marquee = Some(MarqueeSession {
        origin: pointer,
        current: pointer,
    });
    state.selected_icons.clear();
}

/// Moves the marquee's live corner and recomputes the selection.
pub fn update_marquee(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    pointer: PointerPosition,
) -> bool {
    let Some(session) = interaction.marquee.as_mut() else {
        return false;
    };
    session.current = pointer;
    let rect = session.rect();
    state.selected_icons = icons_in_rect(state, &rect);
    true
}

pub fn end_marquee(interaction: &mut InteractionState) {
    interaction.marquee = None;
}

/// Every icon whose bounding box intersects `rect` (open intervals; touching edges do not
/// count).
pub fn icons_in_rect(state: &DesktopState, rect: &PixelRect) -> BTreeSet<String> {
    icon_layout(state)
        .into_iter()
        .filter(|icon| icon_bounds(state, icon.position).intersects(rect))
        .map(|icon| icon.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{model::WindowContent, position_cache::default_icon_position};

    fn entry(id: &str) -> DesktopIconEntry {
        DesktopIconEntry {
            id: id.to_string(),
            title: id.to_string(),
            icon: format!("/icons/{id}.svg"),
            content: WindowContent::About,
            initial_size: None,
        }
    }

    fn desktop(ids: &[&str]) -> DesktopState {
        let mut state = DesktopState::default();
        set_desktop_icons(&mut state, ids.iter().map(|id| entry(id)).collect());
        state
    }

    #[test]
    fn small_wiggle_stays_a_click() {
        let mut state = desktop(&["about"]);
        let mut interaction = InteractionState::default();

        begin_icon_drag(&state, &mut interaction, "about", PointerPosition::new(50, 50));
        assert!(!update_icon_drag(
            &mut state,
            &mut interaction,
            PointerPosition::new(55, 45)
        ));

        let opened = end_icon_drag(&state, &mut interaction);
        assert_eq!(opened.map(|icon| icon.id), Some("about".to_string()));
        assert_eq!(icon_position(&state, "about"), Some(Position::new(16, 16)));
        assert!(state.icon_cache.is_empty());
    }

    #[test]
    fn drag_past_threshold_moves_and_suppresses_open() {
        let mut state = desktop(&["about", "projects"]);
        let mut interaction = InteractionState::default();

        begin_icon_drag(&state, &mut interaction, "projects", PointerPosition::new(20, 120));
        assert!(update_icon_drag(
            &mut state,
            &mut interaction,
            PointerPosition::new(26, 120)
        ));
        assert_eq!(icon_position(&state, "projects"), Some(Position::new(22, 116)));

        // Once latched, moving back inside the threshold still tracks the pointer.
        update_icon_drag(&mut state, &mut interaction, PointerPosition::new(21, 121));
        assert_eq!(icon_position(&state, "projects"), Some(Position::new(17, 117)));

        assert_eq!(end_icon_drag(&state, &mut interaction), None);
        assert!(interaction.icon_drag.is_none());
    }

    #[test]
    fn drag_clamps_to_desktop_origin() {
        let mut state = desktop(&["about"]);
        let mut interaction = InteractionState::default();

        begin_icon_drag(&state, &mut interaction, "about", PointerPosition::new(30, 30));
        update_icon_drag(&mut state, &mut interaction, PointerPosition::new(-100, -200));

        assert_eq!(icon_position(&state, "about"), Some(Position::new(0, 0)));
    }

    #[test]
    fn pressing_unknown_icon_starts_nothing() {
        let state = desktop(&["about"]);
        let mut interaction = InteractionState::default();
        assert!(!begin_icon_drag(
            &state,
            &mut interaction,
            "ghost",
            PointerPosition::new(0, 0)
        ));
        assert!(interaction.is_idle());
    }

    #[test]
    fn marquee_selects_icons_it_overlaps() {
        let mut state = desktop(&["about", "projects"]);
        let mut interaction = InteractionState::default();

        begin_marquee(&mut state, &mut interaction, PointerPosition::new(0, 0));
        update_marquee(&mut state, &mut interaction, PointerPosition::new(100, 100));
        assert_eq!(
            state.selected_icons.iter().cloned().collect::<Vec<_>>(),
            vec!["about".to_string()]
        );

        update_marquee(&mut state, &mut interaction, PointerPosition::new(100, 10));
        assert!(state.selected_icons.is_empty());

        update_marquee(&mut state, &mut interaction, PointerPosition::new(100, 150));
        assert_eq!(state.selected_icons.len(), 2);
    }

    #[test]
    fn marquee_drawn_backwards_is_normalised() {
        let mut state = desktop(&["about"]);
        let mut interaction = InteractionState::default();

        begin_marquee(&mut state, &mut interaction, PointerPosition::new(100, 100));
        update_marquee(&mut state, &mut interaction, PointerPosition::new(0, 0));

        assert!(state.is_icon_selected("about"));
    }

    #[test]
    fn marquee_touching_an_edge_selects_nothing() {
        let mut state = desktop(&["about"]);
        let mut interaction = InteractionState::default();

        // Icon spans x 16..96; a rectangle ending exactly at x = 16 only touches it.
        begin_marquee(&mut state, &mut interaction, PointerPosition::new(0, 0));
        update_marquee(&mut state, &mut interaction, PointerPosition::new(16, 200));

        assert!(state.selected_icons.is_empty());
    }

    #[test]
    fn background_click_clears_selection() {
        let mut state = desktop(&["about"]);
        let mut interaction = InteractionState::default();
        state.selected_icons.insert("about".to_string());

        begin_marquee(&mut state, &mut interaction, PointerPosition::new(500, 500));
        end_marquee(&mut interaction);

        assert!(state.selected_icons.is_empty());
        assert!(interaction.is_idle());
    }

    #[test]
    fn replacing_icons_drops_stale_selection() {
        let mut state = desktop(&["about", "projects"]);
        state.selected_icons.insert("projects".to_string());

        set_desktop_icons(&mut state, vec![entry("about")]);

        assert!(state.selected_icons.is_empty());
    }

    #[test]
    fn reset_reverts_every_icon_to_default_column() {
        let mut state = desktop(&["about", "projects", "terminal"]);
        state.icon_cache.save("about", Position::new(400, 300));
        state.icon_cache.save("terminal", Position::new(10, 10));

        reset_icon_positions(&mut state);

        for (index, icon) in icon_layout(&state).iter().enumerate() {
            assert_eq!(
                icon.position,
                default_icon_position(index, Position::new(16, 16), 100)
            );
        }
    }
}
