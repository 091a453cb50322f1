use std::rc::Rc;

use desktop_runtime::{
    apply_action, icons, DesktopAction, DesktopHostContext, DesktopState, InteractionState,
    PointerPosition, Position, RuntimeEffect, Size, WindowConfig, WindowContent,
    WindowFrameRenderer, WindowId,
};
use futures::executor::block_on;
use platform_host::{MemoryContentService, MemoryNotificationService, MemoryPrefsStore};

struct Desktop {
    host: DesktopHostContext,
    state: DesktopState,
    interaction: InteractionState,
    frames: WindowFrameRenderer,
}

impl Desktop {
    /// Boots a desktop against `store`, the way the provider does on page load.
    fn boot(store: &MemoryPrefsStore) -> Self {
        let host = DesktopHostContext::new(
            Rc::new(store.clone()),
            Rc::new(MemoryContentService::default()),
            Rc::new(MemoryNotificationService::default()),
        );
        let mut desktop = Self {
            host,
            state: DesktopState::default(),
            interaction: InteractionState::default(),
            frames: WindowFrameRenderer::default(),
        };
        for action in block_on(desktop.host.boot_actions()) {
            desktop.dispatch(action);
        }
        desktop
    }

    /// Reduces an action and runs its effects to completion.
    fn dispatch(&mut self, action: DesktopAction) -> Vec<RuntimeEffect> {
        let effects = apply_action(
            &mut self.state,
            &mut self.interaction,
            &mut self.frames,
            action,
        );
        for effect in &effects {
            block_on(self.host.execute_effect(&self.state, *effect)).expect("effect");
        }
        effects
    }

    fn finish_animations(&mut self) {
        let ids: Vec<WindowId> = self.state.windows.iter().map(|w| w.id.clone()).collect();
        for id in ids {
            if let Some(action) = self.frames.animation_complete(&id, &self.state) {
                self.dispatch(action);
            }
        }
    }

    fn close(&mut self, id: &str) {
        self.dispatch(DesktopAction::CloseWindow {
            window_id: id.into(),
        });
        self.finish_animations();
    }
}

fn open_request(id: &str) -> WindowConfig {
    WindowConfig::new(id, id, "/icons/app.svg", WindowContent::Projects)
}

fn expected_focus(state: &DesktopState) -> Option<WindowId> {
    state
        .windows
        .iter()
        .filter(|w| w.is_visible())
        .max_by_key(|w| w.z_index)
        .map(|w| w.id.clone())
}

#[test]
fn focus_always_tracks_highest_visible_window() {
    let ids = ["about", "projects", "terminal", "clock", "blogs"];
    let mut state = DesktopState::default();
    let mut interaction = InteractionState::default();
    let mut frames = WindowFrameRenderer::default();
    let mut seed: u64 = 0x5eed_1234;

    for _ in 0..2_000 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let id = WindowId::from(ids[((seed >> 33) % ids.len() as u64) as usize]);
        let action = match (seed >> 45) % 5 {
            0 => DesktopAction::OpenWindow(open_request(id.as_str())),
            1 => DesktopAction::CloseWindow { window_id: id },
            2 => DesktopAction::MinimizeWindow { window_id: id },
            3 => DesktopAction::FocusWindow { window_id: id },
            _ => DesktopAction::FinalizeClose { window_id: id },
        };
        let top_before = state.top_z_index;

        apply_action(&mut state, &mut interaction, &mut frames, action);

        assert_eq!(state.active_window_id, expected_focus(&state));
        assert!(state.top_z_index >= top_before);
        if let Some(active) = state.active_window() {
            assert!(!active.minimized);
        }
        let mut seen: Vec<&WindowId> = state.windows.iter().map(|w| &w.id).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), state.windows.len(), "one record per id");
    }
}

#[test]
fn reopen_restores_persisted_placement_over_request() {
    let store = MemoryPrefsStore::default();
    let mut desktop = Desktop::boot(&store);

    desktop.dispatch(DesktopAction::OpenWindow(open_request("projects")));
    desktop.dispatch(DesktopAction::UpdatePosition {
        window_id: "projects".into(),
        position: Position::new(240, 180),
    });
    desktop.dispatch(DesktopAction::UpdateSize {
        window_id: "projects".into(),
        size: Size::new(820, 500),
    });
    desktop.close("projects");
    assert!(desktop.state.windows.is_empty());

    desktop.dispatch(DesktopAction::OpenWindow(
        open_request("projects")
            .with_initial_position(Position::new(5, 5))
            .with_initial_size(Size::new(320, 240)),
    ));

    let window = desktop.state.window(&"projects".into()).expect("reopened");
    assert_eq!(window.position, Position::new(240, 180));
    assert_eq!(window.size, Size::new(820, 500));
}

#[test]
fn placements_and_icon_positions_survive_reload() {
    let store = MemoryPrefsStore::default();
    {
        let mut desktop = Desktop::boot(&store);
        desktop.dispatch(DesktopAction::OpenWindow(open_request("terminal")));
        desktop.dispatch(DesktopAction::UpdatePosition {
            window_id: "terminal".into(),
            position: Position::new(64, 32),
        });
        desktop.dispatch(DesktopAction::BeginIconDrag {
            icon_id: "clock".to_string(),
            pointer: PointerPosition::new(50, 450),
        });
        desktop.dispatch(DesktopAction::UpdateIconDrag {
            pointer: PointerPosition::new(450, 470),
        });
        desktop.dispatch(DesktopAction::EndIconDrag);
    }

    let mut reloaded = Desktop::boot(&store);

    assert_eq!(
        icons::icon_position(&reloaded.state, "clock"),
        Some(Position::new(416, 436))
    );
    assert!(reloaded.state.window(&"clock".into()).is_none(), "drag never opens");

    reloaded.dispatch(DesktopAction::OpenWindow(open_request("terminal")));
    assert_eq!(
        reloaded.state.window(&"terminal".into()).map(|w| w.position),
        Some(Position::new(64, 32))
    );
}

#[test]
fn icon_click_opens_its_window_once() {
    let store = MemoryPrefsStore::default();
    let mut desktop = Desktop::boot(&store);

    for _ in 0..2 {
        desktop.dispatch(DesktopAction::BeginIconDrag {
            icon_id: "about".to_string(),
            pointer: PointerPosition::new(40, 40),
        });
        desktop.dispatch(DesktopAction::UpdateIconDrag {
            pointer: PointerPosition::new(43, 37),
        });
        desktop.dispatch(DesktopAction::EndIconDrag);
    }

    assert_eq!(desktop.state.windows.len(), 1);
    assert_eq!(desktop.state.active_window_id, Some("about".into()));
    assert_eq!(icons::icon_position(&desktop.state, "about"), Some(Position::new(16, 16)));
}

#[test]
fn sort_icons_restores_default_column_after_reload() {
    let store = MemoryPrefsStore::default();
    let mut desktop = Desktop::boot(&store);
    desktop.dispatch(DesktopAction::BeginIconDrag {
        icon_id: "projects".to_string(),
        pointer: PointerPosition::new(40, 140),
    });
    desktop.dispatch(DesktopAction::UpdateIconDrag {
        pointer: PointerPosition::new(600, 300),
    });
    desktop.dispatch(DesktopAction::EndIconDrag);

    desktop.dispatch(DesktopAction::ResetIconPositions);
    let reloaded = Desktop::boot(&store);

    for (index, icon) in icons::icon_layout(&reloaded.state).iter().enumerate() {
        assert_eq!(icon.position, Position::new(16, 16 + index as i32 * 100));
    }
}

#[test]
fn marquee_selection_matches_icon_boxes() {
    let store = MemoryPrefsStore::default();
    let mut desktop = Desktop::boot(&store);

    desktop.dispatch(DesktopAction::BeginMarquee {
        pointer: PointerPosition::new(0, 0),
    });
    desktop.dispatch(DesktopAction::UpdateMarquee {
        pointer: PointerPosition::new(100, 100),
    });
    assert!(desktop.state.is_icon_selected("about"));
    assert_eq!(desktop.state.selected_icons.len(), 1);

    desktop.dispatch(DesktopAction::UpdateMarquee {
        pointer: PointerPosition::new(100, 10),
    });
    assert!(desktop.state.selected_icons.is_empty());
    desktop.dispatch(DesktopAction::EndMarquee);
    assert!(desktop.interaction.is_idle());
}
