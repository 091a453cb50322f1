//! Runtime provider and context wiring for the desktop.
//!
//! This module owns the long-lived reducer container, the frame renderer, the runtime effect
//! queue, and host bootstrap wiring. Views read the signals and dispatch [`DesktopAction`] values.

use leptos::*;

use crate::{
    host::DesktopHostContext,
    model::{DesktopState, InteractionState, WindowId},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
    window_frame::WindowFrameRenderer,
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects.
    pub host: StoredValue<DesktopHostContext>,
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Reactive pointer/drag/resize interaction state signal.
    pub interaction: RwSignal<InteractionState>,
    /// Mount and exit-animation phases of window frames.
    pub frames: RwSignal<WindowFrameRenderer>,
    /// Queue of runtime effects emitted by the reducer and drained by the effect executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Reports that a frame finished its exit animation.
    pub fn notify_animation_complete(&self, window_id: &WindowId) {
        let desktop = self.state.get_untracked();
        let mut finalize = None;
        self.frames.update(|frames| {
            finalize = frames.animation_complete(window_id, &desktop);
        });
        if let Some(action) = finalize {
            self.dispatch_action(action);
        }
    }
}

/// Reduces one action and reconciles frame phases, finalizing closing windows that have no
/// frame to animate. Returns every effect emitted along the way, in order.
pub fn apply_action(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    frames: &mut WindowFrameRenderer,
    action: DesktopAction,
) -> Vec<RuntimeEffect> {
    let mut effects = reduce_desktop(state, interaction, action);
    loop {
        let sync = frames.sync(state);
        if sync.finalize.is_empty() {
            break;
        }
        for action in sync.finalize {
            effects.extend(reduce_desktop(state, interaction, action));
        }
    }
    effects
}

/// Drains reducer-emitted effects in order. The queue is cleared before the drain so effects
/// queued by nested dispatches land in a fresh batch.
fn install_effect_executor(runtime: DesktopRuntimeContext) {
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }
        runtime.effects.set(Vec::new());

        let host = runtime.host.get_value();
        for effect in queued {
            host.run_runtime_effect(runtime, effect);
        }
    });
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and boots persisted state.
pub fn DesktopProvider(
    /// Host bundle; the browser strategy is used when omitted.
    #[prop(optional)]
    host: Option<DesktopHostContext>,
    children: Children,
) -> impl IntoView {
    let host = store_value(host.unwrap_or_default());
    let state = create_rw_signal(DesktopState::default());
    let interaction = create_rw_signal(InteractionState::default());
    let frames = create_rw_signal(WindowFrameRenderer::default());
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut desktop = state.get_untracked();
        let mut ui = interaction.get_untracked();
        let mut renderer = frames.get_untracked();
        let previous_desktop = desktop.clone();
        let previous_ui = ui.clone();
        let previous_renderer = renderer.clone();

        let new_effects = apply_action(&mut desktop, &mut ui, &mut renderer, action);

        if desktop != previous_desktop {
            state.set(desktop);
        }
        if ui != previous_ui {
            interaction.set(ui);
        }
        if renderer != previous_renderer {
            frames.set(renderer);
        }
        if !new_effects.is_empty() {
            let mut queue = effects.get_untracked();
            queue.extend(new_effects);
            effects.set(queue);
        }
    });

    let runtime = DesktopRuntimeContext {
        host,
        state,
        interaction,
        frames,
        effects,
        dispatch,
    };

    provide_context(runtime);

    runtime.host.get_value().install_boot_hydration(dispatch);
    install_effect_executor(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{WindowConfig, WindowContent};

    #[test]
    fn closing_hidden_window_is_finalized_in_the_same_dispatch() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let mut frames = WindowFrameRenderer::default();
        let id = WindowId::from("clock");

        apply_action(
            &mut state,
            &mut interaction,
            &mut frames,
            DesktopAction::OpenWindow(WindowConfig::new(
                "clock",
                "Clock",
                "/icons/1F570.svg",
                WindowContent::Clock,
            )),
        );
        apply_action(
            &mut state,
            &mut interaction,
            &mut frames,
            DesktopAction::MinimizeWindow {
                window_id: id.clone(),
            },
        );
        // The frame is still animating out of the minimize; finish it.
        assert_eq!(frames.animation_complete(&id, &state), None);

        let effects = apply_action(
            &mut state,
            &mut interaction,
            &mut frames,
            DesktopAction::CloseWindow {
                window_id: id.clone(),
            },
        );

        assert_eq!(effects, vec![RuntimeEffect::PersistWindowCache]);
        assert!(state.window(&id).is_none());
        assert!(state.window_cache.get("clock").is_some());
    }
}
