use leptos::SignalGetUntracked;

use crate::{
    host::{spawn_logged, DesktopHostContext},
    model::DesktopState,
    persistence::{self, PersistenceError},
    reducer::RuntimeEffect,
    runtime_context::DesktopRuntimeContext,
};

pub(super) async fn execute(
    host: &DesktopHostContext,
    state: &DesktopState,
    effect: RuntimeEffect,
) -> Result<(), PersistenceError> {
    let prefs = host.prefs_store();
    match effect {
        RuntimeEffect::PersistWindowCache => {
            persistence::persist_window_cache(prefs.as_ref(), state).await
        }
        RuntimeEffect::PersistIconCache => {
            persistence::persist_icon_cache(prefs.as_ref(), state).await
        }
        RuntimeEffect::ClearIconCache => persistence::clear_icon_cache(prefs.as_ref()).await,
        RuntimeEffect::PersistConfig => {
            persistence::persist_config(prefs.as_ref(), &state.config).await
        }
    }
}

pub(super) fn spawn(
    host: DesktopHostContext,
    runtime: DesktopRuntimeContext,
    effect: RuntimeEffect,
) {
    // Snapshot now so the write reflects the state that emitted the effect.
    let state = runtime.state.get_untracked();
    let label = match effect {
        RuntimeEffect::PersistWindowCache => "persist window cache",
        RuntimeEffect::PersistIconCache => "persist icon cache",
        RuntimeEffect::ClearIconCache => "clear icon cache",
        RuntimeEffect::PersistConfig => "persist desktop config",
    };
    spawn_logged(label, async move { execute(&host, &state, effect).await });
}
