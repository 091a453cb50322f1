use leptos::{create_effect, logging, spawn_local, Callable, Callback};

use crate::{
    apps,
    host::DesktopHostContext,
    persistence,
    reducer::DesktopAction,
};

pub(super) async fn boot_actions(host: &DesktopHostContext) -> Vec<DesktopAction> {
    let prefs = host.prefs_store();
    let snapshot = persistence::load_boot_snapshot(prefs.as_ref()).await;

    let mut actions = Vec::new();
    if let Some(config) = snapshot.config {
        actions.push(DesktopAction::SetConfig { config });
    }
    actions.push(DesktopAction::HydrateCaches {
        windows: snapshot.windows,
        icons: snapshot.icons,
    });

    let profiles = match host.content_service().fetch_profiles().await {
        Ok(profiles) => profiles,
        Err(err) => {
            logging::warn!("profile fetch failed: {err}");
            if let Err(err) = host
                .notification_service()
                .notify("Could not load profiles", &err)
                .await
            {
                logging::warn!("toast delivery failed: {err}");
            }
            Vec::new()
        }
    };
    actions.push(DesktopAction::SetDesktopIcons {
        icons: apps::desktop_icons(&profiles),
    });

    actions
}

pub(super) fn install_boot_hydration(host: DesktopHostContext, dispatch: Callback<DesktopAction>) {
    create_effect(move |_| {
        let host = host.clone();
        spawn_local(async move {
            for action in boot_actions(&host).await {
                dispatch.call(action);
            }
        });
    });
}
