//! Host-side runtime helpers for executing reducer effects and loading boot state.
//!
//! The reducer never touches storage or remote content. It emits [`RuntimeEffect`] values which
//! the host executes here against injected service adapters, so tests can swap in memory stores.

mod boot;
mod persistence_effects;

use std::rc::Rc;

use leptos::{logging, spawn_local, Callback};
use platform_host::{ContentService, NoopContentService, NotificationService, PrefsStore};
use platform_host_web::{host_strategy_name, notification_service, prefs_store};
use widget_grid::{EditorError, ProfileEditor};

use crate::{
    model::DesktopState,
    persistence::PersistenceError,
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    prefs: Rc<dyn PrefsStore>,
    content: Rc<dyn ContentService>,
    notifications: Rc<dyn NotificationService>,
    host_strategy_name: &'static str,
}

impl Default for DesktopHostContext {
    fn default() -> Self {
        Self {
            prefs: Rc::new(prefs_store()),
            content: Rc::new(NoopContentService),
            notifications: Rc::new(notification_service()),
            host_strategy_name: host_strategy_name(),
        }
    }
}

impl DesktopHostContext {
    /// Builds a host bundle from explicit adapters.
    pub fn new(
        prefs: Rc<dyn PrefsStore>,
        content: Rc<dyn ContentService>,
        notifications: Rc<dyn NotificationService>,
    ) -> Self {
        Self {
            prefs,
            content,
            notifications,
            host_strategy_name: "injected",
        }
    }

    /// Replaces the content collaborator, keeping the other adapters.
    pub fn with_content_service(mut self, content: Rc<dyn ContentService>) -> Self {
        self.content = content;
        self
    }

    pub fn prefs_store(&self) -> Rc<dyn PrefsStore> {
        self.prefs.clone()
    }

    pub fn content_service(&self) -> Rc<dyn ContentService> {
        self.content.clone()
    }

    pub fn notification_service(&self) -> Rc<dyn NotificationService> {
        self.notifications.clone()
    }

    /// Returns the stable name of the selected host strategy.
    pub fn host_strategy_name(&self) -> &'static str {
        self.host_strategy_name
    }

    /// Executes one reducer effect against the prefs store.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] when the store rejects the write.
    pub async fn execute_effect(
        &self,
        state: &DesktopState,
        effect: RuntimeEffect,
    ) -> Result<(), PersistenceError> {
        persistence_effects::execute(self, state, effect).await
    }

    /// Actions that hydrate a fresh desktop: config override, caches, then the icon list.
    pub async fn boot_actions(&self) -> Vec<DesktopAction> {
        boot::boot_actions(self).await
    }

    /// Saves a profile editor draft, surfacing failures as a toast.
    ///
    /// # Errors
    ///
    /// Returns the [`EditorError`] reported by the editor after the toast was shown.
    pub async fn save_profile(&self, editor: &ProfileEditor) -> Result<(), EditorError> {
        let result = editor.save(self.content.as_ref()).await;
        if let Err(err) = &result {
            self.toast("Save failed", &err.to_string()).await;
        }
        result
    }

    async fn toast(&self, title: &str, body: &str) {
        if let Err(err) = self.notifications.notify(title, body).await {
            logging::warn!("toast delivery failed: {err}");
        }
    }

    /// Spawns boot hydration for the desktop provider.
    pub fn install_boot_hydration(&self, dispatch: Callback<DesktopAction>) {
        boot::install_boot_hydration(self.clone(), dispatch);
    }

    /// Spawns execution of a single [`RuntimeEffect`] emitted by the reducer.
    ///
    /// Failures are logged and the desktop continues with its in-memory state.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        persistence_effects::spawn(self.clone(), runtime, effect);
    }
}

pub(crate) fn spawn_logged<F>(label: &'static str, future: F)
where
    F: std::future::Future<Output = Result<(), PersistenceError>> + 'static,
{
    spawn_local(async move {
        if let Err(err) = future.await {
            logging::warn!("{label} failed: {err}");
        }
    });
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use futures::executor::block_on;
    use platform_host::{
        BlogPostSummary, ContentFuture, MemoryContentService, MemoryNotificationService,
        MemoryPrefsStore, ProfileRecord, UnavailablePrefsStore,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        model::{DesktopConfig, InteractionState, Position},
        persistence::{ICON_CACHE_KEY, WINDOW_CACHE_KEY},
        reducer::reduce_desktop,
    };

    fn host_with(
        prefs: Rc<dyn PrefsStore>,
        profiles: Vec<ProfileRecord>,
    ) -> (DesktopHostContext, MemoryNotificationService) {
        let notifications = MemoryNotificationService::default();
        let host = DesktopHostContext::new(
            prefs,
            Rc::new(MemoryContentService::new(profiles, Vec::new())),
            Rc::new(notifications.clone()),
        );
        (host, notifications)
    }

    #[test]
    fn persist_effects_write_and_clear_prefs() {
        let store = MemoryPrefsStore::default();
        let (host, _) = host_with(Rc::new(store.clone()), Vec::new());
        let mut state = DesktopState::default();
        state.icon_cache.save("about", Position::new(300, 200));

        block_on(host.execute_effect(&state, RuntimeEffect::PersistWindowCache)).expect("windows");
        block_on(host.execute_effect(&state, RuntimeEffect::PersistIconCache)).expect("icons");
        assert_eq!(store.raw(WINDOW_CACHE_KEY).as_deref(), Some("{}"));
        assert!(store.raw(ICON_CACHE_KEY).is_some());

        block_on(host.execute_effect(&state, RuntimeEffect::ClearIconCache)).expect("clear");
        assert_eq!(store.raw(ICON_CACHE_KEY), None);
    }

    #[test]
    fn injected_content_service_replaces_the_default() {
        let (host, _) = host_with(Rc::new(MemoryPrefsStore::default()), Vec::new());
        let post = BlogPostSummary {
            id: "1".to_string(),
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            tags: Vec::new(),
        };
        let host = host.with_content_service(Rc::new(MemoryContentService::new(
            Vec::new(),
            vec![post.clone()],
        )));

        let posts = block_on(host.content_service().fetch_blog_posts()).expect("posts");

        assert_eq!(posts, vec![post]);
    }

    #[test]
    fn persisted_config_is_read_back_at_boot() {
        let store = MemoryPrefsStore::default();
        let (host, _) = host_with(Rc::new(store.clone()), Vec::new());
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let config = DesktopConfig {
            drag_threshold_px: 12,
            ..DesktopConfig::default()
        };

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::SetConfig {
                config: config.clone(),
            },
        );
        for effect in effects {
            block_on(host.execute_effect(&state, effect)).expect("persist");
        }

        let actions = block_on(host.boot_actions());
        assert_eq!(actions.first(), Some(&DesktopAction::SetConfig { config }));
    }

    #[test]
    fn failed_writes_surface_as_errors() {
        let (host, _) = host_with(Rc::new(UnavailablePrefsStore::default()), Vec::new());

        let result = block_on(host.execute_effect(
            &DesktopState::default(),
            RuntimeEffect::PersistWindowCache,
        ));

        assert!(result.is_err());
    }

    #[test]
    fn boot_hydrates_caches_and_icons() {
        let store = MemoryPrefsStore::default();
        block_on(store.save_pref(ICON_CACHE_KEY, r#"{"about":{"x":250,"y":30}}"#)).expect("seed");
        let profile = ProfileRecord {
            id: "p1".to_string(),
            name: "Ahpx".to_string(),
            slug: "ahpx".to_string(),
            icon: "/icons/1F464.svg".to_string(),
            is_active: true,
            content: json!({}),
        };
        let (host, notifications) = host_with(Rc::new(store), vec![profile]);

        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        for action in block_on(host.boot_actions()) {
            reduce_desktop(&mut state, &mut interaction, action);
        }

        assert_eq!(state.icon_cache.get("about"), Some(Position::new(250, 30)));
        assert_eq!(state.icons.last().map(|i| i.id.as_str()), Some("profile-ahpx"));
        assert!(notifications.sent().is_empty());
    }

    struct OfflineContent;

    impl ContentService for OfflineContent {
        fn fetch_profiles(&self) -> ContentFuture<'_, Result<Vec<ProfileRecord>, String>> {
            Box::pin(async { Err("network down".to_string()) })
        }

        fn fetch_blog_posts(&self) -> ContentFuture<'_, Result<Vec<BlogPostSummary>, String>> {
            Box::pin(async { Err("network down".to_string()) })
        }

        fn update_profile_content<'a>(
            &'a self,
            _profile_id: &'a str,
            _content: serde_json::Value,
        ) -> ContentFuture<'a, Result<(), String>> {
            Box::pin(async { Err("network down".to_string()) })
        }
    }

    #[test]
    fn profile_fetch_failure_toasts_and_keeps_declared_icons() {
        let notifications = MemoryNotificationService::default();
        let host = DesktopHostContext::new(
            Rc::new(MemoryPrefsStore::default()),
            Rc::new(OfflineContent),
            Rc::new(notifications.clone()),
        );

        let actions = block_on(host.boot_actions());

        let icons = actions.iter().find_map(|action| match action {
            DesktopAction::SetDesktopIcons { icons } => Some(icons.len()),
            _ => None,
        });
        assert_eq!(icons, Some(crate::apps::declared_apps().len()));
        assert_eq!(notifications.sent().len(), 1);
    }

    #[test]
    fn failed_profile_save_toasts_and_returns_error() {
        let notifications = MemoryNotificationService::default();
        let host = DesktopHostContext::new(
            Rc::new(MemoryPrefsStore::default()),
            Rc::new(OfflineContent),
            Rc::new(notifications.clone()),
        );
        let editor = ProfileEditor::new(
            "p1",
            widget_grid::ProfileContent::default(),
            widget_grid::GridConfig::default(),
            Rc::new(widget_grid::ManualScheduler::default()),
        );

        let result = block_on(host.save_profile(&editor));

        assert_eq!(
            result,
            Err(EditorError::Save {
                profile_id: "p1".to_string(),
                message: "network down".to_string(),
            })
        );
        assert_eq!(notifications.sent()[0].0, "Save failed");
    }
}
