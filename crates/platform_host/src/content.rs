//! Remote content collaborator contracts (profiles and blog posts).
//!
//! The desktop core never implements fetching or CRUD itself. It only calls these operations and
//! surfaces failures to the user through a [`crate::NotificationService`].

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Object-safe boxed future used by [`ContentService`].
pub type ContentFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Profile row as returned by the backing store.
pub struct ProfileRecord {
    /// Stable profile id.
    pub id: String,
    /// Display name shown under the desktop icon and in the window title.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Icon asset path.
    pub icon: String,
    /// Whether the profile should appear on the desktop.
    pub is_active: bool,
    /// Raw profile content (`{widgets, layout}`), decoded by the widget grid crate.
    #[serde(default)]
    pub content: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Blog post listing entry.
pub struct BlogPostSummary {
    /// Stable post id.
    pub id: String,
    /// Post title.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Remote data operations consumed by the desktop and the profile editor.
pub trait ContentService {
    /// Fetches every profile.
    fn fetch_profiles(&self) -> ContentFuture<'_, Result<Vec<ProfileRecord>, String>>;

    /// Fetches published blog posts.
    fn fetch_blog_posts(&self) -> ContentFuture<'_, Result<Vec<BlogPostSummary>, String>>;

    /// Replaces the content payload of one profile.
    fn update_profile_content<'a>(
        &'a self,
        profile_id: &'a str,
        content: Value,
    ) -> ContentFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Content service for offline hosts: empty listings, rejected writes.
pub struct NoopContentService;

impl ContentService for NoopContentService {
    fn fetch_profiles(&self) -> ContentFuture<'_, Result<Vec<ProfileRecord>, String>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn fetch_blog_posts(&self) -> ContentFuture<'_, Result<Vec<BlogPostSummary>, String>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn update_profile_content<'a>(
        &'a self,
        _profile_id: &'a str,
        _content: Value,
    ) -> ContentFuture<'a, Result<(), String>> {
        Box::pin(async { Err("content service unavailable".to_string()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory content service with shared backing rows.
pub struct MemoryContentService {
    profiles: Rc<RefCell<Vec<ProfileRecord>>>,
    posts: Rc<RefCell<Vec<BlogPostSummary>>>,
}

impl MemoryContentService {
    /// Creates a service seeded with profiles and posts.
    pub fn new(profiles: Vec<ProfileRecord>, posts: Vec<BlogPostSummary>) -> Self {
        Self {
            profiles: Rc::new(RefCell::new(profiles)),
            posts: Rc::new(RefCell::new(posts)),
        }
    }

    /// Returns the stored profile with `profile_id`.
    pub fn profile(&self, profile_id: &str) -> Option<ProfileRecord> {
        self.profiles
            .borrow()
            .iter()
            .find(|p| p.id == profile_id)
            .cloned()
    }
}

impl ContentService for MemoryContentService {
    fn fetch_profiles(&self) -> ContentFuture<'_, Result<Vec<ProfileRecord>, String>> {
        Box::pin(async move { Ok(self.profiles.borrow().clone()) })
    }

    fn fetch_blog_posts(&self) -> ContentFuture<'_, Result<Vec<BlogPostSummary>, String>> {
        Box::pin(async move { Ok(self.posts.borrow().clone()) })
    }

    fn update_profile_content<'a>(
        &'a self,
        profile_id: &'a str,
        content: Value,
    ) -> ContentFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut profiles = self.profiles.borrow_mut();
            let profile = profiles
                .iter_mut()
                .find(|p| p.id == profile_id)
                .ok_or_else(|| format!("profile `{profile_id}` not found"))?;
            profile.content = content;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn profile(id: &str) -> ProfileRecord {
        ProfileRecord {
            id: id.to_string(),
            name: "Ada".to_string(),
            slug: "ada".to_string(),
            icon: "/icons/ada.svg".to_string(),
            is_active: true,
            content: Value::Null,
        }
    }

    #[test]
    fn memory_service_updates_known_profile() {
        let service = MemoryContentService::new(vec![profile("p1")], Vec::new());
        let content = json!({ "widgets": [], "layout": { "columns": 12, "rowHeight": 30 } });

        block_on(service.update_profile_content("p1", content.clone())).expect("update");

        assert_eq!(service.profile("p1").map(|p| p.content), Some(content));
    }

    #[test]
    fn memory_service_rejects_unknown_profile() {
        let service = MemoryContentService::default();
        let err = block_on(service.update_profile_content("nope", Value::Null))
            .expect_err("unknown profile");
        assert_eq!(err, "profile `nope` not found");
    }

    #[test]
    fn noop_service_lists_nothing_and_rejects_writes() {
        let service = NoopContentService;
        assert!(block_on(service.fetch_profiles()).expect("profiles").is_empty());
        assert!(block_on(service.fetch_blog_posts()).expect("posts").is_empty());
        assert!(block_on(service.update_profile_content("p", Value::Null)).is_err());
    }
}
