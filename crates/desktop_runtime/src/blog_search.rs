//! Debounced title/tag search for the blog listing window.

use std::{cell::RefCell, rc::Rc};

use platform_host::BlogPostSummary;
use widget_grid::{Debouncer, TimerScheduler};

/// Quiet period after the last keystroke before the query is applied.
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Case-insensitive match of `query` against the post title and tags. A blank query matches all.
pub fn matches_query(post: &BlogPostSummary, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    post.title.to_lowercase().contains(&needle)
        || post.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
}

pub fn filter_posts<'a>(posts: &'a [BlogPostSummary], query: &str) -> Vec<&'a BlogPostSummary> {
    posts.iter().filter(|post| matches_query(post, query)).collect()
}

/// Search box state: raw keystrokes are debounced into a committed query.
pub struct BlogSearch {
    committed: Rc<RefCell<String>>,
    debouncer: Debouncer<String>,
}

impl BlogSearch {
    /// `on_commit` runs with the query each time a debounced value lands.
    pub fn new(on_commit: impl Fn(&str) + 'static) -> Self {
        let committed = Rc::new(RefCell::new(String::new()));
        let sink = committed.clone();
        let debouncer = Debouncer::new(SEARCH_DEBOUNCE_MS, move |query: String| {
            *sink.borrow_mut() = query.clone();
            on_commit(&query);
        });
        Self {
            committed,
            debouncer,
        }
    }

    /// Records a keystroke; the previous pending commit is discarded.
    pub fn input<S: TimerScheduler + ?Sized>(&mut self, text: &str, scheduler: &S) {
        self.debouncer.input(text.to_string(), scheduler);
    }

    /// Replaces the query from outside the input box without waiting.
    pub fn set_query(&mut self, query: &str) {
        self.debouncer.cancel();
        *self.committed.borrow_mut() = query.to_string();
    }

    pub fn query(&self) -> String {
        self.committed.borrow().clone()
    }

    pub fn filter<'a>(&self, posts: &'a [BlogPostSummary]) -> Vec<&'a BlogPostSummary> {
        filter_posts(posts, &self.committed.borrow())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;
    use widget_grid::ManualScheduler;

    use super::*;

    fn post(id: &str, title: &str, tags: &[&str]) -> BlogPostSummary {
        BlogPostSummary {
            id: id.to_string(),
            title: title.to_string(),
            slug: id.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    fn posts() -> Vec<BlogPostSummary> {
        vec![
            post("wasm", "Shipping Leptos to the browser", &["Rust", "wasm"]),
            post("grid", "Widget grids that move", &["layout"]),
        ]
    }

    #[test]
    fn query_matches_title_or_tag_ignoring_case() {
        let posts = posts();

        let ids = |query: &str| -> Vec<String> {
            filter_posts(&posts, query)
                .into_iter()
                .map(|post| post.id.clone())
                .collect()
        };

        assert_eq!(ids("rust"), vec!["wasm".to_string()]);
        assert_eq!(ids("GRIDS"), vec!["grid".to_string()]);
        assert_eq!(ids("  "), vec!["wasm".to_string(), "grid".to_string()]);
        assert!(ids("kotlin").is_empty());
    }

    #[test]
    fn typing_burst_commits_once_after_quiet_period() {
        let scheduler = ManualScheduler::default();
        let commits = Rc::new(Cell::new(0));
        let counter = commits.clone();
        let mut search = BlogSearch::new(move |_| counter.set(counter.get() + 1));

        for text in ["w", "wi", "wid", "widg"] {
            search.input(text, &scheduler);
            scheduler.advance(100);
        }
        assert_eq!(search.query(), "");
        assert_eq!(commits.get(), 0);

        scheduler.advance(SEARCH_DEBOUNCE_MS.into());
        assert_eq!(search.query(), "widg");
        assert_eq!(commits.get(), 1);
        let posts = posts();
        assert_eq!(search.filter(&posts).len(), 1);
    }

    #[test]
    fn external_query_drops_pending_keystrokes() {
        let scheduler = ManualScheduler::default();
        let mut search = BlogSearch::new(|_| {});

        search.input("stale", &scheduler);
        search.set_query("layout");
        scheduler.advance(1000);

        assert_eq!(search.query(), "layout");
        assert_eq!(scheduler.pending(), 0);
    }
}
