use super::*;
use crate::{
    apps::blog_post_window,
    blog_search::{filter_posts, BlogSearch},
};

#[component]
pub(super) fn BlogList() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let query = create_rw_signal(String::new());
    let search = store_value(BlogSearch::new(move |committed| {
        query.set(committed.to_string())
    }));
    let scheduler = timer_scheduler();
    let posts = create_local_resource(
        || (),
        move |_| async move {
            let content = runtime.host.get_value().content_service();
            content.fetch_blog_posts().await
        },
    );

    let on_input = move |ev: web_sys::Event| {
        let text = event_target_value(&ev);
        search.update_value(|search| search.input(&text, scheduler.as_ref()));
    };

    view! {
        <div class="blog-list">
            <input
                type="text"
                class="blog-search"
                placeholder="Search posts..."
                on:input=on_input
            />
            <ul>
                {move || match posts.get() {
                    None => view! { <li class="loading">"Loading posts..."</li> }.into_view(),
                    Some(Err(err)) => {
                        logging::warn!("blog posts failed to load: {err}");
                        view! { <li class="error">{err}</li> }.into_view()
                    }
                    Some(Ok(posts)) => filter_posts(&posts, &query.get())
                        .into_iter()
                        .map(|post| {
                            let config = blog_post_window(&post.slug, &post.title);
                            view! {
                                <li>
                                    <button on:click=move |_| {
                                        runtime.dispatch_action(DesktopAction::OpenWindow(
                                            config.clone(),
                                        ))
                                    }>
                                        {post.title.clone()}
                                    </button>
                                </li>
                            }
                        })
                        .collect_view(),
                }}
            </ul>
        </div>
    }
}
