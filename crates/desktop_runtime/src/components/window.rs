use super::{blog_list::BlogList, *};
use crate::{
    model::{WindowContent, WindowId},
    window_frame::{
        frame_pointer_down, resize_handle_pointer_down, title_bar_pointer_down, FrameControl,
    },
};

fn dispatch_all(runtime: DesktopRuntimeContext, actions: Vec<DesktopAction>) {
    for action in actions {
        runtime.dispatch_action(action);
    }
}

#[component]
pub(super) fn DesktopWindowFrame(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();

    let frame = {
        let window_id = window_id.clone();
        Signal::derive(move || {
            frame_views(
                &runtime.state.get(),
                &runtime.frames.get(),
                desktop_viewport(),
            )
            .into_iter()
            .find(|view| view.id == window_id)
        })
    };

    let focus = {
        let window_id = window_id.clone();
        move |_: web_sys::PointerEvent| {
            let frames = runtime.frames.get_untracked();
            dispatch_all(runtime, frame_pointer_down(&frames, window_id.clone()));
        }
    };
    let begin_move = {
        let window_id = window_id.clone();
        move |ev: web_sys::PointerEvent| {
            if !is_primary_press(&ev) {
                return;
            }
            try_set_pointer_capture(&ev);
            ev.prevent_default();
            ev.stop_propagation();
            let frames = runtime.frames.get_untracked();
            dispatch_all(
                runtime,
                title_bar_pointer_down(&frames, window_id.clone(), pointer_from_pointer_event(&ev)),
            );
        }
    };
    let toggle_maximize = {
        let window_id = window_id.clone();
        move |ev: web_sys::MouseEvent| {
            stop_mouse_event(&ev);
            runtime.dispatch_action(FrameControl::ToggleMaximize.action(window_id.clone()));
        }
    };
    let animation_end = {
        let window_id = window_id.clone();
        move |_: web_sys::AnimationEvent| runtime.notify_animation_complete(&window_id)
    };

    let maximized = move || frame.with(|view| view.as_ref().is_some_and(|v| v.maximized));
    let resize_id = window_id.clone();

    view! {
        <section
            class=move || frame.with(|view| view.as_ref().map(frame_class).unwrap_or_default())
            style=move || frame.with(|view| {
                view.as_ref().map(|v| frame_style(v.geometry)).unwrap_or_default()
            })
            role="dialog"
            aria-label=move || frame.with(|view| {
                view.as_ref().map(|v| v.title.clone()).unwrap_or_default()
            })
            on:pointerdown=focus
            on:animationend=animation_end
        >
            <header class="titlebar" on:pointerdown=begin_move on:dblclick=toggle_maximize>
                <div class="titlebar-title">
                    <img
                        src=move || frame.with(|view| {
                            view.as_ref().map(|v| v.icon.clone()).unwrap_or_default()
                        })
                        alt=""
                        aria-hidden="true"
                    />
                    <span>
                        {move || frame.with(|view| {
                            view.as_ref().map(|v| v.title.clone()).unwrap_or_default()
                        })}
                    </span>
                </div>
                <div class="titlebar-controls">
                    <FrameControlButton
                        window_id=window_id.clone()
                        control=FrameControl::Minimize
                        label=Signal::derive(|| "Minimize window")
                    />
                    <FrameControlButton
                        window_id=window_id.clone()
                        control=FrameControl::ToggleMaximize
                        label=Signal::derive(move || {
                            if maximized() { "Restore window" } else { "Maximize window" }
                        })
                    />
                    <FrameControlButton
                        window_id=window_id.clone()
                        control=FrameControl::Close
                        label=Signal::derive(|| "Close window")
                    />
                </div>
            </header>
            <div class=move || {
                if frame.with(|view| view.as_ref().is_some_and(|v| v.padded)) {
                    "window-body padded"
                } else {
                    "window-body"
                }
            }>
                <WindowBody window_id=window_id.clone() />
            </div>
            <Show when=move || !maximized() fallback=|| ()>
                <WindowResizeHandle window_id=resize_id.clone() edge=ResizeEdge::East />
                <WindowResizeHandle window_id=resize_id.clone() edge=ResizeEdge::South />
                <WindowResizeHandle window_id=resize_id.clone() edge=ResizeEdge::SouthEast />
            </Show>
        </section>
    }
}

#[component]
fn FrameControlButton(
    window_id: WindowId,
    control: FrameControl,
    label: Signal<&'static str>,
) -> impl IntoView {
    let runtime = use_desktop_runtime();

    view! {
        <button
            aria-label=move || label.get()
            on:pointerdown=move |ev: web_sys::PointerEvent| {
                ev.prevent_default();
                ev.stop_propagation();
            }
            on:mousedown=move |ev| stop_mouse_event(&ev)
            on:click=move |ev| {
                stop_mouse_event(&ev);
                runtime.dispatch_action(control.action(window_id.clone()));
            }
        />
    }
}

#[component]
fn WindowResizeHandle(window_id: WindowId, edge: ResizeEdge) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let class_name = format!("window-resize-handle {}", resize_edge_class(edge));

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if !is_primary_press(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        let frames = runtime.frames.get_untracked();
        dispatch_all(
            runtime,
            resize_handle_pointer_down(
                &frames,
                window_id.clone(),
                edge,
                pointer_from_pointer_event(&ev),
            ),
        );
    };

    view! {
        <div
            class=class_name
            aria-hidden="true"
            on:pointerdown=on_pointerdown
        />
    }
}

#[component]
fn WindowBody(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let content = runtime
        .state
        .with_untracked(|state| state.window(&window_id).map(|w| w.content.clone()));

    match content {
        Some(WindowContent::Profile { profile_id }) => {
            view! { <ProfileWindowBody profile_id=profile_id /> }.into_view()
        }
        Some(WindowContent::Blogs) => view! { <BlogList /> }.into_view(),
        Some(_) => view! { <div class="window-app" data-window=window_id.0 /> }.into_view(),
        None => view! { <p>"Closed"</p> }.into_view(),
    }
}

#[component]
fn ProfileWindowBody(profile_id: String) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let profile = create_local_resource(
        move || profile_id.clone(),
        move |profile_id| async move {
            let content = runtime.host.get_value().content_service();
            let profiles = content.fetch_profiles().await?;
            profiles
                .into_iter()
                .find(|profile| profile.id == profile_id)
                .ok_or_else(|| format!("profile `{profile_id}` not found"))
        },
    );

    move || match profile.get() {
        None => view! { <p class="loading">"Loading profile..."</p> }.into_view(),
        Some(Ok(profile)) => view! { <ProfileWidgetGrid profile=profile /> }.into_view(),
        Some(Err(err)) => {
            logging::warn!("profile window failed to load: {err}");
            view! { <p class="error">{err}</p> }.into_view()
        }
    }
}
