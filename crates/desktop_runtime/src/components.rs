//! Desktop shell UI: icons, window frames, the taskbar, and the profile/blog window bodies.

mod blog_list;
mod profile_grid;
mod taskbar;
mod window;

use std::rc::Rc;

use leptos::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
use widget_grid::TimerScheduler;

pub use self::profile_grid::ProfileWidgetGrid;
use self::{taskbar::Taskbar, window::DesktopWindowFrame};

use crate::{
    icons::icon_layout,
    model::{InteractionState, PointerPosition, ResizeEdge, Size},
    reducer::DesktopAction,
    runtime_context::{use_desktop_runtime, DesktopRuntimeContext},
    window_frame::{
        frame_pointer_move, frame_pointer_up, frame_views, FrameGeometry, FramePhase, FrameView,
    },
};

const TASKBAR_HEIGHT_PX: i32 = 48;

/// Space available to windows: the browser viewport above the taskbar.
#[cfg(target_arch = "wasm32")]
fn desktop_viewport() -> Size {
    let Some(window) = web_sys::window() else {
        return Size::new(1280, 800 - TASKBAR_HEIGHT_PX);
    };
    let read = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>, fallback: f64| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(fallback) as i32
    };
    Size::new(
        read(window.inner_width(), 1280.0),
        read(window.inner_height(), 800.0) - TASKBAR_HEIGHT_PX,
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn desktop_viewport() -> Size {
    Size::new(1280, 800 - TASKBAR_HEIGHT_PX)
}

/// Browser timers in the page; a manually driven clock elsewhere, where nothing advances it.
#[cfg(target_arch = "wasm32")]
fn timer_scheduler() -> Rc<dyn TimerScheduler> {
    Rc::new(widget_grid::WebTimerScheduler)
}

#[cfg(not(target_arch = "wasm32"))]
fn timer_scheduler() -> Rc<dyn TimerScheduler> {
    Rc::new(widget_grid::ManualScheduler::default())
}

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

fn is_primary_press(ev: &web_sys::PointerEvent) -> bool {
    if ev.pointer_type() == "mouse" {
        ev.button() == 0
    } else {
        ev.is_primary()
    }
}

#[component]
/// Renders the desktop: icon layer, mounted window frames, and the taskbar.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        let pointer = pointer_from_pointer_event(&ev);
        if let Some(action) = shell_pointer_move(&runtime.interaction.get_untracked(), pointer) {
            runtime.dispatch_action(action);
        }
    };
    let on_pointer_end = move |_| end_active_pointer_interaction(runtime);
    let on_background_down = move |ev: web_sys::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        runtime.dispatch_action(DesktopAction::BeginMarquee {
            pointer: pointer_from_pointer_event(&ev),
        });
    };

    view! {
        <div
            id="desktop-shell-root"
            class="desktop-shell"
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_end
            on:pointercancel=on_pointer_end
        >
            <div class="desktop-background" on:pointerdown=on_background_down>
                {move || marquee_view(runtime)}
                <DesktopIcons />
            </div>
            <div class="desktop-window-layer">
                <For
                    each=move || {
                        frame_views(&state.get(), &runtime.frames.get(), desktop_viewport())
                    }
                    key=|view| view.id.clone()
                    let:view
                >
                    <DesktopWindowFrame window_id=view.id />
                </For>
            </div>
            <Taskbar />
        </div>
    }
}

#[component]
fn DesktopIcons() -> impl IntoView {
    let runtime = use_desktop_runtime();

    move || {
        let state = runtime.state.get();
        icon_layout(&state)
            .into_iter()
            .zip(state.icons.iter().cloned())
            .map(|(layout, entry)| {
                let icon_id = layout.id.clone();
                let on_pointerdown = move |ev: web_sys::PointerEvent| {
                    if ev.button() != 0 {
                        return;
                    }
                    ev.stop_propagation();
                    runtime.dispatch_action(DesktopAction::BeginIconDrag {
                        icon_id: icon_id.clone(),
                        pointer: pointer_from_pointer_event(&ev),
                    });
                };
                view! {
                    <button
                        class=if layout.selected { "desktop-icon selected" } else { "desktop-icon" }
                        style=format!(
                            "left:{}px;top:{}px;",
                            layout.position.x,
                            layout.position.y
                        )
                        on:pointerdown=on_pointerdown
                    >
                        <img src=entry.icon.clone() alt="" draggable="false" />
                        <span>{entry.title.clone()}</span>
                    </button>
                }
            })
            .collect_view()
    }
}

fn marquee_view(runtime: DesktopRuntimeContext) -> Option<impl IntoView> {
    let marquee = runtime.interaction.get().marquee?;
    let rect = marquee.rect();
    Some(view! {
        <div
            class="desktop-marquee"
            style=format!(
                "left:{}px;top:{}px;width:{}px;height:{}px;",
                rect.left,
                rect.top,
                rect.right - rect.left,
                rect.bottom - rect.top
            )
        />
    })
}

/// Routes a document-level pointer move to whichever gesture is live.
fn shell_pointer_move(
    interaction: &InteractionState,
    pointer: PointerPosition,
) -> Option<DesktopAction> {
    if let Some(action) = frame_pointer_move(interaction, pointer) {
        return Some(action);
    }
    if interaction.icon_drag.is_some() {
        Some(DesktopAction::UpdateIconDrag { pointer })
    } else if interaction.marquee.is_some() {
        Some(DesktopAction::UpdateMarquee { pointer })
    } else {
        None
    }
}

fn shell_pointer_up(interaction: &InteractionState) -> Option<DesktopAction> {
    if let Some(action) = frame_pointer_up(interaction) {
        return Some(action);
    }
    if interaction.icon_drag.is_some() {
        Some(DesktopAction::EndIconDrag)
    } else if interaction.marquee.is_some() {
        Some(DesktopAction::EndMarquee)
    } else {
        None
    }
}

fn end_active_pointer_interaction(runtime: DesktopRuntimeContext) {
    if let Some(action) = shell_pointer_up(&runtime.interaction.get_untracked()) {
        runtime.dispatch_action(action);
    }
}

fn frame_style(geometry: FrameGeometry) -> String {
    format!(
        "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
        geometry.x, geometry.y, geometry.width, geometry.height, geometry.z_index
    )
}

/// Frames playing their exit animation carry `exiting`; the stylesheet's animation on that class
/// ends with `animationend`, which unmounts the frame.
fn frame_class(view: &FrameView) -> String {
    let mut class = String::from("desktop-window");
    if view.focused {
        class.push_str(" focused");
    }
    if view.maximized {
        class.push_str(" maximized");
    }
    if view.phase == FramePhase::ExitAnimating {
        class.push_str(" exiting");
    }
    class
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

fn resize_edge_class(edge: ResizeEdge) -> &'static str {
    match edge {
        ResizeEdge::East => "edge-e",
        ResizeEdge::South => "edge-s",
        ResizeEdge::SouthEast => "edge-se",
    }
}
