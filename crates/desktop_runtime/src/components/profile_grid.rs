use super::*;
use platform_host::ProfileRecord;
use widget_grid::{GridConfig, LinkVariant, PixelBox, ProfileEditor, WidgetKind};

const FALLBACK_GRID_WIDTH_PX: i32 = 960;

/// Live widget drag: where the pointer went down and the container width at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GridDrag {
    origin: PointerPosition,
    container_width: i32,
}

fn widget_style(pixels: PixelBox) -> String {
    format!(
        "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;",
        pixels.left, pixels.top, pixels.width, pixels.height
    )
}

fn link_variant_class(variant: Option<LinkVariant>) -> &'static str {
    match variant.unwrap_or_default() {
        LinkVariant::Primary => "widget-link primary",
        LinkVariant::Secondary => "widget-link secondary",
        LinkVariant::Outline => "widget-link outline",
    }
}

fn widget_body(kind: WidgetKind) -> View {
    match kind {
        WidgetKind::Text { content } => {
            view! { <div class="widget-text">{content}</div> }.into_view()
        }
        WidgetKind::Image { url, alt, caption } => view! {
            <figure class="widget-image">
                <img src=url alt=alt.unwrap_or_default() draggable="false" />
                {caption.map(|caption| view! { <figcaption>{caption}</figcaption> })}
            </figure>
        }
        .into_view(),
        WidgetKind::LinkButton {
            label,
            url,
            variant,
            ..
        } => view! {
            <a class=link_variant_class(variant) href=url target="_blank" rel="noopener">
                {label}
            </a>
        }
        .into_view(),
    }
}

#[component]
/// One profile's widgets on the grid, with edit mode, delay-gated drag displacement, and save.
pub fn ProfileWidgetGrid(profile: ProfileRecord) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let scheduler = timer_scheduler();
    let mut editor =
        match ProfileEditor::from_profile(&profile, GridConfig::default(), scheduler.clone()) {
            Ok(editor) => editor,
            Err(err) => {
                logging::warn!("profile `{}` could not be opened: {err}", profile.id);
                return view! { <p class="error">{err.to_string()}</p> }.into_view();
            }
        };
    let redraw = create_trigger();
    editor.on_preview_change(move || redraw.notify());
    let editor = store_value(editor);
    let editing = create_rw_signal(false);
    let drag = create_rw_signal(None::<GridDrag>);
    let container = create_node_ref::<html::Div>();

    let container_width = move || {
        container
            .get_untracked()
            .map(|el| el.client_width())
            .filter(|width| *width > 0)
            .unwrap_or(FALLBACK_GRID_WIDTH_PX)
    };

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        let Some(active) = drag.get_untracked() else {
            return;
        };
        let (dx, dy) = pointer_from_pointer_event(&ev).delta_from(active.origin);
        editor.update_value(|editor| {
            editor.drag_by_pixels(active.container_width, dx, dy);
        });
        redraw.notify();
    };
    let on_pointer_end = move |_: web_sys::PointerEvent| {
        if drag.get_untracked().is_none() {
            return;
        }
        drag.set(None);
        editor.update_value(|editor| {
            editor.end_drag();
        });
        redraw.notify();
    };
    let toggle_editing = move |_| {
        let next = !editing.get_untracked();
        editing.set(next);
        drag.set(None);
        editor.update_value(|editor| editor.set_editing(next));
        redraw.notify();
    };
    let save = {
        let scheduler = scheduler.clone();
        move |_| {
            let draft = editor.with_value(|editor| {
                ProfileEditor::new(
                    editor.profile_id(),
                    editor.content(),
                    editor.config(),
                    scheduler.clone(),
                )
            });
            let host = runtime.host.get_value();
            spawn_local(async move {
                if let Err(err) = host.save_profile(&draft).await {
                    logging::warn!("profile save failed: {err}");
                }
            });
        }
    };

    let widgets = move || {
        redraw.track();
        let width = container_width();
        let (metrics, widgets) =
            editor.with_value(|editor| (editor.metrics(width), editor.preview()));
        widgets
            .into_iter()
            .map(|widget| {
                let widget_id = widget.id.clone();
                let on_pointerdown = move |ev: web_sys::PointerEvent| {
                    if !editor.with_value(ProfileEditor::is_editing) || !is_primary_press(&ev) {
                        return;
                    }
                    ev.prevent_default();
                    ev.stop_propagation();
                    let started = editor
                        .try_update_value(|editor| editor.begin_drag(&widget_id))
                        .unwrap_or(false);
                    if !started {
                        return;
                    }
                    if let Some(el) = container.get_untracked() {
                        let _ = el.set_pointer_capture(ev.pointer_id());
                    }
                    drag.set(Some(GridDrag {
                        origin: pointer_from_pointer_event(&ev),
                        container_width: container_width(),
                    }));
                    redraw.notify();
                };
                view! {
                    <div
                        class="grid-widget"
                        style=widget_style(metrics.to_pixels(widget.position))
                        on:pointerdown=on_pointerdown
                    >
                        {widget_body(widget.kind)}
                    </div>
                }
            })
            .collect_view()
    };
    let grid_height = move || {
        redraw.track();
        let width = container_width();
        editor.with_value(|editor| {
            let preview = editor.preview();
            editor
                .metrics(width)
                .content_height(preview.iter().map(|widget| &widget.position))
        })
    };

    view! {
        <div class="profile-grid-window">
            <div class="profile-grid-toolbar">
                <button on:click=toggle_editing>
                    {move || if editing.get() { "Done" } else { "Edit" }}
                </button>
                <button on:click=save>"Save"</button>
            </div>
            <div
                class=move || if editing.get() { "profile-grid editing" } else { "profile-grid" }
                style=move || format!("position:relative;height:{}px;", grid_height())
                node_ref=container
                on:pointermove=on_pointer_move
                on:pointerup=on_pointer_end
                on:pointercancel=on_pointer_end
            >
                {widgets}
            </div>
        </div>
    }
    .into_view()
}
