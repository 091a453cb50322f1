use super::*;
use crate::{
    apps::new_profile_window,
    taskbar::{taskbar_entries, TaskbarEntry},
};

fn taskbar_button_class(entry: &TaskbarEntry) -> &'static str {
    match (entry.focused, entry.minimized) {
        (_, true) => "taskbar-window minimized",
        (true, false) => "taskbar-window focused",
        (false, false) => "taskbar-window",
    }
}

#[component]
pub(super) fn Taskbar() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let entries = create_memo(move |_| taskbar_entries(&runtime.state.get()));

    view! {
        <footer class="taskbar" style=format!("height:{TASKBAR_HEIGHT_PX}px;")>
            <div class="taskbar-windows" role="toolbar" aria-label="Open windows">
                <For
                    each=move || entries.get()
                    key=|entry| (entry.window_id.clone(), entry.focused, entry.minimized)
                    let:entry
                >
                    {
                        let action = entry.press();
                        view! {
                            <button
                                class=taskbar_button_class(&entry)
                                aria-pressed=entry.focused.to_string()
                                on:mousedown=move |ev| stop_mouse_event(&ev)
                                on:click=move |_| runtime.dispatch_action(action.clone())
                            >
                                <img src=entry.icon.clone() alt="" aria-hidden="true" />
                                <span>{entry.title.clone()}</span>
                            </button>
                        }
                    }
                </For>
            </div>
            <button
                class="taskbar-new-profile"
                aria-label="New profile"
                on:click=move |_| {
                    runtime.dispatch_action(DesktopAction::OpenWindow(new_profile_window()))
                }
            />
            <button
                class="taskbar-show-desktop"
                aria-label="Show desktop"
                on:click=move |_| runtime.dispatch_action(DesktopAction::ShowDesktop)
            />
        </footer>
    }
}
