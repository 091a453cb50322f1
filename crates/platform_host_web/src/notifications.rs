//! Toast adapter that hands messages to the page's toast layer.

use platform_host::{NotificationFuture, NotificationService};

/// DOM event name carrying toast payloads (`detail = {title, body}`).
pub const TOAST_EVENT_NAME: &str = "webos:toast";

#[derive(Debug, Clone, Copy, Default)]
/// Browser toast adapter. Dispatches a [`TOAST_EVENT_NAME`] custom event on `window`; the toast
/// component listens for it and owns presentation.
pub struct WebNotificationService;

impl NotificationService for WebNotificationService {
    fn notify<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                use wasm_bindgen::JsValue;

                let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
                let detail = js_sys::Object::new();
                for (field, value) in [("title", title), ("body", body)] {
                    js_sys::Reflect::set(
                        &detail,
                        &JsValue::from_str(field),
                        &JsValue::from_str(value),
                    )
                    .map_err(|e| format!("toast payload failed: {e:?}"))?;
                }

                let init = web_sys::CustomEventInit::new();
                init.set_detail(&detail);
                let event =
                    web_sys::CustomEvent::new_with_event_init_dict(TOAST_EVENT_NAME, &init)
                        .map_err(|e| format!("toast event failed: {e:?}"))?;
                window
                    .dispatch_event(&event)
                    .map(|_| ())
                    .map_err(|e: JsValue| format!("toast dispatch failed: {e:?}"))
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = (title, body);
                Ok(())
            }
        })
    }
}
