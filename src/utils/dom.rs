//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.

use bucketview_core::menu::Size;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Storage, Window};

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get localStorage.
#[inline]
pub fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

/// Focus an element by CSS selector.
///
/// Returns `true` if the element was found and focused successfully.
pub fn focus_element(selector: &str) -> bool {
    if let Some(window) = window()
        && let Some(document) = window.document()
        && let Some(element) = document.query_selector(selector).ok().flatten()
        && let Ok(html_element) = element.dyn_into::<web_sys::HtmlElement>()
    {
        html_element.focus().is_ok()
    } else {
        false
    }
}

/// Click an element by CSS selector (e.g. a hidden file input).
pub fn click_element(selector: &str) -> bool {
    if let Some(document) = window().and_then(|w| w.document())
        && let Some(element) = document.query_selector(selector).ok().flatten()
        && let Ok(html_element) = element.dyn_into::<web_sys::HtmlElement>()
    {
        html_element.click();
        true
    } else {
        false
    }
}

/// Element matched by `selector`, if mounted.
pub fn query(selector: &str) -> Option<web_sys::Element> {
    window()?.document()?.query_selector(selector).ok().flatten()
}

/// Whether `target` lies inside the element matched by `selector`.
pub fn is_inside(selector: &str, target: Option<&web_sys::EventTarget>) -> bool {
    let Some(node) = target.and_then(|t| t.dyn_ref::<web_sys::Node>()) else {
        return false;
    };
    window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector(selector).ok().flatten())
        .is_some_and(|root| root.contains(Some(node)))
}

/// Whether the event target is a text field that owns its own key handling.
pub fn is_text_field(target: Option<&web_sys::EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_ref::<web_sys::Element>())
        .is_some_and(|el| {
            let tag = el.tag_name();
            tag.eq_ignore_ascii_case("input")
                || tag.eq_ignore_ascii_case("textarea")
                || el.has_attribute("contenteditable")
        })
}

// =============================================================================
// Geometry and Time
// =============================================================================

/// Inner size of the window in CSS px.
pub fn viewport_size() -> Size {
    let dim = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    match window() {
        Some(w) => Size::new(dim(w.inner_width()), dim(w.inner_height())),
        None => Size::default(),
    }
}

/// Monotonic milliseconds since page load.
pub fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Whether the browser reports network connectivity.
pub fn is_online() -> bool {
    window().is_none_or(|w| w.navigator().on_line())
}

// =============================================================================
// Dialogs and Shell
// =============================================================================

/// Ask for a line of text. `None` when cancelled.
pub fn prompt(message: &str, default: &str) -> Option<String> {
    window()?
        .prompt_with_message_and_default(message, default)
        .ok()
        .flatten()
}

/// Ask a yes/no question.
pub fn confirm(message: &str) -> bool {
    window().is_some_and(|w| w.confirm_with_message(message).unwrap_or(false))
}

/// Ask the user to type `phrase` to confirm a destructive operation.
pub fn confirm_typed(message: &str, phrase: &str) -> bool {
    prompt(&format!("{message}\n\nType \"{phrase}\" to confirm."), "")
        .is_some_and(|typed| typed.trim() == phrase)
}

/// Open a URL in a new tab.
pub fn open_url(url: &str) {
    if let Some(window) = window() {
        let _ = window.open_with_url_and_target(url, "_blank");
    }
}

/// Write text to the system clipboard.
///
/// Goes through `navigator.clipboard.writeText` reflectively so no unstable
/// web-sys APIs are needed.
pub fn copy_text(text: &str) -> Result<(), JsValue> {
    let navigator = window()
        .ok_or_else(|| JsValue::from_str("window not available"))?
        .navigator();
    let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))?;
    let write = js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))?
        .dyn_into::<js_sys::Function>()?;
    write.call1(&clipboard, &JsValue::from_str(text))?;
    Ok(())
}
