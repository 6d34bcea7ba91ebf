//! Window-level listeners of the explorer.
//!
//! Keyboard shortcuts plus the implicit close triggers of the context menu
//! (scroll, wheel, outside pointer press, resize). Installed once when the
//! explorer mounts and kept for the lifetime of the app.

use crate::app::AppContext;

#[cfg(target_arch = "wasm32")]
pub fn install(ctx: AppContext) {
    use bucketview_core::MenuEvent;
    use leptos::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::Closure;

    use super::context_menu::MENU_SELECTOR;
    use super::shortcuts::handle_keydown;
    use crate::utils::dom;

    let Some(window) = dom::window() else {
        return;
    };
    let menu = ctx.explorer.menu;
    let send = move |event: MenuEvent| {
        if menu.with_untracked(|m| m.is_open()) || matches!(event, MenuEvent::Resize(_)) {
            menu.update(|m| {
                m.handle_event(event);
            });
        }
    };

    let on_keydown = Closure::wrap(Box::new(move |ev: web_sys::KeyboardEvent| {
        handle_keydown(ctx, &ev);
    }) as Box<dyn Fn(web_sys::KeyboardEvent)>);

    // Scrolling inside the menu itself must not close it
    let on_scroll = Closure::wrap(Box::new(move |ev: web_sys::Event| {
        if !dom::is_inside(MENU_SELECTOR, ev.target().as_ref()) {
            send(MenuEvent::Scroll);
        }
    }) as Box<dyn Fn(web_sys::Event)>);

    let on_wheel = Closure::wrap(Box::new(move |ev: web_sys::Event| {
        if !dom::is_inside(MENU_SELECTOR, ev.target().as_ref()) {
            send(MenuEvent::Wheel);
        }
    }) as Box<dyn Fn(web_sys::Event)>);

    let on_pointerdown = Closure::wrap(Box::new(move |ev: web_sys::Event| {
        let inside = dom::is_inside(MENU_SELECTOR, ev.target().as_ref());
        send(MenuEvent::PointerDown { inside });
    }) as Box<dyn Fn(web_sys::Event)>);

    let on_resize = Closure::wrap(Box::new(move || {
        send(MenuEvent::Resize(dom::viewport_size()));
    }) as Box<dyn Fn()>);

    let _ = window.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
    // Capture phase so scrolls of inner containers are seen too
    let _ = window.add_event_listener_with_callback_and_bool(
        "scroll",
        on_scroll.as_ref().unchecked_ref(),
        true,
    );
    let _ = window.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref());
    let _ = window
        .add_event_listener_with_callback("pointerdown", on_pointerdown.as_ref().unchecked_ref());
    let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());

    on_keydown.forget();
    on_scroll.forget();
    on_wheel.forget();
    on_pointerdown.forget();
    on_resize.forget();
}

#[cfg(not(target_arch = "wasm32"))]
pub fn install(_ctx: AppContext) {}
