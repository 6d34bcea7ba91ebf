//! Command palette overlay.
//!
//! The palette lists the global, selection and focused-object actions of
//! the catalog as flat commands. The command list is collected when the
//! palette opens and refreshed while it stays open.

use bucketview_core::actions::palette::{Scope, project, project_actions};
use bucketview_core::actions::{Command, CommandPalette, PaletteKey};
use bucketview_core::models::Row;
use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::utils::dom;

stylance::import_crate_style!(css, "src/components/explorer/palette.module.css");

const INPUT_SELECTOR: &str = "[data-palette-input]";

/// Commands for the current state. Tracked.
fn collect_commands(ctx: AppContext) -> Vec<Command> {
    let is_advanced = ctx.explorer.is_advanced.get();
    let focused = ctx.explorer.selection.with(|s| s.last_selected().map(str::to_string));
    let focused_size = focused.as_deref().and_then(|key| {
        ctx.rows.with(|rows| {
            rows.iter()
                .filter_map(Row::as_object)
                .find(|o| o.key == key)
                .map(|o| o.size)
        })
    });
    ctx.with_actions(|catalog, actions| {
        let mut commands = project_actions(Scope::Global, &catalog.global_actions(actions), is_advanced);
        if actions.selection_count > 0 {
            commands.extend(project_actions(
                Scope::Selection,
                &catalog.selection_actions(actions),
                is_advanced,
            ));
        }
        if let Some(key) = focused.as_deref() {
            commands.extend(project(
                Scope::Object,
                &catalog.object_actions(actions, key, focused_size),
                is_advanced,
            ));
        }
        commands
    })
}

/// Open the palette with a fresh command list.
pub fn open_palette(ctx: AppContext) {
    let commands = untrack(|| collect_commands(ctx));
    ctx.explorer.menu.update(|m| {
        m.close(None);
    });
    ctx.explorer.palette.update(|p| p.open(commands));
    focus_input_later();
}

fn focus_input_later() {
    // The input mounts on the next render
    gloo_timers::callback::Timeout::new(0, || {
        dom::focus_element(INPUT_SELECTOR);
    })
    .forget();
}

fn close(ctx: AppContext) {
    ctx.explorer.palette.update(CommandPalette::close);
}

/// Run the active command. The palette closes first so the command's
/// own signal updates never overlap the palette borrow.
fn run_active(ctx: AppContext) {
    let active = ctx.explorer.palette.with_untracked(|p| {
        p.filtered()
            .get(p.active())
            .map(|c| (*c).clone())
    });
    let Some(command) = active else {
        return;
    };
    if !command.enabled {
        if let Some(reason) = &command.disabled_reason {
            ctx.explorer.notify(reason.clone());
        }
        return;
    }
    close(ctx);
    command.run();
}

#[component]
pub fn Palette() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let is_open = Memo::new(move |_| ctx.explorer.palette.with(CommandPalette::is_open));

    // Keep commands current while open (selection or gates changed)
    Effect::new(move |_| {
        if !is_open.get() {
            return;
        }
        let commands = collect_commands(ctx);
        ctx.explorer.palette.update(|p| p.set_commands(commands));
    });

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        let Some(key) = PaletteKey::from_key(&ev.key()) else {
            return;
        };
        ev.prevent_default();
        ev.stop_propagation();
        match key {
            PaletteKey::Enter => run_active(ctx),
            key => ctx.explorer.palette.update(|p| {
                p.handle_key(key);
            }),
        }
    };

    let items = move || {
        ctx.explorer.palette.with(|p| {
            let active = p.active();
            p.filtered()
                .into_iter()
                .enumerate()
                .map(|(idx, c)| (idx, idx == active, c.label.clone(), c.enabled, c.disabled_reason.clone()))
                .collect::<Vec<_>>()
        })
    };

    move || {
        is_open.get().then(|| {
            view! {
                <div class=css::backdrop on:click=move |_| close(ctx)>
                    <div
                        class=css::palette
                        role="dialog"
                        aria-label="Command palette"
                        on:click=|ev| ev.stop_propagation()
                    >
                        <div class=css::inputRow>
                            <span class=css::inputIcon><Icon icon=ic::COMMAND /></span>
                            <input
                                class=css::input
                                type="text"
                                placeholder="Type a command..."
                                data-palette-input=""
                                autocomplete="off"
                                prop:value=move || ctx.explorer.palette.with(|p| p.query().to_string())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    ctx.explorer.palette.update(|p| p.set_query(&value));
                                }
                                on:keydown=on_keydown
                            />
                        </div>
                        <ul class=css::list role="listbox">
                            {move || {
                                let items = items();
                                if items.is_empty() {
                                    return view! { <li class=css::empty>"No matching commands"</li> }.into_any();
                                }
                                items
                                    .into_iter()
                                    .map(|(idx, active, label, enabled, reason)| {
                                        let mut class = css::item.to_string();
                                        if active {
                                            class = format!("{class} {}", css::active);
                                        }
                                        if !enabled {
                                            class = format!("{class} {}", css::disabled);
                                        }
                                        view! {
                                            <li
                                                class=class
                                                role="option"
                                                aria-selected=active.to_string()
                                                aria-disabled=(!enabled).to_string()
                                                title=reason
                                                on:mouseenter=move |_| {
                                                    if ctx.explorer.palette.with_untracked(|p| p.active()) != idx {
                                                        ctx.explorer.palette.update(|p| p.set_active(idx));
                                                    }
                                                }
                                                on:click=move |_| run_active(ctx)
                                            >
                                                {label}
                                            </li>
                                        }
                                    })
                                    .collect_view()
                                    .into_any()
                            }}
                        </ul>
                    </div>
                </div>
            }
        })
    }
}
