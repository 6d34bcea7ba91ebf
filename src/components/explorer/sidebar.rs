//! Sidebar: bucket tree and recent locations.
//!
//! Tree expansion is persisted per bucket. Children of an expanded node
//! are the common prefixes of its first listing page; the node of the
//! current location is refreshed from the main listing as pages arrive.

use std::collections::HashMap;

use bucketview_core::keys::folder_name;
use bucketview_core::models::BrowseContext;
use bucketview_core::ActionCommand;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_icons::Icon;

use super::commands::{ActionScope, run_action};
use super::drag;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::models::AppRoute;

stylance::import_crate_style!(css, "src/components/explorer/sidebar.module.css");

/// Child prefixes per tree node, keyed by [`node_key`].
#[derive(Clone, Copy)]
struct TreeChildren(RwSignal<HashMap<String, Vec<String>>>);

fn node_key(bucket: &str, prefix: &str) -> String {
    format!("{bucket}\u{0}{prefix}")
}

/// Short label of a recent location.
fn recent_label(context: &BrowseContext) -> String {
    if context.prefix.is_empty() {
        context.bucket.clone()
    } else {
        format!("{}/{}", context.bucket, context.prefix.trim_end_matches('/'))
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let children = RwSignal::new(HashMap::<String, Vec<String>>::new());
    provide_context(TreeChildren(children));

    // Load children of expanded nodes that are not cached yet
    Effect::new(move |previous_profile: Option<Option<String>>| {
        let profile_id = ctx.session.profile.with(|p| p.as_ref().map(|p| p.id.clone()));
        if previous_profile.is_some_and(|prev| prev != profile_id) {
            children.set(HashMap::new());
        }
        let Some(client) = ctx.session.client() else {
            return profile_id;
        };
        let expanded: Vec<(String, String)> = ctx.explorer.tree.with(|tree| {
            tree.buckets
                .iter()
                .flat_map(|(bucket, set)| set.iter().map(move |p| (bucket.clone(), p.clone())))
                .collect()
        });
        for (bucket, prefix) in expanded {
            let key = node_key(&bucket, &prefix);
            if children.with_untracked(|c| c.contains_key(&key)) {
                continue;
            }
            children.update(|c| {
                c.insert(key.clone(), Vec::new());
            });
            let client = client.clone();
            spawn_local(async move {
                match client.list_objects(&bucket, &prefix, None).await {
                    Ok(page) => children.update(|c| {
                        c.insert(key, page.common_prefixes);
                    }),
                    Err(e) => {
                        log::warn!("tree listing of {bucket}/{prefix} failed: {e}");
                        children.update(|c| {
                            c.remove(&key);
                        });
                    }
                }
            });
        }
        profile_id
    });

    // Mirror the main listing into the node of the current location
    Effect::new(move |_| {
        let prefixes: Vec<String> = ctx.explorer.pages.with(|pages| {
            pages
                .iter()
                .flat_map(|p| p.common_prefixes.iter().cloned())
                .collect()
        });
        if prefixes.is_empty() {
            return;
        }
        if let Some(context) = untrack(|| ctx.session.context()) {
            children.update(|c| {
                c.insert(node_key(&context.bucket, &context.prefix), prefixes);
            });
        }
    });

    let recent = move || {
        let profile_id = ctx.session.profile.with(|p| p.as_ref().map(|p| p.id.clone()))?;
        let entries = ctx.explorer.recent.with(|r| {
            r.entries
                .iter()
                .filter(|c| c.profile_id == profile_id)
                .cloned()
                .collect::<Vec<_>>()
        });
        Some(entries)
    };

    view! {
        <aside class=css::sidebar aria-label="Buckets">
            <section class=css::section>
                <header class=css::sectionHeader>
                    <span>"Buckets"</span>
                    <button
                        class=css::sectionButton
                        title="New bucket"
                        on:click=move |_| run_action(ctx, ActionCommand::NewBucket, ActionScope::List)
                    >
                        <Icon icon=ic::PLUS />
                    </button>
                </header>
                <ul class=css::tree role="tree">
                    {move || {
                        ctx.session.buckets.get()
                            .into_iter()
                            .map(|b| view! {
                                <TreeNode bucket=b.name.clone() prefix=String::new() label=b.name depth=0 />
                            })
                            .collect_view()
                    }}
                </ul>
            </section>

            <section class=css::section>
                <header class=css::sectionHeader>
                    <span>"Recent"</span>
                </header>
                <ul class=css::recent>
                    {move || {
                        recent()
                            .unwrap_or_default()
                            .into_iter()
                            .map(|context| {
                                let label = recent_label(&context);
                                let target = AppRoute::browse(context.bucket, &context.prefix);
                                view! {
                                    <li>
                                        <button class=css::recentItem title=label.clone() on:click=move |_| target.push()>
                                            <span class=css::icon><Icon icon=ic::CLOCK /></span>
                                            <span class=css::label>{label.clone()}</span>
                                        </button>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </section>
        </aside>
    }
}

/// One bucket or prefix of the tree, with its expanded children.
#[component]
fn TreeNode(bucket: String, prefix: String, label: String, depth: usize) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let TreeChildren(children) = use_context::<TreeChildren>().expect("TreeChildren must be provided");
    let key = node_key(&bucket, &prefix);

    let is_expanded = {
        let (bucket, prefix) = (bucket.clone(), prefix.clone());
        Signal::derive(move || ctx.explorer.tree.with(|t| t.is_expanded(&bucket, &prefix)))
    };
    let is_current = {
        let (bucket, prefix) = (bucket.clone(), prefix.clone());
        Signal::derive(move || {
            ctx.session
                .route
                .with(|r| r.bucket() == Some(bucket.as_str()) && r.prefix() == prefix)
        })
    };
    // Drops land in the bucket being browsed, so only its nodes accept them
    let in_current_bucket = {
        let bucket = bucket.clone();
        move || ctx.session.route.with(|r| r.bucket() == Some(bucket.as_str()))
    };
    let accepts = in_current_bucket.clone();
    let accepts_drop = in_current_bucket.clone();
    let is_hovered = {
        let prefix = prefix.clone();
        move || in_current_bucket() && ctx.explorer.drag.with(|d| d.is_hovered(&prefix))
    };
    let row_class = move || {
        let mut class = css::node.to_string();
        if is_current.get() {
            class = format!("{class} {}", css::current);
        }
        if is_hovered() {
            class = format!("{class} {}", css::dropTarget);
        }
        class
    };

    let on_toggle = {
        let (bucket, prefix) = (bucket.clone(), prefix.clone());
        move |ev: leptos::ev::MouseEvent| {
            ev.stop_propagation();
            ctx.explorer.tree.update(|t| {
                t.toggle(&bucket, &prefix);
            });
        }
    };
    let on_open = {
        let (bucket, prefix) = (bucket.clone(), prefix.clone());
        move |_: leptos::ev::MouseEvent| AppRoute::browse(bucket.clone(), &prefix).push()
    };
    let (over_prefix, leave_prefix, drop_prefix) = (prefix.clone(), prefix.clone(), prefix.clone());
    let node_icon = if depth == 0 { ic::BUCKET } else { ic::FOLDER };

    let child_nodes = move || {
        if !is_expanded.get() {
            return None;
        }
        let list = children.with(|c| c.get(&key).cloned())?;
        Some(
            list.into_iter()
                .map(|child| {
                    let label = folder_name(&child).to_string();
                    view! {
                        <TreeNode bucket=bucket.clone() prefix=child label=label depth=depth + 1 />
                    }
                    .into_any()
                })
                .collect_view(),
        )
    };

    view! {
        <li role="treeitem" aria-expanded=move || is_expanded.get().to_string()>
            <div
                class=row_class
                style:padding-left=format!("{}px", 8 + depth * 14)
                on:click=on_open
                on:dragover=move |ev| {
                    if accepts() {
                        drag::over(ctx, &ev, &over_prefix);
                    }
                }
                on:dragleave=move |_| drag::leave(ctx, &leave_prefix)
                on:drop=move |ev| {
                    if accepts_drop() {
                        drag::drop_on(ctx, &ev, &drop_prefix);
                    }
                }
            >
                <button class=css::toggle on:click=on_toggle aria-label="Expand">
                    {move || if is_expanded.get() {
                        view! { <Icon icon=ic::CHEVRON_DOWN /> }.into_any()
                    } else {
                        view! { <Icon icon=ic::CHEVRON_RIGHT /> }.into_any()
                    }}
                </button>
                <span class=css::icon>
                    <Icon icon=node_icon />
                </span>
                <span class=css::label>{label}</span>
            </div>
            <ul class=css::children role="group">{child_nodes}</ul>
        </li>
    }
}
