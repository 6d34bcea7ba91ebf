//! Path bar component (Finder style breadcrumb).
//!
//! Displays the bucket and prefix at the bottom of the explorer with
//! clickable segments. Every ancestor segment is also a drop target.

use leptos::prelude::*;
use leptos_icons::Icon;

use super::drag;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::models::AppRoute;

stylance::import_crate_style!(css, "src/components/explorer/pathbar.module.css");

/// Segment data for path bar rendering.
#[derive(Clone)]
struct PathSegment {
    label: String,
    icon: icondata::Icon,
    /// Target route for navigation (None = current segment)
    target: Option<AppRoute>,
    /// Prefix the segment stands for; `None` for the bucket list
    prefix: Option<String>,
}

fn build_segments(route: &AppRoute) -> Vec<PathSegment> {
    let mut segments = vec![PathSegment {
        label: "Buckets".to_string(),
        icon: ic::HOME,
        target: Some(AppRoute::Home),
        prefix: None,
    }];
    let Some(bucket) = route.bucket() else {
        segments[0].target = None;
        return segments;
    };

    segments.push(PathSegment {
        label: bucket.to_string(),
        icon: ic::BUCKET,
        target: Some(AppRoute::browse(bucket, "")),
        prefix: Some(String::new()),
    });

    let mut prefix = String::new();
    for part in route.prefix().split('/').filter(|p| !p.is_empty()) {
        prefix.push_str(part);
        prefix.push('/');
        segments.push(PathSegment {
            label: part.to_string(),
            icon: ic::FOLDER,
            target: Some(AppRoute::browse(bucket, &prefix)),
            prefix: Some(prefix.clone()),
        });
    }

    if let Some(last) = segments.last_mut() {
        last.target = None;
    }
    segments
}

/// Path bar component displayed at the bottom of the explorer.
#[component]
pub fn PathBar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    view! {
        <nav class=css::pathbar aria-label="Path">
            {move || {
                let segments = ctx.session.route.with(build_segments);
                segments
                    .into_iter()
                    .enumerate()
                    .map(|(idx, seg)| {
                        view! {
                            <>
                                {(idx > 0).then(|| view! {
                                    <span class=css::separator>
                                        <Icon icon=ic::CHEVRON_RIGHT />
                                    </span>
                                })}
                                {match seg.target {
                                    Some(target) => view! {
                                        <SegmentLink
                                            icon=seg.icon
                                            label=seg.label
                                            prefix=seg.prefix
                                            on_click=move || target.push()
                                        />
                                    }.into_any(),
                                    None => view! {
                                        <SegmentCurrent icon=seg.icon label=seg.label />
                                    }.into_any(),
                                }}
                            </>
                        }
                    })
                    .collect_view()
            }}
        </nav>
    }
}

/// Clickable path segment; accepts drops when it stands for a prefix.
#[component]
fn SegmentLink<F>(icon: icondata::Icon, label: String, prefix: Option<String>, on_click: F) -> impl IntoView
where
    F: Fn() + 'static,
{
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let is_hovered = {
        let prefix = prefix.clone();
        move || {
            prefix
                .as_deref()
                .is_some_and(|p| ctx.explorer.drag.with(|d| d.is_hovered(p)))
        }
    };
    let class = move || {
        if is_hovered() {
            format!("{} {}", css::segment, css::dropTarget)
        } else {
            css::segment.to_string()
        }
    };
    let (over, leave, dropped) = (prefix.clone(), prefix.clone(), prefix);

    view! {
        <button
            class=class
            on:click=move |_| on_click()
            on:dragover=move |ev| {
                if let Some(p) = over.as_deref() {
                    drag::over(ctx, &ev, p);
                }
            }
            on:dragleave=move |_| {
                if let Some(p) = leave.as_deref() {
                    drag::leave(ctx, p);
                }
            }
            on:drop=move |ev| {
                if let Some(p) = dropped.as_deref() {
                    drag::drop_on(ctx, &ev, p);
                }
            }
        >
            <span class=css::icon><Icon icon=icon /></span>
            <span class=css::label>{label}</span>
        </button>
    }
}

/// Current (disabled) path segment.
#[component]
fn SegmentCurrent(icon: icondata::Icon, label: String) -> impl IntoView {
    view! {
        <button class=format!("{} {}", css::segment, css::segmentCurrent) disabled=true>
            <span class=css::icon><Icon icon=icon /></span>
            <span class=css::label>{label}</span>
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(segments: &[PathSegment]) -> Vec<&str> {
        segments.iter().map(|s| s.label.as_str()).collect()
    }

    #[test]
    fn test_segments_home() {
        let segments = build_segments(&AppRoute::Home);
        assert_eq!(labels(&segments), vec!["Buckets"]);
        assert_eq!(segments[0].target, None);
    }

    #[test]
    fn test_segments_nested_prefix() {
        let segments = build_segments(&AppRoute::browse("media", "photos/2024/"));
        assert_eq!(labels(&segments), vec!["Buckets", "media", "photos", "2024"]);
        assert_eq!(segments[2].prefix.as_deref(), Some("photos/"));
        assert_eq!(segments[2].target, Some(AppRoute::browse("media", "photos/")));
        assert_eq!(segments[3].prefix.as_deref(), Some("photos/2024/"));
        // Current folder is not clickable
        assert_eq!(segments[3].target, None);
    }

    #[test]
    fn test_segments_bucket_root() {
        let segments = build_segments(&AppRoute::browse("media", ""));
        assert_eq!(labels(&segments), vec!["Buckets", "media"]);
        assert_eq!(segments[0].target, Some(AppRoute::Home));
        assert_eq!(segments[1].target, None);
        assert_eq!(segments[1].prefix.as_deref(), Some(""));
    }
}
