//! The action registry: scope + session facts -> ordered action lists.
//!
//! Nothing is cached here. Lists are rebuilt whenever an input changes;
//! memoization is the rendering layer's business.

use std::rc::Rc;

use super::{ActionFn, MenuEntry, UiAction};
use crate::config::PREVIEW_MAX_BYTES;
use crate::keys;
use crate::menu::MenuContents;
use crate::models::{Capabilities, FavoriteSet, Feature};

/// What an action does, handed to the caller's dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionCommand {
    // Object scope
    Preview { key: String },
    Download { key: String },
    CopyKey { key: String },
    CopyObject { key: String },
    CutObject { key: String },
    Rename { key: String },
    CopyObjectTo { key: String },
    MoveObjectTo { key: String },
    ToggleFavorite { key: String },
    Details { key: String },
    DeleteObject { key: String },
    // Prefix scope
    OpenPrefix { prefix: String },
    CopyPrefixPath { prefix: String },
    ZipPrefix { prefix: String },
    CopyPrefixTo { prefix: String },
    MovePrefixTo { prefix: String },
    IndexPrefix { prefix: String },
    DeletePrefix { prefix: String },
    // Selection scope
    CopySelection,
    CutSelection,
    ZipSelection,
    CopySelectionTo,
    MoveSelectionTo,
    ClearSelection,
    DeleteSelection,
    // Global scope
    Refresh,
    GoUp,
    NewFolder,
    Upload,
    Paste,
    SelectAll,
    ToggleFavoritesOnly,
    ToggleAdvanced,
    IndexBucket,
    NewBucket,
}

/// Session facts every gate is computed from.
#[derive(Clone, Copy, Debug)]
pub struct ActionContext<'a> {
    pub caps: &'a Capabilities,
    pub prefix: &'a str,
    pub selection_count: usize,
    pub loaded_count: usize,
    pub clipboard_ready: bool,
    pub favorites: &'a FavoriteSet,
}

/// Preconditions an action can depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Need {
    Profile,
    Bucket,
    Online,
    Provider(Feature),
    Selection,
    Clipboard,
    Loaded,
    Nested,
}

impl ActionContext<'_> {
    /// First unmet precondition, as a human-readable reason.
    fn gate(&self, needs: &[Need]) -> Result<(), String> {
        for need in needs {
            let unmet = match need {
                Need::Profile if !self.caps.profile_selected => Some("Select a profile first".to_string()),
                Need::Bucket if !self.caps.bucket_selected => Some("Select a bucket first".to_string()),
                Need::Online if !self.caps.online => Some("Offline".to_string()),
                Need::Provider(feature) if !self.caps.supports(*feature) => Some(
                    self.caps
                        .provider
                        .as_ref()
                        .map(|p| p.reason(*feature))
                        .unwrap_or_default(),
                ),
                Need::Selection if self.selection_count == 0 => Some("No items selected".to_string()),
                Need::Clipboard if !self.clipboard_ready => Some("Clipboard is empty".to_string()),
                Need::Loaded if self.loaded_count == 0 => Some("Nothing loaded".to_string()),
                Need::Nested if self.prefix.is_empty() => Some("Already at the bucket root".to_string()),
                _ => None,
            };
            if let Some(reason) = unmet {
                return Err(reason);
            }
        }
        Ok(())
    }
}

const BROWSE: &[Need] = &[Need::Profile, Need::Bucket, Need::Online];
const WRITE: &[Need] = &[
    Need::Profile,
    Need::Bucket,
    Need::Online,
    Need::Provider(Feature::ObjectCrud),
];
const JOB: &[Need] = &[
    Need::Profile,
    Need::Bucket,
    Need::Online,
    Need::Provider(Feature::JobTransfer),
];

fn with(base: &[Need], extra: Need) -> Vec<Need> {
    let mut needs = base.to_vec();
    needs.push(extra);
    needs
}

/// Builds every action list from one dispatcher.
#[derive(Clone)]
pub struct ActionCatalog {
    dispatch: Rc<dyn Fn(ActionCommand)>,
}

impl std::fmt::Debug for ActionCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionCatalog").finish_non_exhaustive()
    }
}

impl ActionCatalog {
    pub fn new(dispatch: impl Fn(ActionCommand) + 'static) -> Self {
        Self {
            dispatch: Rc::new(dispatch),
        }
    }

    fn action(&self, id: &str, label: &str, command: ActionCommand) -> UiAction {
        let dispatch = Rc::clone(&self.dispatch);
        let payload = command.clone();
        let run: ActionFn = Rc::new(move || dispatch(payload.clone()));
        UiAction::new(id, label, command, run)
    }

    // =========================================================================
    // Object
    // =========================================================================

    /// Actions for a single object. `size` gates the inline preview.
    pub fn object_actions(&self, ctx: &ActionContext<'_>, key: &str, size: Option<u64>) -> Vec<MenuEntry> {
        let k = || key.to_string();
        let preview_gate = ctx.gate(BROWSE).and_then(|()| match size {
            Some(size) if size > PREVIEW_MAX_BYTES => Err("File too large to preview".to_string()),
            _ => Ok(()),
        });
        let favorite_label = if ctx.favorites.contains(key) {
            "Remove from favorites"
        } else {
            "Add to favorites"
        };

        vec![
            self.action("open", "Open", ActionCommand::Preview { key: k() })
                .keywords(&["preview", "view"])
                .gated(preview_gate)
                .into(),
            self.action("download", "Download", ActionCommand::Download { key: k() })
                .gated(ctx.gate(BROWSE))
                .into(),
            self.action("copy_key", "Copy key", ActionCommand::CopyKey { key: k() })
                .keywords(&["path", "name"])
                .into(),
            MenuEntry::Divider,
            self.action("copy", "Copy", ActionCommand::CopyObject { key: k() })
                .keywords(&["clipboard"])
                .gated(ctx.gate(WRITE))
                .into(),
            self.action("cut", "Cut", ActionCommand::CutObject { key: k() })
                .keywords(&["clipboard", "move"])
                .gated(ctx.gate(WRITE))
                .into(),
            self.action("rename", "Rename", ActionCommand::Rename { key: k() })
                .gated(ctx.gate(WRITE))
                .into(),
            self.action("copy_to", "Copy to...", ActionCommand::CopyObjectTo { key: k() })
                .advanced()
                .keywords(&["transfer"])
                .gated(ctx.gate(JOB))
                .into(),
            self.action("move_to", "Move to...", ActionCommand::MoveObjectTo { key: k() })
                .advanced()
                .keywords(&["transfer"])
                .gated(ctx.gate(JOB))
                .into(),
            MenuEntry::Divider,
            self.action("favorite", favorite_label, ActionCommand::ToggleFavorite { key: k() })
                .keywords(&["star", "favorite"])
                .gated(ctx.gate(BROWSE))
                .into(),
            self.action("details", "Details", ActionCommand::Details { key: k() })
                .advanced()
                .keywords(&["info", "metadata"])
                .gated(ctx.gate(BROWSE))
                .into(),
            MenuEntry::Divider,
            self.action("delete", "Delete", ActionCommand::DeleteObject { key: k() })
                .danger()
                .keywords(&["remove"])
                .gated(ctx.gate(WRITE))
                .into(),
        ]
    }

    // =========================================================================
    // Prefix
    // =========================================================================

    pub fn prefix_actions(&self, ctx: &ActionContext<'_>, prefix: &str) -> Vec<MenuEntry> {
        let p = || keys::normalize_prefix(prefix);
        vec![
            self.action("open", "Open", ActionCommand::OpenPrefix { prefix: p() })
                .keywords(&["folder", "navigate"])
                .gated(ctx.gate(BROWSE))
                .into(),
            self.action("copy_path", "Copy path", ActionCommand::CopyPrefixPath { prefix: p() })
                .into(),
            MenuEntry::Divider,
            self.action("zip", "Download as zip", ActionCommand::ZipPrefix { prefix: p() })
                .advanced()
                .keywords(&["archive", "download"])
                .gated(ctx.gate(JOB))
                .into(),
            self.action("copy_to", "Copy folder to...", ActionCommand::CopyPrefixTo { prefix: p() })
                .advanced()
                .keywords(&["transfer"])
                .gated(ctx.gate(JOB))
                .into(),
            self.action("move_to", "Move folder to...", ActionCommand::MovePrefixTo { prefix: p() })
                .advanced()
                .keywords(&["transfer", "rename"])
                .gated(ctx.gate(JOB))
                .into(),
            self.action("index", "Index for search", ActionCommand::IndexPrefix { prefix: p() })
                .advanced()
                .keywords(&["search"])
                .gated(ctx.gate(JOB))
                .into(),
            MenuEntry::Divider,
            self.action("delete", "Delete folder", ActionCommand::DeletePrefix { prefix: p() })
                .danger()
                .keywords(&["remove"])
                .gated(ctx.gate(JOB))
                .into(),
        ]
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection_actions(&self, ctx: &ActionContext<'_>) -> Vec<UiAction> {
        let write = with(WRITE, Need::Selection);
        let job = with(JOB, Need::Selection);
        vec![
            self.action("copy", "Copy selected", ActionCommand::CopySelection)
                .keywords(&["clipboard"])
                .gated(ctx.gate(&write)),
            self.action("cut", "Cut selected", ActionCommand::CutSelection)
                .keywords(&["clipboard", "move"])
                .gated(ctx.gate(&write)),
            self.action("zip", "Download selected as zip", ActionCommand::ZipSelection)
                .keywords(&["archive", "download"])
                .gated(ctx.gate(&job)),
            self.action("copy_to", "Copy selected to...", ActionCommand::CopySelectionTo)
                .advanced()
                .keywords(&["transfer"])
                .gated(ctx.gate(&job)),
            self.action("move_to", "Move selected to...", ActionCommand::MoveSelectionTo)
                .advanced()
                .keywords(&["transfer"])
                .gated(ctx.gate(&job)),
            self.action("clear", "Clear selection", ActionCommand::ClearSelection)
                .keywords(&["deselect"])
                .gated(ctx.gate(&[Need::Selection])),
            self.action("delete", "Delete selected", ActionCommand::DeleteSelection)
                .danger()
                .keywords(&["remove"])
                .gated(ctx.gate(&write)),
        ]
    }

    // =========================================================================
    // Global
    // =========================================================================

    pub fn global_actions(&self, ctx: &ActionContext<'_>) -> Vec<UiAction> {
        let upload_gate = ctx.gate(WRITE).and_then(|()| {
            let can_upload = ctx.caps.supports(Feature::PresignedUpload)
                || ctx.caps.supports(Feature::DirectUpload);
            if can_upload {
                Ok(())
            } else {
                Err("Uploads are not supported by this provider".to_string())
            }
        });
        vec![
            self.action("refresh", "Refresh", ActionCommand::Refresh)
                .keywords(&["reload"])
                .gated(ctx.gate(BROWSE)),
            self.action("go_up", "Go to parent folder", ActionCommand::GoUp)
                .keywords(&["back", "up"])
                .gated(ctx.gate(&with(BROWSE, Need::Nested))),
            self.action("new_folder", "New folder", ActionCommand::NewFolder)
                .keywords(&["create", "mkdir"])
                .gated(ctx.gate(WRITE)),
            self.action("upload", "Upload files", ActionCommand::Upload)
                .gated(upload_gate),
            self.action("paste", "Paste", ActionCommand::Paste)
                .keywords(&["clipboard"])
                .gated(ctx.gate(&with(WRITE, Need::Clipboard))),
            self.action("select_all", "Select all loaded", ActionCommand::SelectAll)
                .gated(ctx.gate(&[Need::Loaded])),
            self.action("favorites_only", "Toggle favorites only", ActionCommand::ToggleFavoritesOnly)
                .keywords(&["star", "filter"])
                .gated(ctx.gate(&[Need::Bucket])),
            self.action("advanced", "Toggle advanced mode", ActionCommand::ToggleAdvanced)
                .keywords(&["mode", "settings"]),
            self.action("index_bucket", "Index bucket for search", ActionCommand::IndexBucket)
                .advanced()
                .keywords(&["search"])
                .gated(ctx.gate(JOB)),
            self.action("new_bucket", "New bucket", ActionCommand::NewBucket)
                .advanced()
                .keywords(&["create"])
                .gated(ctx.gate(&[
                    Need::Profile,
                    Need::Online,
                    Need::Provider(Feature::BucketCrud),
                ])),
        ]
    }

    /// Entries for an open context menu.
    pub fn menu_entries(
        &self,
        ctx: &ActionContext<'_>,
        contents: &MenuContents,
        object_size: Option<u64>,
    ) -> Vec<MenuEntry> {
        match contents {
            MenuContents::Object { key } => self.object_actions(ctx, key, object_size),
            MenuContents::Prefix { prefix } => self.prefix_actions(ctx, prefix),
            MenuContents::Selection { .. } => self
                .selection_actions(ctx)
                .into_iter()
                .map(MenuEntry::from)
                .collect(),
            MenuContents::List => self
                .global_actions(ctx)
                .into_iter()
                .map(MenuEntry::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProviderCapability;
    use std::cell::RefCell;

    struct Fixture {
        caps: Capabilities,
        favorites: FavoriteSet,
    }

    impl Fixture {
        fn ready() -> Self {
            Self {
                caps: Capabilities::ready(),
                favorites: FavoriteSet::default(),
            }
        }

        fn ctx(&self, selection_count: usize) -> ActionContext<'_> {
            ActionContext {
                caps: &self.caps,
                prefix: "docs/",
                selection_count,
                loaded_count: 3,
                clipboard_ready: false,
                favorites: &self.favorites,
            }
        }
    }

    fn find<'a>(entries: &'a [MenuEntry], id: &str) -> &'a UiAction {
        entries
            .iter()
            .filter_map(MenuEntry::as_action)
            .find(|a| a.id == id)
            .unwrap()
    }

    #[test]
    fn test_dispatches_command() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let catalog = ActionCatalog::new(move |cmd| sink.borrow_mut().push(cmd));
        let fixture = Fixture::ready();
        let entries = catalog.object_actions(&fixture.ctx(0), "docs/a.txt", Some(10));
        assert!(find(&entries, "delete").run());
        assert_eq!(
            *seen.borrow(),
            vec![ActionCommand::DeleteObject { key: "docs/a.txt".to_string() }]
        );
    }

    #[test]
    fn test_offline_disables_but_keeps_actions() {
        let catalog = ActionCatalog::new(|_| {});
        let mut fixture = Fixture::ready();
        let online = catalog.object_actions(&fixture.ctx(0), "k", None);
        fixture.caps.online = false;
        let offline = catalog.object_actions(&fixture.ctx(0), "k", None);
        assert_eq!(online.len(), offline.len());
        let delete = find(&offline, "delete");
        assert!(!delete.enabled);
        assert_eq!(delete.disabled_reason.as_deref(), Some("Offline"));
        assert!(find(&offline, "copy_key").enabled);
    }

    #[test]
    fn test_provider_reason_surfaces() {
        let catalog = ActionCatalog::new(|_| {});
        let mut fixture = Fixture::ready();
        fixture.caps.provider = Some(ProviderCapability {
            job_transfer: false,
            ..Default::default()
        });
        let entries = catalog.prefix_actions(&fixture.ctx(0), "docs/sub");
        let zip = find(&entries, "zip");
        assert!(!zip.enabled);
        assert_eq!(zip.disabled_reason.as_deref(), Some("Not supported by this provider"));
        assert!(find(&entries, "open").enabled);
    }

    #[test]
    fn test_preview_gated_by_size() {
        let catalog = ActionCatalog::new(|_| {});
        let fixture = Fixture::ready();
        let big = catalog.object_actions(&fixture.ctx(0), "k", Some(PREVIEW_MAX_BYTES + 1));
        assert!(!find(&big, "open").enabled);
        let small = catalog.object_actions(&fixture.ctx(0), "k", Some(PREVIEW_MAX_BYTES));
        assert!(find(&small, "open").enabled);
    }

    #[test]
    fn test_selection_actions_need_selection() {
        let catalog = ActionCatalog::new(|_| {});
        let fixture = Fixture::ready();
        let empty = catalog.selection_actions(&fixture.ctx(0));
        assert!(empty.iter().all(|a| !a.enabled));
        let some = catalog.selection_actions(&fixture.ctx(2));
        assert!(some.iter().all(|a| a.enabled));
    }

    #[test]
    fn test_global_paste_and_go_up() {
        let catalog = ActionCatalog::new(|_| {});
        let fixture = Fixture::ready();
        let mut ctx = fixture.ctx(0);
        let actions = catalog.global_actions(&ctx);
        let paste = actions.iter().find(|a| a.id == "paste").unwrap();
        assert_eq!(paste.disabled_reason.as_deref(), Some("Clipboard is empty"));
        ctx.clipboard_ready = true;
        ctx.prefix = "";
        let actions = catalog.global_actions(&ctx);
        assert!(actions.iter().find(|a| a.id == "paste").unwrap().enabled);
        assert!(!actions.iter().find(|a| a.id == "go_up").unwrap().enabled);
    }

    #[test]
    fn test_favorite_label_follows_state() {
        let catalog = ActionCatalog::new(|_| {});
        let mut fixture = Fixture::ready();
        fixture.favorites.insert(crate::models::FavoriteObject {
            object: crate::models::ObjectItem::new("k", 1, ""),
            created_at: String::new(),
        });
        let entries = catalog.object_actions(&fixture.ctx(0), "k", None);
        assert_eq!(find(&entries, "favorite").label, "Remove from favorites");
    }

    #[test]
    fn test_menu_entries_for_selection() {
        let catalog = ActionCatalog::new(|_| {});
        let fixture = Fixture::ready();
        let entries = catalog.menu_entries(&fixture.ctx(2), &MenuContents::Selection { count: 2 }, None);
        assert_eq!(entries.len(), catalog.selection_actions(&fixture.ctx(2)).len());
        assert!(entries.iter().all(|e| !e.is_divider()));
    }
}
