//! Desktop runtime persistence: three independent durable records and their boot hydration.
//!
//! The filesystem tree and the favourites list are app-state envelopes in their own namespaces;
//! UI settings are a typed preference. Each record loads on its own, so a missing or corrupt one
//! falls back to its default without disturbing the others.

use std::rc::Rc;

use leptos::logging;
use platform_host::{
    load_app_state_with_migration, load_pref_with, migrate_envelope_payload, save_app_state_with,
    save_pref_with, AppStateEnvelope, AppStateStore, FavouritesSnapshot, FileNode, FileTree,
    FileTreeSnapshot, FolderNode, Node, PrefsStore, DEFAULT_FILE_LAUNCHER,
    DESKTOP_SETTINGS_PREFS_KEY, FS_FAVOURITES_STATE_NAMESPACE, FS_TREE_STATE_NAMESPACE,
    ROOT_FOLDER_NAME,
};

use crate::{
    model::{DesktopSettings, DesktopState},
    reducer::{DesktopAction, RuntimeEffect},
};

/// Current schema of the filesystem tree record.
pub const FS_TREE_SCHEMA_VERSION: u32 = 1;
/// Current schema of the favourites record.
pub const FS_FAVOURITES_SCHEMA_VERSION: u32 = 1;

const SEED_FOLDERS: [&str; 4] = ["Desktop", "Documents", "Images", "Music"];

// Schema 0 stored the bare root node instead of `{ tree }`.
fn migrate_tree_snapshot(
    schema_version: u32,
    envelope: &AppStateEnvelope,
) -> Result<Option<FileTreeSnapshot>, String> {
    match schema_version {
        0 => migrate_envelope_payload::<Node>(envelope).map(|tree| Some(FileTreeSnapshot { tree })),
        _ => Ok(None),
    }
}

// Schema 0 stored a bare array of paths.
fn migrate_favourites_snapshot(
    schema_version: u32,
    envelope: &AppStateEnvelope,
) -> Result<Option<FavouritesSnapshot>, String> {
    match schema_version {
        0 => migrate_envelope_payload::<Vec<String>>(envelope).map(|favourite_folders| {
            Some(FavouritesSnapshot { favourite_folders })
        }),
        _ => Ok(None),
    }
}

/// Tree a first-time session starts with.
pub fn default_file_tree() -> FileTree {
    let mut root = FolderNode::new(ROOT_FOLDER_NAME);
    root.children = SEED_FOLDERS
        .iter()
        .map(|name| Rc::new(Node::Folder(FolderNode::new(*name))))
        .collect();
    if let Some(Node::Folder(documents)) = root.children.get_mut(1).map(Rc::make_mut) {
        documents.children.push(Rc::new(Node::File(FileNode {
            name: "readme".to_string(),
            data: "Welcome to the desktop. Double-click a file to open it.".to_string(),
            launcher: vec![DEFAULT_FILE_LAUNCHER.to_string()],
            title: Some("Read me".to_string()),
        })));
    }
    FileTree::from_parts(
        Node::Folder(root),
        vec!["Desktop".to_string(), "Documents".to_string()],
    )
}

/// Loads the persisted filesystem tree, logging and discarding unreadable records.
pub async fn load_file_tree<S: AppStateStore + ?Sized>(store: &S) -> Option<FileTreeSnapshot> {
    match load_app_state_with_migration(
        store,
        FS_TREE_STATE_NAMESPACE,
        FS_TREE_SCHEMA_VERSION,
        migrate_tree_snapshot,
    )
    .await
    {
        Ok(snapshot) => snapshot,
        Err(err) => {
            logging::warn!("filesystem tree load failed: {err}");
            None
        }
    }
}

/// Loads the persisted favourites list, logging and discarding unreadable records.
pub async fn load_favourites<S: AppStateStore + ?Sized>(store: &S) -> Option<FavouritesSnapshot> {
    match load_app_state_with_migration(
        store,
        FS_FAVOURITES_STATE_NAMESPACE,
        FS_FAVOURITES_SCHEMA_VERSION,
        migrate_favourites_snapshot,
    )
    .await
    {
        Ok(snapshot) => snapshot,
        Err(err) => {
            logging::warn!("favourites load failed: {err}");
            None
        }
    }
}

pub async fn load_settings<S: PrefsStore + ?Sized>(prefs: &S) -> Option<DesktopSettings> {
    match load_pref_with(prefs, DESKTOP_SETTINGS_PREFS_KEY).await {
        Ok(settings) => settings,
        Err(err) => {
            logging::warn!("settings load failed: {err}");
            None
        }
    }
}

pub async fn persist_file_tree<S: AppStateStore + ?Sized>(
    store: &S,
    fs: &FileTree,
) -> Result<(), String> {
    save_app_state_with(
        store,
        FS_TREE_STATE_NAMESPACE,
        FS_TREE_SCHEMA_VERSION,
        &fs.tree_snapshot(),
    )
    .await
}

pub async fn persist_favourites<S: AppStateStore + ?Sized>(
    store: &S,
    fs: &FileTree,
) -> Result<(), String> {
    save_app_state_with(
        store,
        FS_FAVOURITES_STATE_NAMESPACE,
        FS_FAVOURITES_SCHEMA_VERSION,
        &fs.favourites_snapshot(),
    )
    .await
}

pub async fn persist_settings<S: PrefsStore + ?Sized>(
    prefs: &S,
    settings: &DesktopSettings,
) -> Result<(), String> {
    save_pref_with(prefs, DESKTOP_SETTINGS_PREFS_KEY, settings).await
}

/// Writes the record a persistence effect names. Other effects are ignored.
///
/// Nothing is written until boot hydration has completed, so a session that has not yet loaded
/// the stored records never overwrites them with its defaults.
///
/// # Errors
///
/// Returns the store's error message when the write fails.
pub async fn persist_for_effect(
    app_state: &dyn AppStateStore,
    prefs: &dyn PrefsStore,
    state: &DesktopState,
    effect: &RuntimeEffect,
) -> Result<(), String> {
    if !state.hydrated {
        return Ok(());
    }
    match effect {
        RuntimeEffect::PersistTree => persist_file_tree(app_state, &state.fs).await,
        RuntimeEffect::PersistFavourites => persist_favourites(app_state, &state.fs).await,
        RuntimeEffect::PersistSettings => persist_settings(prefs, &state.settings).await,
        RuntimeEffect::FocusWindowInput(_) => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Records read at boot; `None` means missing or unreadable.
pub struct BootRecords {
    pub tree: Option<FileTreeSnapshot>,
    pub favourites: Option<FavouritesSnapshot>,
    pub settings: Option<DesktopSettings>,
}

impl BootRecords {
    /// Turns the loaded records into hydration actions, ending with
    /// [`DesktopAction::BootHydrationComplete`].
    ///
    /// A missing tree falls back to [`default_file_tree`]. Favourites fall back to the seed
    /// favourites only when the tree did too; a persisted tree keeps an empty list.
    pub fn into_actions(self) -> Vec<DesktopAction> {
        let seeded = default_file_tree();
        let fresh_tree = self.tree.is_none();
        let root = match self.tree {
            Some(snapshot) => snapshot.tree,
            None => seeded.root().clone(),
        };
        let favourites = match self.favourites {
            Some(snapshot) => snapshot.favourite_folders,
            None if fresh_tree => seeded.favourites().to_vec(),
            None => Vec::new(),
        };

        let mut actions = vec![DesktopAction::HydrateFs { root, favourites }];
        if let Some(settings) = self.settings {
            actions.push(DesktopAction::HydrateSettings { settings });
        }
        actions.push(DesktopAction::BootHydrationComplete);
        actions
    }
}

/// Loads all three records concurrently.
pub async fn load_boot_records(
    app_state: &dyn AppStateStore,
    prefs: &dyn PrefsStore,
) -> BootRecords {
    let (tree, favourites, settings) = futures::join!(
        load_file_tree(app_state),
        load_favourites(app_state),
        load_settings(prefs),
    );
    BootRecords {
        tree,
        favourites,
        settings,
    }
}
