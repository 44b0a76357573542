//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

mod fs_actions;

use desktop_app_contract::{
    ApplicationId, LaunchError, LauncherResolver, OpenFileOptions, WindowSettingsOverride,
};
use platform_host::{normalize_path, FileStub, FilePatch, FsError, Node};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    apps::{self, AppDescriptor},
    model::{
        DesktopSettings, DesktopSettingsPatch, DesktopState, DragSession, FocusDirection,
        InteractionState, OpenWindowRequest, PointerPosition, ResizeEdge, ResizeSession, Viewport,
        WindowId, WindowRect,
    },
    tiling::{self, DropZone},
    window_manager,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
/// Filesystem mutations routed through the reducer so windows and persistence stay in step.
pub enum FsCommand {
    /// Create an empty folder at `path`.
    CreateFolder {
        /// Path of the new folder.
        path: String,
    },
    /// Create a file inside the folder at `folder`.
    CreateFile {
        /// Target folder.
        folder: String,
        /// Name and initial contents.
        stub: FileStub,
    },
    /// Shallow-merge a patch into a file.
    UpdateFile {
        /// File to update.
        path: String,
        /// Fields to replace.
        patch: FilePatch,
    },
    /// Rename a node in place.
    Rename {
        /// Node to rename.
        path: String,
        /// New name; anything after a `/` is dropped.
        name: String,
    },
    /// Move a node into another folder.
    Move {
        /// Node to move.
        from: String,
        /// Destination folder.
        to: String,
    },
    /// Remove a node and its subtree.
    Remove {
        /// Node to remove.
        path: String,
    },
    AddFavourite {
        path: String,
    },
    RemoveFavourite {
        path: String,
    },
    /// Make `launcher` the file's default opener.
    SetDefaultLauncher {
        /// Target file.
        path: String,
        /// Launcher to move to the front.
        launcher: String,
    },
    /// Offer `launcher` as a non-default opener.
    AddLauncher {
        /// Target file.
        path: String,
        /// Launcher to move to the back.
        launcher: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Record the current viewport size.
    SetViewport {
        /// New viewport geometry.
        viewport: Viewport,
    },
    /// Open a window for an app from the catalog.
    Launch {
        /// App to open.
        app_id: ApplicationId,
        /// Settings that win over the catalog defaults.
        overrides: WindowSettingsOverride,
    },
    /// Open a file with its resolved launcher.
    OpenFile {
        /// Path of the file in the tree.
        path: String,
        /// Explicit launcher and window settings.
        options: OpenFileOptions,
    },
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Minimize every window.
    MinimizeAll,
    /// Restore a minimized window.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Toggle taskbar behavior for a window (focus, minimize, or restore).
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Step focus through creation order.
    CycleFocus {
        /// Step direction.
        direction: FocusDirection,
    },
    SetWindowTitle {
        window_id: WindowId,
        title: String,
    },
    SetWindowPosition {
        window_id: WindowId,
        x: i32,
        y: i32,
    },
    /// Set a window's size, clamped to its limits.
    SetWindowSize {
        /// Window to resize.
        window_id: WindowId,
        /// Requested width.
        w: i32,
        /// Requested height.
        h: i32,
    },
    /// Begin dragging a window.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag, tiling the window when dropped on a zone.
    EndMove {
        /// Zone under the pointer at release, if any.
        drop_zone: Option<DropZone>,
    },
    /// Abort the active drag and put the window back where it started.
    CancelMove,
    /// Begin resizing a window.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window resize.
    EndResize,
    /// Apply a drop zone's geometry to the window with this view key.
    TileWindow {
        /// View key of the window.
        key: String,
        /// Target zone.
        zone: DropZone,
    },
    /// Mutate the virtual filesystem.
    Fs(FsCommand),
    /// Replace the filesystem with persisted records.
    HydrateFs {
        /// Persisted root folder.
        root: Node,
        /// Persisted favourite paths.
        favourites: Vec<String>,
    },
    /// Replace settings with the persisted record.
    HydrateSettings {
        /// Persisted settings.
        settings: DesktopSettings,
    },
    /// Mark boot hydration as finished.
    BootHydrationComplete,
    /// Merge a settings patch.
    SetSettings(DesktopSettingsPatch),
    /// Restore default settings.
    ResetSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell runtime to execute.
pub enum RuntimeEffect {
    /// Persist the filesystem tree record.
    PersistTree,
    /// Persist the favourites record.
    PersistFavourites,
    /// Persist the settings record.
    PersistSettings,
    /// Move focus into the newly focused window's primary input.
    FocusWindowInput(WindowId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions (for example, referencing a missing window).
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window not found")]
    WindowNotFound,
    /// A filesystem command was rejected; the tree is unchanged.
    #[error(transparent)]
    Fs(#[from] FsError),
    /// The app is not in the catalog.
    #[error("unknown app `{0}`")]
    UnknownApp(String),
    /// No launcher could be resolved for a file.
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

/// Applies a [`DesktopAction`] to the desktop runtime state and collects resulting side effects.
///
/// A failed action leaves `state` unchanged.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not present,
/// and the filesystem or launch error when such a command is rejected.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::SetViewport { viewport } => {
            state.viewport = viewport;
        }
        DesktopAction::Launch { app_id, overrides } => {
            let descriptor = apps::app_descriptor(&app_id)
                .ok_or_else(|| ReducerError::UnknownApp(app_id.to_string()))?;
            let window_id = open_app_window(state, descriptor, descriptor.open_request(overrides));
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::OpenFile { path, options } => {
            let path = normalize_path(&path);
            let file = state.fs.require_file(&path)?;
            let launcher =
                LauncherResolver::default().resolve(file, options.launcher.as_deref())?;
            let title = file.display_title().to_string();
            let descriptor = apps::app_descriptor(&launcher)
                .ok_or_else(|| ReducerError::UnknownApp(launcher.to_string()))?;
            let mut request = descriptor.open_request(options.overrides);
            request.title = title;
            request.opened_path = Some(path);
            let window_id = open_app_window(state, descriptor, request);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::CloseWindow { window_id } => {
            let index = state
                .registry
                .index_of(window_id)
                .ok_or(ReducerError::WindowNotFound)?;
            window_manager::remove_window(&mut state.registry, window_id);
            drop_sessions_for(state, interaction, window_id);
            refocus_after(state, index, &mut effects);
        }
        DesktopAction::FocusWindow { window_id } => {
            if !window_manager::bring_to_front(&mut state.registry, window_id) {
                return Err(ReducerError::WindowNotFound);
            }
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::MinimizeWindow { window_id } => {
            let index = state
                .registry
                .index_of(window_id)
                .ok_or(ReducerError::WindowNotFound)?;
            let was_active = state.registry.active_window == Some(window_id);
            window_manager::minimize_window(&mut state.registry, window_id);
            if was_active {
                refocus_after(state, index + 1, &mut effects);
            }
        }
        DesktopAction::MinimizeAll => {
            window_manager::minimize_all(&mut state.registry);
        }
        DesktopAction::RestoreWindow { window_id } => {
            if !window_manager::restore_window(&mut state.registry, window_id) {
                return Err(ReducerError::WindowNotFound);
            }
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            let index = state
                .registry
                .index_of(window_id)
                .ok_or(ReducerError::WindowNotFound)?;
            window_manager::toggle_taskbar(&mut state.registry, window_id);
            if state.registry.is_minimized(window_id) {
                refocus_after(state, index + 1, &mut effects);
            } else {
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::CycleFocus { direction } => {
            if let Some(window_id) = window_manager::cycle_focus(&mut state.registry, direction) {
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::SetWindowTitle { window_id, title } => {
            if !window_manager::set_title(&mut state.registry, window_id, title) {
                return Err(ReducerError::WindowNotFound);
            }
        }
        DesktopAction::SetWindowPosition { window_id, x, y } => {
            if !window_manager::set_position(&mut state.registry, window_id, x, y) {
                return Err(ReducerError::WindowNotFound);
            }
        }
        DesktopAction::SetWindowSize { window_id, w, h } => {
            if !window_manager::set_size(&mut state.registry, window_id, w, h) {
                return Err(ReducerError::WindowNotFound);
            }
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let rect_start = state
                .registry
                .window(window_id)
                .ok_or(ReducerError::WindowNotFound)?
                .rect;
            window_manager::bring_to_front(&mut state.registry, window_id);
            interaction.resizing = None;
            interaction.dragging = Some(DragSession {
                window_id,
                pointer_start: pointer,
                rect_start,
            });
            state.registry.is_dragging = true;
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let rect = session.rect_start.offset(dx, dy);
                if !window_manager::set_position(&mut state.registry, session.window_id, rect.x, rect.y)
                {
                    interaction.dragging = None;
                    state.registry.is_dragging = false;
                }
            }
        }
        DesktopAction::EndMove { drop_zone } => {
            let session = interaction.dragging.take();
            state.registry.is_dragging = false;
            if let (Some(session), Some(zone)) = (session, drop_zone) {
                let key = state
                    .registry
                    .window(session.window_id)
                    .map(|window| window.key.clone());
                if let Some(key) = key {
                    tiling::tile_window_by_key(&mut state.registry, &key, zone, state.viewport);
                }
            }
        }
        DesktopAction::CancelMove => {
            if let Some(session) = interaction.dragging.take() {
                window_manager::set_geometry(
                    &mut state.registry,
                    session.window_id,
                    session.rect_start,
                );
            }
            state.registry.is_dragging = false;
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            let window = state
                .registry
                .window(window_id)
                .ok_or(ReducerError::WindowNotFound)?;
            let (rect_start, resizeable) = (window.rect, window.resizeable);
            window_manager::bring_to_front(&mut state.registry, window_id);
            if resizeable {
                interaction.dragging = None;
                state.registry.is_dragging = false;
                interaction.resizing = Some(ResizeSession {
                    window_id,
                    edge,
                    pointer_start: pointer,
                    rect_start,
                });
            }
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                match state.registry.window(session.window_id) {
                    Some(window) => {
                        let raw = window_manager::resize_rect(session.rect_start, session.edge, dx, dy);
                        let rect = anchor_resize(
                            session.rect_start,
                            session.edge,
                            window_manager::fit_size(window, raw),
                        );
                        window_manager::set_geometry(&mut state.registry, session.window_id, rect);
                    }
                    None => interaction.resizing = None,
                }
            }
        }
        DesktopAction::EndResize => {
            interaction.resizing = None;
        }
        DesktopAction::TileWindow { key, zone } => {
            if !tiling::tile_window_by_key(&mut state.registry, &key, zone, state.viewport) {
                return Err(ReducerError::WindowNotFound);
            }
        }
        DesktopAction::Fs(command) => {
            fs_actions::reduce_fs_command(state, command, &mut effects)?;
        }
        DesktopAction::HydrateFs { root, favourites } => {
            state.fs = platform_host::FileTree::from_parts(root, favourites);
        }
        DesktopAction::HydrateSettings { settings } => {
            state.settings = settings;
        }
        DesktopAction::BootHydrationComplete => {
            state.hydrated = true;
        }
        DesktopAction::SetSettings(patch) => {
            state.settings.apply(patch);
            effects.push(RuntimeEffect::PersistSettings);
        }
        DesktopAction::ResetSettings => {
            state.settings = DesktopSettings::default();
            effects.push(RuntimeEffect::PersistSettings);
        }
    }

    Ok(effects)
}

/// Opens a window for `descriptor`, reusing the existing window of a single-instance app.
///
/// A reused window keeps its id, key, and geometry; everything else comes from `request`.
fn open_app_window(
    state: &mut DesktopState,
    descriptor: &AppDescriptor,
    request: OpenWindowRequest,
) -> WindowId {
    let existing = if descriptor.single_instance {
        state
            .registry
            .windows
            .iter()
            .find(|window| window.app_id == descriptor.app_id)
            .map(|window| (window.id, window.key.clone(), window.rect))
    } else {
        None
    };
    let mut window = window_manager::create_window(&mut state.registry, state.viewport, request);
    if let Some((id, key, rect)) = existing {
        window.id = id;
        window.key = key;
        window.rect = rect;
    }
    window_manager::add_window(&mut state.registry, window)
}

/// Focus policy after the active window goes away: next non-minimized window from `start`.
fn refocus_after(state: &mut DesktopState, start: usize, effects: &mut Vec<RuntimeEffect>) {
    if state.registry.active_window.is_some() || state.registry.windows.is_empty() {
        return;
    }
    if let Some(window_id) = window_manager::focus_next_available(&mut state.registry, start) {
        effects.push(RuntimeEffect::FocusWindowInput(window_id));
    }
}

fn drop_sessions_for(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    window_id: WindowId,
) {
    if interaction
        .dragging
        .as_ref()
        .is_some_and(|session| session.window_id == window_id)
    {
        interaction.dragging = None;
        state.registry.is_dragging = false;
    }
    if interaction
        .resizing
        .as_ref()
        .is_some_and(|session| session.window_id == window_id)
    {
        interaction.resizing = None;
    }
}

/// Keeps the opposite edge fixed when a clamp shortened a drag on the left or top edge.
fn anchor_resize(start: WindowRect, edge: ResizeEdge, fitted: WindowRect) -> WindowRect {
    let moves_left = matches!(
        edge,
        ResizeEdge::West | ResizeEdge::NorthWest | ResizeEdge::SouthWest
    );
    let moves_top = matches!(
        edge,
        ResizeEdge::North | ResizeEdge::NorthEast | ResizeEdge::NorthWest
    );
    WindowRect {
        x: if moves_left {
            start.x + start.w - fitted.w
        } else {
            fitted.x
        },
        y: if moves_top {
            start.y + start.h - fitted.h
        } else {
            fitted.y
        },
        ..fitted
    }
}

#[cfg(test)]
mod tests {
    use platform_host::{FileNode, FolderNode, ROOT_FOLDER_NAME};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::window_manager::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};

    fn reduce(
        state: &mut DesktopState,
        interaction: &mut InteractionState,
        action: DesktopAction,
    ) -> Vec<RuntimeEffect> {
        reduce_desktop(state, interaction, action).expect("reduce")
    }

    fn launch(state: &mut DesktopState, interaction: &mut InteractionState, app: &str) -> WindowId {
        reduce(
            state,
            interaction,
            DesktopAction::Launch {
                app_id: ApplicationId::trusted(app),
                overrides: WindowSettingsOverride::default(),
            },
        );
        state.registry.active_window.expect("active window")
    }

    fn fs(state: &mut DesktopState, command: FsCommand) -> Vec<RuntimeEffect> {
        reduce_desktop(state, &mut InteractionState::default(), DesktopAction::Fs(command))
            .expect("fs command")
    }

    fn state_with_documents() -> DesktopState {
        let mut state = DesktopState::default();
        fs(
            &mut state,
            FsCommand::CreateFolder {
                path: "Documents".to_string(),
            },
        );
        fs(
            &mut state,
            FsCommand::CreateFile {
                folder: "Documents".to_string(),
                stub: FileStub::named("note")
                    .with_data("hi")
                    .with_launcher(["web", "code"]),
            },
        );
        state
    }

    #[test]
    fn launch_uses_catalog_defaults_and_focuses_new_window() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let effects = reduce(
            &mut state,
            &mut interaction,
            DesktopAction::Launch {
                app_id: ApplicationId::trusted("terminal"),
                overrides: WindowSettingsOverride::default(),
            },
        );

        let window = &state.registry.windows[0];
        assert_eq!(effects, vec![RuntimeEffect::FocusWindowInput(window.id)]);
        assert_eq!(window.title, "Terminal");
        assert_eq!((window.rect.w, window.rect.h), (680, 420));
        assert_eq!(state.registry.active_window, Some(window.id));
    }

    #[test]
    fn launching_unknown_app_is_rejected_without_changes() {
        let mut state = DesktopState::default();
        let err = reduce_desktop(
            &mut state,
            &mut InteractionState::default(),
            DesktopAction::Launch {
                app_id: ApplicationId::trusted("solitaire"),
                overrides: WindowSettingsOverride::default(),
            },
        )
        .unwrap_err();

        assert_eq!(err, ReducerError::UnknownApp("solitaire".to_string()));
        assert!(state.registry.windows.is_empty());
    }

    #[test]
    fn single_instance_launch_reuses_the_existing_window() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let settings = launch(&mut state, &mut interaction, "settings");
        let key = state.registry.windows[0].key.clone();
        let other = launch(&mut state, &mut interaction, "terminal");
        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::SetWindowPosition {
                window_id: settings,
                x: 5,
                y: 6,
            },
        );
        let again = launch(&mut state, &mut interaction, "settings");

        assert_eq!(again, settings);
        assert_eq!(state.registry.windows.len(), 2);
        assert_eq!(state.registry.window_order, vec![other, settings]);
        let window = state.registry.window(settings).expect("settings window");
        assert_eq!(window.key, key);
        assert_eq!((window.rect.x, window.rect.y), (5, 6));
        assert!(state.registry.is_consistent());
    }

    #[test]
    fn open_file_falls_back_to_default_launcher_and_titles_window() {
        let mut state = state_with_documents();
        let mut interaction = InteractionState::default();

        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::OpenFile {
                path: "/Home/Documents/note".to_string(),
                options: OpenFileOptions {
                    launcher: Some("image".to_string()),
                    overrides: WindowSettingsOverride::default(),
                },
            },
        );
        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::OpenFile {
                path: "Documents/note".to_string(),
                options: OpenFileOptions {
                    launcher: Some("code".to_string()),
                    overrides: WindowSettingsOverride::default(),
                },
            },
        );

        let apps: Vec<&str> = state
            .registry
            .windows
            .iter()
            .map(|window| window.app_id.as_str())
            .collect();
        assert_eq!(apps, vec!["web", "code"]);
        assert!(state.registry.windows.iter().all(|window| window.title == "note"
            && window.opened_path.as_deref() == Some("Documents/note")));
    }

    #[test]
    fn open_file_reports_missing_paths_and_folders() {
        let mut state = state_with_documents();
        let mut interaction = InteractionState::default();
        let open = |path: &str| DesktopAction::OpenFile {
            path: path.to_string(),
            options: OpenFileOptions::default(),
        };

        assert_eq!(
            reduce_desktop(&mut state, &mut interaction, open("Documents/missing")),
            Err(ReducerError::Fs(FsError::NotFound {
                path: "Documents/missing".to_string()
            }))
        );
        assert!(matches!(
            reduce_desktop(&mut state, &mut interaction, open("Documents")),
            Err(ReducerError::Fs(FsError::WrongNodeType { .. }))
        ));
        assert!(state.registry.windows.is_empty());
    }

    #[test]
    fn open_file_without_launchers_is_a_launch_error() {
        let mut state = DesktopState::default();
        fs(
            &mut state,
            FsCommand::CreateFile {
                folder: String::new(),
                stub: FileStub::named("blob").with_launcher(Vec::<String>::new()),
            },
        );

        let err = reduce_desktop(
            &mut state,
            &mut InteractionState::default(),
            DesktopAction::OpenFile {
                path: "blob".to_string(),
                options: OpenFileOptions::default(),
            },
        )
        .unwrap_err();

        assert_eq!(
            err,
            ReducerError::Launch(LaunchError::NoLauncher {
                file: "blob".to_string()
            })
        );
    }

    #[test]
    fn closing_the_active_window_focuses_the_next_one() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let a = launch(&mut state, &mut interaction, "explorer");
        let b = launch(&mut state, &mut interaction, "terminal");
        let c = launch(&mut state, &mut interaction, "code");
        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id: c },
        );
        assert_eq!(state.registry.active_window, Some(a));

        let effects = reduce(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id: a },
        );

        assert_eq!(state.registry.active_window, Some(b));
        assert_eq!(effects, vec![RuntimeEffect::FocusWindowInput(b)]);
        assert_eq!(
            reduce_desktop(
                &mut state,
                &mut interaction,
                DesktopAction::CloseWindow { window_id: a }
            ),
            Err(ReducerError::WindowNotFound)
        );
        assert!(state.registry.is_consistent());
    }

    #[test]
    fn minimizing_every_window_leaves_no_active_window() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let a = launch(&mut state, &mut interaction, "explorer");
        let b = launch(&mut state, &mut interaction, "terminal");
        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleTaskbarWindow { window_id: b },
        );
        assert_eq!(state.registry.active_window, Some(a));
        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id: a },
        );
        assert_eq!(state.registry.active_window, None);

        let effects = reduce(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleTaskbarWindow { window_id: b },
        );
        assert_eq!(effects, vec![RuntimeEffect::FocusWindowInput(b)]);
        assert_eq!(state.registry.active_window, Some(b));

        reduce(&mut state, &mut interaction, DesktopAction::MinimizeAll);
        assert_eq!(state.registry.minimized_windows.len(), 2);
        assert_eq!(state.registry.active_window, None);
    }

    #[test]
    fn cycle_focus_wraps_and_requests_input_focus() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let a = launch(&mut state, &mut interaction, "explorer");
        launch(&mut state, &mut interaction, "terminal");
        launch(&mut state, &mut interaction, "code");

        let effects = reduce(
            &mut state,
            &mut interaction,
            DesktopAction::CycleFocus {
                direction: FocusDirection::Forward,
            },
        );
        assert_eq!(effects, vec![RuntimeEffect::FocusWindowInput(a)]);
        assert_eq!(state.registry.top_window(), Some(a));
    }

    #[test]
    fn drag_moves_by_pointer_delta_and_tiles_on_drop_zone() {
        let mut state = DesktopState {
            viewport: Viewport {
                width: 1200,
                height: 840,
                taskbar_height: 40,
            },
            ..DesktopState::default()
        };
        let mut interaction = InteractionState::default();
        let win = launch(&mut state, &mut interaction, "terminal");
        let start = state.registry.window(win).expect("window").rect;

        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: win,
                pointer: PointerPosition { x: 300, y: 300 },
            },
        );
        assert!(state.registry.is_dragging);
        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateMove {
                pointer: PointerPosition { x: 340, y: 280 },
            },
        );
        assert_eq!(
            state.registry.window(win).expect("window").rect,
            start.offset(40, -20)
        );

        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::EndMove {
                drop_zone: Some(DropZone::Left),
            },
        );
        assert!(!state.registry.is_dragging);
        assert_eq!(interaction.dragging, None);
        assert_eq!(
            state.registry.window(win).expect("window").rect,
            WindowRect {
                x: 0,
                y: 0,
                w: 600,
                h: 800
            }
        );
    }

    #[test]
    fn cancelled_drag_restores_the_start_rect() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let win = launch(&mut state, &mut interaction, "terminal");
        let start = state.registry.window(win).expect("window").rect;

        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: win,
                pointer: PointerPosition { x: 0, y: 0 },
            },
        );
        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateMove {
                pointer: PointerPosition { x: 90, y: 90 },
            },
        );
        reduce(&mut state, &mut interaction, DesktopAction::CancelMove);

        assert_eq!(state.registry.window(win).expect("window").rect, start);
        assert!(!state.registry.is_dragging);
    }

    #[test]
    fn resize_clamps_and_keeps_the_opposite_edge_fixed() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let win = launch(&mut state, &mut interaction, "terminal");
        let start = state.registry.window(win).expect("window").rect;

        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::BeginResize {
                window_id: win,
                edge: ResizeEdge::West,
                pointer: PointerPosition { x: 0, y: 0 },
            },
        );
        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateResize {
                pointer: PointerPosition { x: 5_000, y: 0 },
            },
        );
        reduce(&mut state, &mut interaction, DesktopAction::EndResize);

        let rect = state.registry.window(win).expect("window").rect;
        assert_eq!(rect.w, MIN_WINDOW_WIDTH);
        assert_eq!(rect.x + rect.w, start.x + start.w);
        assert_eq!(rect.h, start.h);
        assert_eq!(interaction.resizing, None);
        assert!(MIN_WINDOW_HEIGHT <= rect.h);
    }

    #[test]
    fn resize_is_ignored_for_fixed_size_windows() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let win = launch(&mut state, &mut interaction, "settings");
        let start = state.registry.window(win).expect("window").rect;

        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::BeginResize {
                window_id: win,
                edge: ResizeEdge::SouthEast,
                pointer: PointerPosition { x: 0, y: 0 },
            },
        );
        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateResize {
                pointer: PointerPosition { x: 80, y: 80 },
            },
        );

        assert_eq!(interaction.resizing, None);
        assert_eq!(state.registry.window(win).expect("window").rect, start);
    }

    #[test]
    fn tile_window_targets_by_key() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let win = launch(&mut state, &mut interaction, "web");
        let key = state.registry.window(win).expect("window").key.clone();

        reduce(
            &mut state,
            &mut interaction,
            DesktopAction::TileWindow {
                key,
                zone: DropZone::BottomRight,
            },
        );
        let desktop_height = state.viewport.desktop_height();
        assert_eq!(
            state.registry.window(win).expect("window").rect,
            tiling::tile_rect(DropZone::BottomRight, state.viewport.width, desktop_height)
        );
        assert_eq!(
            reduce_desktop(
                &mut state,
                &mut interaction,
                DesktopAction::TileWindow {
                    key: "window-0".to_string(),
                    zone: DropZone::Left,
                }
            ),
            Err(ReducerError::WindowNotFound)
        );
    }

    #[test]
    fn settings_changes_only_persist_settings() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let effects = reduce(
            &mut state,
            &mut interaction,
            DesktopAction::SetSettings(DesktopSettingsPatch {
                theme: Some("light".to_string()),
                ..DesktopSettingsPatch::default()
            }),
        );
        assert_eq!(effects, vec![RuntimeEffect::PersistSettings]);
        assert_eq!(state.settings.theme, "light");

        let effects = reduce(&mut state, &mut interaction, DesktopAction::ResetSettings);
        assert_eq!(effects, vec![RuntimeEffect::PersistSettings]);
        assert_eq!(state.settings, DesktopSettings::default());
    }

    #[test]
    fn hydration_replaces_records_and_marks_the_session() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let mut root = FolderNode::new(ROOT_FOLDER_NAME);
        root.children.push(std::rc::Rc::new(Node::File(FileNode {
            name: "todo".to_string(),
            data: String::new(),
            launcher: vec!["code".to_string()],
            title: None,
        })));

        let effects = reduce(
            &mut state,
            &mut interaction,
            DesktopAction::HydrateFs {
                root: Node::Folder(root),
                favourites: vec!["todo".to_string(), "gone".to_string()],
            },
        );
        reduce(&mut state, &mut interaction, DesktopAction::BootHydrationComplete);

        assert!(effects.is_empty());
        assert!(state.hydrated);
        assert_eq!(state.fs.favourites(), ["todo".to_string()]);
        assert!(state.fs.file("todo").is_some());
    }
}
