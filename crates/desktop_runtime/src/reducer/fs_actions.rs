//! Reducer helpers for filesystem commands and the windows that show affected files.

use std::rc::Rc;

use desktop_app_contract::ApplicationId;
use platform_host::{
    base_name, is_same_or_descendant, join_path, normalize_path, parent_path, rebase_path,
    truncate_name, FsError,
};

use crate::{
    apps::app_descriptor,
    model::DesktopState,
    reducer::{FsCommand, RuntimeEffect},
};

pub(super) fn reduce_fs_command(
    state: &mut DesktopState,
    command: FsCommand,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), FsError> {
    let root_before = Rc::clone(state.fs.root_handle());
    let favourites_before = state.fs.favourites().to_vec();

    for launcher in launchers_named_by(&command) {
        check_launcher(launcher)?;
    }

    match command {
        FsCommand::CreateFolder { path } => state.fs.create_folder(&path)?,
        FsCommand::CreateFile { folder, stub } => state.fs.create_file(&folder, stub)?,
        FsCommand::UpdateFile { path, patch } => {
            let from = normalize_path(&path);
            let renamed_to = patch
                .name
                .as_deref()
                .map(|name| join_path(&parent_path(&from), truncate_name(name)));
            let retitle = patch.name.is_some() || patch.title.is_some();
            state.fs.update_file(&from, patch)?;
            let current = match renamed_to {
                Some(to) => {
                    rebase_windows(state, &from, &to);
                    to
                }
                None => from,
            };
            if retitle {
                retitle_windows(state, &current);
            }
        }
        FsCommand::Rename { path, name } => {
            let from = normalize_path(&path);
            state.fs.rename(&from, &name)?;
            let to = join_path(&parent_path(&from), truncate_name(&name));
            rebase_windows(state, &from, &to);
            retitle_windows(state, &to);
        }
        FsCommand::Move { from, to } => {
            let from = normalize_path(&from);
            state.fs.move_node(&from, &to)?;
            if state.fs.resolve(&from).is_none() {
                let destination = join_path(&normalize_path(&to), &base_name(&from));
                rebase_windows(state, &from, &destination);
            }
        }
        FsCommand::Remove { path } => {
            let path = normalize_path(&path);
            state.fs.remove(&path)?;
            detach_windows(state, &path);
        }
        FsCommand::AddFavourite { path } => state.fs.add_favourite(&path)?,
        FsCommand::RemoveFavourite { path } => {
            state.fs.remove_favourite(&path);
        }
        FsCommand::SetDefaultLauncher { path, launcher } => {
            state.fs.set_default_launcher(&path, &launcher)?
        }
        FsCommand::AddLauncher { path, launcher } => state.fs.add_launcher(&path, &launcher)?,
    }

    if !Rc::ptr_eq(&root_before, state.fs.root_handle()) {
        effects.push(RuntimeEffect::PersistTree);
    }
    if favourites_before != state.fs.favourites() {
        effects.push(RuntimeEffect::PersistFavourites);
    }
    Ok(())
}

fn launchers_named_by(command: &FsCommand) -> Vec<&str> {
    let list = match command {
        FsCommand::SetDefaultLauncher { launcher, .. } | FsCommand::AddLauncher { launcher, .. } => {
            return vec![launcher.as_str()];
        }
        FsCommand::CreateFile { stub, .. } => stub.launcher.as_deref(),
        FsCommand::UpdateFile { patch, .. } => patch.launcher.as_deref(),
        _ => None,
    };
    list.unwrap_or_default().iter().map(String::as_str).collect()
}

/// Launcher ids must name an application in the catalog.
fn check_launcher(raw: &str) -> Result<(), FsError> {
    let known = ApplicationId::new(raw)
        .ok()
        .and_then(|app_id| app_descriptor(&app_id))
        .is_some();
    if known {
        Ok(())
    } else {
        Err(FsError::InvalidArgument(format!("unknown launcher `{raw}`")))
    }
}

/// Windows showing a removed node (or anything below it) keep running without a file.
fn detach_windows(state: &mut DesktopState, removed: &str) {
    for window in &mut state.registry.windows {
        if window
            .opened_path
            .as_deref()
            .is_some_and(|opened| is_same_or_descendant(opened, removed))
        {
            window.opened_path = None;
        }
    }
}

/// Points windows showing `from` (or anything below it) at the node's new location.
fn rebase_windows(state: &mut DesktopState, from: &str, to: &str) {
    for window in &mut state.registry.windows {
        let rebased = window
            .opened_path
            .as_deref()
            .and_then(|opened| rebase_path(opened, from, to));
        if let Some(rebased) = rebased {
            window.opened_path = Some(rebased);
        }
    }
}

fn retitle_windows(state: &mut DesktopState, path: &str) {
    let Some(title) = state.fs.file(path).map(|file| file.display_title().to_string()) else {
        return;
    };
    for window in &mut state.registry.windows {
        if window.opened_path.as_deref() == Some(path) {
            window.title = title.clone();
        }
    }
}
