//! Filesystem integration handed to apps, backed by the live desktop session.
//!
//! Mutations go through the reducer, so they persist and keep open windows in step exactly like
//! mutations made by the shell itself.

use leptos::SignalWithUntracked;
use platform_host::{
    normalize_path, FilePatch, FileStub, FsError, FsIntegration, FsIntegrationFuture, Node,
};

use crate::{
    reducer::{DesktopAction, FsCommand, ReducerError},
    runtime_context::DesktopRuntimeContext,
};

#[derive(Clone, Copy)]
/// [`FsIntegration`] over a [`DesktopRuntimeContext`].
pub struct RuntimeFsIntegration {
    runtime: DesktopRuntimeContext,
}

impl RuntimeFsIntegration {
    pub fn new(runtime: DesktopRuntimeContext) -> Self {
        Self { runtime }
    }

    fn run(&self, command: FsCommand) -> Result<(), FsError> {
        self.runtime
            .try_dispatch(DesktopAction::Fs(command))
            .map_err(|err| match err {
                ReducerError::Fs(err) => err,
                other => FsError::Integration(other.to_string()),
            })
    }
}

impl FsIntegration for RuntimeFsIntegration {
    fn read_dir<'a>(&'a self, path: &'a str) -> FsIntegrationFuture<'a, Result<Node, FsError>> {
        Box::pin(async move {
            self.runtime
                .state
                .with_untracked(|state| state.fs.resolve(path).cloned())
                .ok_or_else(|| FsError::NotFound {
                    path: normalize_path(path),
                })
        })
    }

    fn make_dir<'a>(&'a self, path: &'a str) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async move {
            self.run(FsCommand::CreateFolder {
                path: path.to_string(),
            })
        })
    }

    fn make_file<'a>(
        &'a self,
        path: &'a str,
        stub: FileStub,
    ) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async move {
            self.run(FsCommand::CreateFile {
                folder: path.to_string(),
                stub,
            })
        })
    }

    fn move_node<'a>(
        &'a self,
        from: &'a str,
        to: &'a str,
    ) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async move {
            self.run(FsCommand::Move {
                from: from.to_string(),
                to: to.to_string(),
            })
        })
    }

    fn update_file<'a>(
        &'a self,
        path: &'a str,
        patch: FilePatch,
    ) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async move {
            self.run(FsCommand::UpdateFile {
                path: path.to_string(),
                patch,
            })
        })
    }

    fn remove_file<'a>(&'a self, path: &'a str) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async move {
            self.run(FsCommand::Remove {
                path: path.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use leptos::{create_runtime, SignalGetUntracked};
    use platform_host::NodeKind;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{host::DesktopHostContext, reducer::RuntimeEffect};

    fn integration() -> RuntimeFsIntegration {
        let _ = create_runtime();
        RuntimeFsIntegration::new(DesktopRuntimeContext::new(DesktopHostContext::default()))
    }

    #[test]
    fn app_mutations_flow_through_the_session() {
        let fs = integration();

        block_on(fs.make_dir("Projects")).expect("mkdir");
        block_on(fs.make_file("Projects", FileStub::named("plan").with_data("v1"))).expect("touch");
        block_on(fs.update_file(
            "Projects/plan",
            FilePatch {
                data: Some("v2".to_string()),
                ..FilePatch::default()
            },
        ))
        .expect("update");

        let node = block_on(fs.read_dir("/Home/Projects/plan")).expect("read");
        assert_eq!(node.as_file().map(|file| file.data.as_str()), Some("v2"));
        assert_eq!(
            fs.runtime.effects.get_untracked(),
            vec![RuntimeEffect::PersistTree; 3]
        );
    }

    #[test]
    fn failures_surface_as_fs_errors() {
        let fs = integration();

        assert_eq!(
            block_on(fs.read_dir("nowhere")),
            Err(FsError::NotFound {
                path: "nowhere".to_string()
            })
        );
        block_on(fs.make_file("", FileStub::named("notes"))).expect("touch");
        assert_eq!(
            block_on(fs.move_node("", "notes")),
            Err(FsError::InvalidArgument("cannot move the root folder".to_string()))
        );
        block_on(fs.make_dir("Trash")).expect("mkdir");
        assert_eq!(
            block_on(fs.move_node("Trash", "notes")),
            Err(FsError::WrongNodeType {
                path: "notes".to_string(),
                expected: NodeKind::Folder,
            })
        );
        block_on(fs.remove_file("notes")).expect("remove");
        assert!(block_on(fs.remove_file("notes")).is_err());
    }
}
