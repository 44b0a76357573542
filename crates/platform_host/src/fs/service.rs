//! Filesystem integration contract consumed by applications.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use super::tree::FileTree;
use super::types::{FilePatch, FileStub, FsError, Node};

/// Object-safe boxed future used by [`FsIntegration`] async methods.
pub type FsIntegrationFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Filesystem operations exposed to applications.
///
/// Every method is future-shaped so an out-of-process filesystem can implement the same contract;
/// in-process implementations resolve immediately.
pub trait FsIntegration {
    /// Returns a copy of the node at `path`.
    fn read_dir<'a>(&'a self, path: &'a str) -> FsIntegrationFuture<'a, Result<Node, FsError>>;

    /// Creates a folder at `path`.
    fn make_dir<'a>(&'a self, path: &'a str) -> FsIntegrationFuture<'a, Result<(), FsError>>;

    /// Creates a file described by `stub` inside the folder at `path`.
    fn make_file<'a>(
        &'a self,
        path: &'a str,
        stub: FileStub,
    ) -> FsIntegrationFuture<'a, Result<(), FsError>>;

    /// Moves the node at `from` into the folder at `to`.
    fn move_node<'a>(
        &'a self,
        from: &'a str,
        to: &'a str,
    ) -> FsIntegrationFuture<'a, Result<(), FsError>>;

    /// Shallow-merges `patch` into the file at `path`.
    fn update_file<'a>(
        &'a self,
        path: &'a str,
        patch: FilePatch,
    ) -> FsIntegrationFuture<'a, Result<(), FsError>>;

    /// Removes the node at `path`.
    fn remove_file<'a>(&'a self, path: &'a str) -> FsIntegrationFuture<'a, Result<(), FsError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op filesystem integration for unsupported targets and baseline tests.
pub struct NoopFsIntegration;

impl NoopFsIntegration {
    fn unsupported(op: &str) -> FsError {
        FsError::Integration(format!("filesystem unavailable: {op}"))
    }
}

impl FsIntegration for NoopFsIntegration {
    fn read_dir<'a>(&'a self, _path: &'a str) -> FsIntegrationFuture<'a, Result<Node, FsError>> {
        Box::pin(async { Err(Self::unsupported("read_dir")) })
    }

    fn make_dir<'a>(&'a self, _path: &'a str) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async { Err(Self::unsupported("make_dir")) })
    }

    fn make_file<'a>(
        &'a self,
        _path: &'a str,
        _stub: FileStub,
    ) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async { Err(Self::unsupported("make_file")) })
    }

    fn move_node<'a>(
        &'a self,
        _from: &'a str,
        _to: &'a str,
    ) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async { Err(Self::unsupported("move_node")) })
    }

    fn update_file<'a>(
        &'a self,
        _path: &'a str,
        _patch: FilePatch,
    ) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async { Err(Self::unsupported("update_file")) })
    }

    fn remove_file<'a>(&'a self, _path: &'a str) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async { Err(Self::unsupported("remove_file")) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory filesystem integration over a shared [`FileTree`].
pub struct MemoryFsIntegration {
    inner: Rc<RefCell<FileTree>>,
}

impl MemoryFsIntegration {
    /// Wraps an existing tree.
    pub fn new(tree: FileTree) -> Self {
        Self {
            inner: Rc::new(RefCell::new(tree)),
        }
    }

    /// Returns a snapshot of the current tree.
    pub fn snapshot(&self) -> FileTree {
        self.inner.borrow().clone()
    }
}

impl FsIntegration for MemoryFsIntegration {
    fn read_dir<'a>(&'a self, path: &'a str) -> FsIntegrationFuture<'a, Result<Node, FsError>> {
        Box::pin(async move {
            let tree = self.inner.borrow();
            tree.resolve(path)
                .cloned()
                .ok_or_else(|| FsError::NotFound {
                    path: super::path::normalize(path),
                })
        })
    }

    fn make_dir<'a>(&'a self, path: &'a str) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async move { self.inner.borrow_mut().create_folder(path) })
    }

    fn make_file<'a>(
        &'a self,
        path: &'a str,
        stub: FileStub,
    ) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async move { self.inner.borrow_mut().create_file(path, stub) })
    }

    fn move_node<'a>(
        &'a self,
        from: &'a str,
        to: &'a str,
    ) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async move { self.inner.borrow_mut().move_node(from, to) })
    }

    fn update_file<'a>(
        &'a self,
        path: &'a str,
        patch: FilePatch,
    ) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async move { self.inner.borrow_mut().update_file(path, patch) })
    }

    fn remove_file<'a>(&'a self, path: &'a str) -> FsIntegrationFuture<'a, Result<(), FsError>> {
        Box::pin(async move { self.inner.borrow_mut().remove(path) })
    }
}
