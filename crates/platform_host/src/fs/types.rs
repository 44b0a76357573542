//! Virtual filesystem data types shared across host contracts and implementations.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the root folder of every virtual filesystem tree.
pub const ROOT_FOLDER_NAME: &str = "Home";
/// Launcher assigned to files created without an explicit launcher list.
pub const DEFAULT_FILE_LAUNCHER: &str = "code";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Discriminant of a [`Node`], used in error reporting.
pub enum NodeKind {
    /// File entry.
    File,
    /// Folder entry.
    Folder,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Folder => f.write_str("folder"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Folder node holding an ordered list of children.
///
/// Children are reference-counted so a mutation only re-allocates the nodes on the path from the
/// mutated node up to the root; untouched sibling subtrees keep their identity.
pub struct FolderNode {
    /// Folder name (unique among its siblings).
    pub name: String,
    /// Ordered children.
    pub children: Vec<Rc<Node>>,
}

impl FolderNode {
    /// Creates an empty folder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Returns the child named `name`, if any.
    pub fn child(&self, name: &str) -> Option<&Rc<Node>> {
        self.children.iter().find(|child| child.name() == name)
    }

    /// Returns `true` when a child named `name` exists.
    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// File node holding an opaque payload and an ordered launcher preference list.
pub struct FileNode {
    /// File name (unique among its siblings).
    pub name: String,
    /// Opaque payload: text, a URL, or an encoded-binary marker.
    #[serde(default)]
    pub data: String,
    /// Launcher ids in preference order; the first entry is the default.
    #[serde(default)]
    pub launcher: Vec<String>,
    /// Optional display title used for window titles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl FileNode {
    /// Returns the default launcher id, if the file has any launcher.
    pub fn default_launcher(&self) -> Option<&str> {
        self.launcher.first().map(String::as_str)
    }

    /// Returns the title shown for this file (explicit title, else name).
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// A node in the virtual filesystem tree.
///
/// Serialized untagged so folders persist as `{name, children}` and files as
/// `{name, data, launcher}`.
pub enum Node {
    /// Folder node.
    Folder(FolderNode),
    /// File node.
    File(FileNode),
}

impl Node {
    /// Returns the node name.
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::File(file) => &file.name,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            Self::Folder(folder) => folder.name = name,
            Self::File(file) => file.name = name,
        }
    }

    /// Returns the node kind.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Folder(_) => NodeKind::Folder,
            Self::File(_) => NodeKind::File,
        }
    }

    /// Returns the folder payload when this node is a folder.
    pub fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::File(_) => None,
        }
    }

    /// Returns the file payload when this node is a file.
    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Self::File(file) => Some(file),
            Self::Folder(_) => None,
        }
    }

    /// Counts this node and every node below it.
    pub fn subtree_len(&self) -> usize {
        match self {
            Self::File(_) => 1,
            Self::Folder(folder) => {
                1 + folder
                    .children
                    .iter()
                    .map(|child| child.subtree_len())
                    .sum::<usize>()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
/// Caller-supplied description of a file to create inside a folder.
pub struct FileStub {
    /// New file name.
    pub name: String,
    /// Initial payload; defaults to the empty string.
    #[serde(default)]
    pub data: Option<String>,
    /// Launcher preference list; defaults to [`DEFAULT_FILE_LAUNCHER`].
    #[serde(default)]
    pub launcher: Option<Vec<String>>,
    /// Optional display title.
    #[serde(default)]
    pub title: Option<String>,
}

impl FileStub {
    /// Creates a stub with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the initial payload.
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Sets the launcher preference list.
    pub fn with_launcher<I, S>(mut self, launcher: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.launcher = Some(launcher.into_iter().map(Into::into).collect());
        self
    }

    pub(crate) fn into_file(self) -> FileNode {
        FileNode {
            name: self.name,
            data: self.data.unwrap_or_default(),
            launcher: self
                .launcher
                .unwrap_or_else(|| vec![DEFAULT_FILE_LAUNCHER.to_string()]),
            title: self.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
/// Partial file update; `None` fields are left untouched.
pub struct FilePatch {
    /// New name (applied with rename semantics).
    #[serde(default)]
    pub name: Option<String>,
    /// New payload.
    #[serde(default)]
    pub data: Option<String>,
    /// New launcher list.
    #[serde(default)]
    pub launcher: Option<Vec<String>>,
    /// New display title.
    #[serde(default)]
    pub title: Option<String>,
}

impl FilePatch {
    /// Returns `true` when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.data.is_none() && self.launcher.is_none() && self.title.is_none()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Structured failures reported by virtual filesystem operations.
pub enum FsError {
    /// The path does not resolve to any node.
    #[error("not found: `{path}`")]
    NotFound {
        /// Normalized path that failed to resolve.
        path: String,
    },
    /// The node exists but has the wrong kind for the operation.
    #[error("expected a {expected} at `{path}`")]
    WrongNodeType {
        /// Normalized path of the offending node.
        path: String,
        /// Kind the operation required.
        expected: NodeKind,
    },
    /// A sibling with the same name already exists.
    #[error("already exists: `{path}`")]
    AlreadyExists {
        /// Normalized path that would collide.
        path: String,
    },
    /// The request was rejected before touching state.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The host integration layer failed.
    #[error("integration failure: {0}")]
    Integration(String),
}

impl FsError {
    pub(crate) fn not_found(path: &str) -> Self {
        Self::NotFound {
            path: path.to_string(),
        }
    }

    pub(crate) fn expected_folder(path: &str) -> Self {
        Self::WrongNodeType {
            path: path.to_string(),
            expected: NodeKind::Folder,
        }
    }

    pub(crate) fn expected_file(path: &str) -> Self {
        Self::WrongNodeType {
            path: path.to_string(),
            expected: NodeKind::File,
        }
    }
}
