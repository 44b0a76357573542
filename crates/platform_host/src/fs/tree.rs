//! In-memory virtual filesystem tree with a favourites list kept in sync with tree mutations.
//!
//! Every mutator is all-or-nothing: validation runs against the current tree before anything is
//! touched, and a failed call returns an [`FsError`] with the tree and favourites unchanged.
//! Mutation is copy-on-write through [`Rc::make_mut`], so only the nodes on the path from the
//! mutated node to the root are re-allocated when a snapshot of the tree is still held elsewhere.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::path;
use super::types::{
    FilePatch, FileNode, FileStub, FolderNode, FsError, Node, ROOT_FOLDER_NAME,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Persisted payload for the filesystem tree record.
pub struct FileTreeSnapshot {
    /// Root folder node.
    pub tree: Node,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
/// Persisted payload for the favourites record.
pub struct FavouritesSnapshot {
    /// Normalized favourite paths in insertion order.
    #[serde(rename = "favouriteFolders", default)]
    pub favourite_folders: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// Rooted virtual filesystem plus its favourites list.
pub struct FileTree {
    root: Rc<Node>,
    favourites: Vec<String>,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    /// Creates a tree holding only an empty `Home` root.
    pub fn new() -> Self {
        Self {
            root: Rc::new(Node::Folder(FolderNode::new(ROOT_FOLDER_NAME))),
            favourites: Vec::new(),
        }
    }

    /// Rebuilds a tree from persisted parts.
    ///
    /// A non-folder root is replaced by an empty `Home` root. Favourites are normalized,
    /// de-duplicated, and dropped when they no longer resolve.
    pub fn from_parts(root: Node, favourites: Vec<String>) -> Self {
        let root = match root {
            Node::Folder(mut folder) => {
                folder.name = ROOT_FOLDER_NAME.to_string();
                Node::Folder(folder)
            }
            Node::File(_) => Node::Folder(FolderNode::new(ROOT_FOLDER_NAME)),
        };
        let mut tree = Self {
            root: Rc::new(root),
            favourites: Vec::new(),
        };
        for favourite in favourites {
            let favourite = path::normalize(&favourite);
            if tree.resolve(&favourite).is_some() && !tree.favourites.contains(&favourite) {
                tree.favourites.push(favourite);
            }
        }
        tree
    }

    /// Returns the root node (always a folder).
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Returns the shared root handle, for identity comparisons across snapshots.
    pub fn root_handle(&self) -> &Rc<Node> {
        &self.root
    }

    /// Returns the favourites list.
    pub fn favourites(&self) -> &[String] {
        &self.favourites
    }

    /// Builds the persisted tree payload.
    pub fn tree_snapshot(&self) -> FileTreeSnapshot {
        FileTreeSnapshot {
            tree: self.root.as_ref().clone(),
        }
    }

    /// Builds the persisted favourites payload.
    pub fn favourites_snapshot(&self) -> FavouritesSnapshot {
        FavouritesSnapshot {
            favourite_folders: self.favourites.clone(),
        }
    }

    /// Resolves a path to a node.
    pub fn resolve(&self, path: &str) -> Option<&Node> {
        path::resolve(path, &self.root)
    }

    /// Resolves a path to a file node.
    pub fn file(&self, path: &str) -> Option<&FileNode> {
        self.resolve(path).and_then(Node::as_file)
    }

    /// Resolves a path to a file node, reporting why it is not one.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] for missing paths and [`FsError::WrongNodeType`] for folders.
    pub fn require_file(&self, path: &str) -> Result<&FileNode, FsError> {
        let normalized = path::normalize(path);
        match self.resolve(&normalized) {
            Some(Node::File(file)) => Ok(file),
            Some(Node::Folder(_)) => Err(FsError::expected_file(&normalized)),
            None => Err(FsError::not_found(&normalized)),
        }
    }

    /// Lists the children of the folder at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] for missing paths and [`FsError::WrongNodeType`] for files.
    pub fn list(&self, path: &str) -> Result<&[Rc<Node>], FsError> {
        let normalized = path::normalize(path);
        match self.resolve(&normalized) {
            Some(Node::Folder(folder)) => Ok(&folder.children),
            Some(Node::File(_)) => Err(FsError::expected_folder(&normalized)),
            None => Err(FsError::not_found(&normalized)),
        }
    }

    /// Counts every file and folder below the root.
    pub fn node_count(&self) -> usize {
        self.root.subtree_len() - 1
    }

    /// Creates an empty folder at `path` (its parent must be an existing folder).
    ///
    /// # Errors
    ///
    /// Fails when the parent is missing or a file, the name is invalid, or a sibling already uses
    /// the name.
    pub fn create_folder(&mut self, path: &str) -> Result<(), FsError> {
        let normalized = path::normalize(path);
        let parent = path::parent_path(&normalized);
        let name = path::base_name(&normalized);
        self.ensure_insertable(&parent, &name)?;
        self.folder_mut(&parent)?
            .children
            .push(Rc::new(Node::Folder(FolderNode::new(name))));
        Ok(())
    }

    /// Creates a file inside the folder at `folder_path`.
    ///
    /// The file name comes from `stub`; launcher defaults to `["code"]` and data to `""`.
    ///
    /// # Errors
    ///
    /// Fails when the target folder is missing or a file, the name is invalid, or a sibling
    /// already uses the name.
    pub fn create_file(&mut self, folder_path: &str, stub: FileStub) -> Result<(), FsError> {
        let folder_path = path::normalize(folder_path);
        self.ensure_insertable(&folder_path, &stub.name)?;
        self.folder_mut(&folder_path)?
            .children
            .push(Rc::new(Node::File(stub.into_file())));
        Ok(())
    }

    /// Shallow-merges `patch` into the file at `path`.
    ///
    /// A `name` in the patch is applied with [`FileTree::rename`] semantics, so favourites and
    /// name validation behave the same as an explicit rename.
    ///
    /// # Errors
    ///
    /// Fails when the path does not resolve to a file or the rename part is rejected.
    pub fn update_file(&mut self, path: &str, mut patch: FilePatch) -> Result<(), FsError> {
        let normalized = path::normalize(path);
        if self.file(&normalized).is_none() {
            return Err(self.missing_or_wrong_kind(&normalized, false));
        }

        let target = match patch.name.take() {
            Some(name) => {
                let new_name = sanitize_name(&name)?;
                self.check_rename(&normalized, &new_name)?;
                path::join(&path::parent_path(&normalized), &new_name)
            }
            None => normalized.clone(),
        };
        if target != normalized {
            self.apply_rename(&normalized, &path::base_name(&target));
        }

        if patch.is_empty() {
            return Ok(());
        }
        let file = self.file_mut(&target)?;
        if let Some(data) = patch.data {
            file.data = data;
        }
        if let Some(launcher) = patch.launcher {
            file.launcher = launcher;
        }
        if let Some(title) = patch.title {
            file.title = Some(title);
        }
        Ok(())
    }

    /// Renames the node at `path`.
    ///
    /// Anything from the first `/` in `new_name` onwards is discarded. Favourites that point at
    /// the node or below it are rewritten to the new location.
    ///
    /// # Errors
    ///
    /// Fails when the path is missing or the root, the truncated name is empty or reserved, or a
    /// sibling already uses the name.
    pub fn rename(&mut self, path: &str, new_name: &str) -> Result<(), FsError> {
        let normalized = path::normalize(path);
        let new_name = sanitize_name(new_name)?;
        self.check_rename(&normalized, &new_name)?;
        self.apply_rename(&normalized, &new_name);
        Ok(())
    }

    /// Moves the node at `from` to become the last child of the folder at `to`.
    ///
    /// Favourites pointing at the moved node or below it are rewritten. Moving a node onto itself
    /// or into the folder it already lives in is a no-op.
    ///
    /// # Errors
    ///
    /// Fails when the source is missing or the root, the destination is missing or a file, the
    /// destination is inside the moved subtree, or the destination already holds a node with the
    /// same name.
    pub fn move_node(&mut self, from: &str, to: &str) -> Result<(), FsError> {
        let from = path::normalize(from);
        let to = path::normalize(to);
        if from.is_empty() {
            return Err(FsError::InvalidArgument("cannot move the root folder".to_string()));
        }
        if self.resolve(&from).is_none() {
            return Err(FsError::not_found(&from));
        }
        match self.resolve(&to) {
            Some(Node::Folder(_)) => {}
            Some(Node::File(_)) => return Err(FsError::expected_folder(&to)),
            None => return Err(FsError::not_found(&to)),
        }

        let source_parent = path::parent_path(&from);
        if from == to || source_parent == to {
            return Ok(());
        }
        if path::is_same_or_descendant(&to, &from) {
            return Err(FsError::InvalidArgument(format!(
                "cannot move `{from}` into its own subtree `{to}`"
            )));
        }
        let name = path::base_name(&from);
        self.ensure_insertable(&to, &name)?;

        let parent = self.folder_mut(&source_parent)?;
        let Some(index) = parent.children.iter().position(|child| child.name() == name) else {
            return Err(FsError::not_found(&from));
        };
        let node = parent.children.remove(index);
        self.folder_mut(&to)?.children.push(node);

        let destination = path::join(&to, &name);
        self.rebase_favourites(&from, &destination);
        Ok(())
    }

    /// Removes the node at `path` together with its subtree.
    ///
    /// Favourites equal to `path` or below it are pruned.
    ///
    /// # Errors
    ///
    /// Fails when the path is the root or does not resolve.
    pub fn remove(&mut self, path: &str) -> Result<(), FsError> {
        let normalized = path::normalize(path);
        if normalized.is_empty() {
            return Err(FsError::InvalidArgument("cannot remove the root folder".to_string()));
        }
        if self.resolve(&normalized).is_none() {
            return Err(FsError::not_found(&normalized));
        }

        let name = path::base_name(&normalized);
        let parent = self.folder_mut(&path::parent_path(&normalized))?;
        let Some(index) = parent.children.iter().position(|child| child.name() == name) else {
            return Err(FsError::not_found(&normalized));
        };
        parent.children.remove(index);
        self.favourites
            .retain(|favourite| !path::is_same_or_descendant(favourite, &normalized));
        Ok(())
    }

    /// Appends `path` to favourites unless it is already present.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] when the path does not resolve.
    pub fn add_favourite(&mut self, path: &str) -> Result<(), FsError> {
        let normalized = path::normalize(path);
        if self.resolve(&normalized).is_none() {
            return Err(FsError::not_found(&normalized));
        }
        if !self.favourites.contains(&normalized) {
            self.favourites.push(normalized);
        }
        Ok(())
    }

    /// Removes `path` from favourites. Returns whether an entry was removed.
    pub fn remove_favourite(&mut self, path: &str) -> bool {
        let normalized = path::normalize(path);
        let before = self.favourites.len();
        self.favourites.retain(|favourite| favourite != &normalized);
        before != self.favourites.len()
    }

    /// Moves `launcher_id` to the front of the file's launcher list.
    ///
    /// # Errors
    ///
    /// Fails when the path does not resolve to a file or the launcher id is empty.
    pub fn set_default_launcher(&mut self, path: &str, launcher_id: &str) -> Result<(), FsError> {
        let normalized = path::normalize(path);
        let launcher_id = checked_launcher(launcher_id)?;
        let file = self.file_mut(&normalized)?;
        file.launcher.retain(|id| id != launcher_id);
        file.launcher.insert(0, launcher_id.to_string());
        Ok(())
    }

    /// Moves `launcher_id` to the back of the file's launcher list.
    ///
    /// # Errors
    ///
    /// Fails when the path does not resolve to a file or the launcher id is empty.
    pub fn add_launcher(&mut self, path: &str, launcher_id: &str) -> Result<(), FsError> {
        let normalized = path::normalize(path);
        let launcher_id = checked_launcher(launcher_id)?;
        let file = self.file_mut(&normalized)?;
        file.launcher.retain(|id| id != launcher_id);
        file.launcher.push(launcher_id.to_string());
        Ok(())
    }

    fn ensure_insertable(&self, folder_path: &str, name: &str) -> Result<(), FsError> {
        validate_name(folder_path, name)?;
        match self.resolve(folder_path) {
            Some(Node::Folder(folder)) if folder.has_child(name) => Err(FsError::AlreadyExists {
                path: path::join(folder_path, name),
            }),
            Some(Node::Folder(_)) => Ok(()),
            Some(Node::File(_)) => Err(FsError::expected_folder(folder_path)),
            None => Err(FsError::not_found(folder_path)),
        }
    }

    fn check_rename(&self, normalized: &str, new_name: &str) -> Result<(), FsError> {
        if normalized.is_empty() {
            return Err(FsError::InvalidArgument("cannot rename the root folder".to_string()));
        }
        if self.resolve(normalized).is_none() {
            return Err(FsError::not_found(normalized));
        }
        if path::base_name(normalized) == new_name {
            return Ok(());
        }
        self.ensure_insertable(&path::parent_path(normalized), new_name)
    }

    fn apply_rename(&mut self, normalized: &str, new_name: &str) {
        if path::base_name(normalized) == new_name {
            return;
        }
        if let Some(node) = descend_mut(&mut self.root, &path::segments(normalized)) {
            node.set_name(new_name.to_string());
        }
        let destination = path::join(&path::parent_path(normalized), new_name);
        self.rebase_favourites(normalized, &destination);
    }

    fn rebase_favourites(&mut self, from: &str, to: &str) {
        for favourite in &mut self.favourites {
            if let Some(rebased) = path::rebase(favourite, from, to) {
                *favourite = rebased;
            }
        }
    }

    fn missing_or_wrong_kind(&self, normalized: &str, want_folder: bool) -> FsError {
        match (self.resolve(normalized), want_folder) {
            (None, _) => FsError::not_found(normalized),
            (Some(_), true) => FsError::expected_folder(normalized),
            (Some(_), false) => FsError::expected_file(normalized),
        }
    }

    fn folder_mut(&mut self, normalized: &str) -> Result<&mut FolderNode, FsError> {
        match self.resolve(normalized) {
            Some(Node::Folder(_)) => {}
            _ => return Err(self.missing_or_wrong_kind(normalized, true)),
        }
        match descend_mut(&mut self.root, &path::segments(normalized)) {
            Some(Node::Folder(folder)) => Ok(folder),
            _ => Err(FsError::not_found(normalized)),
        }
    }

    fn file_mut(&mut self, normalized: &str) -> Result<&mut FileNode, FsError> {
        match self.resolve(normalized) {
            Some(Node::File(_)) => {}
            _ => return Err(self.missing_or_wrong_kind(normalized, false)),
        }
        match descend_mut(&mut self.root, &path::segments(normalized)) {
            Some(Node::File(file)) => Ok(file),
            _ => Err(FsError::not_found(normalized)),
        }
    }
}

fn descend_mut<'a>(node: &'a mut Rc<Node>, segments: &[&str]) -> Option<&'a mut Node> {
    let node = Rc::make_mut(node);
    let Some((first, rest)) = segments.split_first() else {
        return Some(node);
    };
    let Node::Folder(folder) = node else {
        return None;
    };
    let child = folder
        .children
        .iter_mut()
        .find(|child| child.name() == *first)?;
    descend_mut(child, rest)
}

fn sanitize_name(raw: &str) -> Result<String, FsError> {
    let name = path::truncate_name(raw);
    if name.is_empty() {
        return Err(FsError::InvalidArgument(format!("invalid name `{raw}`")));
    }
    Ok(name.to_string())
}

fn validate_name(folder_path: &str, name: &str) -> Result<(), FsError> {
    if name.is_empty() || name.contains('/') || name == "." || name == ".." {
        return Err(FsError::InvalidArgument(format!("invalid name `{name}`")));
    }
    if folder_path.is_empty() && name == ROOT_FOLDER_NAME {
        return Err(FsError::InvalidArgument(format!(
            "`{ROOT_FOLDER_NAME}` is reserved at the root"
        )));
    }
    Ok(())
}

fn checked_launcher(launcher_id: &str) -> Result<&str, FsError> {
    let launcher_id = launcher_id.trim();
    if launcher_id.is_empty() {
        return Err(FsError::InvalidArgument("empty launcher id".to_string()));
    }
    Ok(launcher_id)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fs::types::NodeKind;

    fn documents_tree() -> FileTree {
        let mut tree = FileTree::new();
        tree.create_folder("Documents").expect("documents");
        tree.create_folder("Images").expect("images");
        tree.create_file(
            "Documents",
            FileStub::named("note")
                .with_data("hi")
                .with_launcher(["code"]),
        )
        .expect("note");
        tree
    }

    fn names(tree: &FileTree, path: &str) -> Vec<String> {
        tree.list(path)
            .expect("list")
            .iter()
            .map(|child| child.name().to_string())
            .collect()
    }

    #[test]
    fn create_then_rename_file() {
        let mut tree = documents_tree();
        assert_eq!(tree.file("Documents/note").map(|f| f.data.as_str()), Some("hi"));

        tree.rename("Documents/note", "memo").expect("rename");
        assert!(tree.resolve("Documents/memo").is_some());
        assert!(tree.resolve("Documents/note").is_none());
    }

    #[test]
    fn create_file_applies_defaults() {
        let mut tree = FileTree::new();
        tree.create_file("", FileStub::named("readme")).expect("create");
        let file = tree.file("readme").expect("file");
        assert_eq!(file.launcher, vec!["code".to_string()]);
        assert_eq!(file.data, "");
    }

    #[test]
    fn create_rejects_missing_parent_file_parent_and_duplicates() {
        let mut tree = documents_tree();
        assert_eq!(
            tree.create_folder("Missing/child"),
            Err(FsError::NotFound {
                path: "Missing".to_string()
            })
        );
        assert_eq!(
            tree.create_folder("Documents/note/child"),
            Err(FsError::WrongNodeType {
                path: "Documents/note".to_string(),
                expected: NodeKind::Folder,
            })
        );
        assert_eq!(
            tree.create_folder("Documents"),
            Err(FsError::AlreadyExists {
                path: "Documents".to_string()
            })
        );
        assert_eq!(
            tree.create_file("Documents", FileStub::named("note")),
            Err(FsError::AlreadyExists {
                path: "Documents/note".to_string()
            })
        );
        assert!(matches!(
            tree.create_folder("/Home/Home"),
            Err(FsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rename_truncates_at_path_separator() {
        let mut tree = documents_tree();
        tree.rename("Documents/note", "memo/../../etc").expect("rename");
        assert_eq!(names(&tree, "Documents"), vec!["memo".to_string()]);

        let before = tree.clone();
        assert!(matches!(
            tree.rename("Documents/memo", "/oops"),
            Err(FsError::InvalidArgument(_))
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn rename_to_existing_sibling_is_rejected() {
        let mut tree = documents_tree();
        assert_eq!(
            tree.rename("Documents", "Images"),
            Err(FsError::AlreadyExists {
                path: "Images".to_string()
            })
        );
        tree.rename("Documents", "Documents").expect("same-name rename is a no-op");
    }

    #[test]
    fn rename_rewrites_favourite_and_descendant_favourites() {
        let mut tree = documents_tree();
        tree.add_favourite("Documents").expect("fav");
        tree.add_favourite("/Home/Documents/note").expect("fav");

        tree.rename("Documents", "Docs").expect("rename");
        assert_eq!(
            tree.favourites(),
            &["Docs".to_string(), "Docs/note".to_string()]
        );
    }

    #[test]
    fn move_rewrites_favourites_to_new_location() {
        let mut tree = documents_tree();
        tree.add_favourite("Documents").expect("fav");

        tree.move_node("Documents", "Images").expect("move");
        assert_eq!(tree.favourites(), &["Images/Documents".to_string()]);
        assert!(tree.resolve("Images/Documents/note").is_some());
        assert!(tree.resolve("Documents").is_none());
    }

    #[test]
    fn move_preserves_node_count_and_subtree() {
        let mut tree = documents_tree();
        tree.create_folder("Documents/sub").expect("sub");
        tree.create_file("Documents/sub", FileStub::named("deep"))
            .expect("deep");
        let before_count = tree.node_count();
        let before_subtree = tree.resolve("Documents").cloned().expect("docs");

        tree.move_node("Documents", "Images").expect("move");

        assert_eq!(tree.node_count(), before_count);
        assert_eq!(tree.resolve("Images/Documents").cloned(), Some(before_subtree));
    }

    #[test]
    fn move_edge_cases_are_safe() {
        let mut tree = documents_tree();
        let before = tree.clone();

        tree.move_node("Documents", "Documents").expect("self move");
        tree.move_node("Documents/note", "Documents").expect("same parent");
        assert_eq!(tree, before);

        tree.create_folder("Documents/inner").expect("inner");
        let before = tree.clone();
        assert!(matches!(
            tree.move_node("Documents", "Documents/inner"),
            Err(FsError::InvalidArgument(_))
        ));
        assert_eq!(
            tree.move_node("Documents", "Documents/note"),
            Err(FsError::WrongNodeType {
                path: "Documents/note".to_string(),
                expected: NodeKind::Folder,
            })
        );
        assert_eq!(
            tree.move_node("Nope", "Images"),
            Err(FsError::NotFound {
                path: "Nope".to_string()
            })
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn move_into_folder_with_same_name_child_is_rejected() {
        let mut tree = documents_tree();
        tree.create_file("Images", FileStub::named("note")).expect("clash");
        assert_eq!(
            tree.move_node("Documents/note", "Images"),
            Err(FsError::AlreadyExists {
                path: "Images/note".to_string()
            })
        );
    }

    #[test]
    fn remove_prunes_exact_and_descendant_favourites() {
        let mut tree = documents_tree();
        tree.add_favourite("Documents").expect("fav");
        tree.add_favourite("Documents/note").expect("fav");
        tree.add_favourite("Images").expect("fav");

        tree.remove("Documents").expect("remove");
        assert_eq!(tree.favourites(), &["Images".to_string()]);
        assert!(tree.resolve("Documents").is_none());
        assert!(matches!(tree.remove(""), Err(FsError::InvalidArgument(_))));
    }

    #[test]
    fn favourites_stay_resolvable_after_mixed_operations() {
        let mut tree = documents_tree();
        tree.create_folder("Documents/a").expect("a");
        tree.create_folder("Documents/a/b").expect("b");
        for path in ["Documents", "Documents/a", "Documents/a/b", "Images"] {
            tree.add_favourite(path).expect("fav");
        }

        tree.rename("Documents/a", "alpha").expect("rename");
        tree.move_node("Documents/alpha", "Images").expect("move");
        tree.remove("Images/alpha/b").expect("remove");
        tree.rename("Images", "Pictures").expect("rename");

        for favourite in tree.favourites() {
            assert!(tree.resolve(favourite).is_some(), "dangling favourite {favourite}");
        }
        assert_eq!(
            tree.favourites(),
            &[
                "Documents".to_string(),
                "Pictures/alpha".to_string(),
                "Pictures".to_string()
            ]
        );
    }

    #[test]
    fn add_favourite_requires_existing_path_and_dedups() {
        let mut tree = documents_tree();
        tree.add_favourite("Documents").expect("fav");
        tree.add_favourite("/Home/Documents").expect("dup");
        assert_eq!(tree.favourites(), &["Documents".to_string()]);
        assert!(matches!(
            tree.add_favourite("Nope"),
            Err(FsError::NotFound { .. })
        ));
        assert!(tree.remove_favourite("Home/Documents"));
        assert!(!tree.remove_favourite("Documents"));
    }

    #[test]
    fn launcher_ordering_operations() {
        let mut tree = FileTree::new();
        tree.create_file(
            "",
            FileStub::named("page").with_launcher(["web", "code", "image"]),
        )
        .expect("create");

        tree.set_default_launcher("page", "image").expect("default");
        assert_eq!(tree.file("page").unwrap().launcher, ["image", "web", "code"]);

        tree.add_launcher("page", "image").expect("executable");
        assert_eq!(tree.file("page").unwrap().launcher, ["web", "code", "image"]);

        tree.add_launcher("page", "video").expect("new launcher");
        assert_eq!(
            tree.file("page").unwrap().launcher,
            ["web", "code", "image", "video"]
        );

        tree.create_folder("dir").expect("dir");
        assert!(matches!(
            tree.set_default_launcher("dir", "code"),
            Err(FsError::WrongNodeType { .. })
        ));
    }

    #[test]
    fn update_file_merges_fields_and_renames_through_rename_rules() {
        let mut tree = documents_tree();
        tree.add_favourite("Documents/note").expect("fav");

        tree.update_file(
            "Documents/note",
            FilePatch {
                name: Some("memo".to_string()),
                data: Some("bye".to_string()),
                title: Some("Memo".to_string()),
                ..FilePatch::default()
            },
        )
        .expect("update");

        let file = tree.file("Documents/memo").expect("renamed");
        assert_eq!(file.data, "bye");
        assert_eq!(file.launcher, ["code"]);
        assert_eq!(file.display_title(), "Memo");
        assert_eq!(tree.favourites(), &["Documents/memo".to_string()]);

        assert!(matches!(
            tree.update_file("Documents", FilePatch::default()),
            Err(FsError::WrongNodeType { .. })
        ));
    }

    #[test]
    fn empty_and_rename_only_patches_leave_contents_alone() {
        let mut tree = documents_tree();
        let snapshot = tree.clone();

        tree.update_file("Documents/note", FilePatch::default())
            .expect("empty patch");
        assert!(Rc::ptr_eq(snapshot.root_handle(), tree.root_handle()));

        tree.update_file(
            "Documents/note",
            FilePatch {
                name: Some("memo".to_string()),
                ..FilePatch::default()
            },
        )
        .expect("rename");
        let file = tree.file("Documents/memo").expect("renamed");
        assert_eq!(file.data, "hi");
        assert_eq!(file.launcher, ["code"]);
        assert!(tree.file("Documents/note").is_none());
    }

    #[test]
    fn mutation_only_copies_the_path_to_the_root() {
        let mut tree = documents_tree();
        let snapshot = tree.clone();

        tree.update_file(
            "Documents/note",
            FilePatch {
                data: Some("changed".to_string()),
                ..FilePatch::default()
            },
        )
        .expect("update");

        let old_images = snapshot.root().as_folder().unwrap().child("Images").unwrap();
        let new_images = tree.root().as_folder().unwrap().child("Images").unwrap();
        assert!(Rc::ptr_eq(old_images, new_images));
        assert!(!Rc::ptr_eq(snapshot.root_handle(), tree.root_handle()));
        assert_eq!(snapshot.file("Documents/note").unwrap().data, "hi");
    }

    #[test]
    fn from_parts_drops_dangling_favourites() {
        let tree = documents_tree();
        let rebuilt = FileTree::from_parts(
            tree.tree_snapshot().tree,
            vec![
                "/Home/Documents".to_string(),
                "Documents".to_string(),
                "Gone".to_string(),
            ],
        );
        assert_eq!(rebuilt.favourites(), &["Documents".to_string()]);
        assert_eq!(rebuilt.node_count(), 3);
    }

    #[test]
    fn favourites_snapshot_uses_camel_case_key() {
        let mut tree = documents_tree();
        tree.add_favourite("Images").expect("fav");
        let value = serde_json::to_value(tree.favourites_snapshot()).expect("serialize");
        assert_eq!(value, serde_json::json!({ "favouriteFolders": ["Images"] }));
    }
}
