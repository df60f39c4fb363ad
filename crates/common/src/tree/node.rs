use std::collections::BTreeMap;

/**
 * Nodes
 * =====
 * A bucket has no real directories: every object is addressed by a flat
 *  key and `/` is only a naming convention. The tree built here is the
 *  virtual directory structure implied by those keys.
 * Each folder owns its children outright. There are no parent pointers,
 *  so the structure is acyclic by construction.
 */

// Terminal entry of the tree, i.e. an actual object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct File {
    // path segment at this level
    name: String,
    // the complete object key, before any context-folder stripping
    full_path: String,
}

impl File {
    pub fn new(name: impl Into<String>, full_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_path: full_path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }
}

// A virtual directory. Sub-folders and files live in separate maps
//  so a folder and a file may share a name at the same level
//  (e.g. keys `a` and `a/b`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Folder {
    name: String,
    folders: BTreeMap<String, Folder>,
    files: BTreeMap<String, File>,
}

/// Borrowed view over a single child of a [`Folder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeNode<'a> {
    Folder(&'a Folder),
    File(&'a File),
}

impl<'a> TreeNode<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            TreeNode::Folder(folder) => folder.name(),
            TreeNode::File(file) => file.name(),
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, TreeNode::Folder(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, TreeNode::File(_))
    }
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folders: BTreeMap::new(),
            files: BTreeMap::new(),
        }
    }

    /// The root folder carries an empty name
    pub fn root() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a direct sub-folder by exact name
    pub fn folder(&self, name: &str) -> Option<&Folder> {
        self.folders.get(name)
    }

    /// Get a direct file by exact name
    pub fn file(&self, name: &str) -> Option<&File> {
        self.files.get(name)
    }

    /// Sub-folders, ordered by name
    pub fn nested_folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders.values()
    }

    /// Files, ordered by name
    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.files.values()
    }

    /// All children: folders first, then files, each group ordered by name
    pub fn children(&self) -> impl Iterator<Item = TreeNode<'_>> {
        self.nested_folders()
            .map(TreeNode::Folder)
            .chain(self.files().map(TreeNode::File))
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    /// Number of files in this folder and every folder below it
    pub fn file_count(&self) -> usize {
        self.files.len()
            + self
                .folders
                .values()
                .map(Folder::file_count)
                .sum::<usize>()
    }

    /// Resolve a `/`-separated path relative to this folder.
    ///
    /// Outer separators are ignored; an empty interior segment names a
    ///  folder literally called "".
    pub fn descend(&self, path: &str) -> Option<&Folder> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Some(self);
        }
        path.split('/')
            .try_fold(self, |folder, segment| folder.folder(segment))
    }

    // Walk-or-create the named sub-folder
    pub(crate) fn folder_entry(&mut self, name: &str) -> &mut Folder {
        self.folders
            .entry(name.to_string())
            .or_insert_with(|| Folder::new(name))
    }

    // Re-inserting an existing name replaces the entry in place,
    //  so duplicate keys collapse to one file
    pub(crate) fn insert_file(&mut self, file: File) {
        self.files.insert(file.name.clone(), file);
    }
}
