use std::collections::BTreeSet;

use super::node::{File, Folder};
use super::scope::ScopedKey;

/// A folder/file tree materialized from a flat set of object keys,
///  plus the flat set of every folder path seen along the way.
///
/// The tree is always rebuilt wholesale from a listing; it is never
///  patched incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileTree {
    root: Folder,
    folder_paths: BTreeSet<String>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from unscoped object keys
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        for key in keys {
            let key = key.as_ref();
            tree.insert(key, key);
        }
        tree
    }

    /// Build a tree from keys already filtered and stripped to a context folder
    pub fn from_scoped<'a, I>(keys: I) -> Self
    where
        I: IntoIterator<Item = ScopedKey<'a>>,
    {
        let mut tree = Self::new();
        for key in keys {
            tree.insert(key.relative, key.full);
        }
        tree
    }

    /// Insert a single key.
    ///
    /// All segments of `relative` but the last are folders at successive
    ///  depths; the last is the file name. Segments are taken literally, so
    ///  `a//b` nests `b` under a folder named "" inside `a` and stays distinct
    ///  from `a/b`. A key ending in `/` (a folder marker object) only
    ///  registers its folders.
    pub fn insert(&mut self, relative: &str, full_path: &str) {
        if relative.is_empty() {
            return;
        }
        let segments: Vec<&str> = relative.split('/').collect();
        let Some((file_name, folders)) = segments.split_last() else {
            return;
        };

        let mut current = &mut self.root;
        let mut path = String::new();
        for (depth, segment) in folders.iter().enumerate() {
            if depth > 0 {
                path.push('/');
            }
            path.push_str(segment);
            if !self.folder_paths.contains(&path) {
                self.folder_paths.insert(path.clone());
            }
            current = current.folder_entry(segment);
        }

        if !file_name.is_empty() {
            current.insert_file(File::new(*file_name, full_path));
        }
    }

    pub fn root(&self) -> &Folder {
        &self.root
    }

    /// Every distinct folder path, sorted
    pub fn folder_paths(&self) -> &BTreeSet<String> {
        &self.folder_paths
    }

    /// Exact folder path, or the same path with outer separators trimmed
    pub fn contains_folder(&self, path: &str) -> bool {
        self.folder_paths.contains(path) || self.folder_paths.contains(path.trim_matches('/'))
    }

    pub fn file_count(&self) -> usize {
        self.root.file_count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tree::scope::scope_keys;

    #[test]
    fn test_empty_input() {
        let tree = FileTree::from_keys(Vec::<String>::new());
        assert!(tree.is_empty());
        assert!(tree.folder_paths().is_empty());
        assert_eq!(tree.file_count(), 0);
    }

    #[test]
    fn test_root_level_file() {
        let tree = FileTree::from_keys(["readme.txt"]);
        let file = tree.root().file("readme.txt").unwrap();
        assert_eq!(file.full_path(), "readme.txt");
        assert!(tree.folder_paths().is_empty());
    }

    #[test]
    fn test_nested_key() {
        let tree = FileTree::from_keys(["a/b/c"]);

        let a = tree.root().folder("a").unwrap();
        let b = a.folder("b").unwrap();
        let c = b.file("c").unwrap();
        assert_eq!(c.full_path(), "a/b/c");

        assert!(tree.contains_folder("a"));
        assert!(tree.contains_folder("a/b"));
        assert!(!tree.contains_folder("b"));
        assert_eq!(
            tree.folder_paths().iter().collect::<Vec<_>>(),
            vec!["a", "a/b"]
        );
    }

    #[test]
    fn test_duplicate_keys_collapse() {
        let tree = FileTree::from_keys(["a/x.txt", "a/x.txt", "b.txt", "b.txt"]);
        assert_eq!(tree.file_count(), 2);
        assert_eq!(tree.folder_paths().len(), 1);
    }

    #[test]
    fn test_order_independent() {
        let forward = FileTree::from_keys(["a/1", "a/b/2", "c", "a/b/3", "d/e/f/4"]);
        let backward = FileTree::from_keys(["d/e/f/4", "a/b/3", "c", "a/b/2", "a/1"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_idempotent_build() {
        let keys = ["x/y/z.bin", "x/w.bin", "top.bin"];
        assert_eq!(FileTree::from_keys(keys), FileTree::from_keys(keys));
    }

    #[test]
    fn test_file_count_matches_distinct_keys() {
        let keys = [
            "photos/2023/jan/a.jpg",
            "photos/2023/jan/b.jpg",
            "photos/2023/feb/a.jpg",
            "photos/2024/a.jpg",
            "notes.md",
            "photos/2023/jan/a.jpg",
        ];
        let distinct: BTreeSet<_> = keys.iter().collect();
        let tree = FileTree::from_keys(keys);
        assert_eq!(tree.file_count(), distinct.len());
    }

    #[test]
    fn test_folder_marker_key() {
        let tree = FileTree::from_keys(["empty/", "docs/readme.txt"]);
        assert!(tree.contains_folder("empty"));
        assert!(tree.root().folder("empty").unwrap().is_empty());
        assert_eq!(tree.file_count(), 1);
    }

    #[test]
    fn test_empty_segments_stay_distinct() {
        let forward = FileTree::from_keys(["a/b", "a//b"]);
        let backward = FileTree::from_keys(["a//b", "a/b"]);
        assert_eq!(forward, backward);
        assert_eq!(forward.file_count(), 2);

        let a = forward.root().folder("a").unwrap();
        assert_eq!(a.file("b").unwrap().full_path(), "a/b");
        let nested = a.folder("").unwrap().file("b").unwrap();
        assert_eq!(nested.full_path(), "a//b");
        assert!(forward.contains_folder("a/"));
    }

    #[test]
    fn test_leading_separator_is_distinct() {
        let tree = FileTree::from_keys(["/a/b", "a/b"]);
        assert_eq!(tree.file_count(), 2);

        let leading = tree.root().folder("").unwrap().folder("a").unwrap();
        assert_eq!(leading.file("b").unwrap().full_path(), "/a/b");
        assert!(tree.folder_paths().contains("/a"));
        assert_eq!(FileTree::from_keys([""]).file_count(), 0);
    }

    #[test]
    fn test_scoped_build_keeps_full_path() {
        let keys = ["docs/readme.txt", "docs/img/logo.png", "other.txt"];
        let tree = FileTree::from_scoped(scope_keys(keys.iter().copied(), Some("docs")));

        let readme = tree.root().file("readme.txt").unwrap();
        assert_eq!(readme.full_path(), "docs/readme.txt");

        let logo = tree.root().folder("img").unwrap().file("logo.png").unwrap();
        assert_eq!(logo.full_path(), "docs/img/logo.png");

        assert!(tree.root().file("other.txt").is_none());
        assert_eq!(tree.file_count(), 2);
        assert!(tree.contains_folder("img"));
        assert!(!tree.contains_folder("docs"));
    }
}
