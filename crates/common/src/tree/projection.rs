use serde::{Deserialize, Serialize};

use super::builder::FileTree;
use super::node::{Folder, TreeNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Folder,
    File,
}

/// Presentation-ready tree node, shaped for a tree widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTreeNode {
    /// Unique within the tree: the scope-relative path plus a trailing `/`
    ///  for folders, the full object key for files. Object keys listed as
    ///  files never end in `/`, so a folder and a file of the same name
    ///  cannot collide.
    pub key: String,
    pub label: String,
    /// Path handed back to the engine on selection: the scope-relative
    ///  folder path, or the full object key
    pub data: String,
    pub node_type: NodeType,
    pub leaf: bool,
    pub selectable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileTreeNode>,
}

impl FileTree {
    /// Project the tree into an ordered node list.
    ///
    /// Pure and cheap enough to call after every refresh: folders come
    ///  before files at each level, each group sorted by name.
    pub fn to_nodes(&self) -> Vec<FileTreeNode> {
        project_folder(self.root(), "")
    }
}

fn project_folder(folder: &Folder, prefix: &str) -> Vec<FileTreeNode> {
    folder
        .children()
        .map(|child| match child {
            TreeNode::Folder(sub) => {
                let path = if prefix.is_empty() {
                    sub.name().to_string()
                } else {
                    format!("{}/{}", prefix, sub.name())
                };
                FileTreeNode {
                    key: format!("{}/", path),
                    label: sub.name().to_string(),
                    data: path.clone(),
                    node_type: NodeType::Folder,
                    leaf: false,
                    selectable: false,
                    children: project_folder(sub, &path),
                }
            }
            TreeNode::File(file) => FileTreeNode {
                key: file.full_path().to_string(),
                label: file.name().to_string(),
                data: file.full_path().to_string(),
                node_type: NodeType::File,
                leaf: true,
                selectable: true,
                children: Vec::new(),
            },
        })
        .collect()
}
