use clap::Args;
use common::tree::{FileTreeNode, NodeType};

use crate::session::{self, BucketSelector, OpenSessionError};

#[derive(Args, Debug, Clone)]
pub struct Tree {
    #[command(flatten)]
    pub selector: BucketSelector,

    /// Print the presentation node list as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("{0}")]
    Session(#[from] OpenSessionError),
    #[error("bucket {0} does not allow reading")]
    NotReadable(String),
    #[error("failed to encode tree: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render nodes as an indented text tree
pub fn render(nodes: &[FileTreeNode]) -> String {
    let mut out = String::new();
    render_level(nodes, "", &mut out);
    out.trim_end().to_string()
}

fn render_level(nodes: &[FileTreeNode], indent: &str, out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let branch = if last { "└── " } else { "├── " };
        let suffix = match node.node_type {
            NodeType::Folder => "/",
            NodeType::File => "",
        };
        out.push_str(&format!("{}{}{}{}\n", indent, branch, node.label, suffix));

        if !node.children.is_empty() {
            let child_indent = format!("{}{}", indent, if last { "    " } else { "│   " });
            render_level(&node.children, &child_indent, out);
        }
    }
}

#[async_trait::async_trait]
impl crate::op::Op for Tree {
    type Error = TreeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let credential = session::resolve_credential(ctx, &self.selector)?;
        if !credential.read_allowed {
            return Err(TreeError::NotReadable(credential.display_name().to_string()));
        }

        let (session, _) = session::open_listed(&credential).await?;
        let nodes = session.get_files_tree();

        if self.json {
            return Ok(serde_json::to_string_pretty(&nodes)?);
        }

        let root = match session.context_folder() {
            Some(context_folder) => format!("{}/", context_folder),
            None => format!("{}/", credential.bucket_name),
        };
        if nodes.is_empty() {
            return Ok(format!("{}\n(empty)", root));
        }
        Ok(format!("{}\n{}", root, render(&nodes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::tree::FileTree;

    #[test]
    fn test_render() {
        let tree = FileTree::from_keys(["a/b.txt", "a/c/d.txt", "e.txt"]);
        let rendered = render(&tree.to_nodes());
        let expected = "\
├── a/
│   ├── c/
│   │   └── d.txt
│   └── b.txt
└── e.txt";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "");
    }
}
