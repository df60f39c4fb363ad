use clap::Args;

use crate::session::{self, BucketSelector, OpenSessionError};

#[derive(Args, Debug, Clone)]
pub struct Folders {
    #[command(flatten)]
    pub selector: BucketSelector,

    /// Only report whether this folder exists
    #[arg(long)]
    pub exists: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum FoldersError {
    #[error("{0}")]
    Session(#[from] OpenSessionError),
    #[error("bucket {0} does not allow reading")]
    NotReadable(String),
}

#[async_trait::async_trait]
impl crate::op::Op for Folders {
    type Error = FoldersError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let credential = session::resolve_credential(ctx, &self.selector)?;
        if !credential.read_allowed {
            return Err(FoldersError::NotReadable(
                credential.display_name().to_string(),
            ));
        }

        let (session, _) = session::open_listed(&credential).await?;

        if let Some(folder) = &self.exists {
            let found = session.tree().contains_folder(folder);
            return Ok(if found { "yes" } else { "no" }.to_string());
        }

        let folders = session.folders_in_bucket();
        if folders.is_empty() {
            Ok("No folders".to_string())
        } else {
            Ok(folders.join("\n"))
        }
    }
}
