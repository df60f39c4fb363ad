use std::path::PathBuf;

use clap::Args;
use common::session::SessionError;

use crate::session::{self, BucketSelector, OpenSessionError};

#[derive(Args, Debug, Clone)]
pub struct Get {
    #[command(flatten)]
    pub selector: BucketSelector,

    /// Object name, relative to the context folder
    pub file: String,

    /// Where to write the object (defaults to its file name in the current directory)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetError {
    #[error("{0}")]
    Session(#[from] OpenSessionError),
    #[error("bucket {0} does not allow reading")]
    NotReadable(String),
    #[error("{0}")]
    Fetch(#[from] SessionError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Local file name for an object name: its last non-empty segment
fn default_output(file: &str) -> PathBuf {
    let name = file
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("download");
    PathBuf::from(name)
}

#[async_trait::async_trait]
impl crate::op::Op for Get {
    type Error = GetError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let credential = session::resolve_credential(ctx, &self.selector)?;
        if !credential.read_allowed {
            return Err(GetError::NotReadable(credential.display_name().to_string()));
        }

        let session = session::open(&credential)?;
        let data = session.get_file(&self.file).await?;

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| default_output(&self.file));
        tokio::fs::write(&output, &data).await?;

        Ok(format!("Fetched {} bytes to {}", data.len(), output.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output() {
        assert_eq!(default_output("docs/readme.txt"), PathBuf::from("readme.txt"));
        assert_eq!(default_output("a.bin"), PathBuf::from("a.bin"));
        assert_eq!(default_output("dir/"), PathBuf::from("dir"));
        assert_eq!(default_output(""), PathBuf::from("download"));
    }
}
