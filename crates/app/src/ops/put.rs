use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::Args;
use common::session::SubmitOptions;
use common::transfer::{TransferOutcome, TransferTracker};
use futures::future::join_all;

use crate::session::{self, BucketSelector, OpenSessionError};

#[derive(Args, Debug, Clone)]
pub struct Put {
    #[command(flatten)]
    pub selector: BucketSelector,

    /// Local files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Folder to upload into, relative to the context folder
    #[arg(long)]
    pub prefix: Option<String>,

    /// Ignore the bucket's context folder and upload relative to the bucket root
    #[arg(long)]
    pub no_context_folder: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PutError {
    #[error("{0}")]
    Session(#[from] OpenSessionError),
    #[error("bucket {0} does not allow writing")]
    NotWritable(String),
    #[error("{0} has no file name")]
    NoFileName(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0}")]
    Incomplete(String),
}

/// Object name for a local file, placed under an optional prefix
fn object_name(prefix: Option<&str>, path: &Path) -> Result<String, PutError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| PutError::NoFileName(path.to_path_buf()))?;
    let prefix = prefix.map(|p| p.trim_matches('/')).unwrap_or("");
    if prefix.is_empty() {
        Ok(file_name.to_string())
    } else {
        Ok(format!("{}/{}", prefix, file_name))
    }
}

fn summarize(outcome: &TransferOutcome) -> String {
    let mut summary = format!(
        "Uploaded {} file(s), {} bytes",
        outcome.upload_count, outcome.upload_size
    );
    if outcome.upload_error_count > 0 {
        summary.push_str(&format!("; {} failed:", outcome.upload_error_count));
        for error in &outcome.upload_errors {
            match error.status {
                Some(status) => summary.push_str(&format!(
                    "\n  {}: {} {}",
                    error.object_name, status, error.detail
                )),
                None => summary.push_str(&format!("\n  {}: {}", error.object_name, error.detail)),
            }
        }
    }
    summary
}

#[async_trait::async_trait]
impl crate::op::Op for Put {
    type Error = PutError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let credential = session::resolve_credential(ctx, &self.selector)?;
        if !credential.write_allowed {
            return Err(PutError::NotWritable(credential.display_name().to_string()));
        }

        let mut blobs = Vec::with_capacity(self.files.len());
        for path in &self.files {
            let name = object_name(self.prefix.as_deref(), path)?;
            let data = tokio::fs::read(path).await.map_err(|source| PutError::Read {
                path: path.clone(),
                source,
            })?;
            blobs.push((name, Bytes::from(data)));
        }

        let session = session::open(&credential)?;
        let tracker = TransferTracker::new();
        let options = SubmitOptions {
            target_par: None,
            include_context_folder: !self.no_context_folder,
        };

        // failures land in the tracker, the per-upload results add nothing
        join_all(blobs.into_iter().map(|(name, blob)| {
            let session = session.clone();
            let tracker = tracker.clone();
            let options = options.clone();
            async move { session.submit_blob(blob, &name, &tracker, options).await }
        }))
        .await;

        let outcome = tracker.snapshot();
        let summary = summarize(&outcome);
        if outcome.upload_error_count > 0 {
            return Err(PutError::Incomplete(summary));
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::transfer::UploadErrorRecord;

    #[test]
    fn test_object_name() {
        let path = PathBuf::from("/tmp/report.pdf");
        assert_eq!(object_name(None, &path).unwrap(), "report.pdf");
        assert_eq!(object_name(Some("docs/"), &path).unwrap(), "docs/report.pdf");
        assert_eq!(object_name(Some("/"), &path).unwrap(), "report.pdf");
        assert!(matches!(
            object_name(None, Path::new("/")),
            Err(PutError::NoFileName(_))
        ));
    }

    #[test]
    fn test_summarize() {
        let tracker = TransferTracker::new();
        tracker.record_success(10);
        tracker.record_failure(UploadErrorRecord {
            object_name: "b.txt".to_string(),
            status: Some(403),
            detail: "Forbidden".to_string(),
        });

        let summary = summarize(&tracker.snapshot());
        assert_eq!(
            summary,
            "Uploaded 1 file(s), 10 bytes; 1 failed:\n  b.txt: 403 Forbidden"
        );
    }
}
