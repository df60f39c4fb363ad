use clap::Args;
use common::credentials::{CredentialStoreError, SaveCredential};
use common::kv::FileKeyValueStoreError;
use common::par::{Par, ParError};
use uuid::Uuid;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Save {
    /// Pre-authenticated request url of the bucket (or bucket prefix)
    #[arg(long)]
    pub par: String,

    /// Bucket name (defaults to the name found in the PAR url)
    #[arg(long)]
    pub name: Option<String>,

    /// Human friendly label
    #[arg(long, default_value = "")]
    pub label: String,

    /// Free-form description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Whether the PAR allows reading
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub read: bool,

    /// Whether the PAR allows writing
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub write: bool,

    /// Update the remembered bucket with this id instead of adding a new one
    #[arg(long)]
    pub id: Option<Uuid>,

    /// Scope the bucket to this folder
    #[arg(long)]
    pub context_folder: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BucketSaveError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("{0}")]
    Par(#[from] ParError),
    #[error("no bucket name given and none found in the PAR url. Use --name")]
    NoBucketName,
    #[error("failed to save bucket: {0}")]
    Store(#[from] CredentialStoreError<FileKeyValueStoreError>),
}

#[async_trait::async_trait]
impl crate::op::Op for Save {
    type Error = BucketSaveError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let par = Par::parse(&self.par)?;
        let bucket_name = self
            .name
            .clone()
            .or_else(|| par.bucket_name())
            .ok_or(BucketSaveError::NoBucketName)?;

        let mut request = SaveCredential::new(bucket_name, par)
            .with_label(self.label.clone())
            .with_description(self.description.clone())
            .with_permissions(self.read, self.write)
            .with_context_folder(self.context_folder.clone());
        request.id = self.id;

        let mut store = ctx.credentials()?;
        let saved = store.save(request)?;

        Ok(format!(
            "Saved bucket {} (id: {})",
            saved.display_name(),
            saved.id
        ))
    }
}
