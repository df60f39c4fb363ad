use clap::Args;
use common::credentials::CredentialStoreError;
use common::kv::FileKeyValueStoreError;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Remove {
    /// Bucket name. Every remembered bucket with this name is removed.
    #[arg(long)]
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BucketRemoveError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("failed to remove bucket: {0}")]
    Store(#[from] CredentialStoreError<FileKeyValueStoreError>),
}

#[async_trait::async_trait]
impl crate::op::Op for Remove {
    type Error = BucketRemoveError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut state = ctx.state()?;
        let mut store = ctx.credentials()?;

        // the active bucket may be stored by id, so resolve it before removal
        let active_removed = state
            .config
            .active_bucket
            .as_deref()
            .and_then(|wanted| store.resolve(wanted))
            .is_some_and(|c| c.bucket_name == self.name);

        let removed = store.remove(&self.name)?;

        if active_removed {
            state.config.active_bucket = None;
            state.save_config()?;
        }

        Ok(match removed {
            0 => format!("No remembered bucket named {}", self.name),
            1 => format!("Removed bucket {}", self.name),
            n => format!("Removed {} buckets named {}", n, self.name),
        })
    }
}
