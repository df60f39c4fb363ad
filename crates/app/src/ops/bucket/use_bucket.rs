use clap::Args;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Use {
    /// Remembered bucket id or name to make active
    pub bucket: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BucketUseError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("no remembered bucket matches '{0}'")]
    UnknownBucket(String),
}

#[async_trait::async_trait]
impl crate::op::Op for Use {
    type Error = BucketUseError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut state = ctx.state()?;
        let store = ctx.credentials()?;

        let credential = store
            .resolve(&self.bucket)
            .ok_or_else(|| BucketUseError::UnknownBucket(self.bucket.clone()))?;

        state.config.active_bucket = Some(credential.id.to_string());
        state.save_config()?;

        Ok(format!(
            "Active bucket is now {} (id: {})",
            credential.display_name(),
            credential.id
        ))
    }
}
