use clap::Args;
use common::credentials::BucketCredential;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct List {
    /// Print the remembered buckets as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum BucketListError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("failed to encode buckets: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe(credential: &BucketCredential, active: bool) -> String {
    let marker = if active { "*" } else { " " };
    let access = match (credential.read_allowed, credential.write_allowed) {
        (true, true) => "rw",
        (true, false) => "r-",
        (false, true) => "-w",
        (false, false) => "--",
    };
    let mut line = format!(
        "{} {} [{}] {} (id: {})",
        marker,
        credential.display_name(),
        credential.bucket_name,
        access,
        credential.id
    );
    if let Some(context_folder) = &credential.context_folder {
        line.push_str(&format!(" context: {}/", context_folder));
    }
    if !credential.description.is_empty() {
        line.push_str(&format!("\n    {}", credential.description));
    }
    line
}

#[async_trait::async_trait]
impl crate::op::Op for List {
    type Error = BucketListError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        let store = ctx.credentials()?;

        if self.json {
            return Ok(serde_json::to_string_pretty(store.remembered())?);
        }

        if store.remembered().is_empty() {
            return Ok("No remembered buckets".to_string());
        }

        let active = state
            .config
            .active_bucket
            .as_deref()
            .and_then(|wanted| store.resolve(wanted))
            .map(|c| c.id);
        let output = store
            .remembered()
            .iter()
            .map(|c| describe(c, Some(c.id) == active))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(output)
    }
}
