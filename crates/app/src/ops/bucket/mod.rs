use clap::{Args, Subcommand};

pub mod list;
pub mod remove;
pub mod save;
pub mod use_bucket;

use crate::op::Op;

crate::command_enum! {
    (Save, save::Save),
    (List, list::List),
    (Remove, remove::Remove),
    (Use, use_bucket::Use),
}

// Rename the generated Command to BucketCommand for clarity
pub type BucketCommand = Command;

/// Manage remembered buckets
#[derive(Args, Debug, Clone)]
pub struct Bucket {
    #[command(subcommand)]
    pub command: BucketCommand,
}

#[async_trait::async_trait]
impl Op for Bucket {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
