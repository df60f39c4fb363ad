use clap::Args;
use common::credentials::BucketCredential;
use common::session::{BucketSession, ParClient, ParClientError, SessionStatus};

use crate::op::OpContext;
use crate::state::StateError;

/// Which remembered bucket a command runs against
#[derive(Args, Debug, Clone, Default)]
pub struct BucketSelector {
    /// Remembered bucket id or name (defaults to the active bucket)
    #[arg(long, short = 'b')]
    pub bucket: Option<String>,

    /// Override the bucket's context folder ("/" for the whole bucket)
    #[arg(long)]
    pub context_folder: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenSessionError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("no bucket given and no active bucket set. Use --bucket or 'par bucket use'")]
    NoBucket,
    #[error("no remembered bucket matches '{0}'")]
    UnknownBucket(String),
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] ParClientError),
    #[error("listing failed: {0}")]
    Listing(String),
    #[error("session closed before the listing finished")]
    Closed,
}

/// Resolve the selected credential from the par directory
pub fn resolve_credential(
    ctx: &OpContext,
    selector: &BucketSelector,
) -> Result<BucketCredential, OpenSessionError> {
    let state = ctx.state()?;
    let store = ctx.credentials()?;

    let wanted = selector
        .bucket
        .clone()
        .or(state.config.active_bucket)
        .ok_or(OpenSessionError::NoBucket)?;
    let mut credential = store
        .resolve(&wanted)
        .cloned()
        .ok_or(OpenSessionError::UnknownBucket(wanted))?;

    if let Some(context_folder) = &selector.context_folder {
        credential.context_folder = Some(context_folder.clone());
    }
    Ok(credential)
}

/// Activate the credential in a fresh session without waiting for the listing
pub fn open(credential: &BucketCredential) -> Result<BucketSession, OpenSessionError> {
    let session = BucketSession::new(ParClient::new()?);
    session.activate(credential);
    Ok(session)
}

/// Activate the credential and wait for its first listing to settle
pub async fn open_listed(
    credential: &BucketCredential,
) -> Result<(BucketSession, SessionStatus), OpenSessionError> {
    let session = BucketSession::new(ParClient::new()?);
    let mut status = session.subscribe();
    session.activate(credential);

    let settled = status
        .wait_for(|s| !s.is_listing() && (s.generation > 0 || s.last_error.is_some()))
        .await
        .map_err(|_| OpenSessionError::Closed)?
        .clone();

    if settled.generation == 0 {
        let message = settled
            .last_error
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(OpenSessionError::Listing(message));
    }
    Ok((session, settled))
}
