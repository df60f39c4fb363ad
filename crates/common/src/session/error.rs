use super::client::ParClientError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no PAR is active")]
    NoPar,
    #[error("listing failed: {0}")]
    Listing(#[source] ParClientError),
    #[error("fetch of '{name}' failed: {source}")]
    Fetch {
        name: String,
        #[source]
        source: ParClientError,
    },
    #[error("upload of '{name}' failed: {source}")]
    Upload {
        name: String,
        #[source]
        source: ParClientError,
    },
}
