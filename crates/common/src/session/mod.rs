//! The active bucket session
//!
//! A [`BucketSession`] holds one PAR and an optional context folder and
//! drives every request against the PAR endpoint:
//!
//! - **listing**: `GET <par>`, filtered and stripped locally to the context
//!   folder, then rebuilt into a [`FileTree`](crate::tree::FileTree)
//! - **fetch**: `GET <par><context>/<name>`
//! - **upload**: `PUT <par><context>/<name>`, recorded into a
//!   [`TransferTracker`](crate::transfer::TransferTracker)
//!
//! # Failures
//!
//! No failure ends the session. A failed listing keeps the previous tree and
//! is published on the status channel; a failed upload lands in the caller's
//! tracker; a failed fetch is returned to the caller. Nothing is retried.
//!
//! # Concurrency
//!
//! Uploads may run concurrently and each success schedules its own refresh.
//! Refreshes are not sequenced: whichever listing completes last decides
//! the visible tree.

mod bucket_session;
mod client;
mod error;
mod status;

pub use bucket_session::{BucketSession, SubmitOptions};
pub use client::{ListResponse, ObjectSummary, ParClient, ParClientError};
pub use error::SessionError;
pub use status::{SessionState, SessionStatus};
