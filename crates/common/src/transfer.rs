//! Upload accounting for a batch of transfers.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

/// A single failed upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadErrorRecord {
    /// Object key the upload targeted
    pub object_name: String,
    /// HTTP status, if the request got far enough to receive one
    pub status: Option<u16>,
    /// Status text or transport error message
    pub detail: String,
}

/// Counts, sizes and errors accumulated over one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOutcome {
    pub upload_count: u64,
    pub upload_size: u64,
    pub upload_error_count: u64,
    pub upload_errors: Vec<UploadErrorRecord>,
}

/// Shared handle onto a [`TransferOutcome`].
///
/// The caller builds one per batch and passes clones into every upload.
///  Each completion applies its whole update under one lock, so concurrent
///  uploads never lose increments. Nothing ever resets it mid-batch.
#[derive(Debug, Clone, Default)]
pub struct TransferTracker(Arc<Mutex<TransferOutcome>>);

impl TransferTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, size: u64) {
        let mut outcome = self.0.lock();
        outcome.upload_count += 1;
        outcome.upload_size += size;
    }

    pub fn record_failure(&self, error: UploadErrorRecord) {
        let mut outcome = self.0.lock();
        outcome.upload_error_count += 1;
        outcome.upload_errors.push(error);
    }

    /// Copy of the accumulated outcome so far
    pub fn snapshot(&self) -> TransferOutcome {
        self.0.lock().clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_accumulates() {
        let tracker = TransferTracker::new();
        tracker.record_success(10);
        tracker.record_success(5);
        tracker.record_failure(UploadErrorRecord {
            object_name: "a.txt".to_string(),
            status: Some(404),
            detail: "Not Found".to_string(),
        });

        let outcome = tracker.snapshot();
        assert_eq!(outcome.upload_count, 2);
        assert_eq!(outcome.upload_size, 15);
        assert_eq!(outcome.upload_error_count, 1);
        assert_eq!(outcome.upload_errors[0].status, Some(404));
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let tracker = TransferTracker::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        tracker.record_success(3);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let outcome = tracker.snapshot();
        assert_eq!(outcome.upload_count, 8000);
        assert_eq!(outcome.upload_size, 24000);
        assert_eq!(outcome.upload_error_count, 0);
    }
}
