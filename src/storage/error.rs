use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use super::types::UserId;

/// Failures returned by a [`UserStore`](super::store::UserStore).
///
/// The two variants must stay distinguishable all the way to the caller: a
/// missing record is a client problem, an unusable backing file is ours.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user {id} not found")]
    NotFound { id: UserId },

    #[error("storage unavailable at {}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        cause: StorageCause,
    },
}

#[derive(Debug, Error)]
pub enum StorageCause {
    #[error("failed to {action}")]
    Io {
        action: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("record file is malformed")]
    Malformed(#[from] serde_json::Error),

    #[error("record file still locked after {waited:?}")]
    Busy { waited: Duration },

    #[error("id counter is exhausted")]
    CounterExhausted,

    #[error("store operation did not complete")]
    Interrupted(#[from] tokio::task::JoinError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
