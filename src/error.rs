use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Faults raised by the high-score store.  None of them is fatal: callers
/// either fall back (empty board, partial load) or show a warning.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("high score file {} is unavailable: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not save high scores to {}: {source}", path.display())]
    StorageWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed high score record on line {line}: {text:?}")]
    MalformedRecord { line: usize, text: String },
}

impl LeaderboardError {
    /// A missing file is the normal first-run case, not something to warn about.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LeaderboardError::StorageUnavailable { source, .. }
                if source.kind() == io::ErrorKind::NotFound
        )
    }
}
