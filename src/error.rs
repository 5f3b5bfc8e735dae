//! The facade's own error type: every [`CoreError`] the engine can raise,
//! plus the I/O-shaped failures that only exist once there's an actual
//! filesystem underneath it.

use std::path::PathBuf;
use thiserror::Error;
use veritaschain_core::CoreError;

/// Errors a [`crate::Repository`] can return. Wraps [`CoreError`] so
/// callers can match on the stable taxonomy from section 7 without caring
/// whether a given failure originated in the engine or in the store
/// underneath it.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Raised by `veritaschain-core` itself.
    #[error(transparent)]
    Core(#[from] CoreError),
    /// The repository root could not be created or is not writable.
    #[error("cannot initialize repository at {path}: {source}")]
    InitFailed {
        /// The root directory that failed to initialize.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// A stored object's filename did not decode to a valid content hash.
    #[error("corrupted object filename in {path}")]
    CorruptedFilename {
        /// The offending path.
        path: PathBuf,
    },
}

/// Convenience alias used throughout the facade crate.
pub type RepoResult<T> = Result<T, RepoError>;
