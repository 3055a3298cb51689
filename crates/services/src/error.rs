//! Shared error types for the services crate.

use thiserror::Error;

use sananki_core::model::CardId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    /// Rejected before any storage access.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ReviewService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReviewServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the session manager.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// Rejected before any storage access.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The answered card does not exist in the catalog at all.
    #[error("unknown card: {0}")]
    UnknownCard(CardId),
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
