//! Session errors.

use thiserror::Error;

use crate::cards::SampleError;
use crate::catalog::CatalogError;
use crate::rules::TurnError;

/// Errors surfaced by `SessionController`.
///
/// Rejected card selections are not errors; see `RejectReason`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("catalog size is not known yet; load the catalog before starting")]
    CatalogNotReady,

    #[error("difficulty cannot change while a session is running")]
    SessionRunning,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Turn(#[from] TurnError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
