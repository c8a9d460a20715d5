use thiserror::Error;

use sendarr_services::HttpError;

/// Failure taxonomy for an add/resolve operation. These never cross the
/// dispatch boundary as errors; they are flattened into the outcome shape.
#[derive(Debug, Error)]
pub enum AddError {
    /// A required setting is missing; detected before any network call.
    #[error("{0}")]
    Config(String),

    /// The downstream lookup yielded nothing usable.
    #[error("{0}")]
    NoMatch(String),

    #[error(transparent)]
    Http(#[from] HttpError),
}
