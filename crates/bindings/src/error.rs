//! Error types for the bindings crate.

use thiserror::Error;

use crate::OperationKind;

/// Errors raised by the generic binding contract.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unable to read spec metadata")]
    EmptySpecMetadata,

    #[error("error in resolving spec metadata: {0}")]
    InvalidSpecMetadata(#[source] serde_yaml::Error),

    #[error("failed to encode spec metadata: {0}")]
    EncodeSpecMetadata(#[source] serde_json::Error),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(OperationKind),
}

/// Result type alias for binding contract operations.
pub type Result<T> = std::result::Result<T, Error>;
