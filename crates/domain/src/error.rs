//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`LuxHubError`]
//! via `#[from]`.

/// Top-level domain error.
#[derive(Debug, thiserror::Error)]
pub enum LuxHubError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// A domain invariant was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("entity id `{0}` must look like `<domain>.<object_id>`")]
    InvalidEntityId(String),

    #[error("light automation is missing the light entity")]
    MissingLight,

    #[error("light `{0}` has neither a presence nor an illuminance sensor")]
    NoSensors(String),

    #[error("unknown {kind} `{value}`")]
    UnknownMode { kind: &'static str, value: String },
}
