use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// Configuration and state problems are rejected before a simulation exists;
/// each variant carries enough context to be actionable.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Supplied positions lie outside the simulation domain.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
}
