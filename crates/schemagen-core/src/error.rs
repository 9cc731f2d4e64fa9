use thiserror::Error;

/// Core error type shared across schemagen crates.
///
/// Only unexpected conditions surface here. Expected degradations (rejected
/// objects, discarded defaults, unresolvable foreign keys) are recorded on the
/// model instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema source failed to supply rows.
    #[error("schema source error: {0}")]
    Source(String),
    /// Rows or configuration are structurally invalid.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A SQL type name reached a strict mapping step without a known mapping.
    #[error("unsupported sql type: {0}")]
    UnsupportedType(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by schemagen crates.
pub type Result<T> = std::result::Result<T, Error>;
