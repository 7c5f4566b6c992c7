use thiserror::Error;

/// Errors returned by the file operations.
///
/// Every variant is recovered at the tool boundary and reported to the
/// caller as an `error` message; none of them stops the server.
#[derive(Error, Debug)]
pub enum FsError {
    /// A required request field was not supplied.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    /// The path resolves outside the allowed root.
    #[error("access denied")]
    AccessDenied,
    /// The underlying filesystem call failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
