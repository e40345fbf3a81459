//! Error type shared by all operations in the crate.

/// Error in selecting, applying or assembling a sum-factorized operator.
///
/// All of these indicate a logic error in the calling code
/// rather than a transient fault,
/// so no partial result is ever produced alongside one.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SumFactError {
    /// The combination of element class, configuration code
    /// and diagonal flags is not implemented.
    #[error("Unsupported: {0}")]
    Unsupported(String),
    /// Node counts or column counts don't match the sizes of the given buffers.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    /// The call doesn't satisfy a structural requirement of the operation,
    /// e.g. assembling a 1D operator or a missing operator family entry.
    #[error("Precondition violated: {0}")]
    PreconditionViolated(String),
}

/// The category of a [`SumFactError`] without its message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`SumFactError::Unsupported`].
    Unsupported,
    /// See [`SumFactError::InvalidDimension`].
    InvalidDimension,
    /// See [`SumFactError::PreconditionViolated`].
    PreconditionViolated,
}

impl SumFactError {
    /// Get the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::InvalidDimension(_) => ErrorKind::InvalidDimension,
            Self::PreconditionViolated(_) => ErrorKind::PreconditionViolated,
        }
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, SumFactError>;
