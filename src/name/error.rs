//! Error types for name parsing.

/// Errors that can occur while parsing a name from its URI form.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NameError {
    /// The URI did not start with `/`.
    #[error("Name '{0}' must start with '/'")]
    NotAbsolute(String),

    /// A `%` escape was truncated or contained non-hex digits.
    #[error("Invalid percent escape in component '{0}'")]
    InvalidEscape(String),
}

/// Result type for name operations.
pub type NameResult<T> = Result<T, NameError>;
