//! Trace replay error module.

use thiserror::Error;

use crate::name::{Name, NameError};
use crate::pit::PitError;

/// Errors that can occur while parsing or replaying a trace.
#[derive(Error, Debug)]
pub enum TraceError {
    /// The line does not start with a known command.
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand {
        /// 1-based line number
        line: usize,
        /// The offending keyword
        command: String,
    },

    /// A required argument is missing.
    #[error("line {line}: '{command}' is missing its {argument} argument")]
    MissingArgument {
        /// 1-based line number
        line: usize,
        /// The command being parsed
        command: &'static str,
        /// Which argument is missing
        argument: &'static str,
    },

    /// A numeric argument did not parse.
    #[error("line {line}: invalid {argument} '{value}'")]
    InvalidNumber {
        /// 1-based line number
        line: usize,
        /// Which argument was malformed
        argument: &'static str,
        /// The raw text
        value: String,
    },

    /// The line carries more arguments than the command accepts.
    #[error("line {line}: unexpected trailing argument '{value}'")]
    TrailingArgument {
        /// 1-based line number
        line: usize,
        /// The first unexpected token
        value: String,
    },

    /// A name argument is malformed.
    #[error("line {line}: {source}")]
    Name {
        /// 1-based line number
        line: usize,
        /// The parse failure
        #[source]
        source: NameError,
    },

    /// An Interest arrived for a name no route covers.
    #[error("line {line}: no route for {name}; declare a default route with 'route / <face>'")]
    NoRoute {
        /// 1-based line number
        line: usize,
        /// The Interest name
        name: Name,
    },

    /// A table operation failed in a way the replay cannot continue past.
    #[error("line {line}: {source}")]
    Pit {
        /// 1-based line number
        line: usize,
        /// The table failure
        #[source]
        source: PitError,
    },

    /// Reading the trace or writing the report failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for trace operations.
pub type TraceResult<T> = Result<T, TraceError>;
