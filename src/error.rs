//! Error types for grammar declaration and argument binding.
//!
//! Declaration errors surface when a specification is constructed, before
//! any binding happens; bind errors surface while walking a token stream.
//! Both are plain value enums so tests and callers can match on them.

use thiserror::Error;

/// Errors raised while declaring an argument specification.
///
/// Apart from [`NoNames`](DeclarationError::NoNames), each variant carries
/// `names`, the comma-joined candidate list of the declaration it rejects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// No name candidates were supplied
    #[error("Argument declared without any name")]
    NoNames,

    /// A candidate name was the empty string
    #[error("Argument [{names}]: empty name candidate")]
    EmptyName { names: String },

    /// More than one single-character candidate
    #[error("Argument [{names}]: more than one short name candidate")]
    TooManyShortNames { names: String },

    /// More than two multi-character candidates
    #[error("Argument [{names}]: more than two long name candidates")]
    TooManyLongNames { names: String },

    /// Two multi-character candidates of the same length, so neither can
    /// be the abbreviation of the other
    #[error("Argument [{names}]: long name candidates of equal length")]
    AmbiguousLength { names: String },

    /// The same candidate appeared twice
    #[error("Argument [{names}]: duplicate name candidate '{name}'")]
    DuplicateName { names: String, name: String },

    /// A single-character candidate outside `a-z` / `A-Z`
    #[error("Argument [{names}]: invalid short name '{short}'")]
    InvalidShortName { names: String, short: char },
}

/// Errors raised during a bind call.
///
/// Any of these aborts the whole call; there is no partial result. The only
/// recoverable condition is an unmatched token under tolerant binding,
/// which becomes a tail entry instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A `--name` or `-c` token matched no declared specification
    #[error("Unknown option '{option}'")]
    UnknownOption { option: String },

    /// A bare token arrived with no operand slot left to take it
    #[error("Unexpected argument '{argument}'")]
    UnknownArgument { argument: String },

    /// A value was rejected by the specification's parser, or a required
    /// value was missing at the end of input (`value: None`)
    #[error("{option}: invalid value {}", display_value(.value))]
    InvalidValue {
        option: String,
        value: Option<String>,
    },

    /// A short-cluster character resolved to no specification
    #[error("Invalid option '-{unbundled}' in '{token}'")]
    InvalidOption { token: String, unbundled: char },
}

fn display_value(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("'{v}'"),
        None => "(missing)".to_string(),
    }
}
