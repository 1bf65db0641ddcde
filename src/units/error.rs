//! Errors raised while reading quantity literals.

use thiserror::Error;

/// An error produced while parsing a quantity literal, or while
/// converting a quantity into a unit that its unit system does not
/// recognize.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
  #[error("empty literal: {kind} text cannot be empty")]
  Empty { kind: &'static str },
  #[error("missing number: {kind} must start with a number, got \"{input}\"")]
  MissingNumber { kind: &'static str, input: String },
  #[error("missing unit: {kind} must include a unit ({accepted}), got \"{input}\"")]
  MissingUnit { kind: &'static str, input: String, accepted: String },
  #[error("invalid number: \"{input}\" is not a valid {kind} magnitude")]
  InvalidNumber { kind: &'static str, input: String },
  #[error("invalid number: \"{input}\" is too large to represent")]
  NotFinite { kind: &'static str, input: String },
  #[error("invalid unit: \"{unit}\" is not a {kind} unit, must be one of: {accepted}")]
  InvalidUnit { kind: &'static str, unit: String, accepted: String },
}

impl ParseError {
  /// The kind of literal ("byte size", "time duration") that failed
  /// to parse.
  pub fn kind(&self) -> &'static str {
    match self {
      ParseError::Empty { kind } => *kind,
      ParseError::MissingNumber { kind, .. } => *kind,
      ParseError::MissingUnit { kind, .. } => *kind,
      ParseError::InvalidNumber { kind, .. } => *kind,
      ParseError::NotFinite { kind, .. } => *kind,
      ParseError::InvalidUnit { kind, .. } => *kind,
    }
  }
}
