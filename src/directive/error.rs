use crate::units::ParseError;

use thiserror::Error;

/// An error raised while a directive runs over a batch of rows.
#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum ExecutionError {
  #[error("error parsing value in column '{column}' of row {row}: {source}")]
  Literal { row: usize, column: String, #[source] source: ParseError },
  #[error("no valid rows: no row has both '{size_column}' and '{time_column}'")]
  NoValidRows { size_column: String, time_column: String },
  #[error("error converting to the requested unit: {0}")]
  InvalidOutputUnit(#[source] ParseError),
  #[error("invalid operation \"{0}\", must be one of: total, average")]
  InvalidOperation(String),
  #[error("aggregate for column '{column}' is too large to represent")]
  NonFiniteResult { column: String },
}
