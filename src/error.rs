use crate::directive::{ExecutionError, NoSuchDirectiveError, UsageError};

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
  #[error("{0}")]
  UsageError(#[from] UsageError),
  #[error("{0}")]
  ExecutionError(#[from] ExecutionError),
  #[error("{0}")]
  NoSuchDirective(#[from] NoSuchDirectiveError),
}
