//! Directives are named, argument-driven steps which transform a
//! batch of rows in place.

pub mod aggregate;
pub mod context;
pub mod error;
pub mod registry;
pub mod token;
pub mod usage;

pub use aggregate::{AggregateStats, AggregationSpec, Operation};
pub use context::{Environment, ExecutorContext};
pub use error::ExecutionError;
pub use registry::{default_registry, DirectiveRegistry, NoSuchDirectiveError};
pub use token::{Token, TokenKind};
pub use usage::{Arguments, UsageDefinition, UsageError};

use crate::row::Row;

pub trait Directive {
  /// Runs the directive over `rows`, mutating them in place. On
  /// success, returns the same rows for chaining. On failure, the
  /// rows are left as they were.
  fn execute<'r>(&self, rows: &'r mut [Row], context: &ExecutorContext) -> Result<&'r mut [Row], ExecutionError>;
}
