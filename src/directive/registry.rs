//! Dispatch table to produce the correct directive for a given name.

use super::Directive;
use super::aggregate::AggregateStats;
use super::usage::{Arguments, UsageDefinition};
use crate::error::Error;

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};

pub type BoxedDirective = Box<dyn Directive + Send + Sync>;

/// Builds a directive from its bound arguments.
pub type DirectiveConstructor = fn(&Arguments) -> Result<BoxedDirective, Error>;

#[derive(Clone)]
pub struct DirectiveEntry {
  usage: UsageDefinition,
  construct: DirectiveConstructor,
}

#[derive(Debug, Clone, Default)]
pub struct DirectiveRegistry {
  map: BTreeMap<String, DirectiveEntry>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("No such directive {directive}")]
pub struct NoSuchDirectiveError {
  directive: String,
}

impl DirectiveEntry {
  pub fn usage(&self) -> &UsageDefinition {
    &self.usage
  }
}

impl DirectiveRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a directive under the name of its usage definition,
  /// replacing any directive previously registered under that name.
  pub fn register(&mut self, usage: UsageDefinition, construct: DirectiveConstructor) {
    self.map.insert(usage.name().to_owned(), DirectiveEntry { usage, construct });
  }

  pub fn get(&self, name: &str) -> Result<&DirectiveEntry, NoSuchDirectiveError> {
    self.map.get(name).ok_or_else(|| NoSuchDirectiveError { directive: name.to_owned() })
  }

  /// Binds `args` against the named directive's usage and constructs
  /// the directive.
  pub fn instantiate(&self, name: &str, args: Vec<String>) -> Result<BoxedDirective, Error> {
    let entry = self.get(name)?;
    let bound = entry.usage.bind(args)?;
    (entry.construct)(&bound)
  }

  pub fn usages(&self) -> impl Iterator<Item = &UsageDefinition> + '_ {
    self.map.values().map(DirectiveEntry::usage)
  }
}

impl Debug for DirectiveEntry {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("DirectiveEntry")
      .field("usage", &self.usage)
      .finish_non_exhaustive()
  }
}

pub fn default_registry() -> DirectiveRegistry {
  let mut registry = DirectiveRegistry::new();
  registry.register(AggregateStats::usage(), aggregate_stats);
  registry
}

fn aggregate_stats(args: &Arguments) -> Result<BoxedDirective, Error> {
  Ok(Box::new(AggregateStats::from_arguments(args)?))
}
