//! The environment a directive runs in.

use serde::{Deserialize, Serialize};

use std::fmt::{self, Display, Formatter};

/// Where a pipeline is being executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
  Service,
  #[default]
  Transform,
  Preview,
}

/// Execution context handed to every directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutorContext {
  environment: Environment,
}

impl ExecutorContext {
  pub fn new(environment: Environment) -> Self {
    Self { environment }
  }

  pub fn environment(&self) -> Environment {
    self.environment
  }
}

impl Display for Environment {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let name = match self {
      Environment::Service => "service",
      Environment::Transform => "transform",
      Environment::Preview => "preview",
    };
    write!(f, "{}", name)
  }
}
