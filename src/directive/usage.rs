//! Usage definitions declare the arguments a directive accepts.
//!
//! A definition is an ordered list of named arguments, each with a
//! [`TokenKind`] and, optionally, a default. Arguments are bound
//! positionally, so optional arguments must come after every
//! required one. Binding converts the argument text for each
//! position into a typed [`Token`] and fills in defaults for any
//! trailing arguments which were omitted.

use super::token::{Token, TokenError, TokenKind};
use crate::units::{ByteSize, TimeDuration};

use thiserror::Error;

use std::fmt::{self, Display, Formatter};

/// The declared arguments of a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageDefinition {
  name: String,
  arguments: Vec<Argument>,
}

/// A single declared argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
  name: String,
  kind: TokenKind,
  /// Text used in place of an omitted argument. Arguments without a
  /// default are required.
  default: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UsageDefinitionBuilder {
  name: String,
  arguments: Vec<Argument>,
}

/// Arguments which have been bound against a [`UsageDefinition`], in
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments {
  values: Vec<(String, Token)>,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum UsageError {
  #[error("{directive}: expected {min} to {max} argument(s), got {actual}")]
  WrongArity { directive: String, min: usize, max: usize, actual: usize },
  #[error("argument '{name}': {source}")]
  InvalidArgument { name: String, #[source] source: TokenError },
  #[error("no argument named '{0}'")]
  NoSuchArgument(String),
  #[error("argument '{name}' is {actual}, not {expected}")]
  WrongKind { name: String, expected: TokenKind, actual: TokenKind },
}

impl UsageDefinition {
  pub fn builder(name: impl Into<String>) -> UsageDefinitionBuilder {
    UsageDefinitionBuilder {
      name: name.into(),
      arguments: Vec::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn arguments(&self) -> &[Argument] {
    &self.arguments
  }

  /// The number of arguments without a default.
  pub fn required_count(&self) -> usize {
    self.arguments.iter().filter(|arg| arg.is_required()).count()
  }

  /// Binds positional argument text to this definition.
  pub fn bind(&self, args: Vec<String>) -> Result<Arguments, UsageError> {
    let min = self.required_count();
    let max = self.arguments.len();
    if args.len() < min || args.len() > max {
      return Err(UsageError::WrongArity {
        directive: self.name.clone(),
        min,
        max,
        actual: args.len(),
      });
    }

    let mut supplied = args.into_iter();
    let values = self.arguments.iter().map(|arg| -> Result<(String, Token), UsageError> {
      // Arity was checked above, and every argument past the
      // supplied ones is optional.
      let text = supplied.next().or_else(|| arg.default.clone()).unwrap_or_default();
      let token = Token::parse(arg.kind, &text).map_err(|source| {
        UsageError::InvalidArgument { name: arg.name.clone(), source }
      })?;
      Ok((arg.name.clone(), token))
    }).collect::<Result<Vec<_>, _>>()?;
    Ok(Arguments { values })
  }
}

impl UsageDefinitionBuilder {
  /// Declares a required argument.
  ///
  /// Panics if an optional argument has already been declared, since
  /// a required argument can never be bound after an optional one.
  pub fn define(mut self, name: impl Into<String>, kind: TokenKind) -> Self {
    assert!(
      self.arguments.iter().all(Argument::is_required),
      "required argument declared after an optional one",
    );
    self.arguments.push(Argument { name: name.into(), kind, default: None });
    self
  }

  /// Declares an optional argument with the given default text.
  pub fn define_optional(mut self, name: impl Into<String>, kind: TokenKind, default: impl Into<String>) -> Self {
    self.arguments.push(Argument { name: name.into(), kind, default: Some(default.into()) });
    self
  }

  pub fn build(self) -> UsageDefinition {
    UsageDefinition {
      name: self.name,
      arguments: self.arguments,
    }
  }
}

impl Argument {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn kind(&self) -> TokenKind {
    self.kind
  }

  pub fn default(&self) -> Option<&str> {
    self.default.as_deref()
  }

  pub fn is_required(&self) -> bool {
    self.default.is_none()
  }
}

impl Arguments {
  pub fn get(&self, name: &str) -> Option<&Token> {
    self.values.iter().find(|(arg, _)| arg == name).map(|(_, token)| token)
  }

  fn require(&self, name: &str) -> Result<&Token, UsageError> {
    self.get(name).ok_or_else(|| UsageError::NoSuchArgument(name.to_owned()))
  }

  fn wrong_kind(name: &str, expected: TokenKind, actual: &Token) -> UsageError {
    UsageError::WrongKind { name: name.to_owned(), expected, actual: actual.kind() }
  }

  pub fn text(&self, name: &str) -> Result<&str, UsageError> {
    match self.require(name)? {
      Token::Text(text) => Ok(text),
      other => Err(Self::wrong_kind(name, TokenKind::Text, other)),
    }
  }

  pub fn column(&self, name: &str) -> Result<&str, UsageError> {
    match self.require(name)? {
      Token::Column(column) => Ok(column),
      other => Err(Self::wrong_kind(name, TokenKind::Column, other)),
    }
  }

  pub fn numeric(&self, name: &str) -> Result<f64, UsageError> {
    match self.require(name)? {
      Token::Numeric(n) => Ok(*n),
      other => Err(Self::wrong_kind(name, TokenKind::Numeric, other)),
    }
  }

  pub fn boolean(&self, name: &str) -> Result<bool, UsageError> {
    match self.require(name)? {
      Token::Boolean(b) => Ok(*b),
      other => Err(Self::wrong_kind(name, TokenKind::Boolean, other)),
    }
  }

  pub fn byte_size(&self, name: &str) -> Result<&ByteSize, UsageError> {
    match self.require(name)? {
      Token::ByteSize(size) => Ok(size),
      other => Err(Self::wrong_kind(name, TokenKind::ByteSize, other)),
    }
  }

  pub fn time_duration(&self, name: &str) -> Result<&TimeDuration, UsageError> {
    match self.require(name)? {
      Token::TimeDuration(duration) => Ok(duration),
      other => Err(Self::wrong_kind(name, TokenKind::TimeDuration, other)),
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Token)> + '_ {
    self.values.iter().map(|(name, token)| (name.as_str(), token))
  }
}

/// Renders the definition in directive call form, for instance
/// `aggregate-stats :size_column 'size_unit' ['operation' = "total"]`.
impl Display for UsageDefinition {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name)?;
    for arg in &self.arguments {
      let placeholder = match arg.kind {
        TokenKind::Column => format!(":{}", arg.name),
        TokenKind::Text => format!("'{}'", arg.name),
        _ => format!("<{}>", arg.name),
      };
      match &arg.default {
        None => write!(f, " {}", placeholder)?,
        Some(default) => write!(f, " [{} = \"{}\"]", placeholder, default)?,
      }
    }
    Ok(())
  }
}
