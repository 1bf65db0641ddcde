//! Typed directive arguments. A directive declares the kind of each
//! of its arguments, and the text supplied for an argument is
//! converted into a [`Token`] of that kind before the directive runs.

use crate::units::{ByteSize, ParseError, TimeDuration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// The kinds of value a directive argument may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
  Text,
  Numeric,
  Boolean,
  Column,
  DirectiveName,
  ByteSize,
  TimeDuration,
  Properties,
}

/// A directive argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
  Text(String),
  Numeric(f64),
  Boolean(bool),
  Column(String),
  DirectiveName(String),
  ByteSize(ByteSize),
  TimeDuration(TimeDuration),
  /// `key=value` pairs, written comma-separated.
  Properties(BTreeMap<String, String>),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TokenError {
  #[error("{0}")]
  Literal(#[from] ParseError),
  #[error("expected {expected}, got \"{actual}\"")]
  Malformed { expected: TokenKind, actual: String },
}

impl TokenKind {
  pub const ALL: [TokenKind; 8] = [
    TokenKind::Text,
    TokenKind::Numeric,
    TokenKind::Boolean,
    TokenKind::Column,
    TokenKind::DirectiveName,
    TokenKind::ByteSize,
    TokenKind::TimeDuration,
    TokenKind::Properties,
  ];

  pub fn name(self) -> &'static str {
    match self {
      TokenKind::Text => "TEXT",
      TokenKind::Numeric => "NUMERIC",
      TokenKind::Boolean => "BOOLEAN",
      TokenKind::Column => "COLUMN",
      TokenKind::DirectiveName => "DIRECTIVE_NAME",
      TokenKind::ByteSize => "BYTE_SIZE",
      TokenKind::TimeDuration => "TIME_DURATION",
      TokenKind::Properties => "PROPERTIES",
    }
  }
}

impl Token {
  /// Converts argument text into a token of the given kind.
  ///
  /// Columns may be written with or without a leading `:`.
  pub fn parse(kind: TokenKind, text: &str) -> Result<Token, TokenError> {
    let malformed = || TokenError::Malformed { expected: kind, actual: text.to_owned() };
    match kind {
      TokenKind::Text => Ok(Token::Text(text.to_owned())),
      TokenKind::Numeric => {
        let value: f64 = text.trim().parse().map_err(|_| malformed())?;
        if value.is_finite() {
          Ok(Token::Numeric(value))
        } else {
          Err(malformed())
        }
      }
      TokenKind::Boolean => {
        match text.trim().to_lowercase().as_str() {
          "true" => Ok(Token::Boolean(true)),
          "false" => Ok(Token::Boolean(false)),
          _ => Err(malformed()),
        }
      }
      TokenKind::Column => {
        let name = text.strip_prefix(':').unwrap_or(text);
        if name.is_empty() {
          Err(malformed())
        } else {
          Ok(Token::Column(name.to_owned()))
        }
      }
      TokenKind::DirectiveName => {
        if text.is_empty() || text.contains(char::is_whitespace) {
          Err(malformed())
        } else {
          Ok(Token::DirectiveName(text.to_owned()))
        }
      }
      TokenKind::ByteSize => Ok(Token::ByteSize(ByteSize::parse(text)?)),
      TokenKind::TimeDuration => Ok(Token::TimeDuration(TimeDuration::parse(text)?)),
      TokenKind::Properties => parse_properties(text).map(Token::Properties).ok_or_else(malformed),
    }
  }

  pub fn kind(&self) -> TokenKind {
    match self {
      Token::Text(_) => TokenKind::Text,
      Token::Numeric(_) => TokenKind::Numeric,
      Token::Boolean(_) => TokenKind::Boolean,
      Token::Column(_) => TokenKind::Column,
      Token::DirectiveName(_) => TokenKind::DirectiveName,
      Token::ByteSize(_) => TokenKind::ByteSize,
      Token::TimeDuration(_) => TokenKind::TimeDuration,
      Token::Properties(_) => TokenKind::Properties,
    }
  }
}

fn parse_properties(text: &str) -> Option<BTreeMap<String, String>> {
  text.split(',')
    .map(str::trim)
    .filter(|pair| !pair.is_empty())
    .map(|pair| {
      let (key, value) = pair.split_once('=')?;
      let key = key.trim();
      if key.is_empty() {
        None
      } else {
        Some((key.to_owned(), value.trim().to_owned()))
      }
    })
    .collect()
}

impl Display for TokenKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}
