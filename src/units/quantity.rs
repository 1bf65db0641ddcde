//! Quantity literals: a magnitude tagged with a unit, read from text
//! such as `"2MB"`, `"0.5 GB"` or `"100ns"`.
//!
//! The grammar is shared by every unit system. A literal is a
//! numeric prefix (ASCII digits and decimal points), optional
//! whitespace, and a unit suffix drawn from the system's table. The
//! prefix scanner does not count decimal points; a malformed prefix
//! such as `"1.2.3"` is left for the numeric parse to reject.

use super::error::ParseError;
use super::system::UnitSystem;

use std::fmt::{self, Display, Formatter};
use std::marker::PhantomData;
use std::str::FromStr;

/// The operations common to every kind of quantity literal.
pub trait QuantityLiteral: Sized {
  /// Parses a literal from text.
  fn parse(text: &str) -> Result<Self, ParseError>;

  /// The quantity expressed in the base unit of its unit system.
  fn to_base(&self) -> f64;

  /// The quantity expressed in `target_unit`, which is case-folded
  /// like any other unit text.
  fn convert_to(&self, target_unit: &str) -> Result<f64, ParseError>;

  /// The text the literal was parsed from, exactly as it was given.
  fn raw_text(&self) -> &str;
}

/// An immutable quantity in the unit system `U`.
///
/// A quantity remembers the text it was parsed from, and its
/// [`Display`] impl reproduces that text verbatim rather than
/// rendering the parsed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity<U> {
  magnitude: f64,
  unit: &'static str,
  /// The amount of the base unit that is equal to one of `unit`.
  scale: f64,
  raw_text: String,
  _system: PhantomData<fn() -> U>,
}

impl<U: UnitSystem> Quantity<U> {
  pub fn parse(text: &str) -> Result<Self, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
      return Err(ParseError::Empty { kind: U::KIND });
    }

    let split = trimmed
      .find(|c: char| !(c.is_ascii_digit() || c == '.'))
      .unwrap_or(trimmed.len());
    if split == 0 {
      return Err(ParseError::MissingNumber { kind: U::KIND, input: trimmed.to_owned() });
    }
    if split == trimmed.len() {
      return Err(ParseError::MissingUnit {
        kind: U::KIND,
        input: trimmed.to_owned(),
        accepted: U::accepted(),
      });
    }

    let (number, unit) = trimmed.split_at(split);
    let magnitude = f64::from_str(number)
      .map_err(|_| ParseError::InvalidNumber { kind: U::KIND, input: number.to_owned() })?;
    if !magnitude.is_finite() {
      return Err(ParseError::NotFinite { kind: U::KIND, input: number.to_owned() });
    }
    let (unit, scale) = U::lookup(unit.trim())?;

    tracing::debug!(literal = text, magnitude, unit, "parsed {}", U::KIND);
    Ok(Self {
      magnitude,
      unit,
      scale,
      raw_text: text.to_owned(),
      _system: PhantomData,
    })
  }

  /// The numeric part of the literal, in its own unit.
  pub fn magnitude(&self) -> f64 {
    self.magnitude
  }

  /// The canonical symbol of the literal's unit.
  pub fn unit(&self) -> &'static str {
    self.unit
  }

  pub fn kind(&self) -> &'static str {
    U::KIND
  }

  pub fn raw_text(&self) -> &str {
    &self.raw_text
  }

  pub fn to_base(&self) -> f64 {
    self.magnitude * self.scale
  }

  pub fn convert_to(&self, target_unit: &str) -> Result<f64, ParseError> {
    U::from_base(self.to_base(), target_unit)
  }
}

impl<U: UnitSystem> QuantityLiteral for Quantity<U> {
  fn parse(text: &str) -> Result<Self, ParseError> {
    Quantity::<U>::parse(text)
  }

  fn to_base(&self) -> f64 {
    Quantity::to_base(self)
  }

  fn convert_to(&self, target_unit: &str) -> Result<f64, ParseError> {
    Quantity::convert_to(self, target_unit)
  }

  fn raw_text(&self) -> &str {
    Quantity::raw_text(self)
  }
}

impl<U: UnitSystem> FromStr for Quantity<U> {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, ParseError> {
    Quantity::<U>::parse(s)
  }
}

impl<U> Display for Quantity<U> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.raw_text)
  }
}
