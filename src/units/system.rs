//! Unit systems: the fixed tables of units which a quantity literal
//! may be written in.

use super::error::ParseError;

use itertools::Itertools;

/// A unit system is a finite family of units, each of which is a
/// fixed multiple of a single base unit. Every conversion passes
/// through the base unit.
///
/// Implementors are zero-sized markers. The table itself is static,
/// so a unit system can be consulted without an instance.
pub trait UnitSystem {
  /// Human-readable name of the quantity, as it appears in error
  /// messages.
  const KIND: &'static str;

  /// The canonical symbol of the base unit. Its entry in
  /// [`UnitSystem::table`] is always exactly one.
  const BASE_UNIT: &'static str;

  /// The amount of the base unit that is equal to one of each unit,
  /// keyed by canonical symbol and listed smallest first.
  fn table() -> &'static phf::OrderedMap<&'static str, f64>;

  /// Case-folds unit text as written by a user and resolves any
  /// alternate spellings. The result is only a candidate key into
  /// [`UnitSystem::table`].
  fn fold_unit(unit: &str) -> String;

  /// The accepted units, for display in error messages.
  fn accepted() -> String {
    Self::table().keys().join(", ")
  }

  /// Resolves unit text to its canonical symbol and scale factor.
  fn lookup(unit: &str) -> Result<(&'static str, f64), ParseError> {
    let folded = Self::fold_unit(unit);
    Self::table().get_entry(folded.as_str())
      .map(|(symbol, scale)| (*symbol, *scale))
      .ok_or_else(|| ParseError::InvalidUnit {
        kind: Self::KIND,
        unit: unit.to_owned(),
        accepted: Self::accepted(),
      })
  }

  /// Converts an amount in the given unit to the base unit.
  fn to_base(amount: f64, unit: &str) -> Result<f64, ParseError> {
    let (_, scale) = Self::lookup(unit)?;
    Ok(amount * scale)
  }

  /// Converts an amount in the base unit to the given unit.
  fn from_base(amount: f64, unit: &str) -> Result<f64, ParseError> {
    let (_, scale) = Self::lookup(unit)?;
    Ok(amount / scale)
  }
}
