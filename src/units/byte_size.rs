//! Byte sizes, on a power-of-1024 ladder from bytes to petabytes.
//! Units are case-insensitive and normalize to upper case.

use super::quantity::Quantity;
use super::system::UnitSystem;

use phf::phf_ordered_map;

/// The byte size unit system. The base unit is the byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteUnits;

/// A parsed byte size literal, such as `"0.5GB"`.
pub type ByteSize = Quantity<ByteUnits>;

static BYTE_UNITS: phf::OrderedMap<&'static str, f64> = phf_ordered_map! {
  "B" => 1.0,
  "KB" => 1024.0,
  "MB" => 1024.0 * 1024.0,
  "GB" => 1024.0 * 1024.0 * 1024.0,
  "TB" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
  "PB" => 1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0,
};

impl UnitSystem for ByteUnits {
  const KIND: &'static str = "byte size";
  const BASE_UNIT: &'static str = "B";

  fn table() -> &'static phf::OrderedMap<&'static str, f64> {
    &BYTE_UNITS
  }

  fn fold_unit(unit: &str) -> String {
    unit.to_uppercase()
  }
}
