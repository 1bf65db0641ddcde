//! Time durations, from nanoseconds to days. Units are
//! case-insensitive and normalize to lower case.

use super::quantity::Quantity;
use super::system::UnitSystem;

use phf::phf_ordered_map;

/// The time duration unit system. The base unit is the nanosecond.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationUnits;

/// A parsed time duration literal, such as `"1.5h"`.
pub type TimeDuration = Quantity<DurationUnits>;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

static DURATION_UNITS: phf::OrderedMap<&'static str, f64> = phf_ordered_map! {
  "ns" => 1.0,
  "us" => 1_000.0,
  "ms" => 1_000_000.0,
  "s" => NANOS_PER_SECOND,
  "m" => 60.0 * NANOS_PER_SECOND,
  "h" => 3_600.0 * NANOS_PER_SECOND,
  "d" => 86_400.0 * NANOS_PER_SECOND,
};

impl UnitSystem for DurationUnits {
  const KIND: &'static str = "time duration";
  const BASE_UNIT: &'static str = "ns";

  fn table() -> &'static phf::OrderedMap<&'static str, f64> {
    &DURATION_UNITS
  }

  fn fold_unit(unit: &str) -> String {
    let unit = unit.to_lowercase();
    // Micro sign (U+00B5) and Greek small mu (U+03BC) both spell
    // microseconds.
    match unit.as_str() {
      "\u{b5}s" | "\u{3bc}s" => "us".to_owned(),
      _ => unit,
    }
  }

  fn accepted() -> String {
    "ns, us (\u{b5}s), ms, s, m, h, d".to_owned()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::units::error::ParseError;

  use approx::assert_relative_eq;

  #[test]
  fn test_to_base() {
    assert_eq!(TimeDuration::parse("1000ns").unwrap().to_base(), 1000.0);
    assert_eq!(TimeDuration::parse("1ms").unwrap().to_base(), 1_000_000.0);
    assert_eq!(TimeDuration::parse("1s").unwrap().to_base(), 1e9);
    assert_eq!(TimeDuration::parse("1m").unwrap().to_base(), 6e10);
    assert_eq!(TimeDuration::parse("1h").unwrap().to_base(), 3.6e12);
    assert_eq!(TimeDuration::parse("1d").unwrap().to_base(), 86_400_000_000_000.0);
    assert_eq!(TimeDuration::parse("1.5h").unwrap().to_base(), 5.4e12);
  }

  #[test]
  fn test_to_base_for_every_unit() {
    for (unit, scale) in DURATION_UNITS.entries() {
      for n in [0.0, 1.0, 2.5, 100.0] {
        let duration = TimeDuration::parse(&format!("{n}{unit}")).unwrap();
        assert_eq!(duration.to_base(), n * scale);
      }
    }
  }

  #[test]
  fn test_microsecond_spellings() {
    let expected = TimeDuration::parse("1us").unwrap().to_base();
    for text in ["1US", "1Us", "1\u{b5}s", "1\u{b5}S", "1\u{3bc}s"] {
      let duration = TimeDuration::parse(text).unwrap();
      assert_eq!(duration.unit(), "us");
      assert_eq!(duration.to_base(), expected);
    }
    assert_eq!(expected, 1000.0);
  }

  #[test]
  fn test_case_insensitive_units() {
    let duration = TimeDuration::parse("3 H").unwrap();
    assert_eq!(duration.unit(), "h");
    assert_eq!(duration.to_base(), TimeDuration::parse("3h").unwrap().to_base());
  }

  #[test]
  fn test_convert_to() {
    let duration = TimeDuration::parse("90s").unwrap();
    assert_relative_eq!(duration.convert_to("m").unwrap(), 1.5);
    assert_relative_eq!(duration.convert_to("MS").unwrap(), 90_000.0);
    assert_relative_eq!(duration.convert_to("\u{b5}s").unwrap(), 90_000_000.0);
    assert_relative_eq!(TimeDuration::parse("36h").unwrap().convert_to("d").unwrap(), 1.5);
  }

  #[test]
  fn test_round_trip_through_own_unit() {
    for text in ["100ns", "3.3us", "0.7ms", "59.9s", "61m", "0.1h", "365d"] {
      let duration = TimeDuration::parse(text).unwrap();
      assert_relative_eq!(duration.convert_to(duration.unit()).unwrap(), duration.magnitude(), max_relative = 1e-9);
    }
  }

  #[test]
  fn test_rejects_unknown_units() {
    for text in ["10sec", "10min", "10w", "10 hrs", "10KB"] {
      assert!(matches!(TimeDuration::parse(text), Err(ParseError::InvalidUnit { .. })), "{text}");
    }
  }

  #[test]
  fn test_invalid_unit_lists_accepted_units() {
    let err = TimeDuration::parse("5 fortnights").unwrap_err();
    assert!(err.to_string().ends_with("must be one of: ns, us (\u{b5}s), ms, s, m, h, d"));
  }
}
