//! The `aggregate-stats` directive, which totals or averages a byte
//! size column and a time duration column across a batch of rows and
//! writes the result into every row.

use super::{Directive, ExecutorContext};
use super::error::ExecutionError;
use super::token::TokenKind;
use super::usage::{Arguments, UsageDefinition};
use crate::error::Error;
use crate::row::Row;
use crate::units::{ByteSize, ByteUnits, DurationUnits, QuantityLiteral, TimeDuration, UnitSystem};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// How the per-row values are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Operation {
  #[default]
  Total,
  Average,
}

/// Configuration for an aggregation: which columns to read and
/// write, which units to report in, and how to combine rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSpec {
  size_column: String,
  time_column: String,
  size_output: String,
  time_output: String,
  #[serde(default = "default_size_unit")]
  size_unit: String,
  #[serde(default = "default_time_unit")]
  time_unit: String,
  #[serde(default)]
  operation: Operation,
}

/// The `aggregate-stats` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateStats {
  spec: AggregationSpec,
}

/// Running sums over the contributing rows, in base units.
#[derive(Debug, Clone, Default)]
struct Accumulator {
  bytes: f64,
  nanos: f64,
  count: usize,
}

fn default_size_unit() -> String {
  ByteUnits::BASE_UNIT.to_owned()
}

fn default_time_unit() -> String {
  DurationUnits::BASE_UNIT.to_owned()
}

impl Operation {
  pub fn name(self) -> &'static str {
    match self {
      Operation::Total => "total",
      Operation::Average => "average",
    }
  }

  fn apply(self, sum: f64, count: usize) -> f64 {
    match self {
      Operation::Total => sum,
      Operation::Average => sum / count as f64,
    }
  }
}

impl AggregationSpec {
  /// A spec over the given columns, reporting in bytes and
  /// nanoseconds and totalling.
  pub fn new(
    size_column: impl Into<String>,
    time_column: impl Into<String>,
    size_output: impl Into<String>,
    time_output: impl Into<String>,
  ) -> Self {
    Self {
      size_column: size_column.into(),
      time_column: time_column.into(),
      size_output: size_output.into(),
      time_output: time_output.into(),
      size_unit: default_size_unit(),
      time_unit: default_time_unit(),
      operation: Operation::default(),
    }
  }

  /// The unit is not checked until the aggregate is converted into
  /// it.
  pub fn with_size_unit(mut self, unit: impl Into<String>) -> Self {
    self.size_unit = unit.into();
    self
  }

  pub fn with_time_unit(mut self, unit: impl Into<String>) -> Self {
    self.time_unit = unit.into();
    self
  }

  pub fn with_operation(mut self, operation: Operation) -> Self {
    self.operation = operation;
    self
  }

  pub fn size_column(&self) -> &str {
    &self.size_column
  }

  pub fn time_column(&self) -> &str {
    &self.time_column
  }

  pub fn size_output(&self) -> &str {
    &self.size_output
  }

  pub fn time_output(&self) -> &str {
    &self.time_output
  }

  pub fn size_unit(&self) -> &str {
    &self.size_unit
  }

  pub fn time_unit(&self) -> &str {
    &self.time_unit
  }

  pub fn operation(&self) -> Operation {
    self.operation
  }
}

impl Accumulator {
  fn add(&mut self, size: &ByteSize, time: &TimeDuration) {
    self.bytes += size.to_base();
    self.nanos += time.to_base();
    self.count += 1;
  }
}

/// Aggregates the size and time columns named by `spec` over `rows`,
/// then writes the converted result into the output columns of every
/// row, including rows which did not contribute.
///
/// A row contributes only if it has a non-null value in both input
/// columns; other rows are skipped. A contributing value which fails
/// to parse aborts the whole batch, leaving `rows` untouched.
pub fn aggregate<'r>(rows: &'r mut [Row], spec: &AggregationSpec) -> Result<&'r mut [Row], ExecutionError> {
  let mut acc = Accumulator::default();
  for (index, row) in rows.iter().enumerate() {
    let (Some(size), Some(time)) = (input_text(row, &spec.size_column), input_text(row, &spec.time_column)) else {
      tracing::debug!(row = index, "skipping row without both input columns");
      continue;
    };
    let size: ByteSize = parse_cell(index, &spec.size_column, &size)?;
    let time: TimeDuration = parse_cell(index, &spec.time_column, &time)?;
    acc.add(&size, &time);
  }

  if acc.count == 0 {
    return Err(ExecutionError::NoValidRows {
      size_column: spec.size_column.clone(),
      time_column: spec.time_column.clone(),
    });
  }

  let bytes = spec.operation.apply(acc.bytes, acc.count);
  let nanos = spec.operation.apply(acc.nanos, acc.count);
  let size_result = ByteUnits::from_base(bytes, &spec.size_unit).map_err(ExecutionError::InvalidOutputUnit)?;
  let time_result = DurationUnits::from_base(nanos, &spec.time_unit).map_err(ExecutionError::InvalidOutputUnit)?;
  let size_value = output_value(size_result, &spec.size_output)?;
  let time_value = output_value(time_result, &spec.time_output)?;

  tracing::info!(
    rows = rows.len(),
    contributing = acc.count,
    operation = spec.operation.name(),
    size = size_result,
    size_unit = spec.size_unit.as_str(),
    time = time_result,
    time_unit = spec.time_unit.as_str(),
    "aggregated byte sizes and time durations"
  );
  for row in rows.iter_mut() {
    row.add(spec.size_output.clone(), size_value.clone());
    row.add(spec.time_output.clone(), time_value.clone());
  }
  Ok(rows)
}

/// The text of an input cell. Null cells count as absent; other
/// non-string values are read from their JSON rendering.
fn input_text<'a>(row: &'a Row, column: &str) -> Option<Cow<'a, str>> {
  match row.get_value(column)? {
    Value::Null => None,
    Value::String(text) => Some(Cow::Borrowed(text.as_str())),
    other => Some(Cow::Owned(other.to_string())),
  }
}

fn parse_cell<L: QuantityLiteral>(row: usize, column: &str, text: &str) -> Result<L, ExecutionError> {
  L::parse(text).map_err(|source| {
    tracing::warn!(row, column, error = %source, "aborting aggregation on malformed value");
    ExecutionError::Literal { row, column: column.to_owned(), source }
  })
}

fn output_value(value: f64, column: &str) -> Result<Value, ExecutionError> {
  if value.is_finite() {
    Ok(Value::from(value))
  } else {
    Err(ExecutionError::NonFiniteResult { column: column.to_owned() })
  }
}

impl AggregateStats {
  pub const NAME: &'static str = "aggregate-stats";

  pub fn new(spec: AggregationSpec) -> Self {
    Self { spec }
  }

  pub fn usage() -> UsageDefinition {
    UsageDefinition::builder(Self::NAME)
      .define("size_column", TokenKind::Column)
      .define("time_column", TokenKind::Column)
      .define("size_output", TokenKind::Text)
      .define("time_output", TokenKind::Text)
      .define_optional("size_unit", TokenKind::Text, ByteUnits::BASE_UNIT)
      .define_optional("time_unit", TokenKind::Text, DurationUnits::BASE_UNIT)
      .define_optional("operation", TokenKind::Text, Operation::Total.name())
      .build()
  }

  /// Builds the directive from arguments bound against
  /// [`AggregateStats::usage`].
  pub fn from_arguments(args: &Arguments) -> Result<Self, Error> {
    let spec = AggregationSpec::new(
      args.column("size_column")?,
      args.column("time_column")?,
      args.text("size_output")?,
      args.text("time_output")?,
    )
      .with_size_unit(args.text("size_unit")?)
      .with_time_unit(args.text("time_unit")?)
      .with_operation(args.text("operation")?.parse()?);
    Ok(Self::new(spec))
  }

  pub fn spec(&self) -> &AggregationSpec {
    &self.spec
  }
}

impl Directive for AggregateStats {
  fn execute<'r>(&self, rows: &'r mut [Row], context: &ExecutorContext) -> Result<&'r mut [Row], ExecutionError> {
    let span = tracing::info_span!("execute", directive = Self::NAME, environment = %context.environment());
    let _guard = span.enter();
    aggregate(rows, &self.spec)
  }
}

impl FromStr for Operation {
  type Err = ExecutionError;

  fn from_str(s: &str) -> Result<Self, ExecutionError> {
    match s.trim().to_lowercase().as_str() {
      "total" => Ok(Operation::Total),
      "average" => Ok(Operation::Average),
      _ => Err(ExecutionError::InvalidOperation(s.to_owned())),
    }
  }
}

impl TryFrom<String> for Operation {
  type Error = ExecutionError;

  fn try_from(s: String) -> Result<Self, ExecutionError> {
    s.parse()
  }
}

impl Display for Operation {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::directive::context::Environment;
  use crate::row::test_utils::measurement;
  use crate::units::ParseError;

  use approx::assert_relative_eq;
  use serde_json::json;

  fn spec() -> AggregationSpec {
    AggregationSpec::new("size", "time", "total_size", "total_time")
  }

  fn output(row: &Row, column: &str) -> f64 {
    row.get_value(column).and_then(Value::as_f64).unwrap()
  }

  #[test]
  fn test_average_in_requested_units() {
    let mut rows = vec![measurement("1MB", "1s"), measurement("3MB", "3s")];
    let spec = spec().with_size_unit("MB").with_time_unit("s").with_operation(Operation::Average);
    aggregate(&mut rows, &spec).unwrap();
    for row in &rows {
      assert_eq!(output(row, "total_size"), 2.0);
      assert_eq!(output(row, "total_time"), 2.0);
    }
  }

  #[test]
  fn test_total_with_defaults() {
    let mut rows = vec![measurement("1KB", "1us"), measurement("0.5KB", "500ns")];
    aggregate(&mut rows, &spec()).unwrap();
    assert_eq!(output(&rows[0], "total_size"), 1536.0);
    assert_eq!(output(&rows[1], "total_time"), 1500.0);
  }

  #[test]
  fn test_mixed_units_and_case() {
    let mut rows = vec![
      measurement("512kb", "1500ms"),
      measurement("0.5 MB", "0.5S"),
      measurement("1mb", "1\u{b5}s"),
    ];
    let spec = spec().with_size_unit("mb").with_time_unit("s");
    aggregate(&mut rows, &spec).unwrap();
    assert_relative_eq!(output(&rows[2], "total_size"), 2.0);
    assert_relative_eq!(output(&rows[2], "total_time"), 2.000001, max_relative = 1e-12);
  }

  #[test]
  fn test_skips_rows_missing_a_column_but_annotates_them() {
    let mut rows = vec![
      measurement("2GB", "2h"),
      Row::new().with("size", "100GB"),
      Row::new().with("time", "100h"),
      Row::new().with("size", Value::Null).with("time", "1h"),
      measurement("4GB", "4h"),
    ];
    let spec = spec().with_size_unit("GB").with_time_unit("h").with_operation(Operation::Average);
    aggregate(&mut rows, &spec).unwrap();
    for row in &rows {
      assert_eq!(output(row, "total_size"), 3.0);
      assert_eq!(output(row, "total_time"), 3.0);
    }
  }

  #[test]
  fn test_output_columns_appended_or_overwritten() {
    let mut rows = vec![
      measurement("1B", "1ns").with("total_size", "stale"),
      measurement("1B", "1ns"),
    ];
    aggregate(&mut rows, &spec()).unwrap();
    assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["size", "time", "total_size", "total_time"]);
    assert_eq!(rows[0].get_value("total_size"), Some(&json!(2.0)));
    assert_eq!(rows[1].find("total_time"), Some(3));
  }

  #[test]
  fn test_returns_same_rows_for_chaining() {
    let mut rows = vec![measurement("1B", "1ns")];
    let returned = aggregate(&mut rows, &spec()).unwrap();
    assert_eq!(returned.len(), 1);
    returned[0].add("chained", true);
    assert_eq!(rows[0].get_value("chained"), Some(&json!(true)));
  }

  #[test]
  fn test_no_valid_rows() {
    let mut rows = vec![Row::new().with("size", "1MB"), Row::new().with("other", 1)];
    let err = aggregate(&mut rows, &spec()).unwrap_err();
    assert!(matches!(err, ExecutionError::NoValidRows { .. }));
    assert!(err.to_string().starts_with("no valid rows"));
    assert_eq!(rows[0].find("total_size"), None);

    let mut empty: Vec<Row> = Vec::new();
    assert!(matches!(aggregate(&mut empty, &spec()), Err(ExecutionError::NoValidRows { .. })));
  }

  #[test]
  fn test_one_bad_cell_fails_the_batch() {
    let mut rows = vec![measurement("1MB", "1s"), measurement("1MB", "1 fortnight"), measurement("1MB", "1s")];
    let before = rows.clone();
    let err = aggregate(&mut rows, &spec()).unwrap_err();
    let ExecutionError::Literal { row, column, source } = &err else {
      panic!("Expected Literal error");
    };
    assert_eq!(*row, 1);
    assert_eq!(column, "time");
    assert!(matches!(source, ParseError::InvalidUnit { .. }));
    assert!(err.to_string().contains(&source.to_string()));
    assert_eq!(rows, before);
  }

  #[test]
  fn test_non_string_cells_are_parsed_as_text() {
    let mut rows = vec![Row::new().with("size", 1024).with("time", "1s")];
    let err = aggregate(&mut rows, &spec()).unwrap_err();
    assert!(matches!(err, ExecutionError::Literal { source: ParseError::MissingUnit { .. }, .. }));
  }

  #[test]
  fn test_invalid_output_unit() {
    let mut rows = vec![measurement("1MB", "1s")];
    let err = aggregate(&mut rows, &spec().with_size_unit("MiB")).unwrap_err();
    assert!(matches!(err, ExecutionError::InvalidOutputUnit(ParseError::InvalidUnit { .. })));
    let err = aggregate(&mut rows, &spec().with_time_unit("hours")).unwrap_err();
    assert!(matches!(err, ExecutionError::InvalidOutputUnit(ParseError::InvalidUnit { .. })));
    assert_eq!(rows[0].find("total_size"), None);
  }

  #[test]
  fn test_overflowing_total() {
    let huge = format!("{}PB", "9".repeat(300));
    let mut rows = vec![measurement(&huge, "1s")];
    let err = aggregate(&mut rows, &spec()).unwrap_err();
    assert_eq!(err, ExecutionError::NonFiniteResult { column: "total_size".to_owned() });
  }

  #[test]
  fn test_operation_parsing() {
    assert_eq!("total".parse::<Operation>(), Ok(Operation::Total));
    assert_eq!(" AVERAGE ".parse::<Operation>(), Ok(Operation::Average));
    assert_eq!("sum".parse::<Operation>(), Err(ExecutionError::InvalidOperation("sum".to_owned())));
    assert_eq!(Operation::Average.to_string(), "average");
  }

  #[test]
  fn test_spec_from_json_applies_defaults() {
    let spec: AggregationSpec = serde_json::from_value(json!({
      "size_column": "size",
      "time_column": "time",
      "size_output": "total_size",
      "time_output": "total_time",
    })).unwrap();
    assert_eq!(spec, self::spec());
    assert_eq!(spec.size_unit(), "B");
    assert_eq!(spec.time_unit(), "ns");
    assert_eq!(spec.operation(), Operation::Total);

    let spec: AggregationSpec = serde_json::from_value(json!({
      "size_column": "size",
      "time_column": "time",
      "size_output": "total_size",
      "time_output": "total_time",
      "operation": "Average",
    })).unwrap();
    assert_eq!(spec.operation(), Operation::Average);
    assert_eq!(serde_json::to_value(&spec).unwrap()["operation"], json!("average"));
  }

  #[test]
  fn test_usage_declares_seven_arguments() {
    let usage = AggregateStats::usage();
    let declared: Vec<_> = usage.arguments().iter()
      .map(|arg| (arg.name(), arg.kind(), arg.default()))
      .collect();
    assert_eq!(declared, vec![
      ("size_column", TokenKind::Column, None),
      ("time_column", TokenKind::Column, None),
      ("size_output", TokenKind::Text, None),
      ("time_output", TokenKind::Text, None),
      ("size_unit", TokenKind::Text, Some("B")),
      ("time_unit", TokenKind::Text, Some("ns")),
      ("operation", TokenKind::Text, Some("total")),
    ]);
  }

  #[test]
  fn test_from_arguments() {
    let args = ["size", ":time", "avg_size", "avg_time", "KB", "ms", "average"]
      .map(String::from)
      .to_vec();
    let bound = AggregateStats::usage().bind(args).unwrap();
    let directive = AggregateStats::from_arguments(&bound).unwrap();
    assert_eq!(directive.spec(), &AggregationSpec::new("size", "time", "avg_size", "avg_time")
      .with_size_unit("KB")
      .with_time_unit("ms")
      .with_operation(Operation::Average));

    let bound = AggregateStats::usage().bind(["size", "time", "a", "b"].map(String::from).to_vec()).unwrap();
    let directive = AggregateStats::from_arguments(&bound).unwrap();
    assert_eq!(directive.spec(), &AggregationSpec::new("size", "time", "a", "b"));
  }

  #[test]
  fn test_from_arguments_rejects_unknown_operation() {
    let args = ["size", "time", "a", "b", "B", "ns", "median"].map(String::from).to_vec();
    let bound = AggregateStats::usage().bind(args).unwrap();
    let err = AggregateStats::from_arguments(&bound).unwrap_err();
    assert!(matches!(err, Error::ExecutionError(ExecutionError::InvalidOperation(_))));
  }

  #[test]
  fn test_execute_as_directive() {
    let directive = AggregateStats::new(spec().with_size_unit("KB"));
    let mut rows = vec![measurement("1MB", "1s")];
    let context = ExecutorContext::new(Environment::Preview);
    directive.execute(&mut rows, &context).unwrap();
    assert_eq!(output(&rows[0], "total_size"), 1024.0);
    assert_eq!(output(&rows[0], "total_time"), 1e9);
  }
}
