//! Rows of the tabular pipeline that directives operate on.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A row is an ordered mapping from column name to value. Columns
/// keep the order in which they were first added; overwriting a
/// column's value does not move it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
  fields: Map<String, Value>,
}

impl Row {
  /// A new, empty row.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the value of `column`, appending the column if it is not
  /// already present.
  pub fn add(&mut self, column: impl Into<String>, value: impl Into<Value>) {
    self.fields.insert(column.into(), value.into());
  }

  /// Builder-style variant of [`Row::add`].
  pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
    self.add(column, value);
    self
  }

  pub fn get_value(&self, column: &str) -> Option<&Value> {
    self.fields.get(column)
  }

  /// The position of `column` in this row, if present.
  pub fn find(&self, column: &str) -> Option<usize> {
    self.fields.keys().position(|name| name == column)
  }

  pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
    self.fields.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }
}

impl From<Map<String, Value>> for Row {
  fn from(fields: Map<String, Value>) -> Self {
    Self { fields }
  }
}

impl<K, V> FromIterator<(K, V)> for Row
where K: Into<String>,
      V: Into<Value> {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut row = Row::new();
    for (column, value) in iter {
      row.add(column, value);
    }
    row
  }
}
