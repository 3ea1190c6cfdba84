//! This submodule implements the general layout of the flat CSV export.

use std::fmt::Display;

use serde::{Serialize, Deserialize};

/// The fixed leading columns every record carries.
pub const FIXED_HEADERS: [&str; 4] = ["Material", "Property", "Row_Index", "Values"];

/// Name prefix for the positional value columns.
pub const VALUE_COL_PREFIX: &str = "Value_";

/// A single positional field in a flat record.
#[derive(
  Clone, Debug, Serialize, Deserialize, PartialEq, PartialOrd,
  derive_more::From
)]
#[non_exhaustive]
pub enum CsvField {
  /// A blank field.
  Blank,
  /// An integer.
  Integer(i64),
  /// A real number.
  Real(f64),
  /// An alloc'd string.
  String(String)
}

impl Display for CsvField {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::Blank => write!(f, ""),
      Self::Integer(i) => i.fmt(f),
      Self::Real(x) => x.fmt(f),
      Self::String(s) => s.fmt(f)
    };
  }
}

/// One line of the flat export: a single data row (or scalar value) of a
/// single property of a single material.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlatRecord {
  /// The material name.
  pub material: String,
  /// The property key.
  pub property: String,
  /// Zero-based index of the row within its property; 0 for scalars.
  pub row_index: usize,
  /// A display rendering of the whole row or scalar.
  pub values: String,
  /// The individual positional fields. Empty for scalar records.
  pub fields: Vec<CsvField>
}

impl FlatRecord {
  /// Returns the number of positional fields in this record.
  pub fn width(&self) -> usize {
    return self.fields.len();
  }

  /// Returns this record as `4 + width` display-ready fields, leaving
  /// positional columns past this record's own width blank.
  pub fn to_fields(&self, width: usize) -> impl Iterator<Item = String> + '_ {
    let lead = [
      self.material.clone(),
      self.property.clone(),
      self.row_index.to_string(),
      self.values.clone()
    ];
    let positional = (0..width).map(|i| {
      return self.fields.get(i).map(CsvField::to_string).unwrap_or_default();
    });
    return lead.into_iter().chain(positional);
  }
}

/// Returns the header row for an export whose widest record has the given
/// number of positional fields.
pub fn headers(width: usize) -> Vec<String> {
  let mut hs: Vec<String> = FIXED_HEADERS.iter().map(|s| s.to_string()).collect();
  hs.extend((1..=width).map(|i| format!("{}{}", VALUE_COL_PREFIX, i)));
  return hs;
}
