//! This module contains the subroutines that flatten a parsed material set
//! into flat records and write them out as CSV.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use inp::prelude::*;
use log::debug;

use crate::layout::*;

/// Converts a material set into flat records: materials in deck order,
/// properties in deck order within each material, one record per data row
/// for list-valued properties and a single index-0 record with no
/// positional fields for scalars.
pub fn to_records(set: &MaterialSet) -> Vec<FlatRecord> {
  let mut records: Vec<FlatRecord> = Vec::new();
  for (mat_name, props) in set.iter() {
    for (prop_key, value) in props.iter() {
      match value {
        PropertyValue::Rows(rows) => {
          for (idx, row) in rows.iter().enumerate() {
            records.push(FlatRecord {
              material: mat_name.clone(),
              property: prop_key.clone(),
              row_index: idx,
              values: row.to_string(),
              fields: row_fields(row)
            });
          }
        },
        scalar => {
          records.push(FlatRecord {
            material: mat_name.clone(),
            property: prop_key.clone(),
            row_index: 0,
            values: scalar.to_string(),
            fields: Vec::new()
          });
        }
      };
    }
  }
  debug!("Flattened {} material(s) into {} record(s).", set.len(), records.len());
  return records;
}

/// Returns the positional fields for one data row.
fn row_fields(row: &DataRow) -> Vec<CsvField> {
  return match row {
    DataRow::Numeric(xs) => xs.iter().copied().map(CsvField::from).collect(),
    DataRow::Text(ts) => ts.iter().cloned().map(CsvField::from).collect()
  };
}

/// Returns the maximum positional width across a whole export. Zero when
/// there are no records or only scalar records.
pub fn max_width(records: &[FlatRecord]) -> usize {
  return records.iter().map(FlatRecord::width).max().unwrap_or(0);
}

/// Writes records as CSV: a header row first, then one line per record,
/// with positional columns up to the widest row in the whole export.
pub fn write_records<W: Write>(records: &[FlatRecord], out: W) -> io::Result<()> {
  let width = max_width(records);
  let mut wtr = csv::Writer::from_writer(out);
  wtr.write_record(headers(width))?;
  for rec in records.iter() {
    wtr.write_record(rec.to_fields(width))?;
  }
  wtr.flush()?;
  return Ok(());
}

/// Flattens a material set and writes it to a CSV file. The destination is
/// truncated.
pub fn save_csv<P: AsRef<Path>>(set: &MaterialSet, path: P) -> io::Result<()> {
  let records = to_records(set);
  let file = File::create(path)?;
  return write_records(&records, BufWriter::new(file));
}
