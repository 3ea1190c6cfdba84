//! This module implements the general structure of the material data we
//! extract from a deck: a set of named materials, each mapping property
//! keys to either tabular data rows or scalar attribute values.

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Serialize, Deserialize};

/// One physical data line belonging to a property. A row is numeric only if
/// every field on the line parsed as a float; otherwise the whole row is
/// kept as raw string tokens. Rows never mix the two.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum DataRow {
  /// Every field on the line parsed as a float.
  Numeric(Vec<f64>),
  /// At least one field wasn't a float, so all fields are kept verbatim.
  Text(Vec<String>)
}

impl DataRow {
  /// Decodes a cleaned, non-keyword line into a data row: split on commas,
  /// trim each token, drop empty tokens. Returns `None` if no tokens
  /// remain.
  pub fn from_line(line: &str) -> Option<Self> {
    let tokens: Vec<&str> = line
      .split(',')
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .collect();
    if tokens.is_empty() {
      return None;
    }
    let reals: Option<Vec<f64>> = tokens.iter().map(|t| t.parse().ok()).collect();
    return Some(match reals {
      Some(v) => Self::Numeric(v),
      None => Self::Text(tokens.into_iter().map(String::from).collect())
    });
  }

  /// Returns the number of fields in the row.
  pub fn width(&self) -> usize {
    return match self {
      Self::Numeric(v) => v.len(),
      Self::Text(v) => v.len()
    };
  }
}

impl Display for DataRow {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::Numeric(v) => write!(f, "{:?}", v),
      Self::Text(v) => write!(f, "{:?}", v)
    };
  }
}

/// The value stored under a property key: either accumulated data rows, or
/// a single scalar for attribute and metadata keys like `Elastic_Type` or
/// `Depvar`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum PropertyValue {
  /// One entry per data line, in deck order.
  Rows(Vec<DataRow>),
  /// An integer scalar, e.g. a state variable or constant count.
  Integer(i64),
  /// A string scalar, e.g. an elasticity type.
  Text(String)
}

impl Display for PropertyValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::Rows(rows) => {
        let parts: Vec<String> = rows.iter().map(DataRow::to_string).collect();
        write!(f, "[{}]", parts.join(", "))
      },
      Self::Integer(n) => n.fmt(f),
      Self::Text(s) => s.fmt(f)
    };
  }
}

/// A single material: property keys mapped to their values, in the order
/// they appeared in the deck.
pub type Material = IndexMap<String, PropertyValue>;

/// The output of a deck parse: material names mapped to their properties,
/// in deck order. Names are case-sensitive, exactly as written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialSet {
  /// The materials, keyed by name.
  materials: IndexMap<String, Material>
}

impl MaterialSet {
  /// Instantiates a new, empty material set.
  pub fn new() -> Self {
    return Self { materials: IndexMap::new() };
  }

  /// Returns the number of materials in the set.
  pub fn len(&self) -> usize {
    return self.materials.len();
  }

  /// Returns true if no materials were found.
  pub fn is_empty(&self) -> bool {
    return self.materials.is_empty();
  }

  /// Returns a material's properties by name, if present.
  pub fn get(&self, name: &str) -> Option<&Material> {
    return self.materials.get(name);
  }

  /// Iterates over materials in deck order.
  pub fn iter(&self) -> impl Iterator<Item = (&String, &Material)> {
    return self.materials.iter();
  }

  /// Registers a material under the given name with no properties,
  /// replacing the accumulated properties of any earlier definition with
  /// the same name.
  pub fn insert_material(&mut self, name: &str) {
    self.materials.insert(name.to_owned(), Material::new());
  }

  /// Sets a property key on a material. Does nothing if the material is
  /// unknown.
  pub fn put(&mut self, material: &str, key: String, value: PropertyValue) {
    if let Some(props) = self.materials.get_mut(material) {
      props.insert(key, value);
    }
  }

  /// Appends a data row to a list-valued property. Does nothing if the
  /// material or the property is missing, or the property isn't
  /// list-valued.
  pub fn push_row(&mut self, material: &str, property: &str, row: DataRow) {
    let value = self.materials
      .get_mut(material)
      .and_then(|props| props.get_mut(property));
    if let Some(PropertyValue::Rows(rows)) = value {
      rows.push(row);
    }
  }

  /// Serialises the whole set to a JSON file: materials and property keys
  /// in deck order, numeric rows as numbers, string rows as strings,
  /// four-space indentation. The destination is truncated.
  pub fn save_json<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, fmt);
    self.serialize(&mut ser).map_err(io::Error::from)?;
    writer.write_all(b"\n")?;
    return writer.flush();
  }

  /// Reads a material set back from a JSON file written by `save_json`.
  pub fn load_json<P: AsRef<Path>>(path: P) -> io::Result<Self> {
    let file = File::open(path)?;
    let set = serde_json::from_reader(BufReader::new(file))?;
    return Ok(set);
  }
}
