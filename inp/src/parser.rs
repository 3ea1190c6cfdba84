//! This module implements the one-pass parser that walks a deck line by
//! line and accumulates material definitions, plus the state machine that
//! keeps track of where in the deck we currently stand.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::{debug, warn};
use serde::{Serialize, Deserialize};

use crate::keywords::*;
use crate::materials::*;
use crate::util::*;

/// Where the parser currently stands in the deck. Carrying the material
/// and property names inside the variants makes invalid combinations (a
/// property with no material, say) unrepresentable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ParserState {
  /// Not inside any material definition.
  #[default]
  Idle,
  /// Inside a material, with no property taking data.
  InMaterial(String),
  /// Inside a material, right after a scalar property keyword that didn't
  /// carry its value inline; the next data line may supply it.
  AwaitingScalar {
    /// The material in scope.
    material: String,
    /// The scalar property kind whose value is pending.
    kind: PropertyKind
  },
  /// Actively consuming data rows for a property.
  ReadingProperty {
    /// The material in scope.
    material: String,
    /// The key of the property taking rows.
    property: String
  }
}

impl ParserState {
  /// Returns the name of the material in scope, if any.
  pub fn material(&self) -> Option<&str> {
    return match self {
      Self::Idle => None,
      Self::InMaterial(material) => Some(material),
      Self::AwaitingScalar { material, .. } => Some(material),
      Self::ReadingProperty { material, .. } => Some(material)
    };
  }
}

/// The parser might respond this after consuming a line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ParserResponse {
  /// The line was blank or a comment.
  Skipped,
  /// The line registered a new material.
  NewMaterial(String),
  /// A material keyword with no usable name; the line was inert.
  UnnamedMaterial,
  /// The line opened a property sub-block for the current material.
  BeginProperty(PropertyKind),
  /// The line set a scalar property value (or failed to and gave up).
  Scalar(PropertyKind),
  /// The line closed the material section.
  SectionEnd,
  /// A keyword line that changed nothing of note.
  InertKeyword,
  /// The line was a data row, with this many fields, appended to the
  /// active property.
  Row(usize),
  /// A data line with nowhere to go; dropped.
  DroppedData
}

/// This is the deck parser -- it doesn't care how lines are fed into it.
/// One-pass, single-thread, no shared state between instances.
pub struct DeckParser {
  /// The materials accumulated so far.
  set: MaterialSet,
  /// The current state.
  state: ParserState,
  /// The total number of consumed lines.
  total_lines: usize
}

impl Default for DeckParser {
  fn default() -> Self {
    return Self::new();
  }
}

impl DeckParser {
  /// Instantiates a new parser.
  pub fn new() -> Self {
    return Self {
      set: MaterialSet::new(),
      state: ParserState::Idle,
      total_lines: 0
    };
  }

  /// Returns the current state, mostly for diagnostics.
  pub fn state(&self) -> &ParserState {
    return &self.state;
  }

  /// Consumes a line into the parser.
  pub fn consume(&mut self, raw: &str) -> ParserResponse {
    self.total_lines += 1;
    let line = match clean_line(raw) {
      Some(line) => line,
      None => return ParserResponse::Skipped
    };
    if line.starts_with(KEYWORD_MARKER) {
      return self.consume_keyword(line);
    }
    return self.consume_data(line);
  }

  /// Handles a cleaned keyword line.
  fn consume_keyword(&mut self, line: &str) -> ParserResponse {
    match classify(line) {
      Keyword::MaterialStart(Some(name)) => {
        debug!("Line {}: found material \"{}\".", self.total_lines, name);
        self.set.insert_material(&name);
        self.state = ParserState::InMaterial(name.clone());
        return ParserResponse::NewMaterial(name);
      },
      Keyword::MaterialStart(None) => {
        warn!(
          "Line {}: material keyword with no usable name, ignored.",
          self.total_lines
        );
        return ParserResponse::UnnamedMaterial;
      },
      Keyword::PropertyStart(kind, attrs) => {
        return self.begin_property(kind, attrs);
      },
      Keyword::SectionBoundary => {
        if let Some(material) = self.state.material() {
          debug!(
            "Line {}: leaving material \"{}\".", self.total_lines, material
          );
          self.state = ParserState::Idle;
          return ParserResponse::SectionEnd;
        }
        return ParserResponse::InertKeyword;
      },
      Keyword::Other => {
        // unknown keywords detach the property but keep the material
        if let Some(material) = self.state.material().map(str::to_owned) {
          self.state = ParserState::InMaterial(material);
        }
        return ParserResponse::InertKeyword;
      }
    };
  }

  /// Handles a recognised property keyword for the current material, if
  /// there is one.
  fn begin_property(
    &mut self,
    kind: PropertyKind,
    attrs: Vec<(String, PropertyValue)>
  ) -> ParserResponse {
    let material = match self.state.material().map(str::to_owned) {
      Some(material) => material,
      None => return ParserResponse::InertKeyword
    };
    if kind.has_rows() {
      // the property key goes in first so attributes follow it in order
      let key = kind.key().to_owned();
      self.set.put(&material, key.clone(), PropertyValue::Rows(Vec::new()));
      for (akey, avalue) in attrs {
        self.set.put(&material, akey, avalue);
      }
      debug!(
        "Line {}: reading {} data for \"{}\".",
        self.total_lines,
        kind,
        material
      );
      self.state = ParserState::ReadingProperty { material, property: key };
      return ParserResponse::BeginProperty(kind);
    }
    // scalar-only property: the keyword line itself may carry the value,
    // otherwise the next data line gets a chance to
    if attrs.is_empty() {
      self.state = ParserState::AwaitingScalar { material, kind };
      return ParserResponse::BeginProperty(kind);
    }
    for (akey, avalue) in attrs {
      self.set.put(&material, akey, avalue);
    }
    self.state = ParserState::InMaterial(material);
    return ParserResponse::Scalar(kind);
  }

  /// Handles a cleaned non-keyword line.
  fn consume_data(&mut self, line: &str) -> ParserResponse {
    match &self.state {
      ParserState::ReadingProperty { material, property } => {
        match DataRow::from_line(line) {
          Some(row) => {
            let width = row.width();
            debug!(
              "Line {}: {} row {} for \"{}\".",
              self.total_lines,
              property,
              row,
              material
            );
            self.set.push_row(material, property, row);
            return ParserResponse::Row(width);
          },
          None => return ParserResponse::DroppedData
        };
      },
      ParserState::AwaitingScalar { material, kind } => {
        let material = material.clone();
        let kind = *kind;
        if let Some(n) = first_integer(line) {
          self.set.put(&material, kind.key().to_owned(), n.into());
        }
        self.state = ParserState::InMaterial(material);
        return ParserResponse::Scalar(kind);
      },
      ParserState::Idle | ParserState::InMaterial(_) => {
        debug!(
          "Line {}: data line with no active property, dropped.",
          self.total_lines
        );
        return ParserResponse::DroppedData;
      }
    };
  }

  /// Finishes up and returns the accumulated material set. No finalisation
  /// is needed at end of input, in whatever state.
  pub fn finish(self) -> MaterialSet {
    return self.set;
  }

  /// Reads everything from a reader and parses it. Decoding is lenient:
  /// invalid byte sequences are dropped instead of failing the read, and
  /// any line ending style is accepted.
  pub fn parse_reader<R: Read>(mut reader: R) -> io::Result<MaterialSet> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = match String::from_utf8(bytes) {
      Ok(text) => text,
      Err(err) => {
        warn!("Input isn't valid UTF-8, dropping bad byte sequences.");
        String::from_utf8_lossy(err.as_bytes())
          .chars()
          .filter(|c| *c != char::REPLACEMENT_CHARACTER)
          .collect()
      }
    };
    let mut parser = Self::new();
    for line in text.lines() {
      parser.consume(line);
    }
    return Ok(parser.finish());
  }

  /// Utility method -- opens and parses a file.
  pub fn parse_file<P: AsRef<Path>>(path: P) -> io::Result<MaterialSet> {
    let file = File::open(path.as_ref())?;
    return Self::parse_reader(file);
  }
}
