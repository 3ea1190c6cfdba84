//! This module implements the keyword tables for the deck dialect we read:
//! which keyword opens a material, which keywords open property sub-blocks
//! (and what inline attributes they carry), and which keywords mark the end
//! of the material section of a deck.

use serde::{Serialize, Deserialize};

use crate::materials::PropertyValue;
use crate::util::{first_integer, keyword_attr, title_case};

/// The character that starts a keyword line.
pub const KEYWORD_MARKER: char = '*';

/// The marker that starts a comment, whether a whole line or inline.
pub const COMMENT_MARKER: &str = "**";

/// Upper-case prefix of the keyword that opens a material definition.
pub const MATERIAL_KEYWORD: &str = "*MATERIAL";

/// Upper-case keyword prefixes that close the current material's scope.
/// This mirrors the keywords decks commonly interleave with material data;
/// it's configuration, not a full grammar of the host format.
pub const BOUNDARY_KEYWORDS: &[&str] = &[
  "*STEP", "*PART", "*ASSEMBLY", "*ELEMENT", "*NODE",
  "*SECTION", "*SOLID SECTION", "*SHELL SECTION",
  "*BEAM SECTION", "*BOUNDARY", "*ELSET", "*NSET"
];

/// Hyperelastic model names we look for on the keyword line, in match
/// priority order. The first one found wins.
pub const HYPERELASTIC_MODELS: &[&str] = &[
  "mooney-rivlin", "neo hooke", "ogden", "polynomial", "yeoh"
];

/// Generates the PropertyKind enum and its keyword/key tables.
macro_rules! gen_property_kinds {
  (
    $(
      {
        $desc:literal,
        $pname:ident,
        $key:literal,
        $kw:literal
      },
    )*
  ) => {
    /// The material properties we recognise.
    #[derive(
      Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd,
      Ord
    )]
    #[non_exhaustive]
    pub enum PropertyKind {
      $(
        #[doc = $desc]
        $pname,
      )*
    }

    impl PropertyKind {
      /// Returns all known property kinds, most specific keyword first so
      /// that prefix matching can't be shadowed by a shorter keyword.
      pub const fn all() -> &'static [Self] {
        return &[ $(Self::$pname,)* ];
      }

      /// Returns the canonical key this property is stored under.
      pub const fn key(&self) -> &'static str {
        return match self {
          $(Self::$pname => $key,)*
        };
      }

      /// Returns the upper-case keyword prefix that opens this property.
      pub const fn keyword(&self) -> &'static str {
        return match self {
          $(Self::$pname => $kw,)*
        };
      }

      /// Returns a short description of the property.
      pub const fn desc(&self) -> &'static str {
        return match self {
          $(Self::$pname => $desc,)*
        };
      }
    }
  }
}

gen_property_kinds!(
  {
    "Specific heat capacity",
    SpecificHeat,
    "Specific_Heat",
    "*SPECIFIC HEAT"
  },
  {
    "User-defined material (UMAT)",
    UserMaterial,
    "User_Material",
    "*USER MATERIAL"
  },
  {
    "Hyperelastic behaviour",
    Hyperelastic,
    "Hyperelastic",
    "*HYPERELASTIC"
  },
  {
    "Viscoelastic behaviour",
    Viscoelastic,
    "Viscoelastic",
    "*VISCOELASTIC"
  },
  {
    "Elastic moduli",
    Elastic,
    "Elastic",
    "*ELASTIC"
  },
  {
    "Plastic hardening data",
    Plastic,
    "Plastic",
    "*PLASTIC"
  },
  {
    "Mass density",
    Density,
    "Density",
    "*DENSITY"
  },
  {
    "Thermal conductivity",
    Conductivity,
    "Conductivity",
    "*CONDUCTIVITY"
  },
  {
    "Thermal expansion",
    Expansion,
    "Expansion",
    "*EXPANSION"
  },
  {
    "Structural damping",
    Damping,
    "Damping",
    "*DAMPING"
  },
  {
    "Solution-dependent state variable count",
    Depvar,
    "Depvar",
    "*DEPVAR"
  },
);

impl PropertyKind {
  /// True if this property accumulates data rows. Everything does, except
  /// Depvar, which is a bare scalar.
  pub const fn has_rows(&self) -> bool {
    return !matches!(self, Self::Depvar);
  }

  /// Extracts this property's inline attributes from its keyword line, as
  /// derived-key/value pairs ready for insertion. Malformed or absent
  /// attributes are simply omitted.
  pub fn extract_attrs(&self, line: &str) -> Vec<(String, PropertyValue)> {
    let mut attrs: Vec<(String, PropertyValue)> = Vec::new();
    match self {
      Self::Elastic => {
        if let Some(t) = keyword_attr(line, "type") {
          attrs.push(("Elastic_Type".to_owned(), t.to_owned().into()));
        }
      },
      Self::Plastic => {
        if let Some(h) = keyword_attr(line, "hardening") {
          attrs.push(("Plastic_Hardening".to_owned(), h.to_owned().into()));
        }
      },
      Self::Expansion => {
        if let Some(t) = keyword_attr(line, "type") {
          attrs.push(("Expansion_Type".to_owned(), t.to_owned().into()));
        }
      },
      Self::Hyperelastic => {
        // models can be written with or without their internal space
        let squished = line.to_ascii_lowercase().replace(' ', "");
        for model in HYPERELASTIC_MODELS {
          if squished.contains(&model.replace(' ', "")) {
            attrs.push((
              "Hyperelastic_Model".to_owned(),
              title_case(model).into()
            ));
            break;
          }
        }
      },
      Self::UserMaterial => {
        if let Some(c) = keyword_attr(line, "constants") {
          if let Ok(n) = c.parse::<i64>() {
            attrs.push(("User_Material_Constants".to_owned(), n.into()));
          }
        }
      },
      Self::Depvar => {
        if let Some(n) = first_integer(line) {
          attrs.push(("Depvar".to_owned(), n.into()));
        }
      },
      _ => {}
    };
    return attrs;
  }
}

impl std::fmt::Display for PropertyKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.key());
  }
}

/// What a single keyword line means to the parser.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Keyword {
  /// A material definition start. A `None` name means no well-formed
  /// `name=` attribute was found; such a line is inert.
  MaterialStart(Option<String>),
  /// A recognised property keyword, with its inline attributes.
  PropertyStart(PropertyKind, Vec<(String, PropertyValue)>),
  /// A keyword that ends the material section of the deck.
  SectionBoundary,
  /// Any other keyword: detaches the active property but neither names a
  /// property nor closes the material.
  Other
}

/// Classifies a cleaned line known to start with the keyword marker.
/// Property keywords are checked before boundary keywords, in table order.
pub fn classify(line: &str) -> Keyword {
  let upper = line.to_ascii_uppercase();
  if upper.starts_with(MATERIAL_KEYWORD) {
    return Keyword::MaterialStart(
      keyword_attr(line, "name").map(String::from)
    );
  }
  for kind in PropertyKind::all() {
    if upper.starts_with(kind.keyword()) {
      return Keyword::PropertyStart(*kind, kind.extract_attrs(line));
    }
  }
  if BOUNDARY_KEYWORDS.iter().any(|kw| upper.starts_with(kw)) {
    return Keyword::SectionBoundary;
  }
  return Keyword::Other;
}
