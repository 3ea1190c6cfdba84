//! This library implements a flat, spreadsheet-friendly CSV rendition of
//! material data extracted from input decks. Primarily meant for use by the
//! `inpmat` tool, i.e. deck-to-table conversion.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::needless_return)]

pub mod from_deck;
pub mod layout;


/// Imports the most relevant exports from the library.
pub mod prelude {
  pub use super::from_deck::*;
  pub use super::layout::*;
}
