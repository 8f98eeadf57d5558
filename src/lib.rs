//! The deckgen library turns free text into a slide deck: it asks an LLM model for
//! slides, parses the loosely structured reply into slide records and writes them
//! into a `.pptx` file, either from the web front end or from the command line.

pub mod constants;
pub mod deck;
pub mod generate;
pub mod parse;
pub mod prompt;
pub mod session;
pub mod slide;
pub mod web;

pub use deck::{DeckWriter, Theme};
pub use generate::{GenerateContext, build_model, generate_slides};
pub use parse::parse_slides;
pub use slide::{Slide, slides_to_markup};
