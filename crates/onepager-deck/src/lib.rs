//! # onepager-deck
//!
//! Structured, queryable model of a one-pager presentation.
//!
//! A [`SlideDeck`] is loaded from the raw package bytes. Its slides are kept in
//! presentation order and carry their filtered texts, referenced images,
//! detected content language and resolved theme.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use onepager_deck::{SlideDeck, WhatlangClassifier};
//!
//! let deck = SlideDeck::load(std::fs::read("onepager.pptx")?, Arc::new(WhatlangClassifier))?;
//! for slide in deck.one_pagers().await? {
//!     println!("{} {:?} {}", slide.number, slide.used_language, slide.theme.name);
//! }
//! ```

pub mod deck;
pub mod error;
pub mod language;
pub mod slide;
pub mod theme;

// Re-exports
pub use deck::SlideDeck;
pub use error::{ClassifierError, DeckError, Result};
pub use language::{LanguageClassifier, Locale, WhatlangClassifier, UNDETERMINED};
pub use slide::{ImageRef, Slide, ONE_PAGER_MIN_SECTIONS};
pub use theme::{Theme, ThemeResolver};
