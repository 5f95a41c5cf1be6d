//! # onepager-ooxml
//!
//! Read-only access to OOXML packages for one-pager validation.
//!
//! This crate provides functionality to:
//! - Open a PPTX package and read its parts on demand
//! - Parse relationship parts and resolve their targets
//!
//! ## Example: Resolving the layout of a slide
//!
//! ```no_run
//! use onepager_ooxml::{resolve_target, OoxmlArchive, Relationships};
//!
//! let archive = OoxmlArchive::from_bytes(std::fs::read("onepager.pptx")?)?;
//! let rels = archive.relationships_for("ppt/slides/slide1.xml")?;
//!
//! if let Some(layout) = rels.first_of_type(Relationships::TYPE_SLIDE_LAYOUT) {
//!     let path = resolve_target("ppt/slides/slide1.xml", &layout.target);
//!     println!("{} bytes", archive.read(&path)?.len());
//! }
//! # Ok::<(), onepager_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod error;
pub mod relationships;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use archive::{OoxmlArchive, PRESENTATION_PATH, PRESENTATION_RELS_PATH};
pub use error::{OoxmlError, Result};
pub use relationships::{rels_path_for, resolve_target, RelationshipTarget, Relationships};
