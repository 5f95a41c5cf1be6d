//! Archive handling for PPTX packages
//!
//! A PPTX file is a ZIP archive containing XML parts and media. The archive is
//! opened once and never modified; entries are decompressed only when read.

use std::io::{Cursor, Read};
use std::sync::Arc;

use zip::read::ZipArchive;
use zip::result::ZipError;

use crate::error::{OoxmlError, Result};
use crate::relationships::{rels_path_for, Relationships};

/// Path of the main presentation part
pub const PRESENTATION_PATH: &str = "ppt/presentation.xml";

/// Path of the presentation's relationship part
pub const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// Read-only view of an OOXML package
///
/// Cloning is cheap: the raw bytes and the parsed central directory are shared.
#[derive(Debug, Clone)]
pub struct OoxmlArchive {
    zip: ZipArchive<Cursor<Arc<[u8]>>>,
}

impl OoxmlArchive {
    /// Open a package from an in-memory byte buffer
    ///
    /// Fails with [`OoxmlError::CorruptArchive`] if the bytes are not a zip container.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let zip = ZipArchive::new(Cursor::new(bytes.into()))?;
        Ok(Self { zip })
    }

    /// Check if an entry exists in the archive
    pub fn contains(&self, path: &str) -> bool {
        self.zip.index_for_name(path).is_some()
    }

    /// List all file entries in the archive (directories are skipped)
    pub fn file_list(&self) -> impl Iterator<Item = &str> {
        self.zip.file_names().filter(|name| !name.ends_with('/'))
    }

    /// Decompress an entry
    ///
    /// Fails with [`OoxmlError::MissingEntry`] if the entry does not exist.
    pub fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.read_optional(path)?
            .ok_or_else(|| OoxmlError::MissingEntry(path.to_string()))
    }

    /// Decompress an entry, returning `None` if it does not exist
    pub fn read_optional(&self, path: &str) -> Result<Option<Vec<u8>>> {
        // by_name needs a mutable cursor; the clone shares the central directory
        let mut zip = self.zip.clone();
        let mut file = match zip.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut contents = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut contents)?;
        Ok(Some(contents))
    }

    /// Get the presentation part (ppt/presentation.xml)
    pub fn presentation_xml(&self) -> Result<Vec<u8>> {
        self.read(PRESENTATION_PATH)
    }

    /// Get the presentation relationships (ppt/_rels/presentation.xml.rels)
    pub fn presentation_rels(&self) -> Result<Relationships> {
        Relationships::parse(&self.read(PRESENTATION_RELS_PATH)?)
    }

    /// Get the relationships of an arbitrary part
    ///
    /// A part without a relationship file has no relationships.
    pub fn relationships_for(&self, part: &str) -> Result<Relationships> {
        match self.read_optional(&rels_path_for(part))? {
            Some(xml) => Relationships::parse(&xml),
            None => Ok(Relationships::new()),
        }
    }
}
