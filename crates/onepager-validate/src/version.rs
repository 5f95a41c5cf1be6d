//! Document versions as handed out by a repository

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use onepager_deck::Locale;

use crate::error::Result;
use crate::naming::locale_from_file_name;

/// Employee identifier as used by repositories and reporters
pub type EmployeeId = String;

/// Handle that produces the packaged document bytes on demand
#[derive(Debug, Clone)]
pub enum DocumentContent {
    /// Already in memory
    Bytes(Arc<[u8]>),
    /// Read from disk when the version is evaluated
    File(PathBuf),
}

impl DocumentContent {
    /// Load the document bytes
    pub async fn load(&self) -> Result<Arc<[u8]>> {
        match self {
            DocumentContent::Bytes(bytes) => Ok(Arc::clone(bytes)),
            DocumentContent::File(path) => Ok(tokio::fs::read(path).await?.into()),
        }
    }
}

impl From<Vec<u8>> for DocumentContent {
    fn from(bytes: Vec<u8>) -> Self {
        DocumentContent::Bytes(bytes.into())
    }
}

impl From<PathBuf> for DocumentContent {
    fn from(path: PathBuf) -> Self {
        DocumentContent::File(path)
    }
}

/// One physical document of an employee
#[derive(Debug, Clone)]
pub struct OnePagerVersion {
    /// Document name, used as the label in reports
    pub name: String,
    /// Last time the employee changed the document
    pub last_update_by_employee: DateTime<Utc>,
    /// Locale indicator taken from the file name
    pub locale: Option<Locale>,
    pub content: DocumentContent,
}

impl OnePagerVersion {
    /// Create a version whose locale is derived from `name`
    pub fn new(
        name: impl Into<String>,
        last_update_by_employee: DateTime<Utc>,
        content: impl Into<DocumentContent>,
    ) -> Self {
        let name = name.into();
        let locale = locale_from_file_name(&name);
        Self {
            name,
            last_update_by_employee,
            locale,
            content: content.into(),
        }
    }

    /// Override the derived locale indicator
    pub fn with_locale(mut self, locale: Option<Locale>) -> Self {
        self.locale = locale;
        self
    }
}
