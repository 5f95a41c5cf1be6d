//! Repository and reporter implementations

pub mod local_file;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::codes::ValidationError;

pub use local_file::{LocalFileOnePagerRepository, LocalFileValidationReporter, ONE_PAGER_DIR};
pub use memory::{InMemoryOnePagerRepository, InMemoryValidationReporter};

/// Findings stored for one employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReport {
    /// Name of the evaluated document
    pub document: String,
    pub errors: Vec<ValidationError>,
}
