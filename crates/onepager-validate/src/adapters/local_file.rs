//! Adapters over a local data directory
//!
//! ```text
//! <data_dir>/
//!   onepagers/
//!     Max_Mustermann_4711/
//!       Mustermann, Max_DE_240131.pptx
//!   4711_validation.json
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{NaiveTime, TimeZone, Utc};
use tracing::{debug, warn};

use super::StoredReport;
use crate::codes::ValidationError;
use crate::error::Result;
use crate::naming::{EmployeeFolder, OnePagerFileName};
use crate::ports::{DocumentRepository, ValidationReporter};
use crate::version::{DocumentContent, OnePagerVersion};

/// Folder below the data directory holding the employee folders
pub const ONE_PAGER_DIR: &str = "onepagers";

/// Reads one-pagers from `<data_dir>/onepagers/<Name>_<FamilyName>_<Id>/`
#[derive(Debug, Clone)]
pub struct LocalFileOnePagerRepository {
    root: PathBuf,
}

impl LocalFileOnePagerRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root: data_dir.as_ref().join(ONE_PAGER_DIR),
        }
    }

    /// All employee folders, sorted by id
    pub async fn employee_folders(&self) -> Result<Vec<(EmployeeFolder, PathBuf)>> {
        let mut folders = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.root.display(), "No one-pager directory");
                return Ok(folders);
            }
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            match EmployeeFolder::parse(&name) {
                Some(folder) => folders.push((folder, entry.path())),
                None => warn!(folder = %name, "Ignoring folder without employee id"),
            }
        }

        folders.sort_by(|(a, _), (b, _)| a.employee_id.cmp(&b.employee_id));
        Ok(folders)
    }

    async fn employee_dir(&self, employee_id: &str) -> Result<Option<PathBuf>> {
        Ok(self
            .employee_folders()
            .await?
            .into_iter()
            .find(|(folder, _)| folder.employee_id == employee_id)
            .map(|(_, path)| path))
    }

    /// Store a document in the employee folder under its conventional name
    pub async fn save_one_pager(
        &self,
        folder: &EmployeeFolder,
        file_name: &OnePagerFileName,
        bytes: &[u8],
    ) -> Result<PathBuf> {
        let dir = self.root.join(folder.to_string());
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(file_name.to_string());
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

#[async_trait]
impl DocumentRepository for LocalFileOnePagerRepository {
    async fn get_all_versions_of_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<OnePagerVersion>> {
        let Some(dir) = self.employee_dir(employee_id).await? else {
            debug!(employee = employee_id, "No employee folder");
            return Ok(Vec::new());
        };

        let mut versions = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(parsed) = OnePagerFileName::parse(&name) else {
                debug!(employee = employee_id, file = %name, "Skipping non one-pager file");
                continue;
            };
            let last_update = Utc.from_utc_datetime(&parsed.date.and_time(NaiveTime::default()));
            versions.push(
                OnePagerVersion::new(name, last_update, DocumentContent::File(entry.path()))
                    .with_locale(Some(parsed.locale)),
            );
        }
        Ok(versions)
    }

    async fn get_all_employee_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .employee_folders()
            .await?
            .into_iter()
            .map(|(folder, _)| folder.employee_id)
            .collect())
    }
}

/// Stores findings as `<data_dir>/<id>_validation.json`
#[derive(Debug, Clone)]
pub struct LocalFileValidationReporter {
    data_dir: PathBuf,
}

impl LocalFileValidationReporter {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of an employee's report file
    pub fn report_path(&self, employee_id: &str) -> PathBuf {
        self.data_dir.join(format!("{employee_id}_validation.json"))
    }

    /// Stored report including the document label
    pub async fn read_report(&self, employee_id: &str) -> Result<Option<StoredReport>> {
        match tokio::fs::read(self.report_path(employee_id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ValidationReporter for LocalFileValidationReporter {
    async fn report_valid(&self, employee_id: &str) -> Result<()> {
        match tokio::fs::remove_file(self.report_path(employee_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn report_errors(
        &self,
        employee_id: &str,
        document: &str,
        errors: &[ValidationError],
    ) -> Result<()> {
        let report = StoredReport {
            document: document.to_string(),
            errors: errors.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&report)?;
        tokio::fs::create_dir_all(&self.data_dir).await?;
        tokio::fs::write(self.report_path(employee_id), json).await?;
        Ok(())
    }

    async fn get_result_for(&self, employee_id: &str) -> Result<Vec<ValidationError>> {
        Ok(self
            .read_report(employee_id)
            .await?
            .map(|report| report.errors)
            .unwrap_or_default())
    }
}
