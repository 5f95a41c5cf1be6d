//! Map-backed adapters

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::StoredReport;
use crate::codes::ValidationError;
use crate::error::{Result, ValidateError};
use crate::ports::{DocumentRepository, ValidationReporter};
use crate::version::{EmployeeId, OnePagerVersion};

/// Documents held in memory, keyed by employee
#[derive(Debug, Clone, Default)]
pub struct InMemoryOnePagerRepository {
    one_pagers: HashMap<EmployeeId, Vec<OnePagerVersion>>,
}

impl InMemoryOnePagerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add versions for an employee
    pub fn with_versions(
        mut self,
        employee_id: impl Into<EmployeeId>,
        versions: impl IntoIterator<Item = OnePagerVersion>,
    ) -> Self {
        self.one_pagers
            .entry(employee_id.into())
            .or_default()
            .extend(versions);
        self
    }
}

#[async_trait]
impl DocumentRepository for InMemoryOnePagerRepository {
    async fn get_all_versions_of_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<OnePagerVersion>> {
        Ok(self.one_pagers.get(employee_id).cloned().unwrap_or_default())
    }

    async fn get_all_employee_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.one_pagers.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// Reports held in memory
#[derive(Debug, Default)]
pub struct InMemoryValidationReporter {
    reports: Mutex<HashMap<EmployeeId, StoredReport>>,
}

impl InMemoryValidationReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored report of an employee, including the document label
    pub fn report_for(&self, employee_id: &str) -> Option<StoredReport> {
        self.reports
            .lock()
            .ok()
            .and_then(|reports| reports.get(employee_id).cloned())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<EmployeeId, StoredReport>>> {
        self.reports
            .lock()
            .map_err(|e| ValidateError::Reporter(e.to_string()))
    }
}

#[async_trait]
impl ValidationReporter for InMemoryValidationReporter {
    async fn report_valid(&self, employee_id: &str) -> Result<()> {
        self.lock()?.remove(employee_id);
        Ok(())
    }

    async fn report_errors(
        &self,
        employee_id: &str,
        document: &str,
        errors: &[ValidationError],
    ) -> Result<()> {
        self.lock()?.insert(
            employee_id.to_string(),
            StoredReport {
                document: document.to_string(),
                errors: errors.to_vec(),
            },
        );
        Ok(())
    }

    async fn get_result_for(&self, employee_id: &str) -> Result<Vec<ValidationError>> {
        Ok(self
            .lock()?
            .get(employee_id)
            .map(|report| report.errors.clone())
            .unwrap_or_default())
    }
}
