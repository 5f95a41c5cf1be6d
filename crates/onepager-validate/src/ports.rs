//! Collaborator interfaces of the orchestrator

use async_trait::async_trait;

use crate::codes::ValidationError;
use crate::error::Result;
use crate::version::OnePagerVersion;

/// Source of an employee's documents
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Every stored version of the employee's one-pager, in no particular order
    async fn get_all_versions_of_employee(&self, employee_id: &str)
        -> Result<Vec<OnePagerVersion>>;

    /// Ids of all employees known to the repository
    async fn get_all_employee_ids(&self) -> Result<Vec<String>>;
}

/// Sink for validation results, one record per employee
///
/// A record is either absent (valid) or the complete findings of the last
/// evaluated document.
#[async_trait]
pub trait ValidationReporter: Send + Sync {
    /// Clear any stored findings; calling it repeatedly is harmless
    async fn report_valid(&self, employee_id: &str) -> Result<()>;

    /// Replace the stored findings with `errors`
    async fn report_errors(
        &self,
        employee_id: &str,
        document: &str,
        errors: &[ValidationError],
    ) -> Result<()>;

    /// Stored findings, empty if the employee is valid or unknown
    async fn get_result_for(&self, employee_id: &str) -> Result<Vec<ValidationError>>;
}
