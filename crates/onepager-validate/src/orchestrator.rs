//! Per-employee validation run
//!
//! One call handles one employee: fetch all versions, select the newest,
//! evaluate it and report the result. Evaluation errors are returned before
//! anything is reported, so a stored record always reflects a complete run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use onepager_deck::{LanguageClassifier, SlideDeck};
use tracing::{debug, info};

use crate::codes::ValidationError;
use crate::error::Result;
use crate::ports::{DocumentRepository, ValidationReporter};
use crate::version::OnePagerVersion;
use crate::{OnePagerContext, ValidationRule};

/// Result of validating one employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The employee has no documents; nothing was reported
    NoDocuments,
    /// The newest document passed every rule
    Valid { document: String },
    /// The newest document has findings
    Invalid {
        document: String,
        errors: Vec<ValidationError>,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }

    /// Findings of the evaluated document (empty unless invalid)
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ValidationOutcome::Invalid { errors, .. } => errors,
            _ => &[],
        }
    }
}

/// Pick the version with the latest update
///
/// Equal timestamps are decided by the lexicographically smallest name.
pub fn select_newest(versions: Vec<OnePagerVersion>) -> Option<OnePagerVersion> {
    versions.into_iter().max_by(|a, b| {
        a.last_update_by_employee
            .cmp(&b.last_update_by_employee)
            .then_with(|| b.name.cmp(&a.name))
    })
}

/// Validates employees' newest one-pagers and reports the results
#[derive(Clone)]
pub struct OnePagerValidation {
    repository: Arc<dyn DocumentRepository>,
    reporter: Arc<dyn ValidationReporter>,
    classifier: Arc<dyn LanguageClassifier>,
    rule: Arc<dyn ValidationRule>,
}

impl OnePagerValidation {
    pub fn new(
        repository: Arc<dyn DocumentRepository>,
        reporter: Arc<dyn ValidationReporter>,
        classifier: Arc<dyn LanguageClassifier>,
        rule: Arc<dyn ValidationRule>,
    ) -> Self {
        Self {
            repository,
            reporter,
            classifier,
            rule,
        }
    }

    /// Validate against the current time
    pub async fn validate_employee(&self, employee_id: &str) -> Result<ValidationOutcome> {
        self.validate_employee_at(employee_id, Utc::now()).await
    }

    /// Validate against `now`
    pub async fn validate_employee_at(
        &self,
        employee_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ValidationOutcome> {
        let versions = self
            .repository
            .get_all_versions_of_employee(employee_id)
            .await?;
        debug!(employee = employee_id, versions = versions.len(), "Fetched versions");

        let Some(version) = select_newest(versions) else {
            info!(employee = employee_id, "No one-pager found, nothing to validate");
            return Ok(ValidationOutcome::NoDocuments);
        };
        debug!(
            employee = employee_id,
            document = %version.name,
            last_update = %version.last_update_by_employee,
            "Selected newest version"
        );

        let document = version.name.clone();
        let errors = self.evaluate(version, now).await?;

        if errors.is_empty() {
            self.reporter.report_valid(employee_id).await?;
            info!(employee = employee_id, document = %document, "One-pager is valid");
            Ok(ValidationOutcome::Valid { document })
        } else {
            self.reporter
                .report_errors(employee_id, &document, &errors)
                .await?;
            let codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
            info!(employee = employee_id, document = %document, errors = ?codes, "One-pager has findings");
            Ok(ValidationOutcome::Invalid { document, errors })
        }
    }

    /// Run the rule set against one version without reporting
    pub async fn evaluate(
        &self,
        version: OnePagerVersion,
        now: DateTime<Utc>,
    ) -> Result<Vec<ValidationError>> {
        let bytes = version.content.load().await?;
        let deck = SlideDeck::load(bytes, Arc::clone(&self.classifier))?;
        let ctx = OnePagerContext::new(version, deck, now);
        self.rule.validate(&ctx).await
    }
}

impl std::fmt::Debug for OnePagerValidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnePagerValidation")
            .field("rule", &self.rule.name())
            .finish_non_exhaustive()
    }
}
