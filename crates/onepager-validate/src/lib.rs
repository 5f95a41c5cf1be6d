//! # onepager-validate
//!
//! Compliance rules for one-pager decks and the orchestration that applies
//! them to an employee's newest document.
//!
//! # Architecture
//!
//! Individual checks implement the [`ValidationRule`] trait. [`combine`]
//! runs a set of rules concurrently against one [`OnePagerContext`] and
//! flattens their findings in declaration order. [`OnePagerValidation`]
//! fetches an employee's documents through a [`DocumentRepository`], picks
//! the newest, evaluates it and stores the outcome through a
//! [`ValidationReporter`].
//!
//! # Example
//!
//! ```rust,ignore
//! use onepager_validate::{combine, rules::{AgeRule, LanguageRule}};
//!
//! let rule = combine(vec![Box::new(AgeRule), Box::new(LanguageRule)]);
//! let errors = rule.validate(&context).await?;
//! ```

pub mod adapters;
pub mod codes;
pub mod config;
pub mod error;
pub mod naming;
pub mod orchestrator;
pub mod ports;
pub mod rules;
pub mod version;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use onepager_deck::SlideDeck;

// Re-exports
pub use codes::ValidationError;
pub use config::Settings;
pub use error::{Result, ValidateError};
pub use naming::{locale_from_file_name, EmployeeFolder, OnePagerFileName};
pub use orchestrator::{select_newest, OnePagerValidation, ValidationOutcome};
pub use ports::{DocumentRepository, ValidationReporter};
pub use version::{DocumentContent, EmployeeId, OnePagerVersion};

/// Everything a rule may look at for one document version
///
/// Rules only borrow the context; the deck is read-only and shared by all
/// rules of one evaluation.
#[derive(Debug)]
pub struct OnePagerContext {
    pub version: OnePagerVersion,
    pub deck: SlideDeck,
    /// Reference time for age checks
    pub now: DateTime<Utc>,
}

impl OnePagerContext {
    pub fn new(version: OnePagerVersion, deck: SlideDeck, now: DateTime<Utc>) -> Self {
        Self { version, deck, now }
    }
}

/// A compliance check over one document version
///
/// Expected domain conditions are returned as findings; an `Err` aborts the
/// whole evaluation.
#[async_trait]
pub trait ValidationRule: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Evaluate the rule, returning its findings (empty if none)
    async fn validate(&self, ctx: &OnePagerContext) -> Result<Vec<ValidationError>>;
}

/// Rules evaluated together as one
///
/// Created by [`combine`].
pub struct CombinedRule {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl CombinedRule {
    /// Number of constituent rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Names of the constituent rules, in declaration order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

impl std::fmt::Debug for CombinedRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedRule")
            .field("rules", &self.rule_names())
            .finish()
    }
}

#[async_trait]
impl ValidationRule for CombinedRule {
    fn name(&self) -> &'static str {
        "combined"
    }

    async fn validate(&self, ctx: &OnePagerContext) -> Result<Vec<ValidationError>> {
        let results = try_join_all(self.rules.iter().map(|rule| async move {
            let errors = rule.validate(ctx).await?;
            tracing::debug!(rule = rule.name(), findings = errors.len(), "Rule evaluated");
            Ok::<_, ValidateError>(errors)
        }))
        .await?;

        Ok(results.into_iter().flatten().collect())
    }
}

/// Combine rules into one that runs them concurrently
///
/// Findings are concatenated in the order of `rules`, independent of which
/// rule finishes first. The first failing rule fails the combination.
pub fn combine(rules: Vec<Box<dyn ValidationRule>>) -> CombinedRule {
    CombinedRule { rules }
}
