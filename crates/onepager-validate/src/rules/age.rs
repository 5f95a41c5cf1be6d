//! Freshness of the document

use async_trait::async_trait;
use chrono::{DateTime, Months, Utc};

use crate::{OnePagerContext, Result, ValidationError, ValidationRule};

/// Months after which a one-pager counts as outdated
pub const MAX_AGE_MONTHS: u32 = 6;

/// Flags documents not updated within the last six months
#[derive(Debug, Clone, Copy, Default)]
pub struct AgeRule;

impl AgeRule {
    /// Whether `last_update` lies before `now` minus six months
    pub fn is_outdated(last_update: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.checked_sub_months(Months::new(MAX_AGE_MONTHS))
            .is_some_and(|limit| last_update < limit)
    }
}

#[async_trait]
impl ValidationRule for AgeRule {
    fn name(&self) -> &'static str {
        "age"
    }

    async fn validate(&self, ctx: &OnePagerContext) -> Result<Vec<ValidationError>> {
        if Self::is_outdated(ctx.version.last_update_by_employee, ctx.now) {
            Ok(vec![ValidationError::OlderThanSixMonths])
        } else {
            Ok(Vec::new())
        }
    }
}
