//! Consistency between the file-name locale and the content language

use async_trait::async_trait;
use onepager_deck::Locale;

use crate::{OnePagerContext, Result, ValidationError, ValidationRule};

/// Compares detected content languages with the file-name indicator
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageRule;

impl LanguageRule {
    /// Decide the finding for an indicator and the distinct detected languages
    ///
    /// Checked in order: mixed content, missing indicator, match, nothing
    /// detected, mismatch.
    pub fn check(indicator: Option<Locale>, detected: &[Locale]) -> Option<ValidationError> {
        if detected.len() > 1 {
            return Some(ValidationError::MixedLanguageVersion);
        }
        let Some(indicator) = indicator else {
            return Some(ValidationError::MissingLanguageIndicatorInName);
        };
        match detected.first() {
            Some(language) if *language == indicator => None,
            None => None,
            Some(_) => Some(ValidationError::WrongLanguageContent),
        }
    }
}

#[async_trait]
impl ValidationRule for LanguageRule {
    fn name(&self) -> &'static str {
        "language"
    }

    async fn validate(&self, ctx: &OnePagerContext) -> Result<Vec<ValidationError>> {
        let detected = ctx.deck.content_languages().await?;
        let finding = Self::check(ctx.version.locale, &detected);
        if let Some(error) = finding {
            tracing::debug!(
                document = %ctx.version.name,
                indicator = ?ctx.version.locale,
                detected = ?detected,
                %error,
                "Language check failed"
            );
        }
        Ok(finding.into_iter().collect())
    }
}
