//! Closed vocabulary of policy findings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A policy finding produced by a rule
///
/// Findings are data, never Rust errors. They serialize to their stable
/// upper-case codes, e.g. `"OLDER_THAN_SIX_MONTHS"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationError {
    OlderThanSixMonths,
    MissingLanguageIndicatorInName,
    MixedLanguageVersion,
    WrongLanguageContent,
    UsingModifiedTemplate,
    UsingUnknownTemplate,
    MissingPhoto,
    OtherImages,
    LowQualityPhoto,
    /// Only emitted when the file-name rule is enabled
    WrongFileName,
}

impl ValidationError {
    /// Every code, in vocabulary order
    pub const ALL: [ValidationError; 10] = [
        ValidationError::OlderThanSixMonths,
        ValidationError::MissingLanguageIndicatorInName,
        ValidationError::MixedLanguageVersion,
        ValidationError::WrongLanguageContent,
        ValidationError::UsingModifiedTemplate,
        ValidationError::UsingUnknownTemplate,
        ValidationError::MissingPhoto,
        ValidationError::OtherImages,
        ValidationError::LowQualityPhoto,
        ValidationError::WrongFileName,
    ];

    /// Stable string code
    pub fn code(self) -> &'static str {
        match self {
            ValidationError::OlderThanSixMonths => "OLDER_THAN_SIX_MONTHS",
            ValidationError::MissingLanguageIndicatorInName => "MISSING_LANGUAGE_INDICATOR_IN_NAME",
            ValidationError::MixedLanguageVersion => "MIXED_LANGUAGE_VERSION",
            ValidationError::WrongLanguageContent => "WRONG_LANGUAGE_CONTENT",
            ValidationError::UsingModifiedTemplate => "USING_MODIFIED_TEMPLATE",
            ValidationError::UsingUnknownTemplate => "USING_UNKNOWN_TEMPLATE",
            ValidationError::MissingPhoto => "MISSING_PHOTO",
            ValidationError::OtherImages => "OTHER_IMAGES",
            ValidationError::LowQualityPhoto => "LOW_QUALITY_PHOTO",
            ValidationError::WrongFileName => "WRONG_FILE_NAME",
        }
    }

    /// Short human-readable explanation
    pub fn description(self) -> &'static str {
        match self {
            ValidationError::OlderThanSixMonths => "last update is older than six months",
            ValidationError::MissingLanguageIndicatorInName => {
                "file name carries no language indicator"
            }
            ValidationError::MixedLanguageVersion => "slides are written in more than one language",
            ValidationError::WrongLanguageContent => {
                "content language differs from the file name indicator"
            }
            ValidationError::UsingModifiedTemplate => "template theme has been altered",
            ValidationError::UsingUnknownTemplate => "document is not based on the template",
            ValidationError::MissingPhoto => "no photo with a face was found",
            ValidationError::OtherImages => "images other than the photo are used",
            ValidationError::LowQualityPhoto => "photo quality is too low",
            ValidationError::WrongFileName => "file name does not follow the naming convention",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ValidationError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.code() == s)
            .ok_or_else(|| format!("unknown validation error code: {s}"))
    }
}
