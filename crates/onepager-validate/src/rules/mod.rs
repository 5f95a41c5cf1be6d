//! The one-pager rule set
//!
//! | Rule | Findings |
//! |------|----------|
//! | [`AgeRule`] | `OLDER_THAN_SIX_MONTHS` |
//! | [`LanguageRule`] | `MISSING_LANGUAGE_INDICATOR_IN_NAME`, `MIXED_LANGUAGE_VERSION`, `WRONG_LANGUAGE_CONTENT` |
//! | [`TemplateRule`] | `USING_MODIFIED_TEMPLATE`, `USING_UNKNOWN_TEMPLATE` |
//! | [`PhotoRule`] | `MISSING_PHOTO`, `OTHER_IMAGES`, `LOW_QUALITY_PHOTO` |
//! | [`FileNameRule`] | `WRONG_FILE_NAME` (opt-in) |

pub mod age;
pub mod file_name;
pub mod language;
pub mod photo;
pub mod template;

use std::sync::Arc;

pub use age::AgeRule;
pub use file_name::FileNameRule;
pub use language::LanguageRule;
pub use photo::{Face, PhotoLabels, PhotoRule, PhotoScorer, ScorerError};
pub use template::{TemplateRule, TemplateThemes};

use crate::config::Settings;
use crate::{combine, CombinedRule, ValidationRule};

/// Build the configured rule set
///
/// The photo rule needs a scorer; without one it is left out even when
/// enabled in `settings`.
pub fn all_rules(
    settings: &Settings,
    template: Arc<TemplateThemes>,
    scorer: Option<Arc<dyn PhotoScorer>>,
) -> CombinedRule {
    let mut rules: Vec<Box<dyn ValidationRule>> = vec![
        Box::new(AgeRule),
        Box::new(LanguageRule),
        Box::new(TemplateRule::new(template)),
    ];

    match scorer {
        Some(scorer) if settings.rules.photo => {
            rules.push(Box::new(PhotoRule::new(scorer).with_settings(&settings.photo)));
        }
        None if settings.rules.photo => {
            tracing::info!("Photo rule enabled but no photo scorer configured, skipping");
        }
        _ => {}
    }

    if settings.rules.file_name {
        rules.push(Box::new(FileNameRule));
    }

    combine(rules)
}
