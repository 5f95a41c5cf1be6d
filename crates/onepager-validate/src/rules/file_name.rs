//! Naming convention of the document file

use async_trait::async_trait;

use crate::naming::OnePagerFileName;
use crate::{OnePagerContext, Result, ValidationError, ValidationRule};

/// Flags documents not named `"<FamilyName>, <Name>_<DE|EN>_<yyMMdd>.pptx"`
#[derive(Debug, Clone, Copy, Default)]
pub struct FileNameRule;

#[async_trait]
impl ValidationRule for FileNameRule {
    fn name(&self) -> &'static str {
        "file_name"
    }

    async fn validate(&self, ctx: &OnePagerContext) -> Result<Vec<ValidationError>> {
        let name = ctx.version.name.trim();
        if name.is_empty() || !OnePagerFileName::matches(name) {
            return Ok(vec![ValidationError::WrongFileName]);
        }
        Ok(Vec::new())
    }
}
