//! Conformance with the canonical template

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use onepager_deck::theme::unique_by_digest;
use onepager_deck::{DeckError, Theme, ThemeResolver};
use onepager_ooxml::OoxmlArchive;
use tokio::sync::OnceCell;

use crate::version::DocumentContent;
use crate::{OnePagerContext, Result, ValidationError, ValidationRule};

/// Lazily loaded theme set of the canonical template
///
/// Owned by the caller and shared by every evaluation. Loaded on first use
/// and never refreshed, so a template that changes on disk is only picked up
/// by a new instance.
#[derive(Debug)]
pub struct TemplateThemes {
    source: Option<DocumentContent>,
    themes: OnceCell<Vec<Theme>>,
}

impl TemplateThemes {
    /// Load the template from `source` on first use
    pub fn new(source: impl Into<DocumentContent>) -> Self {
        Self {
            source: Some(source.into()),
            themes: OnceCell::new(),
        }
    }

    /// Template stored on disk
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(DocumentContent::File(path.into()))
    }

    /// Use an already known theme set
    pub fn preloaded(themes: Vec<Theme>) -> Self {
        Self {
            source: None,
            themes: OnceCell::new_with(Some(themes)),
        }
    }

    /// Themes of all slide masters of the template, de-duplicated by digest
    pub async fn themes(&self) -> Result<&[Theme]> {
        let themes = self.themes.get_or_try_init(|| self.load()).await?;
        Ok(themes.as_slice())
    }

    async fn load(&self) -> Result<Vec<Theme>> {
        let Some(source) = &self.source else {
            return Ok(Vec::new());
        };
        let bytes = source.load().await?;
        let archive = OoxmlArchive::from_bytes(bytes).map_err(DeckError::from)?;
        let themes = ThemeResolver::new(archive).master_themes().await?;
        let themes = unique_by_digest(themes.iter());
        tracing::info!(themes = themes.len(), "Loaded template themes");
        Ok(themes)
    }
}

/// Checks that the one-pager slides use the template's themes
#[derive(Debug, Clone)]
pub struct TemplateRule {
    template: Arc<TemplateThemes>,
}

impl TemplateRule {
    pub fn new(template: Arc<TemplateThemes>) -> Self {
        Self { template }
    }

    /// Decide the finding for the document themes against the template
    pub fn check(document: &[Theme], template: &[Theme]) -> Option<ValidationError> {
        if document.is_empty() {
            return Some(ValidationError::UsingUnknownTemplate);
        }

        let known = |theme: &Theme| template.iter().any(|t| t.same_visual_theme(theme));
        if document.iter().all(known) {
            return None;
        }

        let related = document.iter().any(|theme| {
            template.iter().any(|t| {
                t.same_visual_theme(theme) || (!theme.name.is_empty() && t.name == theme.name)
            })
        });
        if related {
            Some(ValidationError::UsingModifiedTemplate)
        } else {
            Some(ValidationError::UsingUnknownTemplate)
        }
    }
}

#[async_trait]
impl ValidationRule for TemplateRule {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn validate(&self, ctx: &OnePagerContext) -> Result<Vec<ValidationError>> {
        let template = self.template.themes().await?;

        let mut document = ctx.deck.themes_in_use().await?;
        if document.is_empty() {
            document = ctx.deck.all_slide_themes().await?;
        }

        let finding = Self::check(&document, template);
        if let Some(error) = finding {
            let names: Vec<&str> = document.iter().map(|t| t.name.as_str()).collect();
            tracing::debug!(document = %ctx.version.name, themes = ?names, %error, "Template check failed");
        }
        Ok(finding.into_iter().collect())
    }
}
