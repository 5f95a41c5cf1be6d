//! The slide-deck aggregate.
//!
//! `SlideDeck::load` validates the package and resolves the presentation
//! order. The slides themselves are built on first access, concurrently, and
//! memoized for the lifetime of the deck.

use std::sync::Arc;

use futures::future::try_join_all;
use onepager_ooxml::{
    resolve_target, OoxmlArchive, OoxmlError, PRESENTATION_PATH, PRESENTATION_RELS_PATH,
};
use quick_xml::events::Event;
use quick_xml::Reader;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::{DeckError, Result};
use crate::language::{detect_locale, LanguageClassifier, Locale};
use crate::slide::{
    content_section_count, read_slide_part, ImageRef, Slide, ONE_PAGER_MIN_SECTIONS,
};
use crate::theme::{unique_by_digest, Theme, ThemeResolver};

/// A loaded presentation
///
/// Read-only after construction; safe to share across concurrent rule evaluations.
pub struct SlideDeck {
    archive: OoxmlArchive,
    slide_paths: Vec<String>,
    classifier: Arc<dyn LanguageClassifier>,
    themes: ThemeResolver,
    slides: OnceCell<Vec<Slide>>,
}

impl std::fmt::Debug for SlideDeck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlideDeck")
            .field("slide_paths", &self.slide_paths)
            .field("loaded", &self.slides.initialized())
            .finish()
    }
}

impl SlideDeck {
    /// Load a deck from the raw package bytes
    ///
    /// Fails if the bytes are not a zip container, or if `presentation.xml`,
    /// its relationships, or any referenced slide part is missing.
    pub fn load(
        bytes: impl Into<Arc<[u8]>>,
        classifier: Arc<dyn LanguageClassifier>,
    ) -> Result<Self> {
        let archive = OoxmlArchive::from_bytes(bytes)?;
        let slide_paths = presentation_order(&archive)?;

        if let Some(missing) = slide_paths.iter().find(|path| !archive.contains(path)) {
            return Err(OoxmlError::MissingEntry(missing.clone()).into());
        }

        debug!(slides = slide_paths.len(), "loaded presentation");

        Ok(Self {
            themes: ThemeResolver::new(archive.clone()),
            archive,
            slide_paths,
            classifier,
            slides: OnceCell::new(),
        })
    }

    /// All slides in presentation order
    ///
    /// Built at most once; concurrent first callers share the same computation.
    pub async fn slides(&self) -> Result<&[Slide]> {
        let slides = self
            .slides
            .get_or_try_init(|| self.build_slides())
            .await?;
        Ok(slides.as_slice())
    }

    /// Slides classified as one-pagers
    pub async fn one_pagers(&self) -> Result<Vec<&Slide>> {
        Ok(self
            .slides()
            .await?
            .iter()
            .filter(|slide| slide.is_one_pager)
            .collect())
    }

    /// Distinct languages detected on one-pager slides, first-seen order
    pub async fn content_languages(&self) -> Result<Vec<Locale>> {
        let mut languages = Vec::new();
        for slide in self.one_pagers().await? {
            if let Some(locale) = slide.used_language {
                if !languages.contains(&locale) {
                    languages.push(locale);
                }
            }
        }
        Ok(languages)
    }

    /// Themes of the one-pager slides, de-duplicated by digest
    pub async fn themes_in_use(&self) -> Result<Vec<Theme>> {
        let one_pagers = self.one_pagers().await?;
        Ok(unique_by_digest(one_pagers.iter().map(|slide| &slide.theme)))
    }

    /// Themes of all slides, de-duplicated by digest
    pub async fn all_slide_themes(&self) -> Result<Vec<Theme>> {
        let slides = self.slides().await?;
        Ok(unique_by_digest(slides.iter().map(|slide| &slide.theme)))
    }

    /// Images referenced by one-pager slides, de-duplicated by path
    pub async fn used_images(&self) -> Result<Vec<ImageRef>> {
        let mut images: Vec<ImageRef> = Vec::new();
        for slide in self.one_pagers().await? {
            for image in &slide.images {
                if !images.contains(image) {
                    images.push(image.clone());
                }
            }
        }
        Ok(images)
    }

    async fn build_slides(&self) -> Result<Vec<Slide>> {
        // try_join_all yields results in input order, not completion order
        try_join_all(
            self.slide_paths
                .iter()
                .enumerate()
                .map(|(i, path)| self.build_slide(i + 1, path)),
        )
        .await
    }

    async fn build_slide(&self, number: usize, path: &str) -> Result<Slide> {
        let archive = self.archive.clone();
        let part_path = path.to_string();
        let part = tokio::task::spawn_blocking(move || read_slide_part(&archive, &part_path))
            .await
            .map_err(|e| DeckError::Task(e.to_string()))??;

        let theme = self.themes.resolve(path, &part.relationships).await?;

        let sections = content_section_count(&part.texts);
        let is_one_pager = sections >= ONE_PAGER_MIN_SECTIONS;
        let used_language = if is_one_pager {
            detect_locale(self.classifier.as_ref(), &part.texts.join("\n"), number).await?
        } else {
            debug!(slide = number, sections, "too few content sections for language detection");
            None
        };

        let images = part
            .image_paths
            .into_iter()
            .map(|image| ImageRef::new(image, self.archive.clone()))
            .collect();

        Ok(Slide {
            number,
            path: path.to_string(),
            is_one_pager,
            texts: part.texts,
            images,
            used_language,
            theme,
        })
    }
}

/// Resolve the slide part paths in the order listed by `presentation.xml`
fn presentation_order(archive: &OoxmlArchive) -> Result<Vec<String>> {
    let xml = archive.presentation_xml()?;
    let rels = archive.presentation_rels()?;

    let mut reader = Reader::from_reader(xml.as_slice());
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut ids = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(OoxmlError::from)? {
            Event::Empty(ref e) | Event::Start(ref e) if e.local_name().as_ref() == b"sldId" => {
                // the relationship id is the namespaced r:id, not the numeric id
                for attr in e.attributes().filter_map(|a| a.ok()) {
                    if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id" {
                        if let Ok(value) = attr.unescape_value() {
                            ids.push(value.to_string());
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    ids.iter()
        .map(|id| {
            rels.get(id)
                .map(|target| resolve_target(PRESENTATION_PATH, target))
                .ok_or_else(|| {
                    DeckError::from(OoxmlError::MissingEntry(format!(
                        "{} ({})",
                        PRESENTATION_RELS_PATH, id
                    )))
                })
        })
        .collect()
}
