//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use onepager_deck::{ClassifierError, LanguageClassifier, SlideDeck};
use onepager_ooxml::test_utils::{PptxBuilder, SlideFixture};
use onepager_validate::rules::{Face, PhotoLabels, PhotoScorer, ScorerError};
use onepager_validate::{OnePagerContext, OnePagerVersion};

pub const GERMAN: [&str; 3] = ["Profil und Werdegang", "Kenntnisse", "Projekte"];
pub const ENGLISH: [&str; 3] = ["Work on the platform", "Skills in the cloud", "Projects"];

/// Answers "eng" for text containing " the ", "deu" otherwise
pub struct KeywordClassifier;

#[async_trait]
impl LanguageClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<String, ClassifierError> {
        if text.contains(" the ") {
            Ok("eng".to_string())
        } else {
            Ok("deu".to_string())
        }
    }
}

/// Scores images by their content marker
///
/// `face-good` and `face-poor` carry a face with all labels at 1 or 0,
/// `face-nan` carries a face whose labels are not numbers, `logo` has no
/// face and `broken` makes the scorer fail.
pub struct MarkerScorer;

#[async_trait]
impl PhotoScorer for MarkerScorer {
    async fn detect_faces(&self, image: &[u8]) -> Result<Vec<Face>, ScorerError> {
        match image {
            b"broken" => Err(ScorerError("cannot decode image".to_string())),
            b"face-good" | b"face-poor" | b"face-nan" => Ok(vec![Face { confidence: 0.98 }]),
            _ => Ok(Vec::new()),
        }
    }

    async fn score_quality(&self, image: &[u8]) -> Result<PhotoLabels, ScorerError> {
        match image {
            b"face-good" => Ok(PhotoLabels::uniform(1.0)),
            b"face-poor" => Ok(PhotoLabels::uniform(0.0)),
            b"face-nan" => Ok(PhotoLabels::uniform(f64::NAN)),
            _ => Err(ScorerError("no face".to_string())),
        }
    }
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 15, 12, 0, 0).unwrap()
}

/// A one-pager slide in the given language with a photo
pub fn one_pager(texts: [&str; 3], photo: &str) -> SlideFixture {
    SlideFixture::new(&texts).image(photo)
}

/// A compliant German one-pager package with a good photo
pub fn compliant_deck() -> PptxBuilder {
    PptxBuilder::new()
        .slide_with(one_pager(GERMAN, "photo.png"))
        .media("photo.png", b"face-good".to_vec())
}

pub fn version(name: &str, last_update: DateTime<Utc>, bytes: Vec<u8>) -> OnePagerVersion {
    OnePagerVersion::new(name, last_update, bytes)
}

/// Context for a document named `name`, last updated at `last_update`
pub fn context(name: &str, last_update: DateTime<Utc>, builder: PptxBuilder) -> OnePagerContext {
    let bytes = builder.build();
    let deck = SlideDeck::load(bytes.clone(), Arc::new(KeywordClassifier)).unwrap();
    OnePagerContext::new(version(name, last_update, bytes), deck, now())
}
