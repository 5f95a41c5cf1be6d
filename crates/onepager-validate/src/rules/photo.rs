//! Presence and quality of the employee photo
//!
//! Every image used on a one-pager slide is sent to a [`PhotoScorer`]. Images
//! with a face are scored on five quality labels. Each label probability is
//! sharpened by a symmetric gain transform and the results are averaged with
//! fixed weights.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use onepager_deck::ImageRef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PhotoSettings;
use crate::{OnePagerContext, Result, ValidationError, ValidationRule};

/// Label weights: bright background, neutral background, white shirt,
/// high quality, business attire
pub const LABEL_WEIGHTS: [f64; 5] = [2.0, 1.0, 1.0, 3.0, 3.0];

/// Failure of the external scoring service for one image
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Photo scorer error: {0}")]
pub struct ScorerError(pub String);

/// A detected face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Detection confidence in `[0, 1]`
    pub confidence: f64,
}

/// Independent label probabilities returned by the quality scorer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoLabels {
    pub bright_background: f64,
    pub neutral_background: f64,
    pub white_shirt: f64,
    pub high_quality: f64,
    pub business_attire: f64,
}

impl PhotoLabels {
    /// All labels set to `p`
    pub fn uniform(p: f64) -> Self {
        Self {
            bright_background: p,
            neutral_background: p,
            white_shirt: p,
            high_quality: p,
            business_attire: p,
        }
    }

    /// Whether every label is a real number
    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|p| p.is_finite())
    }

    fn as_array(&self) -> [f64; 5] {
        [
            self.bright_background,
            self.neutral_background,
            self.white_shirt,
            self.high_quality,
            self.business_attire,
        ]
    }

    /// Weighted average of the gained probabilities
    pub fn combined_score(&self, k: f64) -> f64 {
        let total: f64 = LABEL_WEIGHTS.iter().sum();
        self.as_array()
            .iter()
            .zip(LABEL_WEIGHTS)
            .map(|(p, weight)| gain(*p, k) * weight)
            .sum::<f64>()
            / total
    }
}

/// Push `p` away from 0.5 towards its nearer extreme
///
/// `k = 1` is the identity; larger `k` steepens the curve.
pub fn gain(p: f64, k: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    let v = p.min(1.0 - p);
    let a = 0.5 * (2.0 * v).powf(k);
    if p < 0.5 {
        a
    } else {
        1.0 - a
    }
}

/// External face detection and quality labelling
#[async_trait]
pub trait PhotoScorer: Send + Sync {
    async fn detect_faces(&self, image: &[u8]) -> std::result::Result<Vec<Face>, ScorerError>;

    async fn score_quality(&self, image: &[u8]) -> std::result::Result<PhotoLabels, ScorerError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Assessment {
    Face { score: f64 },
    NoFace,
    Failed,
}

/// Checks that a photo is present, alone and of sufficient quality
#[derive(Clone)]
pub struct PhotoRule {
    scorer: Arc<dyn PhotoScorer>,
    gain_k: f64,
    low_quality_threshold: f64,
}

impl PhotoRule {
    pub fn new(scorer: Arc<dyn PhotoScorer>) -> Self {
        let defaults = PhotoSettings::default();
        Self {
            scorer,
            gain_k: defaults.gain_k,
            low_quality_threshold: defaults.low_quality_threshold,
        }
    }

    pub fn with_settings(mut self, settings: &PhotoSettings) -> Self {
        self.gain_k = settings.gain_k;
        self.low_quality_threshold = settings.low_quality_threshold;
        self
    }

    async fn assess(&self, image: &ImageRef) -> Assessment {
        let data = match image.data().await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(image = image.path(), error = %e, "Cannot read image");
                return Assessment::Failed;
            }
        };

        let faces = match self.scorer.detect_faces(&data).await {
            Ok(faces) => faces,
            Err(e) => {
                tracing::warn!(image = image.path(), error = %e, "Face detection failed");
                return Assessment::Failed;
            }
        };
        if faces.is_empty() {
            return Assessment::NoFace;
        }

        match self.scorer.score_quality(&data).await {
            Ok(labels) if !labels.is_finite() => {
                tracing::warn!(
                    image = image.path(),
                    ?labels,
                    "Quality scorer returned non-finite labels"
                );
                Assessment::Failed
            }
            Ok(labels) => {
                let score = labels.combined_score(self.gain_k);
                tracing::debug!(image = image.path(), score, "Photo scored");
                Assessment::Face { score }
            }
            Err(e) => {
                tracing::warn!(image = image.path(), error = %e, "Quality scoring failed");
                Assessment::Failed
            }
        }
    }

    /// Findings for the assessments of all used images
    fn findings(&self, assessments: &[Assessment]) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let scores: Vec<f64> = assessments
            .iter()
            .filter_map(|a| match a {
                Assessment::Face { score } => Some(*score),
                _ => None,
            })
            .collect();

        if scores.is_empty() {
            errors.push(ValidationError::MissingPhoto);
        }
        if assessments
            .iter()
            .any(|a| !matches!(a, Assessment::Face { .. }))
        {
            errors.push(ValidationError::OtherImages);
        }
        if scores.iter().any(|s| *s < self.low_quality_threshold) {
            errors.push(ValidationError::LowQualityPhoto);
        }
        errors
    }
}

impl std::fmt::Debug for PhotoRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoRule")
            .field("gain_k", &self.gain_k)
            .field("low_quality_threshold", &self.low_quality_threshold)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ValidationRule for PhotoRule {
    fn name(&self) -> &'static str {
        "photo"
    }

    async fn validate(&self, ctx: &OnePagerContext) -> Result<Vec<ValidationError>> {
        let images = ctx.deck.used_images().await?;
        let assessments = join_all(images.iter().map(|image| self.assess(image))).await;

        let failed = assessments
            .iter()
            .filter(|a| **a == Assessment::Failed)
            .count();
        if failed > 0 {
            tracing::warn!(
                document = %ctx.version.name,
                failed,
                total = assessments.len(),
                "Images could not be scored, treated as without face"
            );
        }

        Ok(self.findings(&assessments))
    }
}
