//! Content language identification.
//!
//! The classifier is a thin, swappable collaborator that returns an ISO 639-3
//! code. Only two locales are meaningful for one-pagers; everything else is
//! treated as undetermined.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ClassifierError;

/// Code returned when the classifier has no answer
pub const UNDETERMINED: &str = "und";

/// Locales a one-pager can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Locale {
    /// German
    De,
    /// English
    En,
}

impl Locale {
    /// Two-letter indicator as used in file names
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::De => "DE",
            Locale::En => "EN",
        }
    }

    /// Map a classifier language code into the locale domain
    ///
    /// Accepts ISO 639-3 (`deu`, `eng`), the bibliographic `ger` and
    /// ISO 639-1 (`de`, `en`), case-insensitively.
    pub fn from_language_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "deu" | "ger" | "de" => Some(Locale::De),
            "eng" | "en" => Some(Locale::En),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DE" => Ok(Locale::De),
            "EN" => Ok(Locale::En),
            other => Err(format!("unknown locale indicator '{}'", other)),
        }
    }
}

/// Statistical text-language identifier
#[async_trait]
pub trait LanguageClassifier: Send + Sync {
    /// Classify `text`, returning a language code or [`UNDETERMINED`]
    async fn classify(&self, text: &str) -> Result<String, ClassifierError>;
}

/// Trigram-based classifier backed by `whatlang`
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangClassifier;

#[async_trait]
impl LanguageClassifier for WhatlangClassifier {
    async fn classify(&self, text: &str) -> Result<String, ClassifierError> {
        Ok(whatlang::detect(text)
            .map(|info| info.lang().code().to_string())
            .unwrap_or_else(|| UNDETERMINED.to_string()))
    }
}

/// Classify a slide's text and map the result into the locale domain
///
/// Languages outside the domain are logged and reported as `None`;
/// classifier failures propagate.
pub async fn detect_locale(
    classifier: &dyn LanguageClassifier,
    text: &str,
    slide: usize,
) -> Result<Option<Locale>, ClassifierError> {
    let code = classifier.classify(text).await?;
    match Locale::from_language_code(&code) {
        Some(locale) => {
            debug!(slide, %locale, "detected slide language");
            Ok(Some(locale))
        }
        None => {
            warn!(slide, code = %code, "detected language is not a supported locale");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    #[async_trait]
    impl LanguageClassifier for Fixed {
        async fn classify(&self, _text: &str) -> Result<String, ClassifierError> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl LanguageClassifier for Failing {
        async fn classify(&self, _text: &str) -> Result<String, ClassifierError> {
            Err(ClassifierError("model unavailable".to_string()))
        }
    }

    #[test]
    fn test_locale_from_language_code() {
        assert_eq!(Locale::from_language_code("deu"), Some(Locale::De));
        assert_eq!(Locale::from_language_code("ENG"), Some(Locale::En));
        assert_eq!(Locale::from_language_code("de"), Some(Locale::De));
        assert_eq!(Locale::from_language_code("fra"), None);
        assert_eq!(Locale::from_language_code(UNDETERMINED), None);
    }

    #[test]
    fn test_locale_parse_and_display() {
        assert_eq!("de".parse::<Locale>().unwrap(), Locale::De);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert!("FR".parse::<Locale>().is_err());
        assert_eq!(Locale::En.to_string(), "EN");
    }

    #[tokio::test]
    async fn test_detect_locale_maps_codes() {
        assert_eq!(
            detect_locale(&Fixed("deu"), "text", 1).await.unwrap(),
            Some(Locale::De)
        );
        assert_eq!(detect_locale(&Fixed("spa"), "texto", 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_detect_locale_propagates_failures() {
        let err = detect_locale(&Failing, "text", 1).await.unwrap_err();
        assert_eq!(err.0, "model unavailable");
    }

    #[tokio::test]
    async fn test_whatlang_classifier() {
        let german = "Ich arbeite seit vielen Jahren als Softwareentwickler und habe \
                      umfangreiche Erfahrung in der Entwicklung von verteilten Systemen.";
        let english = "I have been working as a software developer for many years and \
                       have extensive experience in building distributed systems.";

        assert_eq!(WhatlangClassifier.classify(german).await.unwrap(), "deu");
        assert_eq!(WhatlangClassifier.classify(english).await.unwrap(), "eng");
    }
}
