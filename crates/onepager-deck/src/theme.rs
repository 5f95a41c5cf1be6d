//! Theme resolution.
//!
//! A slide reaches its theme through slide -> slideLayout -> slideMaster -> theme.
//! Themes are compared by a digest of the raw theme part.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use onepager_ooxml::{resolve_target, OoxmlArchive, Relationships};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::{DeckError, Result};

const MASTER_RELS_PREFIX: &str = "ppt/slideMasters/_rels/";

/// Visual theme of a slide
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Theme {
    /// Display name from the theme part (empty if the part has none)
    pub name: String,
    /// Part path inside the package
    pub path: String,
    /// Hex SHA-256 of the raw theme part
    pub digest: String,
}

impl Theme {
    /// Build a theme from its raw part content
    pub fn from_part(path: impl Into<String>, xml: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(xml);
        let digest = format!("{:x}", hasher.finalize());

        let name = theme_name(&String::from_utf8_lossy(xml)).unwrap_or_default();

        Self {
            name,
            path: path.into(),
            digest,
        }
    }

    /// Same visual theme: byte-identical theme parts
    pub fn same_visual_theme(&self, other: &Theme) -> bool {
        self.digest == other.digest
    }
}

/// Extract the display name of a theme part
///
/// Tolerates a numeric prefix such as `1_OnePager`.
pub fn theme_name(xml: &str) -> Option<String> {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    let re = NAME_RE
        .get_or_init(|| Regex::new(r#"<a:theme\b[^>]*?\sname="(?:\d+_)?([^"]+)""#).unwrap());
    re.captures(xml).map(|caps| caps[1].to_string())
}

/// De-duplicate themes by digest, keeping first-seen order
pub fn unique_by_digest<'a>(themes: impl IntoIterator<Item = &'a Theme>) -> Vec<Theme> {
    let mut unique: Vec<Theme> = Vec::new();
    for theme in themes {
        if !unique.iter().any(|t| t.same_visual_theme(theme)) {
            unique.push(theme.clone());
        }
    }
    unique
}

#[derive(Debug)]
struct MasterPart {
    path: String,
    relationships: Relationships,
}

/// Resolves slide themes within one package
///
/// Master relationships are parsed once and theme parts are loaded once per path.
#[derive(Debug)]
pub struct ThemeResolver {
    archive: OoxmlArchive,
    masters: OnceCell<Vec<MasterPart>>,
    loaded: Mutex<HashMap<String, Theme>>,
}

impl ThemeResolver {
    /// Create a resolver for a package
    pub fn new(archive: OoxmlArchive) -> Self {
        Self {
            archive,
            masters: OnceCell::new(),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve the theme of a slide from its relationships
    pub async fn resolve(&self, slide_path: &str, slide_rels: &Relationships) -> Result<Theme> {
        let layout = slide_rels
            .first_of_type(Relationships::TYPE_SLIDE_LAYOUT)
            .map(|rel| resolve_target(slide_path, &rel.target))
            .ok_or_else(|| DeckError::theme_not_found(slide_path))?;

        let theme_path = self
            .masters()
            .await?
            .iter()
            .find(|master| {
                master
                    .relationships
                    .iter()
                    .any(|(_, rel)| resolve_target(&master.path, &rel.target) == layout)
            })
            .and_then(|master| master_theme_path(master))
            .ok_or_else(|| DeckError::theme_not_found(slide_path))?;

        debug!(slide = slide_path, layout = %layout, theme = %theme_path, "resolved theme chain");
        self.load_theme(&theme_path).await
    }

    /// Themes of every slide master in the package, in master order
    pub async fn master_themes(&self) -> Result<Vec<Theme>> {
        let mut themes = Vec::new();
        for path in self.masters().await?.iter().filter_map(master_theme_path) {
            themes.push(self.load_theme(&path).await?);
        }
        Ok(themes)
    }

    async fn masters(&self) -> Result<&[MasterPart]> {
        let masters = self
            .masters
            .get_or_try_init(|| async {
                let mut rels_files: Vec<String> = self
                    .archive
                    .file_list()
                    .filter(|name| name.starts_with(MASTER_RELS_PREFIX) && name.ends_with(".rels"))
                    .map(str::to_string)
                    .collect();
                rels_files.sort();

                let mut masters = Vec::with_capacity(rels_files.len());
                for rels_file in rels_files {
                    let file = &rels_file[MASTER_RELS_PREFIX.len()..];
                    let path = format!("ppt/slideMasters/{}", file.trim_end_matches(".rels"));
                    let relationships = Relationships::parse(&self.archive.read(&rels_file)?)?;
                    masters.push(MasterPart {
                        path,
                        relationships,
                    });
                }
                Ok::<_, DeckError>(masters)
            })
            .await?;
        Ok(masters.as_slice())
    }

    async fn load_theme(&self, path: &str) -> Result<Theme> {
        if let Some(theme) = self.cached(path) {
            return Ok(theme);
        }

        let archive = self.archive.clone();
        let part = path.to_string();
        let xml = tokio::task::spawn_blocking(move || archive.read(&part))
            .await
            .map_err(|e| DeckError::Task(e.to_string()))??;

        let theme = Theme::from_part(path, &xml);
        if let Ok(mut loaded) = self.loaded.lock() {
            loaded.insert(path.to_string(), theme.clone());
        }
        Ok(theme)
    }

    fn cached(&self, path: &str) -> Option<Theme> {
        self.loaded
            .lock()
            .ok()
            .and_then(|loaded| loaded.get(path).cloned())
    }
}

fn master_theme_path(master: &MasterPart) -> Option<String> {
    master
        .relationships
        .first_of_type(Relationships::TYPE_THEME)
        .map(|rel| resolve_target(&master.path, &rel.target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use onepager_ooxml::test_utils::{theme_xml, PptxBuilder};

    #[test]
    fn test_theme_name() {
        assert_eq!(
            theme_name(r#"<a:theme xmlns:a="urn:a" name="OnePager">"#),
            Some("OnePager".to_string())
        );
        assert_eq!(
            theme_name(r#"<a:theme xmlns:a="urn:a" name="2_OnePager 2024">"#),
            Some("OnePager 2024".to_string())
        );
        assert_eq!(theme_name(r#"<a:theme xmlns:a="urn:a">"#), None);
    }

    #[test]
    fn test_identical_bytes_give_identical_digests() {
        let xml = theme_xml("OnePager");
        let a = Theme::from_part("ppt/theme/theme1.xml", xml.as_bytes());
        let b = Theme::from_part("ppt/theme/theme7.xml", xml.as_bytes());
        assert!(a.same_visual_theme(&b));
        assert_ne!(a.path, b.path);

        let c = Theme::from_part("ppt/theme/theme1.xml", theme_xml("Other").as_bytes());
        assert!(!a.same_visual_theme(&c));
        assert_eq!(a.digest.len(), 64);
    }

    #[test]
    fn test_unique_by_digest() {
        let xml = theme_xml("OnePager");
        let a = Theme::from_part("ppt/theme/theme1.xml", xml.as_bytes());
        let b = Theme::from_part("ppt/theme/theme2.xml", xml.as_bytes());
        let c = Theme::from_part("ppt/theme/theme3.xml", theme_xml("X").as_bytes());

        let unique = unique_by_digest([&a, &b, &c]);
        assert_eq!(unique, vec![a, c]);
    }

    #[tokio::test]
    async fn test_resolve_through_layout_and_master() {
        let bytes = PptxBuilder::new()
            .theme(theme_xml("First"))
            .theme(theme_xml("Second"))
            .slide_with(onepager_ooxml::test_utils::SlideFixture::new(&["x"]).theme(1))
            .build();
        let archive = OoxmlArchive::from_bytes(bytes).unwrap();
        let resolver = ThemeResolver::new(archive.clone());

        let rels = archive.relationships_for("ppt/slides/slide1.xml").unwrap();
        let theme = resolver.resolve("ppt/slides/slide1.xml", &rels).await.unwrap();

        assert_eq!(theme.name, "Second");
        assert_eq!(theme.path, "ppt/theme/theme2.xml");
    }

    #[tokio::test]
    async fn test_missing_layout_is_theme_not_found() {
        let bytes = PptxBuilder::new()
            .slide_with(onepager_ooxml::test_utils::SlideFixture::new(&["x"]).without_layout())
            .build();
        let archive = OoxmlArchive::from_bytes(bytes).unwrap();
        let resolver = ThemeResolver::new(archive.clone());

        let rels = archive.relationships_for("ppt/slides/slide1.xml").unwrap();
        let err = resolver
            .resolve("ppt/slides/slide1.xml", &rels)
            .await
            .unwrap_err();
        assert!(matches!(err, DeckError::ThemeNotFound { .. }));
    }

    #[tokio::test]
    async fn test_master_themes() {
        let bytes = PptxBuilder::new()
            .theme(theme_xml("First"))
            .theme(theme_xml("Second"))
            .build();
        let resolver = ThemeResolver::new(OoxmlArchive::from_bytes(bytes).unwrap());

        let names: Vec<String> = resolver
            .master_themes()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}
