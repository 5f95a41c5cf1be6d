//! Relationships parsing for OOXML packages
//!
//! OOXML uses relationship files (_rels/*.rels) to map short IDs to target
//! parts. A presentation resolves its slide order through them, and every
//! slide reaches its theme via slide -> slideLayout -> slideMaster -> theme.
//!
//! # Example
//!
//! ```ignore
//! use onepager_ooxml::relationships::{resolve_target, Relationships};
//!
//! let rels = Relationships::parse(xml_bytes)?;
//! let layout = rels.first_of_type(Relationships::TYPE_SLIDE_LAYOUT).unwrap();
//! let path = resolve_target("ppt/slides/slide1.xml", &layout.target);
//! assert_eq!(path, "ppt/slideLayouts/slideLayout1.xml");
//! ```

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};

/// Common relationship type URIs
impl Relationships {
    /// Slide layout relationship type (slide -> layout, master -> layout)
    pub const TYPE_SLIDE_LAYOUT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    /// Theme relationship type (master -> theme)
    pub const TYPE_THEME: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
}

/// Parsed relationships from a .rels file
///
/// Keeps document order so that iteration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Ordered list of relationship IDs
    order: Vec<String>,
    /// Map of relationship ID to target (for fast lookups)
    map: HashMap<String, RelationshipTarget>,
}

/// A relationship target with its type and mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipTarget {
    /// The target path (relative to the source part) or URL
    pub target: String,
    /// The relationship type URI
    pub rel_type: String,
    /// Target mode: "External" for URLs, None for internal parts
    pub target_mode: Option<String>,
}

impl RelationshipTarget {
    /// Whether this relationship points outside the package
    pub fn is_external(&self) -> bool {
        self.target_mode.as_deref() == Some("External")
    }

    /// Whether the relationship type matches a type URI
    ///
    /// Compares the last path segment so that strict and transitional
    /// namespace variants of the same type both match.
    pub fn has_type(&self, rel_type: &str) -> bool {
        last_segment(&self.rel_type) == last_segment(rel_type)
    }
}

impl Relationships {
    /// Create an empty relationships map
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse relationships from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut order = Vec::new();
        let mut map = HashMap::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    if e.local_name().as_ref() == b"Relationship" {
                        let mut id = None;
                        let mut target = None;
                        let mut rel_type = None;
                        let mut target_mode = None;

                        for attr in e.attributes().filter_map(|a| a.ok()) {
                            let value = attr.unescape_value().ok().map(|s| s.to_string());
                            match attr.key.as_ref() {
                                b"Id" => id = value,
                                b"Target" => target = value,
                                b"Type" => rel_type = value,
                                b"TargetMode" => target_mode = value,
                                _ => {}
                            }
                        }

                        if let (Some(id), Some(target)) = (id, target) {
                            if !map.contains_key(&id) {
                                order.push(id.clone());
                            }
                            map.insert(
                                id,
                                RelationshipTarget {
                                    target,
                                    rel_type: rel_type.unwrap_or_default(),
                                    target_mode,
                                },
                            );
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { order, map })
    }

    /// Get the target for a relationship ID
    pub fn get(&self, id: &str) -> Option<&str> {
        self.map.get(id).map(|r| r.target.as_str())
    }

    /// First relationship of the given type, in document order
    pub fn first_of_type(&self, rel_type: &str) -> Option<&RelationshipTarget> {
        self.iter()
            .map(|(_, rel)| rel)
            .find(|rel| rel.has_type(rel_type))
    }

    /// Iterate over relationships in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RelationshipTarget)> {
        self.order
            .iter()
            .filter_map(|id| self.map.get(id).map(|rel| (id.as_str(), rel)))
    }
}

/// Path of the relationship part belonging to `part`
///
/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that declares it
///
/// Targets are relative to the source part's directory unless they start
/// with `/`, in which case they are package-absolute.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return normalize(absolute.split('/'));
    }

    let base = source_part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    normalize(base.split('/').chain(target.split('/')))
}

fn normalize<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    stack.join("/")
}

fn last_segment(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relationships() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
        <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout2.xml"/>
            <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
            <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
        </Relationships>"#;

        let rels = Relationships::parse(xml).unwrap();

        assert_eq!(rels.iter().count(), 3);
        assert_eq!(rels.get("rId1"), Some("../slideLayouts/slideLayout2.xml"));
        assert_eq!(rels.get("rId2"), Some("../media/image1.png"));

        let external: Vec<&str> = rels
            .iter()
            .filter(|(_, rel)| rel.is_external())
            .map(|(id, _)| id)
            .collect();
        assert_eq!(external, vec!["rId3"]);
    }

    #[test]
    fn test_empty_relationships() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
        <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
        </Relationships>"#;

        let rels = Relationships::parse(xml).unwrap();
        assert!(rels.get("rId1").is_none());
        assert!(rels.iter().next().is_none());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let xml = b"<Relationships><Relationship Id=\"rId1\" Target=\"x\"></Oops>";
        assert!(matches!(
            Relationships::parse(xml),
            Err(OoxmlError::Xml(_))
        ));
    }

    #[test]
    fn test_iteration_keeps_document_order() {
        let xml = br#"<Relationships>
            <Relationship Id="rId9" Type="t" Target="third.xml"/>
            <Relationship Id="rId1" Type="t" Target="first.xml"/>
            <Relationship Id="rId4" Type="t" Target="second.xml"/>
        </Relationships>"#;

        let rels = Relationships::parse(xml).unwrap();
        let targets: Vec<&str> = rels.iter().map(|(_, rel)| rel.target.as_str()).collect();
        assert_eq!(targets, vec!["third.xml", "first.xml", "second.xml"]);
    }

    #[test]
    fn test_first_of_type_matches_strict_namespace() {
        let xml = br#"<Relationships>
            <Relationship Id="rId1" Type="http://purl.oclc.org/ooxml/officeDocument/relationships/theme" Target="../theme/theme1.xml"/>
        </Relationships>"#;

        let rels = Relationships::parse(xml).unwrap();
        let theme = rels.first_of_type(Relationships::TYPE_THEME).unwrap();
        assert_eq!(theme.target, "../theme/theme1.xml");
        assert!(rels.first_of_type(Relationships::TYPE_SLIDE_LAYOUT).is_none());
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(
            rels_path_for("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(
            rels_path_for("ppt/presentation.xml"),
            "ppt/_rels/presentation.xml.rels"
        );
        assert_eq!(rels_path_for("root.xml"), "_rels/root.xml.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "../media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(
            resolve_target("ppt/presentation.xml", "slides/slide3.xml"),
            "ppt/slides/slide3.xml"
        );
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "/ppt/media/logo.png"),
            "ppt/media/logo.png"
        );
        assert_eq!(
            resolve_target("ppt/slideMasters/slideMaster1.xml", "./../theme/theme1.xml"),
            "ppt/theme/theme1.xml"
        );
    }
}
