//! Slide model and per-slide extraction.
//!
//! A slide part is read once: its text bodies are collected from the shape
//! tree, boilerplate is filtered out, and the media it references are listed.

use std::fmt;
use std::sync::OnceLock;

use onepager_ooxml::{resolve_target, OoxmlArchive, OoxmlError, Relationships};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use crate::error::{DeckError, Result};
use crate::language::Locale;
use crate::theme::Theme;

/// Minimum number of content sections for a slide to count as a one-pager
pub const ONE_PAGER_MIN_SECTIONS: usize = 3;

/// Text bodies that are template boilerplate rather than content
pub const BOILERPLATE_PHRASES: &[&str] = &[
    "Vertraulich",
    "Confidential",
    "Nur für den internen Gebrauch",
    "For internal use only",
    "Klicken Sie, um Text hinzuzufügen",
    "Click to add text",
];

/// Prefixes of annotation bodies, which do not count as content sections
pub const ANNOTATION_PREFIXES: &[&str] = &["Ergänzung: ", "supplement:"];

/// Image formats the photo scorer cannot decode
pub const UNSUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["emf", "wmf", "svg", "wdp", "tiff", "tif"];

const MEDIA_DIR: &str = "ppt/media/";

/// One slide of a deck, in presentation order
#[derive(Debug, Clone)]
pub struct Slide {
    /// 1-based position in the presentation
    pub number: usize,
    /// Part path inside the package
    pub path: String,
    /// Whether the slide carries enough content to be a one-pager
    pub is_one_pager: bool,
    /// Boilerplate-filtered text bodies
    pub texts: Vec<String>,
    /// Referenced images, de-duplicated, first-seen order
    pub images: Vec<ImageRef>,
    /// Detected content language, if determined
    pub used_language: Option<Locale>,
    /// Resolved visual theme
    pub theme: Theme,
}

impl Slide {
    /// Number of text bodies that are content rather than annotations
    pub fn content_sections(&self) -> usize {
        content_section_count(&self.texts)
    }
}

/// An image referenced by a slide
///
/// Holds only the path; the bytes are decompressed when [`ImageRef::data`] is called.
#[derive(Clone)]
pub struct ImageRef {
    path: String,
    archive: OoxmlArchive,
}

impl ImageRef {
    pub(crate) fn new(path: String, archive: OoxmlArchive) -> Self {
        Self { path, archive }
    }

    /// Path of the media part inside the package
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File name of the media part
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Load the image bytes
    pub async fn data(&self) -> Result<Vec<u8>> {
        let archive = self.archive.clone();
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || archive.read(&path))
            .await
            .map_err(|e| DeckError::Task(e.to_string()))?
            .map_err(DeckError::from)
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRef").field("path", &self.path).finish()
    }
}

impl PartialEq for ImageRef {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for ImageRef {}

/// Raw extraction result of one slide part, before theme and language
#[derive(Debug, Clone)]
pub(crate) struct SlidePart {
    pub texts: Vec<String>,
    pub image_paths: Vec<String>,
    pub relationships: Relationships,
}

/// Read and parse one slide part with its relationships
pub(crate) fn read_slide_part(archive: &OoxmlArchive, path: &str) -> Result<SlidePart> {
    let xml = archive.read(path)?;
    let texts = filter_boilerplate(extract_text_bodies(&xml)?);
    let relationships = archive.relationships_for(path)?;
    let image_paths = extract_image_paths(path, &relationships);

    Ok(SlidePart {
        texts,
        image_paths,
        relationships,
    })
}

/// Collect the text of every text body in a slide's shape tree
///
/// Runs of a paragraph are concatenated. A paragraph without runs or with an
/// end-paragraph marker, and every explicit line break, contributes a newline.
pub fn extract_text_bodies(xml: &[u8]) -> std::result::Result<Vec<String>, OoxmlError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut bodies = Vec::new();
    let mut body: Option<String> = None;
    let mut runs = 0usize;
    let mut end_marker = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"txBody" => body = Some(String::new()),
                b"p" if body.is_some() => {
                    runs = 0;
                    end_marker = false;
                }
                b"r" | b"fld" => runs += 1,
                b"t" => in_text = body.is_some(),
                b"br" => push_char(&mut body, '\n'),
                b"endParaRPr" => end_marker = true,
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"br" => push_char(&mut body, '\n'),
                b"endParaRPr" => end_marker = true,
                b"r" | b"fld" => runs += 1,
                b"p" => push_char(&mut body, '\n'),
                _ => {}
            },
            Event::Text(ref e) if in_text => {
                if let Some(body) = body.as_mut() {
                    body.push_str(&e.unescape()?);
                }
            }
            Event::CData(ref e) if in_text => {
                if let Some(body) = body.as_mut() {
                    body.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if runs == 0 || end_marker {
                        push_char(&mut body, '\n');
                    }
                }
                b"txBody" => {
                    if let Some(text) = body.take() {
                        bodies.push(text);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(bodies)
}

fn push_char(body: &mut Option<String>, c: char) {
    if let Some(body) = body.as_mut() {
        body.push(c);
    }
}

/// Trim bodies and drop empty, boilerplate and footer-date bodies
pub fn filter_boilerplate(bodies: Vec<String>) -> Vec<String> {
    bodies
        .into_iter()
        .map(|body| body.trim().to_string())
        .filter(|body| !body.is_empty())
        .filter(|body| !BOILERPLATE_PHRASES.contains(&body.as_str()))
        .filter(|body| !is_footer_date(body))
        .collect()
}

/// `dd.mm.yyyy` bodies are footer dates
pub fn is_footer_date(text: &str) -> bool {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    let re = DATE_RE.get_or_init(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").unwrap());
    re.is_match(text)
}

/// Whether a body is an annotation ("Ergänzung: ..." / "supplement: ...")
pub fn is_annotation(text: &str) -> bool {
    let lower = text.to_lowercase();
    ANNOTATION_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(&prefix.to_lowercase()))
}

/// Number of filtered bodies that are not annotations
pub fn content_section_count(texts: &[String]) -> usize {
    texts.iter().filter(|text| !is_annotation(text)).count()
}

/// List the media a slide references, in relationship order
///
/// Only targets inside the media folder are kept, unsupported formats are
/// dropped and duplicates are removed.
pub fn extract_image_paths(slide_path: &str, relationships: &Relationships) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();

    for (_, rel) in relationships.iter() {
        if rel.is_external() {
            continue;
        }
        let path = resolve_target(slide_path, &rel.target);
        if !path.starts_with(MEDIA_DIR) || is_unsupported_image(&path) {
            continue;
        }
        if !paths.contains(&path) {
            paths.push(path);
        }
    }

    paths
}

fn is_unsupported_image(path: &str) -> bool {
    path.rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            UNSUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
