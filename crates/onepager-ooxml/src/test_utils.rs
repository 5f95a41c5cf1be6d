//! Shared test utilities for the one-pager crates
//!
//! [`PptxBuilder`] writes real PPTX packages with the parts the deck model
//! reads: presentation, slides, layouts, masters, themes and media.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Minimal theme part with the given name
pub fn theme_xml(name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="{NS_A}" name="{name}"><a:themeElements><a:clrScheme name="{name}"><a:dk1><a:srgbClr val="000000"/></a:dk1></a:clrScheme></a:themeElements></a:theme>"#
    )
}

/// One slide of a [`PptxBuilder`] package
#[derive(Debug, Clone)]
pub struct SlideFixture {
    file_name: Option<String>,
    bodies: Vec<Vec<String>>,
    images: Vec<String>,
    theme: usize,
    raw_xml: Option<String>,
    with_layout: bool,
}

impl SlideFixture {
    /// A slide with one text body per entry, each a single paragraph
    pub fn new(bodies: &[&str]) -> Self {
        Self {
            file_name: None,
            bodies: bodies.iter().map(|b| vec![b.to_string()]).collect(),
            images: Vec::new(),
            theme: 0,
            raw_xml: None,
            with_layout: true,
        }
    }

    /// A slide whose part content is given verbatim
    pub fn raw(xml: impl Into<String>) -> Self {
        Self {
            raw_xml: Some(xml.into()),
            ..Self::new(&[])
        }
    }

    /// Override the part file name (default `slide<N>.xml`)
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Add a text body made of several paragraphs
    pub fn body(mut self, paragraphs: &[&str]) -> Self {
        self.bodies
            .push(paragraphs.iter().map(|p| p.to_string()).collect());
        self
    }

    /// Reference a media file (relative to `ppt/media/`)
    pub fn image(mut self, media_name: impl Into<String>) -> Self {
        self.images.push(media_name.into());
        self
    }

    /// Use the n-th theme registered on the builder (0-based)
    pub fn theme(mut self, index: usize) -> Self {
        self.theme = index;
        self
    }

    /// Drop the slide layout relationship
    pub fn without_layout(mut self) -> Self {
        self.with_layout = false;
        self
    }

    fn to_xml(&self) -> String {
        if let Some(raw) = &self.raw_xml {
            return raw.clone();
        }

        let mut shapes = String::new();
        for (i, paragraphs) in self.bodies.iter().enumerate() {
            shapes.push_str(&format!(
                r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="Text {}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>"#,
                i + 2,
                i + 1
            ));
            for paragraph in paragraphs {
                shapes.push_str(&format!(
                    "<a:p><a:r><a:rPr lang=\"de-DE\"/><a:t>{}</a:t></a:r></a:p>",
                    escape(paragraph)
                ));
            }
            shapes.push_str("</p:txBody></p:sp>");
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{NS_A}" xmlns:p="{NS_P}" xmlns:r="{NS_R}"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld></p:sld>"#
        )
    }
}

/// Builder for in-memory PPTX packages
#[derive(Debug, Clone, Default)]
pub struct PptxBuilder {
    slides: Vec<SlideFixture>,
    themes: Vec<String>,
    media: Vec<(String, Vec<u8>)>,
    omitted: HashSet<String>,
}

impl PptxBuilder {
    /// Create an empty builder
    ///
    /// Without an explicit theme, a single theme named "OnePager" is used.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a theme (with its own master and layout)
    pub fn theme(mut self, xml: impl Into<String>) -> Self {
        self.themes.push(xml.into());
        self
    }

    /// Add a slide with one single-paragraph text body per entry
    pub fn slide(self, bodies: &[&str]) -> Self {
        self.slide_with(SlideFixture::new(bodies))
    }

    /// Add a fully specified slide
    pub fn slide_with(mut self, slide: SlideFixture) -> Self {
        self.slides.push(slide);
        self
    }

    /// Add a media file under `ppt/media/`
    pub fn media(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.media.push((name.into(), bytes.into()));
        self
    }

    /// Leave an entry out of the written package
    pub fn omit(mut self, path: impl Into<String>) -> Self {
        self.omitted.insert(path.into());
        self
    }

    /// Write the package
    pub fn build(&self) -> Vec<u8> {
        let themes = if self.themes.is_empty() {
            vec![theme_xml("OnePager")]
        } else {
            self.themes.clone()
        };

        let mut parts: Vec<(String, Vec<u8>)> = Vec::new();
        let mut put = |path: String, contents: Vec<u8>| parts.push((path, contents));

        put(
            "[Content_Types].xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/></Types>"#
            )
            .into_bytes(),
        );
        put(
            "_rels/.rels".to_string(),
            rels_xml(&[(
                "rId1".to_string(),
                format!("{REL_BASE}/officeDocument"),
                "ppt/presentation.xml".to_string(),
            )])
            .into_bytes(),
        );

        // Presentation: masters first (rId1..), then slides
        let mut presentation_rels = Vec::new();
        let mut master_ids = String::new();
        for i in 0..themes.len() {
            let rid = format!("rId{}", i + 1);
            master_ids.push_str(&format!(
                r#"<p:sldMasterId id="{}" r:id="{rid}"/>"#,
                2147483648u64 + i as u64
            ));
            presentation_rels.push((
                rid,
                format!("{REL_BASE}/slideMaster"),
                format!("slideMasters/slideMaster{}.xml", i + 1),
            ));
        }

        let mut slide_ids = String::new();
        let mut slide_rels = Vec::new();
        for (i, slide) in self.slides.iter().enumerate() {
            let rid = format!("rId{}", themes.len() + i + 1);
            slide_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="{rid}"/>"#, 256 + i));
            slide_rels.push((
                rid,
                format!("{REL_BASE}/slide"),
                format!("slides/{}", slide_file_name(slide, i)),
            ));
        }
        // Relationship order deliberately differs from presentation order
        slide_rels.reverse();
        presentation_rels.extend(slide_rels);

        put(
            "ppt/presentation.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{NS_A}" xmlns:p="{NS_P}" xmlns:r="{NS_R}"><p:sldMasterIdLst>{master_ids}</p:sldMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#
            )
            .into_bytes(),
        );
        put(
            "ppt/_rels/presentation.xml.rels".to_string(),
            rels_xml(&presentation_rels).into_bytes(),
        );

        for (i, theme) in themes.iter().enumerate() {
            let n = i + 1;
            put(
                format!("ppt/slideMasters/slideMaster{n}.xml"),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="{NS_A}" xmlns:p="{NS_P}" xmlns:r="{NS_R}"><p:cSld><p:spTree/></p:cSld><p:sldLayoutIdLst><p:sldLayoutId id="{}" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#,
                    2147483649u64 + i as u64
                )
                .into_bytes(),
            );
            put(
                format!("ppt/slideMasters/_rels/slideMaster{n}.xml.rels"),
                rels_xml(&[
                    (
                        "rId1".to_string(),
                        format!("{REL_BASE}/slideLayout"),
                        format!("../slideLayouts/slideLayout{n}.xml"),
                    ),
                    (
                        "rId2".to_string(),
                        format!("{REL_BASE}/theme"),
                        format!("../theme/theme{n}.xml"),
                    ),
                ])
                .into_bytes(),
            );
            put(
                format!("ppt/slideLayouts/slideLayout{n}.xml"),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="{NS_A}" xmlns:p="{NS_P}" xmlns:r="{NS_R}"><p:cSld name="Layout {n}"><p:spTree/></p:cSld></p:sldLayout>"#
                )
                .into_bytes(),
            );
            put(
                format!("ppt/slideLayouts/_rels/slideLayout{n}.xml.rels"),
                rels_xml(&[(
                    "rId1".to_string(),
                    format!("{REL_BASE}/slideMaster"),
                    format!("../slideMasters/slideMaster{n}.xml"),
                )])
                .into_bytes(),
            );
            put(format!("ppt/theme/theme{n}.xml"), theme.clone().into_bytes());
        }

        for (i, slide) in self.slides.iter().enumerate() {
            let file = slide_file_name(slide, i);
            let mut rels = Vec::new();
            if slide.with_layout {
                rels.push((
                    "rId1".to_string(),
                    format!("{REL_BASE}/slideLayout"),
                    format!("../slideLayouts/slideLayout{}.xml", slide.theme + 1),
                ));
            }
            for (j, image) in slide.images.iter().enumerate() {
                rels.push((
                    format!("rId{}", j + 2),
                    format!("{REL_BASE}/image"),
                    format!("../media/{image}"),
                ));
            }
            put(format!("ppt/slides/{file}"), slide.to_xml().into_bytes());
            put(
                format!("ppt/slides/_rels/{file}.rels"),
                rels_xml(&rels).into_bytes(),
            );
        }

        for (name, bytes) in &self.media {
            put(format!("ppt/media/{name}"), bytes.clone());
        }

        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (path, contents) in parts {
            if self.omitted.contains(&path) {
                continue;
            }
            zip.start_file(path, options).unwrap();
            zip.write_all(&contents).unwrap();
        }

        zip.finish().unwrap();
        buffer.into_inner()
    }
}

fn slide_file_name(slide: &SlideFixture, index: usize) -> String {
    slide
        .file_name
        .clone()
        .unwrap_or_else(|| format!("slide{}.xml", index + 1))
}

fn rels_xml(rels: &[(String, String, String)]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_RELS}">"#
    );
    for (id, rel_type, target) in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
