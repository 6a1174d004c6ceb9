//! Remap template handling.
//!
//! A template is any .docx whose numbering part defines the configured
//! numbering id. Remap output is the template package byte-for-byte with
//! only `word/document.xml` replaced; the template's trailing section
//! properties are preserved so page size and margins carry over.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::config::FormatConfig;
use crate::error::{Error, Result};
use crate::model::DocParagraph;
use crate::render::docx::{document_xml, sect_pr_xml};

use super::reader::{get_attr, parse_style_names, read_part};

const DOCUMENT_PART: &str = "word/document.xml";

/// Collect the numbering definition ids (`w:num w:numId`) a numbering part
/// declares.
fn parse_numbering_ids(xml: &str) -> Result<HashSet<u32>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut ids = HashSet::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"w:num" {
                    if let Some(id) = get_attr(&e, b"w:numId").and_then(|v| v.parse().ok()) {
                        ids.insert(id);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::DocxParse(format!("numbering.xml: {e}"))),
            _ => {}
        }
        buf.clear();
    }
    Ok(ids)
}

/// Extract the body's trailing `w:sectPr` block, keeping it verbatim.
fn extract_sect_pr(document: &str) -> Option<String> {
    let start = document.rfind("<w:sectPr")?;
    let rest = &document[start..];
    let close = rest.find('>')?;
    if rest[..=close].ends_with("/>") {
        return Some(rest[..=close].to_string());
    }
    let end_tag = "</w:sectPr>";
    let end = rest.find(end_tag)?;
    Some(rest[..end + end_tag.len()].to_string())
}

/// A loaded remap template: the package's zip entries plus the pieces of
/// its document part the remapper preserves.
pub struct Template {
    entries: Vec<(String, Vec<u8>)>,
    sect_pr: String,
    has_list_style: bool,
}

impl Template {
    /// Load and validate a template against `config`.
    ///
    /// Fails if the package has no document part or its numbering part does
    /// not define `config.numbering_id`. A missing list style is tolerated
    /// with a warning; remapped paragraphs then rely on numbering alone.
    pub fn load(path: impl AsRef<Path>, config: &FormatConfig) -> Result<Self> {
        let path = path.as_ref();
        if !crate::detect::is_docx(path) {
            return Err(Error::UnknownFormat);
        }

        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut bytes)?;
            entries.push((name, bytes));
        }

        let document = read_part(&mut archive, DOCUMENT_PART)?
            .ok_or_else(|| Error::TemplateMissing(DOCUMENT_PART.to_string()))?;

        let numbering = read_part(&mut archive, "word/numbering.xml")?
            .ok_or_else(|| Error::TemplateMissing("word/numbering.xml".to_string()))?;
        let num_ids = parse_numbering_ids(&numbering)?;
        if !num_ids.contains(&config.numbering_id) {
            return Err(Error::TemplateMissing(format!(
                "numbering id {}",
                config.numbering_id
            )));
        }

        let has_list_style = match read_part(&mut archive, "word/styles.xml")? {
            Some(styles) => parse_style_names(&styles)?
                .values()
                .any(|name| name == &config.list_style_name),
            None => false,
        };
        if !has_list_style {
            log::warn!(
                "template has no \"{}\" style, remapped lists will use numbering only",
                config.list_style_name
            );
        }

        let sect_pr = extract_sect_pr(&document).unwrap_or_else(|| sect_pr_xml().to_string());

        Ok(Self {
            entries,
            sect_pr,
            has_list_style,
        })
    }

    /// Check if the template's styles include the configured list style.
    pub fn has_list_style(&self) -> bool {
        self.has_list_style
    }

    /// Section properties preserved from the template body.
    pub fn sect_pr(&self) -> &str {
        &self.sect_pr
    }

    /// Write the template package with `paragraphs` as its new body.
    pub fn write_with_body(
        &self,
        paragraphs: &[DocParagraph],
        out_path: impl AsRef<Path>,
    ) -> Result<()> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options: FileOptions<()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, bytes) in &self.entries {
            zip.start_file(name.as_str(), options)?;
            if name == DOCUMENT_PART {
                zip.write_all(document_xml(paragraphs, &self.sect_pr).as_bytes())?;
            } else {
                zip.write_all(bytes)?;
            }
        }

        let cursor = zip.finish()?;
        std::fs::write(out_path, cursor.into_inner())?;
        Ok(())
    }
}
