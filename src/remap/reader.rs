//! DOCX package reader.
//!
//! Walks `word/document.xml` into the paragraph model, resolving style ids
//! to names through `word/styles.xml`. Only the properties the remapper
//! cares about are read: paragraph style, direct indents, numbering
//! binding, and run-level bold/italic/underline/font/size.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::model::{DocParagraph, NumberingRef, TextRun};

pub(crate) fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(|a| a.ok())
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

fn get_attr_i32(e: &BytesStart, key: &[u8]) -> Option<i32> {
    get_attr(e, key).and_then(|s| s.parse().ok())
}

/// True when the element carries w:val="0" or w:val="false" or w:val="none",
/// i.e. the toggle property is explicitly off.
fn val_is_off(e: &BytesStart) -> bool {
    match get_attr(e, b"w:val") {
        Some(v) => v == "0" || v == "false" || v == "none",
        None => false,
    }
}

/// Read a zip entry into a string, or `None` if the part is absent.
pub(crate) fn read_part<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|e| Error::DocxParse(format!("failed to read {name}: {e}")))?;
    Ok(Some(content))
}

/// Parse `word/styles.xml` into a styleId → display-name map.
pub fn parse_style_names(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut names = HashMap::new();
    let mut current_id: Option<String> = None;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:style" => current_id = get_attr(&e, b"w:styleId"),
                b"w:name" => {
                    if let (Some(id), Some(name)) = (&current_id, get_attr(&e, b"w:val")) {
                        names.insert(id.clone(), name);
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"w:style" {
                    current_id = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::DocxParse(format!("styles.xml: {e}"))),
            _ => {}
        }
        buf.clear();
    }
    Ok(names)
}

#[derive(Default)]
struct ParaBuilder {
    para: DocParagraph,
    run: Option<TextRun>,
    in_ppr: bool,
    in_rpr: bool,
    in_text: bool,
    pending_ilvl: Option<u8>,
    pending_num_id: Option<u32>,
}

impl ParaBuilder {
    fn leaf(&mut self, e: &BytesStart, style_names: &HashMap<String, String>) {
        match e.name().as_ref() {
            b"w:pStyle" if self.in_ppr => {
                if let Some(id) = get_attr(e, b"w:val") {
                    let name = style_names.get(&id).cloned().unwrap_or(id);
                    self.para.style_name = Some(name);
                }
            }
            b"w:ind" if self.in_ppr => {
                if let Some(left) = get_attr_i32(e, b"w:left") {
                    self.para.left_indent = Some(left as f32 / 20.0);
                }
                if let Some(hang) = get_attr_i32(e, b"w:hanging") {
                    self.para.first_line_indent = Some(-(hang as f32) / 20.0);
                } else if let Some(first) = get_attr_i32(e, b"w:firstLine") {
                    self.para.first_line_indent = Some(first as f32 / 20.0);
                }
            }
            b"w:ilvl" if self.in_ppr => {
                self.pending_ilvl = get_attr_i32(e, b"w:val").map(|v| v.clamp(0, 255) as u8);
            }
            b"w:numId" if self.in_ppr => {
                self.pending_num_id = get_attr_i32(e, b"w:val").and_then(|v| u32::try_from(v).ok());
            }
            // Run properties; a pPr-embedded rPr describes the paragraph
            // mark, not a run, so it is skipped.
            b"w:b" if self.in_rpr && !self.in_ppr => {
                if let Some(run) = &mut self.run {
                    run.style.bold = !val_is_off(e);
                }
            }
            b"w:i" if self.in_rpr && !self.in_ppr => {
                if let Some(run) = &mut self.run {
                    run.style.italic = !val_is_off(e);
                }
            }
            b"w:u" if self.in_rpr && !self.in_ppr => {
                if let Some(run) = &mut self.run {
                    run.style.underline = !val_is_off(e);
                }
            }
            b"w:rFonts" if self.in_rpr && !self.in_ppr => {
                if let Some(run) = &mut self.run {
                    run.style.font_name = get_attr(e, b"w:ascii");
                }
            }
            b"w:sz" if self.in_rpr && !self.in_ppr => {
                if let Some(run) = &mut self.run {
                    run.style.font_size = get_attr_i32(e, b"w:val").map(|v| v as f32 / 2.0);
                }
            }
            _ => {}
        }
    }

    fn finish(mut self) -> DocParagraph {
        if let (Some(num_id), level) = (self.pending_num_id, self.pending_ilvl.unwrap_or(0)) {
            self.para.numbering = Some(NumberingRef { num_id, level });
        }
        self.para
    }
}

/// Parse `word/document.xml` into paragraphs.
pub fn parse_document_paragraphs(
    xml: &str,
    style_names: &HashMap<String, String>,
) -> Result<Vec<DocParagraph>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut paragraphs = Vec::new();
    let mut builder: Option<ParaBuilder> = None;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => builder = Some(ParaBuilder::default()),
                b"w:pPr" => {
                    if let Some(b) = &mut builder {
                        b.in_ppr = true;
                    }
                }
                b"w:r" => {
                    if let Some(b) = &mut builder {
                        if !b.in_ppr {
                            b.run = Some(TextRun::new(""));
                        }
                    }
                }
                b"w:rPr" => {
                    if let Some(b) = &mut builder {
                        b.in_rpr = true;
                    }
                }
                b"w:t" => {
                    if let Some(b) = &mut builder {
                        b.in_text = true;
                    }
                }
                _ => {
                    if let Some(b) = &mut builder {
                        b.leaf(&e, style_names);
                    }
                }
            },
            Ok(Event::Empty(e)) => {
                if let Some(b) = &mut builder {
                    b.leaf(&e, style_names);
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(b) = &mut builder {
                    if b.in_text {
                        if let Some(run) = &mut b.run {
                            let text = t
                                .unescape()
                                .map_err(|e| Error::DocxParse(format!("document.xml: {e}")))?;
                            run.text.push_str(&text);
                        }
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => {
                    if let Some(b) = builder.take() {
                        paragraphs.push(b.finish());
                    }
                }
                b"w:pPr" => {
                    if let Some(b) = &mut builder {
                        b.in_ppr = false;
                    }
                }
                b"w:r" => {
                    if let Some(b) = &mut builder {
                        if let Some(run) = b.run.take() {
                            b.para.runs.push(run);
                        }
                    }
                }
                b"w:rPr" => {
                    if let Some(b) = &mut builder {
                        b.in_rpr = false;
                    }
                }
                b"w:t" => {
                    if let Some(b) = &mut builder {
                        b.in_text = false;
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::DocxParse(format!("document.xml: {e}"))),
            _ => {}
        }
        buf.clear();
    }
    Ok(paragraphs)
}

/// Read a .docx file into paragraphs.
pub fn read_docx(path: impl AsRef<Path>) -> Result<Vec<DocParagraph>> {
    let path = path.as_ref();
    if !crate::detect::is_docx(path) {
        return Err(Error::UnknownFormat);
    }

    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let style_names = match read_part(&mut archive, "word/styles.xml")? {
        Some(xml) => parse_style_names(&xml)?,
        None => HashMap::new(),
    };
    let document = read_part(&mut archive, "word/document.xml")?
        .ok_or_else(|| Error::DocxParse("missing word/document.xml".to_string()))?;
    parse_document_paragraphs(&document, &style_names)
}
