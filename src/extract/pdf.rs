//! PDF-backed page source using lopdf.
//!
//! Glyph geometry comes from walking each page's content stream with a text
//! matrix; the plain-text channel is derived from the same reconstructed
//! lines so both views agree, with lopdf's own `extract_text` as a fallback
//! when a page's geometry cannot be parsed.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::detect_pdf_from_path;
use crate::error::{Error, Result};

use super::{GlyphLine, GlyphSpan, PageSource};

/// PDF page source.
pub struct PdfSource {
    doc: LopdfDocument,
}

impl PdfSource {
    /// Open a PDF file, validating the header first.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        detect_pdf_from_path(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Ok(Self { doc })
    }

    /// Load a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Ok(Self { doc })
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        let pages = self.doc.get_pages();
        pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, pages.len() as u32))
    }

    /// Raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .get_plain_content()
                        .map_err(|e| Error::PdfParse(e.to_string()));
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.get_plain_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    /// Extract positioned text spans from a page's content stream.
    fn page_spans(&self, page: u32) -> Result<Vec<GlyphSpan>> {
        let page_id = self.page_id(page)?;
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let content_bytes = self.page_content(page_id)?;
        let content = lopdf::content::Content::decode(&content_bytes)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut current_font_name: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_name) = &op.operands[0] {
                            current_font_name = font_name.clone();
                        }
                        current_font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    matrix.next_line();
                }
                "Tj" | "TJ" => {
                    if !in_text_block {
                        continue;
                    }
                    let text = match op.operator.as_str() {
                        "TJ" => {
                            if let Some(Object::Array(arr)) = op.operands.first() {
                                self.decode_tj_array(&lopdf_fonts, &current_font_name, arr)
                            } else {
                                String::new()
                            }
                        }
                        _ => {
                            if let Some(Object::String(bytes, _)) = op.operands.first() {
                                self.decode_bytes(&lopdf_fonts, &current_font_name, bytes)
                            } else {
                                String::new()
                            }
                        }
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = matrix.position();
                        let size = current_font_size * matrix.scale();
                        spans.push(make_span(text, x, y, size));
                    }
                }
                "'" | "\"" => {
                    matrix.next_line();
                    if !in_text_block {
                        continue;
                    }
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let text = self.decode_bytes(&lopdf_fonts, &current_font_name, bytes);
                        if !text.trim().is_empty() {
                            let (x, y) = matrix.position();
                            let size = current_font_size * matrix.scale();
                            spans.push(make_span(text, x, y, size));
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Decode a TJ array: strings are decoded and concatenated, and a
    /// kerning adjustment past [`TJ_SPACE_THRESHOLD`] (1/1000 em units,
    /// negative values advance the pen) becomes a word space. Scripts
    /// written without spaces never get one inserted.
    fn decode_tj_array(
        &self,
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font_name: &[u8],
        arr: &[Object],
    ) -> String {
        let mut combined = String::new();
        for item in arr {
            match item {
                Object::String(bytes, _) => {
                    combined.push_str(&self.decode_bytes(fonts, font_name, bytes));
                }
                Object::Integer(n) => push_tj_space(&mut combined, -(*n as f32)),
                Object::Real(n) => push_tj_space(&mut combined, -n),
                _ => {}
            }
        }
        combined
    }

    /// Decode a text byte sequence using the current font's encoding,
    /// falling back to simple decoding if the encoding is unavailable.
    fn decode_bytes(
        &self,
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font_name: &[u8],
        bytes: &[u8],
    ) -> String {
        if let Some(font_dict) = fonts.get(font_name) {
            if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }
}

impl PageSource for PdfSource {
    fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn page_lines(&self, page: u32) -> Result<Vec<String>> {
        // Derive the text channel from the same reconstructed lines as the
        // geometry channel, so both views agree line for line. When the
        // content stream cannot be parsed, fall back to lopdf's extractor.
        match self.page_glyph_lines(page) {
            Ok(lines) if !lines.is_empty() => Ok(lines.iter().map(GlyphLine::text).collect()),
            Ok(_) => Ok(Vec::new()),
            Err(Error::PageOutOfRange(p, n)) => Err(Error::PageOutOfRange(p, n)),
            Err(e) => {
                log::warn!("page {page}: geometry unavailable ({e}), using text fallback");
                let text = self
                    .doc
                    .extract_text(&[page])
                    .map_err(|e| Error::TextExtract(format!("Page {page}: {e}")))?;
                Ok(text.lines().map(str::to_string).collect())
            }
        }
    }

    fn page_glyph_lines(&self, page: u32) -> Result<Vec<GlyphLine>> {
        let spans = self.page_spans(page)?;
        Ok(group_spans_into_lines(spans))
    }
}

/// Group spans into lines by baseline proximity, in reading order
/// (descending y, then ascending x).
fn group_spans_into_lines(mut spans: Vec<GlyphSpan>) -> Vec<GlyphLine> {
    if spans.is_empty() {
        return Vec::new();
    }

    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<GlyphLine> = Vec::new();
    let mut current: Vec<GlyphSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        // Tolerance proportional to glyph size absorbs baseline jitter
        let tolerance = (span.width / span.text.chars().count().max(1) as f32).max(2.0) * 0.6;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(GlyphLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(GlyphLine::from_spans(current));
    }

    lines
}

fn make_span(text: String, x: f32, y: f32, font_size: f32) -> GlyphSpan {
    // Width estimate: average glyph is about half the em size
    let width = text.chars().count() as f32 * font_size * 0.5;
    GlyphSpan { text, x, y, width }
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; a TL operator would refine this
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Kerning adjustment (1/1000 em) past which a TJ gap reads as a word
/// break. Varies by font; 200 works for most.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

fn push_tj_space(combined: &mut String, adjustment: f32) {
    if adjustment <= TJ_SPACE_THRESHOLD
        || combined.is_empty()
        || combined.ends_with(' ')
        || combined.ends_with('\u{00A0}')
    {
        return;
    }
    // CJK text does not use word spaces
    if let Some(c) = combined.chars().last() {
        if !is_spaceless_script_char(c) {
            combined.push(' ');
        }
    }
}

fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;
    // CJK Unified Ideographs plus extensions, kana, and CJK punctuation.
    // Hangul is excluded; Korean uses word spaces.
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // Try UTF-16BE first (BOM marker)
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    // Try UTF-8
    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Fallback: Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
