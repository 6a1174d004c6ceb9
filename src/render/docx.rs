//! Minimal OOXML package writer.
//!
//! Emits the five parts Word needs to open a .docx: content types, the
//! package and document relationship files, a style sheet, a bullet
//! numbering definition, and the document body. Documents written here are
//! also valid remap templates, since they carry numbering id 1 and a
//! "List Paragraph" style.

use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::escape::escape;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::FormatConfig;
use crate::error::Result;
use crate::model::DocParagraph;

const WP_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Points to twentieths of a point (the unit of `w:ind`).
pub(crate) fn twips(pt: f32) -> i32 {
    (pt * 20.0).round() as i32
}

/// Points to half-points (the unit of `w:sz`).
pub(crate) fn half_points(pt: f32) -> u32 {
    (pt * 2.0).round().max(0.0) as u32
}

/// Style id referenced by `w:pStyle`: the style name with spaces removed.
pub(crate) fn style_id(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

fn run_properties_xml(style: &crate::model::TextStyle, out: &mut String) {
    let has_props = style.bold
        || style.italic
        || style.underline
        || style.font_name.is_some()
        || style.font_size.is_some();
    if !has_props {
        return;
    }
    out.push_str("<w:rPr>");
    if let Some(font) = &style.font_name {
        let f = escape(font.as_str());
        out.push_str(&format!(
            "<w:rFonts w:ascii=\"{f}\" w:hAnsi=\"{f}\" w:cs=\"{f}\" w:eastAsia=\"{f}\"/>"
        ));
    }
    if style.bold {
        out.push_str("<w:b/>");
    }
    if style.italic {
        out.push_str("<w:i/>");
    }
    if style.underline {
        out.push_str("<w:u w:val=\"single\"/>");
    }
    if let Some(size) = style.font_size {
        let hp = half_points(size);
        out.push_str(&format!("<w:sz w:val=\"{hp}\"/><w:szCs w:val=\"{hp}\"/>"));
    }
    out.push_str("</w:rPr>");
}

/// Serialize one paragraph as a `w:p` element.
pub(crate) fn paragraph_xml(para: &DocParagraph, out: &mut String) {
    out.push_str("<w:p>");

    let has_ppr =
        para.style_name.is_some() || para.numbering.is_some() || para.left_indent.is_some();
    if has_ppr {
        out.push_str("<w:pPr>");
        if let Some(name) = &para.style_name {
            out.push_str(&format!("<w:pStyle w:val=\"{}\"/>", escape(&style_id(name))));
        }
        if let Some(num) = &para.numbering {
            out.push_str(&format!(
                "<w:numPr><w:ilvl w:val=\"{}\"/><w:numId w:val=\"{}\"/></w:numPr>",
                num.level, num.num_id
            ));
        }
        if let Some(left) = para.left_indent {
            out.push_str(&format!("<w:ind w:left=\"{}\"", twips(left)));
            match para.first_line_indent {
                Some(first) if first < 0.0 => {
                    out.push_str(&format!(" w:hanging=\"{}\"", twips(-first)));
                }
                Some(first) if first > 0.0 => {
                    out.push_str(&format!(" w:firstLine=\"{}\"", twips(first)));
                }
                _ => {}
            }
            out.push_str("/>");
        }
        out.push_str("</w:pPr>");
    }

    for run in &para.runs {
        out.push_str("<w:r>");
        run_properties_xml(&run.style, out);
        out.push_str(&format!(
            "<w:t xml:space=\"preserve\">{}</w:t>",
            escape(run.text.as_str())
        ));
        out.push_str("</w:r>");
    }

    out.push_str("</w:p>");
}

fn content_types_xml() -> String {
    concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
        "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
        "<Default Extension=\"xml\" ContentType=\"application/xml\"/>",
        "<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>",
        "<Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>",
        "<Override PartName=\"/word/numbering.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml\"/>",
        "</Types>"
    )
    .to_string()
}

fn package_rels_xml() -> String {
    concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
        "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>",
        "</Relationships>"
    )
    .to_string()
}

fn document_rels_xml() -> String {
    concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
        "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>",
        "<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering\" Target=\"numbering.xml\"/>",
        "</Relationships>"
    )
    .to_string()
}

fn list_style_xml(name: &str, ilvl: u8, num_id: u32, left_pt: f32, hang_pt: f32) -> String {
    format!(
        concat!(
            "<w:style w:type=\"paragraph\" w:styleId=\"{id}\">",
            "<w:name w:val=\"{name}\"/>",
            "<w:basedOn w:val=\"Normal\"/>",
            "<w:pPr>",
            "<w:numPr><w:ilvl w:val=\"{ilvl}\"/><w:numId w:val=\"{num}\"/></w:numPr>",
            "<w:ind w:left=\"{left}\" w:hanging=\"{hang}\"/>",
            "</w:pPr>",
            "</w:style>"
        ),
        id = style_id(name),
        name = escape(name),
        ilvl = ilvl,
        num = num_id,
        left = twips(left_pt),
        hang = twips(hang_pt),
    )
}

fn styles_xml(config: &FormatConfig) -> String {
    let font = escape(config.font_family.as_str());
    let sz = half_points(config.font_size);
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>");
    xml.push_str(&format!("<w:styles xmlns:w=\"{WP_NS}\">"));
    xml.push_str(&format!(
        concat!(
            "<w:docDefaults><w:rPrDefault><w:rPr>",
            "<w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\" w:eastAsia=\"{font}\"/>",
            "<w:sz w:val=\"{sz}\"/><w:szCs w:val=\"{sz}\"/>",
            "</w:rPr></w:rPrDefault></w:docDefaults>"
        ),
        font = font,
        sz = sz,
    ));
    xml.push_str(concat!(
        "<w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\">",
        "<w:name w:val=\"Normal\"/>",
        "</w:style>"
    ));
    for (name, ilvl) in [("List Bullet", 0u8), ("List Bullet 2", 1), ("List Bullet 3", 2)] {
        xml.push_str(&list_style_xml(
            name,
            ilvl,
            config.numbering_id,
            config.indent_for_level(ilvl),
            config.hang_indent,
        ));
    }
    xml.push_str(&format!(
        concat!(
            "<w:style w:type=\"paragraph\" w:styleId=\"{id}\">",
            "<w:name w:val=\"{name}\"/>",
            "<w:basedOn w:val=\"Normal\"/>",
            "</w:style>"
        ),
        id = style_id(&config.list_style_name),
        name = escape(config.list_style_name.as_str()),
    ));
    xml.push_str("</w:styles>");
    xml
}

fn numbering_xml(config: &FormatConfig) -> String {
    let glyphs = ["\u{2022}", "\u{25E6}", "\u{25AA}"];
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>");
    xml.push_str(&format!("<w:numbering xmlns:w=\"{WP_NS}\">"));
    xml.push_str("<w:abstractNum w:abstractNumId=\"0\">");
    for (level, glyph) in glyphs.iter().enumerate() {
        let left = twips(config.indent_for_level(level as u8));
        let hang = twips(config.hang_indent);
        xml.push_str(&format!(
            concat!(
                "<w:lvl w:ilvl=\"{lvl}\">",
                "<w:start w:val=\"1\"/>",
                "<w:numFmt w:val=\"bullet\"/>",
                "<w:lvlText w:val=\"{glyph}\"/>",
                "<w:lvlJc w:val=\"left\"/>",
                "<w:pPr><w:ind w:left=\"{left}\" w:hanging=\"{hang}\"/></w:pPr>",
                "</w:lvl>"
            ),
            lvl = level,
            glyph = glyph,
            left = left,
            hang = hang,
        ));
    }
    xml.push_str("</w:abstractNum>");
    xml.push_str(&format!(
        "<w:num w:numId=\"{}\"><w:abstractNumId w:val=\"0\"/></w:num>",
        config.numbering_id
    ));
    xml.push_str("</w:numbering>");
    xml
}

/// Default section properties: US Letter with one-inch margins.
pub(crate) fn sect_pr_xml() -> &'static str {
    concat!(
        "<w:sectPr>",
        "<w:pgSz w:w=\"12240\" w:h=\"15840\"/>",
        "<w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" ",
        "w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/>",
        "</w:sectPr>"
    )
}

/// Serialize a full `word/document.xml` part from paragraphs and a trailing
/// section properties block.
pub(crate) fn document_xml(paragraphs: &[DocParagraph], sect_pr: &str) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>");
    xml.push_str(&format!("<w:document xmlns:w=\"{WP_NS}\"><w:body>"));
    for para in paragraphs {
        paragraph_xml(para, &mut xml);
    }
    xml.push_str(sect_pr);
    xml.push_str("</w:body></w:document>");
    xml
}

/// Writes paragraph streams as complete DOCX packages.
pub struct DocxWriter<'a> {
    config: &'a FormatConfig,
}

impl<'a> DocxWriter<'a> {
    pub fn new(config: &'a FormatConfig) -> Self {
        Self { config }
    }

    /// Build the package in memory.
    pub fn to_bytes(&self, paragraphs: &[DocParagraph]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options: FileOptions<()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        let parts: [(&str, String); 5] = [
            ("[Content_Types].xml", content_types_xml()),
            ("_rels/.rels", package_rels_xml()),
            ("word/_rels/document.xml.rels", document_rels_xml()),
            ("word/styles.xml", styles_xml(self.config)),
            ("word/numbering.xml", numbering_xml(self.config)),
        ];
        for (name, body) in parts {
            zip.start_file(name, options)?;
            zip.write_all(body.as_bytes())?;
        }

        zip.start_file("word/document.xml", options)?;
        zip.write_all(document_xml(paragraphs, sect_pr_xml()).as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// Build the package and write it to `path`.
    pub fn write_file(&self, paragraphs: &[DocParagraph], path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes(paragraphs)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NumberingRef, TextRun};

    #[test]
    fn test_unit_conversions() {
        assert_eq!(twips(18.0), 360);
        assert_eq!(twips(36.0), 720);
        assert_eq!(half_points(12.0), 24);
    }

    #[test]
    fn test_style_id_strips_spaces() {
        assert_eq!(style_id("List Bullet 2"), "ListBullet2");
        assert_eq!(style_id("Normal"), "Normal");
    }

    #[test]
    fn test_paragraph_xml_escapes_text() {
        let p = DocParagraph::with_text("a < b & c");
        let mut xml = String::new();
        paragraph_xml(&p, &mut xml);
        assert!(xml.contains("a &lt; b &amp; c"));
        assert!(xml.contains("xml:space=\"preserve\""));
    }

    #[test]
    fn test_paragraph_xml_hanging_indent() {
        let mut p = DocParagraph::with_text("x");
        p.left_indent = Some(36.0);
        p.first_line_indent = Some(-18.0);
        let mut xml = String::new();
        paragraph_xml(&p, &mut xml);
        assert!(xml.contains("<w:ind w:left=\"720\" w:hanging=\"360\"/>"));
    }

    #[test]
    fn test_paragraph_xml_numbering() {
        let mut p = DocParagraph::with_text("x");
        p.numbering = Some(NumberingRef { num_id: 1, level: 2 });
        let mut xml = String::new();
        paragraph_xml(&p, &mut xml);
        assert!(xml.contains("<w:numPr><w:ilvl w:val=\"2\"/><w:numId w:val=\"1\"/></w:numPr>"));
    }

    #[test]
    fn test_bold_run_properties() {
        let mut p = DocParagraph::new();
        p.add_run(TextRun::bold("Heading"));
        let mut xml = String::new();
        paragraph_xml(&p, &mut xml);
        assert!(xml.contains("<w:b/>"));
    }

    #[test]
    fn test_package_parts_present() {
        let config = FormatConfig::default();
        let writer = DocxWriter::new(&config);
        let bytes = writer.to_bytes(&[DocParagraph::with_text("hello")]).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/_rels/document.xml.rels",
            "word/styles.xml",
            "word/numbering.xml",
            "word/document.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing part {name}");
        }
    }

    #[test]
    fn test_styles_cover_bullet_levels() {
        let config = FormatConfig::default();
        let xml = styles_xml(&config);
        assert!(xml.contains("w:styleId=\"ListBullet\""));
        assert!(xml.contains("w:styleId=\"ListBullet2\""));
        assert!(xml.contains("w:styleId=\"ListBullet3\""));
        assert!(xml.contains("w:styleId=\"ListParagraph\""));
        assert!(xml.contains("Aptos (Body)"));
    }

    #[test]
    fn test_numbering_binds_configured_id() {
        let config = FormatConfig::default().with_numbering_id(7);
        let xml = numbering_xml(&config);
        assert!(xml.contains("<w:num w:numId=\"7\">"));
    }
}
