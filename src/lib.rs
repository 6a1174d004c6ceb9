//! # decknotes
//!
//! Slide-deck PDF to structured Word notes.
//!
//! This library reads lecture-style PDF decks, classifies each page's text
//! lines (titles, headings, bullets, continuations, footer noise), recovers
//! bullet nesting from glyph coordinates, and renders the result as a
//! .docx outline. A second pass can rebind the output's lists to a Word
//! template's own numbering definitions.
//!
//! ## Quick Start
//!
//! ```no_run
//! use decknotes::convert_file;
//!
//! fn main() -> decknotes::Result<()> {
//!     let stats = convert_file("deck.pdf", "notes.docx")?;
//!     println!("{} bullets from {} pages", stats.bullets, stats.pages_emitted);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Line classification**: bullet glyphs, headings, footer noise
//! - **Coordinate nesting**: bullet levels clustered from glyph x-positions
//! - **Continuation merging**: wrapped bullet text rejoined into one entry
//! - **DOCX output**: native OOXML package, no external tooling
//! - **Template remap**: rebind lists to a template's numbering

pub mod assemble;
pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod extract;
pub mod levels;
pub mod model;
pub mod remap;
pub mod render;

// Re-export commonly used types
pub use assemble::{Assembler, ConvertStats};
pub use classify::LineClassifier;
pub use config::FormatConfig;
pub use detect::{detect_pdf_from_bytes, detect_pdf_from_path, is_docx, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use extract::{GlyphLine, GlyphSpan, PageSource, PdfSource};
pub use model::{
    ClassifiedLine, DocParagraph, Line, LineKind, NumberingRef, Outline, OutlineNode, TextRun,
    TextStyle,
};
pub use render::{render_outline, DocxWriter};

use std::path::{Path, PathBuf};

/// Conversion options.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Treat every plain line as its own bullet instead of a continuation
    pub all_bullets: bool,

    /// Formatting constants for rendering
    pub config: FormatConfig,

    /// Template to remap the output against after rendering
    pub template: Option<PathBuf>,
}

impl ConvertOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn every plain line into its own bullet.
    pub fn all_bullets(mut self) -> Self {
        self.all_bullets = true;
        self
    }

    /// Set formatting constants.
    pub fn with_config(mut self, config: FormatConfig) -> Self {
        self.config = config;
        self
    }

    /// Remap the rendered output against a template as a final stage.
    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = Some(template.into());
        self
    }
}

/// Result of a conversion: the intermediate outline plus counters.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// The assembled semantic outline
    pub outline: Outline,

    /// Conversion counters
    pub stats: ConvertStats,
}

/// Extract the semantic outline of an open page source.
pub fn outline_from_source<S: PageSource>(
    source: &S,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    let classifier = LineClassifier::new();
    let assembler = Assembler::new(options.all_bullets);

    let mut outline = Outline::new();
    let mut stats = ConvertStats::default();

    for page in 1..=source.page_count() {
        let raw = source.page_lines(page)?;
        let lines = classifier.classify_page(page, &raw.join("\n"));

        // Geometry failures degrade to level 0, they never abort the run.
        let page_levels = match source.page_glyph_lines(page) {
            Ok(glyph_lines) => levels::infer_levels(&glyph_lines),
            Err(e) => {
                log::warn!("page {page}: bullet level inference unavailable: {e}");
                Vec::new()
            }
        };

        for node in assembler.assemble_page(&lines, &page_levels, &mut stats) {
            outline.push(node);
        }
    }

    log::debug!(
        "assembled {} node(s) from {} page(s), {} skipped",
        outline.len(),
        stats.pages_emitted,
        stats.pages_skipped
    );
    Ok(ConvertResult { outline, stats })
}

/// Convert a deck PDF to a .docx outline with custom options.
pub fn convert_file_with_options<P, Q>(
    input: P,
    output: Q,
    options: &ConvertOptions,
) -> Result<ConvertStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let source = PdfSource::open(input)?;
    let result = outline_from_source(&source, options)?;

    let mut paragraphs = render::render_outline(&result.outline, &options.config);
    render::postprocess(&mut paragraphs, &options.config);

    let writer = DocxWriter::new(&options.config);
    match &options.template {
        None => writer.write_file(&paragraphs, &output)?,
        Some(template) => {
            // Skip the intermediate file and rebuild the rendered
            // paragraphs straight onto the template package.
            let template = remap::Template::load(template, &options.config)?;
            let remapped =
                remap::remap_paragraphs(&paragraphs, &options.config, template.has_list_style());
            template.write_with_body(&remapped, &output)?;
        }
    }
    Ok(result.stats)
}

/// Convert a deck PDF to a .docx outline with default options.
///
/// # Example
///
/// ```no_run
/// use decknotes::convert_file;
///
/// let stats = convert_file("deck.pdf", "notes.docx").unwrap();
/// println!("{} bullets", stats.bullets);
/// ```
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<ConvertStats> {
    convert_file_with_options(input, output, &ConvertOptions::default())
}

/// Extract a deck's semantic outline without rendering.
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<Outline> {
    let source = PdfSource::open(path)?;
    let result = outline_from_source(&source, &ConvertOptions::default())?;
    Ok(result.outline)
}

/// Serialize an outline as JSON for inspection.
pub fn outline_to_json(outline: &Outline, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(outline)
    } else {
        serde_json::to_string(outline)
    };
    json.map_err(|e| Error::Render(format!("outline serialization failed: {e}")))
}

/// Rebind a document's lists to a template's numbering, with default
/// formatting constants.
pub fn remap_file<P, Q, R>(source: P, template: Q, output: R) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    remap::remap(source, template, output, &FormatConfig::default())
}

/// Builder-style entry point over [`ConvertOptions`].
///
/// ```no_run
/// use decknotes::Decknotes;
///
/// let stats = Decknotes::new()
///     .all_bullets()
///     .convert("deck.pdf", "notes.docx")
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decknotes {
    options: ConvertOptions,
}

impl Decknotes {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn every plain line into its own bullet.
    pub fn all_bullets(mut self) -> Self {
        self.options.all_bullets = true;
        self
    }

    /// Set formatting constants.
    pub fn with_config(mut self, config: FormatConfig) -> Self {
        self.options.config = config;
        self
    }

    /// Remap the output against a template as a final stage.
    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.options.template = Some(template.into());
        self
    }

    /// Run the conversion.
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<ConvertStats> {
        convert_file_with_options(input, output, &self.options)
    }

    /// Extract the semantic outline only.
    pub fn outline<P: AsRef<Path>>(&self, input: P) -> Result<Outline> {
        let source = PdfSource::open(input)?;
        let result = outline_from_source(&source, &self.options)?;
        Ok(result.outline)
    }
}
