//! Rendering: outline nodes → document paragraphs → DOCX bytes.

pub mod body;
pub mod docx;
pub mod postprocess;

pub use body::render_outline;
pub use docx::DocxWriter;
pub use postprocess::postprocess;
