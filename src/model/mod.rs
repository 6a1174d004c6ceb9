//! Document model types.
//!
//! Two intermediate representations live here: the per-page line/outline
//! model produced by classification and assembly, and the flat paragraph
//! stream that rendering, postprocessing and remapping all operate on.

mod line;
mod outline;
mod paragraph;

pub use line::{ClassifiedLine, Line, LineKind};
pub use outline::{Outline, OutlineNode};
pub use paragraph::{DocParagraph, NumberingRef, TextRun, TextStyle};
