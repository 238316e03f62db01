/// Printable PDF module
///
/// This module handles:
/// - Partitioning the print batch into 2x2 pages (layout.rs)
/// - Rendering the pages to a PDF file with printpdf (render.rs)

pub mod layout;
pub mod render;

pub use render::{PdfError, RenderedPdf};
