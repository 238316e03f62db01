/// Screen views
///
/// One module per screen: upload queue, gallery grid, and the PDF
/// summary. Each exposes a single `view` over the application state.

pub mod gallery;
pub mod preview;
pub mod upload;
