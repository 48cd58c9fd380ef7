//! # Interview Report
//!
//! A paginated report engine for interview summaries.
//!
//! An interview record (participants, a résumé-derived candidate profile,
//! the questions asked with the interviewer's notes, and the verdict) is
//! laid out top to bottom onto fixed-size pages and written as a PDF.
//!
//! Layout never slices an infinite canvas into pages. Each block (a
//! question with its code and feedback, a profile subsection, a paragraph)
//! is checked against the space left on the current page once, and moves
//! to a fresh page whole when it doesn't fit.
//!
//! ## Architecture
//!
//! ```text
//! InterviewRecord (JSON/API)
//!       ↓
//!   [model]    Record, page geometry, placeholders
//!       ↓
//!   [layout]   Page-aware layout: blocks, cursor, page breaks
//!       ↓        uses [text] wrapping and [font] metrics
//!   [pdf]      Serialize draw instructions to PDF bytes
//!       ↓
//!   [export]   File name and write to disk
//! ```
//!
//! [`store`] persists the interview in progress and [`pipeline`] wires the
//! external question-generation services around the renderer.

pub mod error;
pub mod export;
pub mod font;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod pipeline;
pub mod store;
pub mod text;

#[cfg(feature = "wasm")]
pub mod wasm;

use tracing::info;

use error::ReportError;
use font::{FontContext, TextMeasure};
use layout::{Document, LayoutEngine};
use model::{InterviewRecord, PageGeometry};

/// Lay out a record into pages using the standard font metrics.
pub fn render(record: &InterviewRecord, geometry: &PageGeometry) -> Result<Document, ReportError> {
    render_with(record, geometry, &FontContext::new())
}

/// Lay out a record with a caller-supplied text measurer.
pub fn render_with(
    record: &InterviewRecord,
    geometry: &PageGeometry,
    measurer: &dyn TextMeasure,
) -> Result<Document, ReportError> {
    let document = LayoutEngine::new(measurer).layout(record, geometry)?;
    info!(
        pages = document.page_count(),
        questions = record.questions.len(),
        "layout finished"
    );
    Ok(document)
}

/// Render a record to PDF bytes.
///
/// This is the primary entry point. Takes a record and returns the raw
/// bytes of a valid PDF file.
pub fn render_pdf(record: &InterviewRecord, geometry: &PageGeometry) -> Result<Vec<u8>, ReportError> {
    let document = render(record, geometry)?;
    export::report_bytes(record, &document)
}

/// Render a record described as JSON to PDF bytes on A4.
pub fn render_json(json: &str) -> Result<Vec<u8>, ReportError> {
    let record: InterviewRecord = serde_json::from_str(json)?;
    render_pdf(&record, &PageGeometry::a4())
}
