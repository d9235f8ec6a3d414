//! Document engine interfaces and backends.
//!
//! The pipeline never touches a document format directly; it drives a
//! [`RedactableDocument`], a single mutable resource whose pages carry
//! explicit pending-regions state with a one-shot commit. Two backends
//! ship here: [`PdfDocument`] over `lopdf` for real files and
//! [`MemoryDocument`] for tests and dry runs.
//!
//! Line-accurate text redaction and header-boundary refinement belong to
//! external collaborators behind [`LineRedactor`] and
//! [`HeaderBoundaryRefiner`]; the defaults in this module are the
//! conservative fallbacks the pipeline uses when no text-geometry source
//! is wired in.

mod memory;
mod pdf;

use std::ops::RangeInclusive;
use std::path::Path;

pub use memory::{MemoryDocument, Region};
pub use pdf::PdfDocument;

use crate::error::Result;
use crate::model::{FillColor, PointRect};
use crate::options::RedactionOptions;

/// A document whose pages accumulate redaction regions and burn them in
/// once.
///
/// Burn-in is irreversible, so each page moves through a strict
/// lifecycle: regions are staged while the page is open, `commit_page`
/// applies them all at once, and staging afterwards is a runtime error
/// ([`crate::Error::PageCommitted`]). Committing an already-committed
/// page is a no-op.
pub trait RedactableDocument: Sized {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Page size in points, `(width, height)`.
    fn page_size(&self, page: usize) -> Result<(f32, f32)>;

    /// Copy an inclusive page range into a new document of the same
    /// backend. Committed content carries over; uncommitted staged
    /// regions do not. The new document's pages start uncommitted.
    fn extract_pages(&self, range: RangeInclusive<usize>) -> Result<Self>;

    /// Stage a redaction region on a page. The region must already be in
    /// point space.
    fn stage_region(&mut self, page: usize, region: PointRect, fill: FillColor) -> Result<()>;

    /// Burn in all staged regions on a page. Idempotent.
    fn commit_page(&mut self, page: usize) -> Result<()>;

    /// Whether a page's regions were already burned in.
    fn is_page_committed(&self, page: usize) -> bool;

    /// Write the document out, compressing where the backend supports it.
    fn save(&mut self, path: &Path) -> Result<()>;
}

/// Tuning for line-accurate redaction inside a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineRedactionParams {
    /// Padding around each text line, in points; keeps glyph edges from
    /// escaping the box
    pub pad: f32,
    /// Baseline tolerance when grouping words into lines, in points
    pub y_tolerance: f32,
    /// Fragments closer than this merge into one box, in points
    pub merge_gap: f32,
    /// Fill for the produced regions
    pub fill: FillColor,
}

impl From<&RedactionOptions> for LineRedactionParams {
    fn from(options: &RedactionOptions) -> Self {
        Self {
            pad: options.text_pad,
            y_tolerance: options.y_tolerance,
            merge_gap: options.merge_gap,
            fill: options.body_fill,
        }
    }
}

/// Geometric thresholds for header-boundary refinement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderRefineParams {
    /// Band below the page top scanned for header text, in points
    pub top_pts: f32,
    /// Maximum vertical gap between header lines, in points
    pub gap_pts: f32,
    /// Baseline tolerance, in points
    pub y_tolerance: f32,
    /// Horizontal margin scanned for header text, in points
    pub margin_pts: f32,
    /// Horizontal padding on the refined box, in points
    pub pad_x: f32,
    /// Vertical padding on the refined box, in points
    pub pad_y: f32,
}

impl From<&RedactionOptions> for HeaderRefineParams {
    fn from(options: &RedactionOptions) -> Self {
        Self {
            top_pts: options.header_top_pts,
            gap_pts: options.header_gap_pts,
            y_tolerance: options.header_y_tol,
            margin_pts: options.header_margin_pts,
            pad_x: options.header_pad_x,
            pad_y: options.header_pad_y,
        }
    }
}

/// Refines a rectangular window into precise per-text-line redaction
/// regions.
pub trait LineRedactor<D: RedactableDocument> {
    /// Stage fine-grained regions covering the text inside `window` on
    /// `page`.
    fn redact_window(
        &self,
        doc: &mut D,
        page: usize,
        window: PointRect,
        params: &LineRedactionParams,
    ) -> Result<()>;
}

/// Computes a tight header bounding box from a page's text geometry.
pub trait HeaderBoundaryRefiner<D: RedactableDocument> {
    /// Return the refined header rectangle, or `None` when the page's
    /// text gives nothing to refine against.
    fn refine(&self, doc: &D, page: usize, params: &HeaderRefineParams)
        -> Result<Option<PointRect>>;
}

/// Fallback line redactor: stages the whole window, padded, as a single
/// opaque region. Without a text-geometry source there are no lines to
/// split on, so the window is covered wholesale.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockLineRedactor;

impl<D: RedactableDocument> LineRedactor<D> for BlockLineRedactor {
    fn redact_window(
        &self,
        doc: &mut D,
        page: usize,
        window: PointRect,
        params: &LineRedactionParams,
    ) -> Result<()> {
        let region = window.expanded(params.pad, params.pad);
        if region.is_degenerate() {
            return Ok(());
        }
        doc.stage_region(page, region, params.fill)
    }
}

/// Fallback header refiner: never refines, forcing the raw detected
/// header box.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHeaderRefiner;

impl<D: RedactableDocument> HeaderBoundaryRefiner<D> for NoHeaderRefiner {
    fn refine(
        &self,
        _doc: &D,
        _page: usize,
        _params: &HeaderRefineParams,
    ) -> Result<Option<PointRect>> {
        Ok(None)
    }
}
