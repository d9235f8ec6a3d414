//! # casemask
//!
//! Layout-aware redaction and opinion splitting for scanned legal
//! documents.
//!
//! Given a set of per-page, ML-classified layout regions (captions, body
//! separators, headers, footnotes, end-of-opinion markers), casemask
//! plans which body spans to erase, burns pixel-accurate redactions into
//! the document across two-column, multi-page layouts, and splits the
//! result into one masked sub-document per detected opinion.
//!
//! ## Quick Start
//!
//! ```no_run
//! use casemask::{redact_and_split, DetectionManifest, RedactionOptions};
//!
//! fn main() -> casemask::Result<()> {
//!     let manifest = DetectionManifest::load("detections.json")?;
//!     let output = redact_and_split(
//!         "volume_204.pdf",
//!         &manifest,
//!         "out",
//!         RedactionOptions::default(),
//!     )?;
//!
//!     println!("redacted: {}", output.redacted_path.display());
//!     println!("opinions: {}", output.opinion_paths.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Planning** ([`plan`]): near-duplicate detections are filtered,
//!   boxes are sorted into reading order (page, left column before
//!   right, top to bottom), and a state machine pairs captions with
//!   their end markers into redaction instructions and opinion spans.
//! - **Geometry** ([`redact`]): each instruction becomes column- and
//!   header/footer-aware rectangles per page, rescaled from detection
//!   pixels to document points and burned in through a document engine.
//! - **Splitting** ([`split`]): each opinion's page range is copied out
//!   of the redacted document and masked outside the opinion's span.
//!
//! Document formats sit behind the [`engine::RedactableDocument`] trait;
//! a `lopdf`-backed PDF implementation and an in-memory recorder for
//! tests and dry runs ship in [`engine`].

pub mod engine;
pub mod error;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod plan;
pub mod redact;
pub mod split;

// Re-export commonly used types
pub use engine::{
    BlockLineRedactor, HeaderBoundaryRefiner, HeaderRefineParams, LineRedactionParams,
    LineRedactor, MemoryDocument, NoHeaderRefiner, PdfDocument, RedactableDocument,
};
pub use error::{Error, Result};
pub use model::{
    Column, ColumnBounds, DetectionManifest, FillColor, Label, LayoutObject, OpinionSpan,
    PageDimensions, PixelRect, PointRect, RedactionInstruction, RedactionPlan, Scale, SpanReason,
};
pub use options::RedactionOptions;
pub use pipeline::{PipelineOutput, RedactionPipeline};
pub use plan::{filter_overlapping, OpinionPlanner};
pub use redact::{PageFrame, Redactor};
pub use split::{BoundaryMaps, OpinionSplitter};

use std::path::Path;

/// Plan redactions and opinion spans for a manifest without touching any
/// document.
///
/// # Example
///
/// ```no_run
/// use casemask::{plan_opinions, DetectionManifest, RedactionOptions};
///
/// let manifest = DetectionManifest::load("detections.json").unwrap();
/// let plan = plan_opinions(&manifest, RedactionOptions::default()).unwrap();
/// println!("{} opinions", plan.spans.len());
/// ```
pub fn plan_opinions(
    manifest: &DetectionManifest,
    options: RedactionOptions,
) -> Result<RedactionPlan> {
    RedactionPipeline::new(options).plan(manifest)
}

/// Redact a PDF and split it into per-opinion masked documents.
///
/// Writes `<stem>_redacted.<ext>` plus a `masked/` directory of
/// per-opinion files under `out_dir`.
pub fn redact_and_split<P, Q>(
    input: P,
    manifest: &DetectionManifest,
    out_dir: Q,
    options: RedactionOptions,
) -> Result<PipelineOutput>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    RedactionPipeline::new(options).run(input.as_ref(), manifest, out_dir.as_ref())
}
