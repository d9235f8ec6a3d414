//! Drives body and object redactions onto a document.

use log::{debug, info};

use super::geometry::PageFrame;
use crate::engine::{
    BlockLineRedactor, HeaderBoundaryRefiner, HeaderRefineParams, LineRedactionParams,
    LineRedactor, NoHeaderRefiner, RedactableDocument,
};
use crate::error::Result;
use crate::model::{DetectionManifest, LayoutObject, PixelRect, RedactionPlan};
use crate::options::RedactionOptions;

/// Applies a redaction plan to a document, page by page.
///
/// Each page is derived into a [`PageFrame`], every instruction window is
/// handed to the line redactor, discrete objects and headers are staged
/// as solid boxes, and the page is committed once. Pages with no known
/// dimensions are skipped; pages already committed are left alone, so a
/// second run over the same document stages nothing.
#[derive(Debug)]
pub struct Redactor<L = BlockLineRedactor, H = NoHeaderRefiner> {
    options: RedactionOptions,
    line_redactor: L,
    header_refiner: H,
}

impl Redactor {
    /// Create a redactor with the fallback collaborators.
    pub fn new(options: RedactionOptions) -> Self {
        Self {
            options,
            line_redactor: BlockLineRedactor,
            header_refiner: NoHeaderRefiner,
        }
    }
}

impl<L, H> Redactor<L, H> {
    /// Create a redactor with explicit line-redaction and header-refine
    /// collaborators.
    pub fn with_collaborators(options: RedactionOptions, line_redactor: L, header_refiner: H) -> Self {
        Self {
            options,
            line_redactor,
            header_refiner,
        }
    }

    /// Apply the plan's body redactions and the manifest's discrete
    /// object redactions to `doc`.
    pub fn apply<D>(
        &self,
        doc: &mut D,
        plan: &RedactionPlan,
        manifest: &DetectionManifest,
    ) -> Result<()>
    where
        D: RedactableDocument,
        L: LineRedactor<D>,
        H: HeaderBoundaryRefiner<D>,
    {
        let line_params = LineRedactionParams::from(&self.options);
        let header_params = HeaderRefineParams::from(&self.options);
        let mut redacted_pages = 0usize;

        for page in 0..doc.page_count() {
            let Some(dims) = manifest.page_dimensions.get(&page) else {
                debug!("page {page}: no dimensions, skipping");
                continue;
            };
            if doc.is_page_committed(page) {
                debug!("page {page}: already committed, skipping");
                continue;
            }

            let objects: Vec<&LayoutObject> = manifest.objects_on_page(page).collect();
            let frame = PageFrame::build(
                page,
                dims,
                manifest.page_columns.get(&page).copied(),
                &objects,
            );

            for instr in &plan.instructions {
                for window in frame.instruction_windows(
                    instr,
                    self.options.start_offset,
                    self.options.end_offset,
                ) {
                    self.line_redactor
                        .redact_window(doc, page, window, &line_params)?;
                }
            }

            self.stage_object_boxes(doc, page, &frame, &objects, &header_params)?;

            doc.commit_page(page)?;
            redacted_pages += 1;
        }

        info!("redacted {redacted_pages} pages");
        Ok(())
    }

    /// Solid-box redactions for discrete objects, plus the header
    /// special case.
    fn stage_object_boxes<D>(
        &self,
        doc: &mut D,
        page: usize,
        frame: &PageFrame,
        objects: &[&LayoutObject],
        header_params: &HeaderRefineParams,
    ) -> Result<()>
    where
        D: RedactableDocument,
        H: HeaderBoundaryRefiner<D>,
    {
        let scale = frame.scale();
        let fill = self.options.body_fill;
        let mut header_coords: Option<PixelRect> = None;

        for obj in objects {
            if obj.label.is_discrete_redaction() {
                let rect = scale.rect_to_points(obj.coords);
                if !rect.is_degenerate() {
                    doc.stage_region(page, rect, fill)?;
                }
            }
            if obj.label == crate::model::Label::Header {
                header_coords = Some(obj.coords);
            }
        }

        match self.header_refiner.refine(doc, page, header_params)? {
            Some(mut rect) => {
                // Extend the refined box down to the raw detection's
                // bottom edge; the detector sees rules and ornaments the
                // text scan misses.
                if let Some(coords) = header_coords {
                    rect.y1 = rect.y1.max(coords.y1 * scale.y);
                }
                if !rect.is_degenerate() {
                    doc.stage_region(page, rect, fill)?;
                }
            }
            None => {
                if let Some(coords) = header_coords {
                    let rect = scale.rect_to_points(coords);
                    if !rect.is_degenerate() {
                        doc.stage_region(page, rect, fill)?;
                    }
                }
            }
        }

        Ok(())
    }
}
