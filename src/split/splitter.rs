//! Extracts each opinion's page range and masks content outside the
//! opinion's span.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rayon::prelude::*;

use crate::engine::RedactableDocument;
use crate::error::Result;
use crate::model::{Column, ColumnBounds, OpinionSpan, PointRect};
use crate::options::RedactionOptions;

/// Points added below the header ceiling when masking, so the mask never
/// shaves the header rule itself.
const HEADER_CEILING_PAD_PT: f32 = 2.0;

/// Per-page geometry the splitter shares with the body-redaction stage:
/// column splits from the manifest, header/footer edges from the planner.
/// All values are in pixel space; the splitter rescales with the uniform
/// resolution-derived factor.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryMaps<'a> {
    /// Page index to column bounds (pixel space)
    pub columns: &'a HashMap<usize, ColumnBounds>,
    /// Page index to header bottom edge (pixel space)
    pub headers: &'a HashMap<usize, f32>,
    /// Page index to topmost footnote edge (pixel space)
    pub footers: &'a HashMap<usize, f32>,
}

impl BoundaryMaps<'_> {
    fn header_ceiling_pt(&self, page: usize, scale: f32) -> f32 {
        let y = self.headers.get(&page).copied().unwrap_or(0.0);
        (y * scale).max(0.0) + HEADER_CEILING_PAD_PT
    }

    fn footer_limit_pt(&self, page: usize, page_h: f32, scale: f32) -> f32 {
        self.footers
            .get(&page)
            .map_or(page_h, |&y| (y * scale).min(page_h))
    }

    fn split_pt(&self, page: usize, page_w: f32, scale: f32) -> f32 {
        self.columns
            .get(&page)
            .map_or(page_w / 2.0, |c| c.split_x * scale)
    }
}

/// Builds one masked sub-document per opinion span.
///
/// The source must already be body-redacted; extraction copies its
/// burned content. Boundary masks use the mask fill, visually distinct
/// from erased content: the opposite column of a boundary page is masked
/// in full, the opinion's own column only outside the span.
#[derive(Debug, Clone)]
pub struct OpinionSplitter {
    options: RedactionOptions,
}

impl OpinionSplitter {
    /// Create a splitter.
    pub fn new(options: RedactionOptions) -> Self {
        Self { options }
    }

    /// Extract one opinion into a new, masked, committed document.
    pub fn extract_opinion<D: RedactableDocument>(
        &self,
        src: &D,
        span: &OpinionSpan,
        maps: BoundaryMaps<'_>,
    ) -> Result<D> {
        let mut out = src.extract_pages(span.page_range())?;
        let scale = self.options.point_scale();
        let last = out.page_count().saturating_sub(1);

        // Extracted start page: hide everything before the opinion.
        let start_page = span.start.page_index;
        let (w, h) = out.page_size(0)?;
        let hy = maps.header_ceiling_pt(start_page, scale);
        let fy = maps.footer_limit_pt(start_page, h, scale);
        let split = maps.split_pt(start_page, w, scale);
        let sy = span.start.top() * scale;
        for mask in start_page_masks(span.start.col, w, split, sy, hy, fy) {
            if !mask.is_degenerate() {
                out.stage_region(0, mask, self.options.mask_fill)?;
            }
        }

        // Extracted end page: hide everything after it.
        let end_page = span.end.page_index;
        let (w, h) = out.page_size(last)?;
        let hy = maps.header_ceiling_pt(end_page, scale);
        let fy = maps.footer_limit_pt(end_page, h, scale);
        let split = maps.split_pt(end_page, w, scale);
        let ey = span.end.bottom() * scale;
        for mask in end_page_masks(span.end.col, w, split, ey, hy, fy) {
            if !mask.is_degenerate() {
                out.stage_region(last, mask, self.options.mask_fill)?;
            }
        }

        for page in 0..out.page_count() {
            out.commit_page(page)?;
        }
        Ok(out)
    }

    /// Extract every span into `dir`, one file per opinion named by its
    /// case name. Spans are independent once the source is finalized,
    /// so extraction fans out over rayon unless configured sequential;
    /// files already written survive a later span's failure.
    pub fn split_to_dir<D>(
        &self,
        src: &D,
        spans: &[OpinionSpan],
        maps: BoundaryMaps<'_>,
        dir: &Path,
        extension: &str,
    ) -> Result<Vec<PathBuf>>
    where
        D: RedactableDocument + Sync,
    {
        fs::create_dir_all(dir)?;
        info!("extracting {} opinions", spans.len());

        let extract_one = |span: &OpinionSpan| -> Result<PathBuf> {
            let mut out = self.extract_opinion(src, span, maps)?;
            let path = dir.join(format!("{}.{extension}", span.display_name()));
            out.save(&path)?;
            debug!("extracted {}", span.display_name());
            Ok(path)
        };

        let paths: Result<Vec<PathBuf>> = if self.options.parallel {
            spans.par_iter().map(extract_one).collect()
        } else {
            spans.iter().map(extract_one).collect()
        };
        let paths = paths?;

        info!("saved {} opinions to {}", paths.len(), dir.display());
        Ok(paths)
    }
}

/// Masks for the extracted first page, relative to the opinion's start
/// edge `sy`. `hy`/`fy` bound every mask vertically.
fn start_page_masks(col: Column, w: f32, split: f32, sy: f32, hy: f32, fy: f32) -> Vec<PointRect> {
    match col {
        Column::Left => vec![
            PointRect::new(0.0, hy, split, sy.min(fy)),
            PointRect::new(split, hy, w, fy),
        ],
        Column::Right => vec![
            PointRect::new(0.0, hy, split, fy),
            PointRect::new(split, hy, w, sy.min(fy)),
        ],
        Column::Unset => Vec::new(),
    }
}

/// Masks for the extracted last page, relative to the opinion's end edge
/// `ey`.
fn end_page_masks(col: Column, w: f32, split: f32, ey: f32, hy: f32, fy: f32) -> Vec<PointRect> {
    match col {
        Column::Left => vec![
            PointRect::new(0.0, ey, split, fy),
            PointRect::new(split, hy, w, fy),
        ],
        Column::Right => vec![PointRect::new(split, ey, w, fy)],
        Column::Unset => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryDocument;
    use crate::model::{Label, LayoutObject, PixelRect, SpanReason};

    fn span(start_page: usize, start_col: Column, end_page: usize, end_col: Column) -> OpinionSpan {
        OpinionSpan {
            n: 1,
            start: LayoutObject::new(
                start_page,
                Label::Caption,
                start_col,
                PixelRect::new(100.0, 400.0, 800.0, 500.0),
            ),
            end: LayoutObject::new(
                end_page,
                Label::Key,
                end_col,
                PixelRect::new(900.0, 1000.0, 1600.0, 1100.0),
            ),
            reason: SpanReason::CaptionToKey,
            case_name: Some("0003-01".to_string()),
        }
    }

    fn maps<'a>(
        columns: &'a HashMap<usize, ColumnBounds>,
        headers: &'a HashMap<usize, f32>,
        footers: &'a HashMap<usize, f32>,
    ) -> BoundaryMaps<'a> {
        BoundaryMaps {
            columns,
            headers,
            footers,
        }
    }

    #[test]
    fn test_start_page_masks_left() {
        let masks = start_page_masks(Column::Left, 612.0, 300.0, 150.0, 20.0, 700.0);
        assert_eq!(masks.len(), 2);
        // Own column above the start, opposite column in full.
        assert_eq!(masks[0], PointRect::new(0.0, 20.0, 300.0, 150.0));
        assert_eq!(masks[1], PointRect::new(300.0, 20.0, 612.0, 700.0));
    }

    #[test]
    fn test_start_page_masks_right() {
        let masks = start_page_masks(Column::Right, 612.0, 300.0, 150.0, 20.0, 700.0);
        assert_eq!(masks[0], PointRect::new(0.0, 20.0, 300.0, 700.0));
        assert_eq!(masks[1], PointRect::new(300.0, 20.0, 612.0, 150.0));
    }

    #[test]
    fn test_end_page_masks() {
        let left = end_page_masks(Column::Left, 612.0, 300.0, 500.0, 20.0, 700.0);
        assert_eq!(left[0], PointRect::new(0.0, 500.0, 300.0, 700.0));
        assert_eq!(left[1], PointRect::new(300.0, 20.0, 612.0, 700.0));

        let right = end_page_masks(Column::Right, 612.0, 300.0, 500.0, 20.0, 700.0);
        assert_eq!(right, vec![PointRect::new(300.0, 500.0, 612.0, 700.0)]);
    }

    #[test]
    fn test_unset_column_masks_nothing() {
        assert!(start_page_masks(Column::Unset, 612.0, 300.0, 150.0, 20.0, 700.0).is_empty());
        assert!(end_page_masks(Column::Unset, 612.0, 300.0, 500.0, 20.0, 700.0).is_empty());
    }

    #[test]
    fn test_extract_opinion_masks_boundary_pages() {
        // 4-page source; opinion covers pages 1..=2.
        let src = MemoryDocument::with_uniform_pages(4, 612.0, 792.0);
        let columns = HashMap::new();
        let headers = HashMap::new();
        let footers = HashMap::new();

        let splitter = OpinionSplitter::new(RedactionOptions::default());
        let out = splitter
            .extract_opinion(
                &src,
                &span(1, Column::Left, 2, Column::Right),
                maps(&columns, &headers, &footers),
            )
            .unwrap();

        assert_eq!(out.page_count(), 2);
        assert!(out.is_page_committed(0));
        assert!(out.is_page_committed(1));
        // Left start masks two rects on the first page, right end one.
        assert_eq!(out.burned_regions(0).len(), 2);
        assert_eq!(out.burned_regions(1).len(), 1);

        // With no column map, the split falls back to half the width.
        assert_eq!(out.burned_regions(0)[0].rect.x1, 306.0);
    }

    #[test]
    fn test_single_page_opinion_masks_both_sides() {
        let src = MemoryDocument::with_uniform_pages(2, 612.0, 792.0);
        let columns = HashMap::new();
        let headers = HashMap::new();
        let footers = HashMap::new();

        let splitter = OpinionSplitter::new(RedactionOptions::default());
        let out = splitter
            .extract_opinion(
                &src,
                &span(0, Column::Left, 0, Column::Left),
                maps(&columns, &headers, &footers),
            )
            .unwrap();

        assert_eq!(out.page_count(), 1);
        // Start masks (2) and end masks (2) all land on the same page.
        assert_eq!(out.burned_regions(0).len(), 4);
    }

    #[test]
    fn test_header_and_footer_bound_masks() {
        let src = MemoryDocument::with_uniform_pages(1, 612.0, 792.0);
        let columns = HashMap::new();
        let mut headers = HashMap::new();
        headers.insert(0usize, 100.0f32); // px
        let mut footers = HashMap::new();
        footers.insert(0usize, 1900.0f32); // px

        let splitter = OpinionSplitter::new(RedactionOptions::default());
        let out = splitter
            .extract_opinion(
                &src,
                &span(0, Column::Right, 0, Column::Right),
                maps(&columns, &headers, &footers),
            )
            .unwrap();

        // scale = 72/200 = 0.36: header 100px -> 38pt, footer 1900px -> 684pt
        for region in out.burned_regions(0) {
            assert!(region.rect.y0 >= 38.0 - 1e-3);
            assert!(region.rect.y1 <= 684.0 + 1e-3);
        }
    }

    #[test]
    fn test_split_to_dir_writes_named_files() {
        let src = MemoryDocument::with_uniform_pages(3, 612.0, 792.0);
        let columns = HashMap::new();
        let headers = HashMap::new();
        let footers = HashMap::new();
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("masked");

        let spans = vec![span(0, Column::Left, 1, Column::Right)];
        let splitter = OpinionSplitter::new(RedactionOptions::default().sequential());
        let paths = splitter
            .split_to_dir(
                &src,
                &spans,
                maps(&columns, &headers, &footers),
                &out_dir,
                "json",
            )
            .unwrap();

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0], out_dir.join("0003-01.json"));
        assert!(paths[0].exists());
    }
}
