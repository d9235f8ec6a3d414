//! Per-page geometric derivation for body redactions.

use crate::model::{
    ColumnBounds, Label, LayoutObject, PageDimensions, PointRect, RedactionInstruction, Scale,
};

/// Default bottom margin when no footnote constrains a column, in pixels.
const DEFAULT_BOTTOM_MARGIN_PX: f32 = 60.0;

/// Baseline ceiling below the page top, in pixels.
const BASE_CEILING_PX: f32 = 90.0;

/// Clearance added below a detected header's bottom edge, in pixels.
const HEADER_CLEARANCE_PX: f32 = 5.0;

/// One page's derived geometry: everything needed to place a redaction
/// window without touching the document again.
///
/// All vertical limits are kept in pixel space; [`PageFrame::column_window`]
/// clamps there and rescales to points in one step.
#[derive(Debug, Clone)]
pub struct PageFrame {
    page_index: usize,
    scale: Scale,
    columns: ColumnBounds,
    pixel_h: f32,
    ceiling_y: f32,
    bottom_limit_left: f32,
    bottom_limit_right: f32,
}

impl PageFrame {
    /// Derive a page's frame from its dimensions, column map and the
    /// objects detected on it.
    ///
    /// Footnotes pull the bottom limit of their column up to their top
    /// edge; a footnote without a column constrains both. The ceiling
    /// tracks the tallest detected header, but only when that header
    /// sits in the top third of the page; a "header" box reaching further
    /// down is a misdetection and the baseline ceiling stands.
    pub fn build(
        page_index: usize,
        dims: &PageDimensions,
        columns: Option<ColumnBounds>,
        objects_on_page: &[&LayoutObject],
    ) -> Self {
        let pixel_h = dims.pixel_h;

        let default_bottom = pixel_h - DEFAULT_BOTTOM_MARGIN_PX;
        let mut bottom_limit_left = default_bottom;
        let mut bottom_limit_right = default_bottom;
        for obj in objects_on_page {
            if obj.label != Label::Footnotes {
                continue;
            }
            let top = obj.top();
            match obj.col {
                crate::model::Column::Left => {
                    bottom_limit_left = bottom_limit_left.min(top);
                }
                crate::model::Column::Right => {
                    bottom_limit_right = bottom_limit_right.min(top);
                }
                crate::model::Column::Unset => {
                    bottom_limit_left = bottom_limit_left.min(top);
                    bottom_limit_right = bottom_limit_right.min(top);
                }
            }
        }

        let mut ceiling_y = BASE_CEILING_PX;
        let tallest_header = objects_on_page
            .iter()
            .filter(|o| o.label == Label::Header)
            .map(|o| o.bottom())
            .fold(f32::NEG_INFINITY, f32::max);
        if tallest_header.is_finite() && tallest_header < pixel_h / 3.0 {
            ceiling_y = ceiling_y.max(tallest_header + HEADER_CLEARANCE_PX);
        }

        Self {
            page_index,
            scale: Scale::from_dimensions(dims),
            columns: columns.unwrap_or_else(|| ColumnBounds::fallback(pixel_h)),
            pixel_h,
            ceiling_y,
            bottom_limit_left,
            bottom_limit_right,
        }
    }

    /// The page this frame describes.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Pixel-to-point conversion for this page.
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Effective ceiling in pixel space.
    pub fn ceiling_y(&self) -> f32 {
        self.ceiling_y
    }

    /// Effective bottom limit of one column in pixel space.
    pub fn bottom_limit(&self, left: bool) -> f32 {
        if left {
            self.bottom_limit_left
        } else {
            self.bottom_limit_right
        }
    }

    /// A column-wide window spanning `y_top_px..y_bottom_px`, clamped to
    /// the ceiling, the column's bottom limit and its x-bounds, rescaled
    /// to points. `None` when clamping leaves nothing.
    pub fn column_window(&self, left: bool, y_top_px: f32, y_bottom_px: f32) -> Option<PointRect> {
        let y_top = y_top_px.max(self.ceiling_y);
        let y_bottom = y_bottom_px.min(self.bottom_limit(left));
        if y_bottom <= y_top {
            return None;
        }

        let (x0, x1) = self.columns.x_bounds(left);
        let rect = PointRect::new(
            x0 * self.scale.x,
            y_top * self.scale.y,
            x1 * self.scale.x,
            y_bottom * self.scale.y,
        );
        if rect.is_degenerate() {
            None
        } else {
            Some(rect)
        }
    }

    /// Concrete windows an instruction produces on this page.
    ///
    /// Four positional cases apply, keyed by where the instruction's
    /// endpoints sit relative to this page. Instructions not touching
    /// the page produce nothing. Endpoints in an unset column place on
    /// the right.
    pub fn instruction_windows(
        &self,
        instr: &RedactionInstruction,
        start_offset: f32,
        end_offset: f32,
    ) -> Vec<PointRect> {
        let page = self.page_index;
        let (start, end) = (&instr.start, &instr.end);
        if !instr.touches_page(page) {
            return Vec::new();
        }

        let start_left = start.col.is_left();
        let end_left = end.col.is_left();
        let bottom = self.pixel_h;
        let mut windows = Vec::new();
        let mut push = |w: Option<PointRect>| {
            if let Some(w) = w {
                windows.push(w);
            }
        };

        if start.page_index == page && end.page_index == page {
            // Whole instruction on this page.
            let sy = start.bottom() + start_offset;
            let ey = end.top() + end_offset;
            if start_left == end_left {
                push(self.column_window(start_left, sy, ey));
            } else {
                // Reading order wraps columns: finish the start column,
                // open the end column from the top.
                push(self.column_window(start_left, sy, bottom));
                push(self.column_window(end_left, 0.0, ey));
            }
        } else if start.page_index < page && end.page_index == page {
            // Tail of a span that began earlier.
            let ey = end.top() + end_offset;
            if end_left {
                push(self.column_window(true, 0.0, ey));
            } else {
                push(self.column_window(true, 0.0, bottom));
                push(self.column_window(false, 0.0, ey));
            }
        } else if start.page_index == page && end.page_index > page {
            // Head of a span that continues.
            let sy = start.bottom() + start_offset;
            if start_left {
                push(self.column_window(true, sy, bottom));
                push(self.column_window(false, 0.0, bottom));
            } else {
                push(self.column_window(false, sy, bottom));
            }
        } else {
            // Page strictly inside the span.
            push(self.column_window(true, 0.0, bottom));
            push(self.column_window(false, 0.0, bottom));
        }

        windows
    }
}
