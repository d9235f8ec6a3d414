//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::model::FillColor;

/// Options shared by the planner, geometry engine and splitter.
///
/// Defaults mirror the production detection setup: pages rendered at
/// 200dpi, dark-gray body fills, white boundary masks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactionOptions {
    /// Resolution the detection raster was rendered at
    pub dpi: u32,

    /// Overlap ratio above which two detections on a page are considered
    /// duplicates
    pub overlap_threshold: f32,

    /// Pixels added below an instruction's start edge
    pub start_offset: f32,
    /// Pixels added below an instruction's end edge
    pub end_offset: f32,

    /// Fill for body redactions and discrete-object boxes
    pub body_fill: FillColor,
    /// Fill for opinion-boundary masks
    pub mask_fill: FillColor,

    /// Padding around refined text lines, in points
    pub text_pad: f32,
    /// Baseline tolerance when grouping words into lines, in points
    pub y_tolerance: f32,
    /// Maximum gap between adjacent line fragments that are merged into
    /// one box, in points
    pub merge_gap: f32,

    /// Header refinement: how far below the page top text is considered
    /// header material, in points
    pub header_top_pts: f32,
    /// Header refinement: maximum vertical gap between header lines, in
    /// points
    pub header_gap_pts: f32,
    /// Header refinement: baseline tolerance, in points
    pub header_y_tol: f32,
    /// Header refinement: horizontal margin scanned for header text, in
    /// points
    pub header_margin_pts: f32,
    /// Header refinement: horizontal padding on the refined box, in points
    pub header_pad_x: f32,
    /// Header refinement: vertical padding on the refined box, in points
    pub header_pad_y: f32,

    /// Whether per-opinion extraction runs in parallel
    pub parallel: bool,
}

impl RedactionOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the detection raster resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the duplicate-detection overlap threshold.
    pub fn with_overlap_threshold(mut self, threshold: f32) -> Self {
        self.overlap_threshold = threshold;
        self
    }

    /// Set the start/end pixel offsets applied to instruction edges.
    pub fn with_offsets(mut self, start: f32, end: f32) -> Self {
        self.start_offset = start;
        self.end_offset = end;
        self
    }

    /// Set the body redaction fill.
    pub fn with_body_fill(mut self, fill: FillColor) -> Self {
        self.body_fill = fill;
        self
    }

    /// Set the opinion-boundary mask fill.
    pub fn with_mask_fill(mut self, fill: FillColor) -> Self {
        self.mask_fill = fill;
        self
    }

    /// Disable parallel opinion extraction.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Points-per-pixel factor implied by the configured resolution,
    /// used where a page carries no explicit dimensions.
    pub fn point_scale(&self) -> f32 {
        72.0 / self.dpi as f32
    }
}

impl Default for RedactionOptions {
    fn default() -> Self {
        Self {
            dpi: 200,
            overlap_threshold: 0.6,
            start_offset: 0.0,
            end_offset: 0.0,
            body_fill: FillColor::DARK_GRAY,
            mask_fill: FillColor::WHITE,
            text_pad: 1.5,
            y_tolerance: 3.0,
            merge_gap: 2.5,
            header_top_pts: 40.0,
            header_gap_pts: 2.0,
            header_y_tol: 3.0,
            header_margin_pts: 120.0,
            header_pad_x: 2.0,
            header_pad_y: 1.0,
            parallel: true,
        }
    }
}
