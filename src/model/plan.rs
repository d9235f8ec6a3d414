//! Planner output types: redaction instructions and opinion spans.

use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::LayoutObject;

/// A body-text span to erase, possibly crossing columns and pages.
///
/// `start` precedes `end` in document reading order; the geometry engine
/// turns the pair into concrete per-page rectangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionInstruction {
    /// Object whose bottom edge opens the erased span
    pub start: LayoutObject,
    /// Object whose top edge closes the erased span
    pub end: LayoutObject,
}

impl RedactionInstruction {
    /// Whether any part of the span lies on the given page.
    pub fn touches_page(&self, page: usize) -> bool {
        self.start.page_index <= page && page <= self.end.page_index
    }
}

/// Why an opinion span was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanReason {
    /// A caption was matched with a Key end marker.
    #[serde(rename = "caption->Key")]
    CaptionToKey,
}

impl fmt::Display for SpanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanReason::CaptionToKey => write!(f, "caption->Key"),
        }
    }
}

/// One logical opinion's extent, from its caption to its Key marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpinionSpan {
    /// 1-based running opinion number across the batch
    pub n: u32,
    /// Opening caption object
    pub start: LayoutObject,
    /// Closing Key object
    pub end: LayoutObject,
    /// How the span was closed
    pub reason: SpanReason,
    /// Assigned `{first_page:04}-{counter:02}` name; filled by the
    /// naming pass after all spans are known
    #[serde(default)]
    pub case_name: Option<String>,
}

impl OpinionSpan {
    /// Inclusive page range covered by the opinion.
    pub fn page_range(&self) -> RangeInclusive<usize> {
        self.start.page_index..=self.end.page_index
    }

    /// Case name, or a positional placeholder when naming has not run.
    pub fn display_name(&self) -> String {
        self.case_name
            .clone()
            .unwrap_or_else(|| format!("opinion_{:03}", self.n))
    }
}

/// Everything the planner produces for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedactionPlan {
    /// Body-text spans to erase
    pub instructions: Vec<RedactionInstruction>,
    /// Detected opinions in reading order
    pub spans: Vec<OpinionSpan>,
    /// Per-page header bottom edge (pixel space)
    pub page_headers: HashMap<usize, f32>,
    /// Per-page topmost footnote edge (pixel space)
    pub page_footers: HashMap<usize, f32>,
}

impl RedactionPlan {
    /// Whether planning produced no work at all.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty() && self.spans.is_empty()
    }
}
