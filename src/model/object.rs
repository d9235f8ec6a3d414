//! Classified layout objects produced by the detection stage.

use serde::{Deserialize, Serialize};

use super::PixelRect;
use crate::error::{Error, Result};

/// Region class assigned by the layout detector.
///
/// Only `caption`, `line`, `headmatter` and `Key` drive the planner state
/// machine; `header` and `footnotes` feed the per-page geometry limits;
/// `brackets` and `order` are redacted as solid boxes. Any label the
/// detector emits beyond these deserializes to [`Label::Other`] and is
/// ignored by every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Label {
    /// Case citation block opening an opinion
    Caption,
    /// Horizontal separator line
    Line,
    /// Preliminary text following a caption
    Headmatter,
    /// End-of-identifying-block marker
    Key,
    /// Running page header
    Header,
    /// Footnote block
    Footnotes,
    /// Bracketed editorial matter
    Brackets,
    /// Court order block
    Order,
    /// Any other detector class; carried through but never acted on
    Other,
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        // Detector classes keep their historical spelling: lowercase
        // except the capitalized Key marker.
        match s.as_str() {
            "caption" => Label::Caption,
            "line" => Label::Line,
            "headmatter" => Label::Headmatter,
            "Key" => Label::Key,
            "header" => Label::Header,
            "footnotes" => Label::Footnotes,
            "brackets" => Label::Brackets,
            "order" => Label::Order,
            _ => Label::Other,
        }
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        match label {
            Label::Caption => "caption",
            Label::Line => "line",
            Label::Headmatter => "headmatter",
            Label::Key => "Key",
            Label::Header => "header",
            Label::Footnotes => "footnotes",
            Label::Brackets => "brackets",
            Label::Order => "order",
            Label::Other => "other",
        }
        .to_string()
    }
}

impl Label {
    /// Whether this label participates in the planner state machine.
    pub fn drives_planner(self) -> bool {
        matches!(
            self,
            Label::Caption | Label::Line | Label::Headmatter | Label::Key
        )
    }

    /// Whether objects with this label are redacted as solid boxes.
    pub fn is_discrete_redaction(self) -> bool {
        matches!(
            self,
            Label::Line | Label::Key | Label::Brackets | Label::Order
        )
    }
}

/// Column assignment of a detection on a two-column page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Column {
    /// Left column
    Left,
    /// Right column
    Right,
    /// No column assigned (full-width or unclassified)
    #[default]
    Unset,
}

impl From<String> for Column {
    fn from(s: String) -> Self {
        match s.as_str() {
            "LEFT" => Column::Left,
            "RIGHT" => Column::Right,
            _ => Column::Unset,
        }
    }
}

impl From<Column> for String {
    fn from(col: Column) -> Self {
        match col {
            Column::Left => "LEFT",
            Column::Right => "RIGHT",
            Column::Unset => "UNSET",
        }
        .to_string()
    }
}

impl Column {
    /// Ordinal used for reading-order sorts: left before right, unset
    /// objects after both. An explicit rank avoids leaning on string
    /// collation for ordering.
    pub fn sort_rank(self) -> u8 {
        match self {
            Column::Left => 0,
            Column::Right => 1,
            Column::Unset => 99,
        }
    }

    /// Whether this is the left column. Unset columns are treated as
    /// right-side for geometric placement.
    pub fn is_left(self) -> bool {
        matches!(self, Column::Left)
    }
}

/// One classified region on one page, in detection pixel space.
///
/// Produced externally by the object-detection stage and read many times;
/// never mutated. `page_index` is 0-based within the processed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutObject {
    /// 0-based page the detection sits on
    pub page_index: usize,
    /// Detector class
    pub label: Label,
    /// Column assignment, if any
    #[serde(default)]
    pub col: Column,
    /// Bounding box in detection pixel space
    pub coords: PixelRect,
}

impl LayoutObject {
    /// Create an object from its parts.
    pub fn new(page_index: usize, label: Label, col: Column, coords: PixelRect) -> Self {
        Self {
            page_index,
            label,
            col,
            coords,
        }
    }

    /// Top edge (smaller y) of the detection box.
    pub fn top(&self) -> f32 {
        self.coords.y0
    }

    /// Bottom edge (larger y) of the detection box.
    pub fn bottom(&self) -> f32 {
        self.coords.y1
    }

    /// Box area in square pixels.
    pub fn area(&self) -> f32 {
        self.coords.width().max(0.0) * self.coords.height().max(0.0)
    }

    /// Reject detections the geometry engine cannot place. Upstream
    /// detection guarantees well-formed boxes, so a non-finite coordinate
    /// is a configuration error for the whole run, not a skippable box.
    pub fn validate(&self) -> Result<()> {
        let c = &self.coords;
        if ![c.x0, c.y0, c.x1, c.y1].iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidManifest(format!(
                "object on page {} has non-finite coordinates",
                self.page_index
            )));
        }
        Ok(())
    }
}
