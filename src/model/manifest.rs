//! Detection manifest: the JSON handoff from the detector stage.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ColumnBounds, LayoutObject, PageDimensions};
use crate::error::{Error, Result};

/// Everything the detection stage hands to the planner and geometry
/// engine: classified objects, per-page dual dimensions, per-page column
/// maps, and the document's first printed page number.
///
/// Pages absent from `page_dimensions` are skipped for body redaction;
/// pages absent from `page_columns` fall back to heuristic bounds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionManifest {
    /// All classified layout objects across the document
    #[serde(default)]
    pub objects: Vec<LayoutObject>,

    /// Page index to `[point_w, point_h, pixel_w, pixel_h]`
    #[serde(default)]
    pub page_dimensions: HashMap<usize, PageDimensions>,

    /// Page index to `[left_x0, left_x1, right_x0, right_x1, split_x]`
    /// in pixel space
    #[serde(default)]
    pub page_columns: HashMap<usize, ColumnBounds>,

    /// Printed page number of the document's first page; offsets case
    /// names
    #[serde(default)]
    pub first_page: usize,
}

impl DetectionManifest {
    /// Parse a manifest from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: DetectionManifest = serde_json::from_str(json)
            .map_err(|e| Error::InvalidManifest(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load a manifest from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Fail fast on malformed input rather than letting bad numbers
    /// propagate into page edits.
    pub fn validate(&self) -> Result<()> {
        for obj in &self.objects {
            obj.validate()?;
        }
        for (page, d) in &self.page_dimensions {
            let values = [d.point_w, d.point_h, d.pixel_w, d.pixel_h];
            if !values.iter().all(|v| v.is_finite() && *v > 0.0) {
                return Err(Error::InvalidManifest(format!(
                    "page {page} has non-positive or non-finite dimensions"
                )));
            }
        }
        for (page, c) in &self.page_columns {
            let values = [c.left_x0, c.left_x1, c.right_x0, c.right_x1, c.split_x];
            if !values.iter().all(|v| v.is_finite()) {
                return Err(Error::InvalidManifest(format!(
                    "page {page} has non-finite column bounds"
                )));
            }
        }
        Ok(())
    }

    /// Objects sitting on the given page, in input order.
    pub fn objects_on_page(&self, page: usize) -> impl Iterator<Item = &LayoutObject> {
        self.objects.iter().filter(move |o| o.page_index == page)
    }

    /// Number of pages with known dimensions.
    pub fn dimensioned_pages(&self) -> usize {
        self.page_dimensions.len()
    }
}
