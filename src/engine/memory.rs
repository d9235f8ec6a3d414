//! In-memory document backend for tests and dry runs.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::RedactableDocument;
use crate::error::{Error, Result};
use crate::model::{FillColor, PointRect};

/// One staged or burned region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Region rectangle in point space
    pub rect: PointRect,
    /// Fill it is (or will be) painted with
    pub fill: FillColor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MemoryPage {
    width: f32,
    height: f32,
    staged: Vec<Region>,
    burned: Vec<Region>,
    committed: bool,
}

/// A document that records regions instead of painting them.
///
/// Pages behave exactly like the PDF backend's: staging accumulates,
/// commit moves staged regions to the burned list and seals the page,
/// staging on a sealed page errors. `save` writes the burned state as
/// JSON, which makes dry runs inspectable with ordinary tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDocument {
    pages: Vec<MemoryPage>,
}

impl MemoryDocument {
    /// Create a document from per-page `(width, height)` point sizes.
    pub fn new(page_sizes: &[(f32, f32)]) -> Self {
        Self {
            pages: page_sizes
                .iter()
                .map(|&(width, height)| MemoryPage {
                    width,
                    height,
                    staged: Vec::new(),
                    burned: Vec::new(),
                    committed: false,
                })
                .collect(),
        }
    }

    /// Create a document of `count` identical pages.
    pub fn with_uniform_pages(count: usize, width: f32, height: f32) -> Self {
        Self::new(&vec![(width, height); count])
    }

    /// Regions staged on a page but not yet burned.
    pub fn staged_regions(&self, page: usize) -> &[Region] {
        match self.pages.get(page) {
            Some(p) => &p.staged,
            None => &[],
        }
    }

    /// Regions burned into a page.
    pub fn burned_regions(&self, page: usize) -> &[Region] {
        match self.pages.get(page) {
            Some(p) => &p.burned,
            None => &[],
        }
    }

    fn page(&self, page: usize) -> Result<&MemoryPage> {
        self.pages.get(page).ok_or(Error::PageOutOfRange {
            page,
            pages: self.pages.len(),
        })
    }

    fn page_mut(&mut self, page: usize) -> Result<&mut MemoryPage> {
        let pages = self.pages.len();
        self.pages
            .get_mut(page)
            .ok_or(Error::PageOutOfRange { page, pages })
    }
}

impl RedactableDocument for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, page: usize) -> Result<(f32, f32)> {
        let p = self.page(page)?;
        Ok((p.width, p.height))
    }

    fn extract_pages(&self, range: RangeInclusive<usize>) -> Result<Self> {
        let (start, end) = (*range.start(), *range.end());
        if start > end {
            return Err(Error::EmptyPageRange { start, end });
        }
        if end >= self.pages.len() {
            return Err(Error::PageOutOfRange {
                page: end,
                pages: self.pages.len(),
            });
        }

        Ok(Self {
            pages: self.pages[start..=end]
                .iter()
                .map(|p| MemoryPage {
                    width: p.width,
                    height: p.height,
                    staged: Vec::new(),
                    // Burned content is part of the page now and copies
                    // with it; staged-but-uncommitted regions are not.
                    burned: p.burned.clone(),
                    committed: false,
                })
                .collect(),
        })
    }

    fn stage_region(&mut self, page: usize, region: PointRect, fill: FillColor) -> Result<()> {
        let p = self.page_mut(page)?;
        if p.committed {
            return Err(Error::PageCommitted { page });
        }
        p.staged.push(Region { rect: region, fill });
        Ok(())
    }

    fn commit_page(&mut self, page: usize) -> Result<()> {
        let p = self.page_mut(page)?;
        if !p.committed {
            let staged = std::mem::take(&mut p.staged);
            p.burned.extend(staged);
            p.committed = true;
        }
        Ok(())
    }

    fn is_page_committed(&self, page: usize) -> bool {
        self.pages.get(page).is_some_and(|p| p.committed)
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
