//! PDF backend over `lopdf`.

use std::ops::RangeInclusive;
use std::path::Path;

use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};

use super::RedactableDocument;
use crate::error::{Error, Result};
use crate::model::{FillColor, PointRect};

#[derive(Debug, Clone)]
struct PageSlot {
    id: ObjectId,
    staged: Vec<(PointRect, FillColor)>,
    committed: bool,
}

/// A PDF document with per-page pending-regions state.
///
/// Burn-in appends opaque fill operators to the page's content stream.
/// The underlying text operators are not stripped; callers needing
/// content removal layer a text-aware [`super::LineRedactor`] on top.
#[derive(Debug)]
pub struct PdfDocument {
    doc: Document,
    pages: Vec<PageSlot>,
}

impl PdfDocument {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = Document::load(path)?;
        Self::from_lopdf(doc)
    }

    /// Wrap an already-parsed `lopdf` document.
    pub fn from_lopdf(doc: Document) -> Result<Self> {
        let pages = doc
            .get_pages()
            .values()
            .map(|&id| PageSlot {
                id,
                staged: Vec::new(),
                committed: false,
            })
            .collect();
        Ok(Self { doc, pages })
    }

    fn slot(&self, page: usize) -> Result<&PageSlot> {
        self.pages.get(page).ok_or(Error::PageOutOfRange {
            page,
            pages: self.pages.len(),
        })
    }

    /// MediaBox of a page, following the Pages-tree inheritance chain.
    fn media_box(&self, page_id: ObjectId) -> Result<[f32; 4]> {
        let mut current = page_id;
        // Bounded walk; a well-formed page tree is shallow.
        for _ in 0..32 {
            let dict = self.doc.get_dictionary(current)?;
            if let Ok(obj) = dict.get(b"MediaBox") {
                let obj = match obj.as_reference() {
                    Ok(id) => self.doc.get_object(id)?,
                    Err(_) => obj,
                };
                let arr = obj.as_array()?;
                if arr.len() == 4 {
                    let mut edges = [0.0f32; 4];
                    for (slot, value) in edges.iter_mut().zip(arr.iter()) {
                        *slot = object_number(value).ok_or_else(|| {
                            Error::Pdf("non-numeric MediaBox entry".into())
                        })?;
                    }
                    return Ok(edges);
                }
            }
            match dict.get(b"Parent").and_then(|p| p.as_reference()) {
                Ok(parent) => current = parent,
                Err(_) => break,
            }
        }
        Err(Error::Pdf("page has no MediaBox".into()))
    }

    /// Opaque-fill operators for one region, in PDF bottom-left
    /// coordinates.
    fn fill_operations(media: [f32; 4], region: PointRect, fill: FillColor) -> Vec<Operation> {
        let [mx0, _my0, _mx1, my1] = media;
        let x = mx0 + region.x0;
        let y = my1 - region.y1;
        vec![
            Operation::new("q", vec![]),
            Operation::new(
                "rg",
                vec![fill.r.into(), fill.g.into(), fill.b.into()],
            ),
            Operation::new(
                "re",
                vec![
                    x.into(),
                    y.into(),
                    region.width().into(),
                    region.height().into(),
                ],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]
    }
}

fn object_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

impl RedactableDocument for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, page: usize) -> Result<(f32, f32)> {
        let slot = self.slot(page)?;
        let [x0, y0, x1, y1] = self.media_box(slot.id)?;
        Ok((x1 - x0, y1 - y0))
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

        // lopdf pages are 1-based; drop everything outside the range.
        let keep = (start as u32 + 1)..=(end as u32 + 1);
        let delete: Vec<u32> = (1..=self.pages.len() as u32)
            .filter(|n| !keep.contains(n))
            .collect();

        let mut doc = self.doc.clone();
        doc.delete_pages(&delete);
        doc.prune_objects();
        Self::from_lopdf(doc)
    }

    fn stage_region(&mut self, page: usize, region: PointRect, fill: FillColor) -> Result<()> {
        let pages = self.pages.len();
        let slot = self
            .pages
            .get_mut(page)
            .ok_or(Error::PageOutOfRange { page, pages })?;
        if slot.committed {
            return Err(Error::PageCommitted { page });
        }
        slot.staged.push((region, fill));
        Ok(())
    }

    fn commit_page(&mut self, page: usize) -> Result<()> {
        let pages = self.pages.len();
        let slot = self
            .pages
            .get_mut(page)
            .ok_or(Error::PageOutOfRange { page, pages })?;
        if slot.committed {
            return Ok(());
        }
        slot.committed = true;

        let staged = std::mem::take(&mut slot.staged);
        if staged.is_empty() {
            return Ok(());
        }
        let page_id = slot.id;

        let media = self.media_box(page_id)?;
        let mut operations = Vec::with_capacity(staged.len() * 5);
        for (region, fill) in &staged {
            operations.extend(Self::fill_operations(media, *region, *fill));
        }
        debug!("burning {} regions into page {}", staged.len(), page);

        let extra = Content { operations }.encode()?;
        let mut content = self.doc.get_page_content(page_id).unwrap_or_default();
        if !content.is_empty() {
            content.push(b'\n');
        }
        content.extend_from_slice(&extra);
        self.doc.change_page_content(page_id, content)?;
        Ok(())
    }

    fn is_page_committed(&self, page: usize) -> bool {
        self.pages.get(page).is_some_and(|p| p.committed)
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        self.doc.compress();
        self.doc.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use lopdf::Stream;

    /// Minimal document: `count` letter-size pages, MediaBox inherited
    /// from the Pages node.
    fn sample_doc(count: usize) -> PdfDocument {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let kids: Vec<Object> = (0..count)
            .map(|_| {
                let content_id = doc.add_object(Stream::new(
                    dictionary! {},
                    b"0.8 0.8 0.8 rg".to_vec(),
                ));
                let page_id = doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                });
                page_id.into()
            })
            .collect();

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count as i64,
            "MediaBox" => vec![0i64.into(), 0i64.into(), 612i64.into(), 792i64.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        PdfDocument::from_lopdf(doc).unwrap()
    }

    #[test]
    fn test_page_count_and_inherited_size() {
        let doc = sample_doc(3);
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.page_size(1).unwrap(), (612.0, 792.0));
        assert!(doc.page_size(9).is_err());
    }

    #[test]
    fn test_commit_appends_fill_operators() {
        let mut doc = sample_doc(1);
        doc.stage_region(0, PointRect::new(10.0, 20.0, 110.0, 120.0), FillColor::DARK_GRAY)
            .unwrap();
        doc.commit_page(0).unwrap();

        let page_id = doc.pages[0].id;
        let content = doc.doc.get_page_content(page_id).unwrap();
        let decoded = Content::decode(&content).unwrap();
        let ops: Vec<&str> = decoded
            .operations
            .iter()
            .map(|op| op.operator.as_str())
            .collect();
        assert!(ops.ends_with(&["q", "rg", "re", "f", "Q"]));
    }

    #[test]
    fn test_stage_after_commit_errors() {
        let mut doc = sample_doc(1);
        doc.commit_page(0).unwrap();
        let err = doc
            .stage_region(0, PointRect::new(0.0, 0.0, 10.0, 10.0), FillColor::WHITE)
            .unwrap_err();
        assert!(matches!(err, Error::PageCommitted { page: 0 }));
        // Re-committing stays quiet.
        doc.commit_page(0).unwrap();
    }

    #[test]
    fn test_extract_pages() {
        let doc = sample_doc(4);
        let sub = doc.extract_pages(1..=2).unwrap();
        assert_eq!(sub.page_count(), 2);
        assert!(!sub.is_page_committed(0));

        assert!(matches!(
            doc.extract_pages(2..=9),
            Err(Error::PageOutOfRange { .. })
        ));
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        let mut doc = sample_doc(2);
        doc.stage_region(0, PointRect::new(10.0, 20.0, 110.0, 120.0), FillColor::DARK_GRAY)
            .unwrap();
        doc.commit_page(0).unwrap();
        doc.save(&path).unwrap();

        let reopened = PdfDocument::open(&path).unwrap();
        assert_eq!(reopened.page_count(), 2);
        assert_eq!(reopened.page_size(0).unwrap(), (612.0, 792.0));
    }
}
