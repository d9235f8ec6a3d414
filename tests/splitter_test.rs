//! End-to-end round trip over the in-memory backend: plan, redact,
//! split, and check the boundary masks.

use std::collections::HashMap;

use casemask::{
    BoundaryMaps, Column, DetectionManifest, FillColor, Label, LayoutObject, MemoryDocument,
    OpinionPlanner, OpinionSplitter, PixelRect, RedactableDocument, RedactionOptions, Redactor,
};

// Two 612x792pt pages rendered at 200dpi: 1700x2200px, scale 0.36.
const SCALE: f32 = 72.0 / 200.0;

fn manifest() -> DetectionManifest {
    let mut page_dimensions = HashMap::new();
    page_dimensions.insert(0usize, [612.0, 792.0, 1700.0, 2200.0].into());
    page_dimensions.insert(1usize, [612.0, 792.0, 1700.0, 2200.0].into());

    let mut page_columns = HashMap::new();
    page_columns.insert(0usize, [100.0, 800.0, 900.0, 1600.0, 850.0].into());
    page_columns.insert(1usize, [100.0, 800.0, 900.0, 1600.0, 850.0].into());

    DetectionManifest {
        objects: vec![
            // Opinion: caption on page 0 LEFT at y=120 through Key on
            // page 1 RIGHT ending at y=400.
            LayoutObject::new(
                0,
                Label::Caption,
                Column::Left,
                PixelRect::new(100.0, 120.0, 800.0, 220.0),
            ),
            LayoutObject::new(
                1,
                Label::Key,
                Column::Right,
                PixelRect::new(900.0, 360.0, 1600.0, 400.0),
            ),
        ],
        page_dimensions,
        page_columns,
        first_page: 0,
    }
}

#[test]
fn test_round_trip_single_cross_page_opinion() {
    let manifest = manifest();
    let options = RedactionOptions::default().sequential();

    let mut planner = OpinionPlanner::new(options.clone());
    let plan = planner.plan(&manifest.objects, manifest.first_page);
    assert_eq!(plan.spans.len(), 1);
    assert_eq!(plan.spans[0].case_name.as_deref(), Some("0000-01"));

    // Body-redact the source, then split.
    let mut source = MemoryDocument::with_uniform_pages(2, 612.0, 792.0);
    Redactor::new(options.clone())
        .apply(&mut source, &plan, &manifest)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let masked_dir = dir.path().join("masked");
    let maps = BoundaryMaps {
        columns: &manifest.page_columns,
        headers: &plan.page_headers,
        footers: &plan.page_footers,
    };
    let splitter = OpinionSplitter::new(options);
    let paths = splitter
        .split_to_dir(&source, &plan.spans, maps, &masked_dir, "json")
        .unwrap();

    // Exactly one extracted document, named by its case.
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0], masked_dir.join("0000-01.json"));

    let extracted = splitter
        .extract_opinion(&source, &plan.spans[0], maps)
        .unwrap();
    assert_eq!(extracted.page_count(), 2);

    let masks: Vec<_> = extracted
        .burned_regions(0)
        .iter()
        .filter(|r| r.fill == FillColor::WHITE)
        .collect();
    assert_eq!(masks.len(), 2);

    let split_pt = 850.0 * SCALE;
    // Own (left) column masked above the caption's top edge.
    assert_eq!(masks[0].rect.x1, split_pt);
    assert!((masks[0].rect.y1 - 120.0 * SCALE).abs() < 1e-3);
    // Opposite (right) column masked in full.
    assert_eq!(masks[1].rect.x0, split_pt);
    assert_eq!(masks[1].rect.y1, 792.0);

    // End page: right column masked below the Key's bottom edge. (The
    // Key itself was burned as a dark discrete box in the source and
    // travels with the copy.)
    let end_masks: Vec<_> = extracted
        .burned_regions(1)
        .iter()
        .filter(|r| r.fill == FillColor::WHITE)
        .collect();
    assert_eq!(end_masks.len(), 1);
    assert_eq!(end_masks[0].rect.x0, split_pt);
    assert!((end_masks[0].rect.y0 - 400.0 * SCALE).abs() < 1e-3);
    assert_eq!(end_masks[0].rect.y1, 792.0);
}

#[test]
fn test_extraction_copies_body_redactions() {
    let mut manifest = manifest();
    // Add a discrete object inside the opinion's range so the redacted
    // source carries a burned body region.
    manifest.objects.push(LayoutObject::new(
        1,
        Label::Brackets,
        Column::Left,
        PixelRect::new(200.0, 500.0, 600.0, 700.0),
    ));

    let options = RedactionOptions::default().sequential();
    let mut planner = OpinionPlanner::new(options.clone());
    let plan = planner.plan(&manifest.objects, 0);

    let mut source = MemoryDocument::with_uniform_pages(2, 612.0, 792.0);
    Redactor::new(options.clone())
        .apply(&mut source, &plan, &manifest)
        .unwrap();

    let maps = BoundaryMaps {
        columns: &manifest.page_columns,
        headers: &plan.page_headers,
        footers: &plan.page_footers,
    };
    let extracted = OpinionSplitter::new(options)
        .extract_opinion(&source, &plan.spans[0], maps)
        .unwrap();

    // The brackets and Key boxes burned into the source page 1 travel
    // with the extracted copy, alongside the white end-page mask.
    let carried: Vec<_> = extracted
        .burned_regions(1)
        .iter()
        .filter(|r| r.fill == FillColor::DARK_GRAY)
        .collect();
    assert_eq!(carried.len(), 2);
}

#[test]
fn test_multiple_opinions_write_distinct_files() {
    let mut page_dimensions = HashMap::new();
    page_dimensions.insert(0usize, [612.0, 792.0, 1700.0, 2200.0].into());
    let mut page_columns = HashMap::new();
    page_columns.insert(0usize, [100.0, 800.0, 900.0, 1600.0, 850.0].into());

    let manifest = DetectionManifest {
        objects: vec![
            LayoutObject::new(
                0,
                Label::Caption,
                Column::Left,
                PixelRect::new(100.0, 100.0, 800.0, 180.0),
            ),
            LayoutObject::new(
                0,
                Label::Key,
                Column::Left,
                PixelRect::new(100.0, 400.0, 800.0, 440.0),
            ),
            LayoutObject::new(
                0,
                Label::Caption,
                Column::Left,
                PixelRect::new(100.0, 500.0, 800.0, 580.0),
            ),
            LayoutObject::new(
                0,
                Label::Key,
                Column::Left,
                PixelRect::new(100.0, 900.0, 800.0, 940.0),
            ),
        ],
        page_dimensions,
        page_columns,
        first_page: 204,
    };

    let options = RedactionOptions::default();
    let mut planner = OpinionPlanner::new(options.clone());
    let plan = planner.plan(&manifest.objects, manifest.first_page);

    let mut source = MemoryDocument::with_uniform_pages(1, 612.0, 792.0);
    Redactor::new(options.clone())
        .apply(&mut source, &plan, &manifest)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let masked_dir = dir.path().join("masked");
    let maps = BoundaryMaps {
        columns: &manifest.page_columns,
        headers: &plan.page_headers,
        footers: &plan.page_footers,
    };
    let paths = OpinionSplitter::new(options)
        .split_to_dir(&source, &plan.spans, maps, &masked_dir, "json")
        .unwrap();

    assert_eq!(paths.len(), 2);
    assert!(masked_dir.join("0204-01.json").exists());
    assert!(masked_dir.join("0204-02.json").exists());
}
