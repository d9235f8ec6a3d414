//! Near-duplicate suppression for layout detections.

use log::debug;

use crate::model::LayoutObject;

/// Drop detections that substantially overlap an earlier detection on the
/// same page.
///
/// The overlap ratio between two boxes is their intersection area divided
/// by the smaller box's area, so a small box fully inside a large one
/// counts as a duplicate regardless of which came first. Input order
/// decides survivors: the first of a duplicate pair is kept.
pub fn filter_overlapping(objects: &[LayoutObject], threshold: f32) -> Vec<LayoutObject> {
    let mut kept: Vec<LayoutObject> = Vec::with_capacity(objects.len());

    for obj in objects {
        let duplicate = kept.iter().any(|k| {
            k.page_index == obj.page_index && overlap_ratio(k, obj) > threshold
        });
        if duplicate {
            debug!(
                "dropping duplicate {:?} detection on page {}",
                obj.label, obj.page_index
            );
        } else {
            kept.push(obj.clone());
        }
    }

    kept
}

fn overlap_ratio(a: &LayoutObject, b: &LayoutObject) -> f32 {
    let min_area = a.area().min(b.area());
    if min_area <= 0.0 {
        return 0.0;
    }
    a.coords.intersection_area(&b.coords) / min_area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, Label, PixelRect};

    fn obj(page: usize, x0: f32, y0: f32, x1: f32, y1: f32) -> LayoutObject {
        LayoutObject::new(
            page,
            Label::Caption,
            Column::Left,
            PixelRect::new(x0, y0, x1, y1),
        )
    }

    #[test]
    fn test_keeps_first_of_near_identical_pair() {
        let a = obj(0, 100.0, 100.0, 500.0, 200.0);
        let b = obj(0, 102.0, 101.0, 498.0, 199.0);
        let kept = filter_overlapping(&[a.clone(), b], 0.6);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0], a);
    }

    #[test]
    fn test_never_deduplicates_across_pages() {
        let a = obj(0, 100.0, 100.0, 500.0, 200.0);
        let b = obj(1, 100.0, 100.0, 500.0, 200.0);
        let kept = filter_overlapping(&[a, b], 0.6);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_disjoint_boxes_survive() {
        let a = obj(0, 0.0, 0.0, 100.0, 100.0);
        let b = obj(0, 200.0, 200.0, 300.0, 300.0);
        let kept = filter_overlapping(&[a, b], 0.6);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_small_box_inside_large_is_duplicate() {
        // Ratio uses the smaller area, so full containment always trips
        // the threshold.
        let large = obj(0, 0.0, 0.0, 1000.0, 1000.0);
        let small = obj(0, 400.0, 400.0, 500.0, 500.0);
        let kept = filter_overlapping(&[large.clone(), small], 0.6);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0], large);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_overlapping(&[], 0.6).is_empty());
    }
}
