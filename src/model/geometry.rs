//! Geometric primitives shared by all pipeline stages.
//!
//! Two coordinate spaces are in play: *pixel space*, where the detector
//! produced its boxes (the page rendered at a configured resolution), and
//! *point space*, the document's native unit (1/72 inch, y growing
//! downward). [`Scale`] is the bridge; every rectangle that reaches the
//! document engine has already been rescaled to points.

use serde::{Deserialize, Serialize};

/// Rectangle in detection pixel space.
///
/// Serialized as the detector's 4-element array `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct PixelRect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl PixelRect {
    /// Create a rectangle from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Whether the rectangle has non-positive width or height.
    pub fn is_degenerate(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Area of the intersection with another rectangle, zero if disjoint.
    pub fn intersection_area(&self, other: &PixelRect) -> f32 {
        let w = self.x1.min(other.x1) - self.x0.max(other.x0);
        let h = self.y1.min(other.y1) - self.y0.max(other.y0);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

impl From<[f32; 4]> for PixelRect {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<PixelRect> for [f32; 4] {
    fn from(r: PixelRect) -> Self {
        [r.x0, r.y0, r.x1, r.y1]
    }
}

/// Rectangle in document point space, y growing downward from the top of
/// the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl PointRect {
    /// Create a rectangle from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Whether the rectangle has non-positive width or height. Degenerate
    /// rectangles are dropped before staging, never an error.
    pub fn is_degenerate(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Grow the rectangle by `dx` horizontally and `dy` vertically on
    /// each side.
    pub fn expanded(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x0 - dx, self.y0 - dy, self.x1 + dx, self.y1 + dy)
    }
}

/// RGB fill color for burned-in regions, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillColor {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
}

impl FillColor {
    /// Dark gray used for body redactions.
    pub const DARK_GRAY: FillColor = FillColor {
        r: 0.2,
        g: 0.2,
        b: 0.2,
    };

    /// White used for opinion-boundary masking, visually distinct from
    /// erased content.
    pub const WHITE: FillColor = FillColor {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Create a fill color from components.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Per-page dimensions in both coordinate spaces.
///
/// Serialized as `[point_w, point_h, pixel_w, pixel_h]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct PageDimensions {
    /// Page width in points
    pub point_w: f32,
    /// Page height in points
    pub point_h: f32,
    /// Rendered page width in pixels
    pub pixel_w: f32,
    /// Rendered page height in pixels
    pub pixel_h: f32,
}

impl PageDimensions {
    /// Create dimensions from point and pixel extents.
    pub fn new(point_w: f32, point_h: f32, pixel_w: f32, pixel_h: f32) -> Self {
        Self {
            point_w,
            point_h,
            pixel_w,
            pixel_h,
        }
    }
}

impl From<[f32; 4]> for PageDimensions {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<PageDimensions> for [f32; 4] {
    fn from(d: PageDimensions) -> Self {
        [d.point_w, d.point_h, d.pixel_w, d.pixel_h]
    }
}

/// Column x-bounds and split for one two-column page, in pixel space.
///
/// Serialized as `[left_x0, left_x1, right_x0, right_x1, split_x]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 5]", into = "[f32; 5]")]
pub struct ColumnBounds {
    /// Left column, left edge
    pub left_x0: f32,
    /// Left column, right edge
    pub left_x1: f32,
    /// Right column, left edge
    pub right_x0: f32,
    /// Right column, right edge
    pub right_x1: f32,
    /// x-coordinate dividing the two columns
    pub split_x: f32,
}

impl ColumnBounds {
    /// Create bounds from explicit edges.
    pub fn new(left_x0: f32, left_x1: f32, right_x0: f32, right_x1: f32, split_x: f32) -> Self {
        Self {
            left_x0,
            left_x1,
            right_x0,
            right_x1,
            split_x,
        }
    }

    /// Heuristic bounds for pages without a detected column map: fixed
    /// 30px margins and a 50% split.
    ///
    /// TODO: the edges derive from the page's pixel *height*, not its
    /// width; confirm with product owners before changing, since fixing
    /// it shifts output geometry on every fallback page.
    pub fn fallback(pixel_h: f32) -> Self {
        Self::new(
            30.0,
            pixel_h / 2.0 - 5.0,
            pixel_h / 2.0 + 5.0,
            pixel_h - 30.0,
            pixel_h / 2.0,
        )
    }

    /// x-bounds of one column. The right bounds also serve unset-column
    /// placements.
    pub fn x_bounds(&self, left: bool) -> (f32, f32) {
        if left {
            (self.left_x0, self.left_x1)
        } else {
            (self.right_x0, self.right_x1)
        }
    }
}

impl From<[f32; 5]> for ColumnBounds {
    fn from(v: [f32; 5]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4])
    }
}

impl From<ColumnBounds> for [f32; 5] {
    fn from(c: ColumnBounds) -> Self {
        [c.left_x0, c.left_x1, c.right_x0, c.right_x1, c.split_x]
    }
}

/// Pixel-to-point conversion factors for one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    /// Horizontal factor (points per pixel)
    pub x: f32,
    /// Vertical factor (points per pixel)
    pub y: f32,
}

impl Scale {
    /// Derive the conversion from a page's dual dimensions.
    pub fn from_dimensions(d: &PageDimensions) -> Self {
        Self {
            x: d.point_w / d.pixel_w,
            y: d.point_h / d.pixel_h,
        }
    }

    /// Rescale a pixel-space rectangle into point space.
    pub fn rect_to_points(&self, r: PixelRect) -> PointRect {
        PointRect::new(
            r.x0 * self.x,
            r.y0 * self.y,
            r.x1 * self.x,
            r.y1 * self.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_rect_array_round_trip() {
        let json = "[10.0,20.0,110.0,220.0]";
        let r: PixelRect = serde_json::from_str(json).unwrap();
        assert_eq!(r, PixelRect::new(10.0, 20.0, 110.0, 220.0));
        let back = serde_json::to_string(&r).unwrap();
        let again: PixelRect = serde_json::from_str(&back).unwrap();
        assert_eq!(again, r);
    }

    #[test]
    fn test_degenerate_rects() {
        assert!(PointRect::new(10.0, 10.0, 10.0, 20.0).is_degenerate());
        assert!(PointRect::new(10.0, 20.0, 30.0, 20.0).is_degenerate());
        assert!(!PointRect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn test_intersection_area() {
        let a = PixelRect::new(0.0, 0.0, 10.0, 10.0);
        let b = PixelRect::new(5.0, 5.0, 15.0, 15.0);
        assert_eq!(a.intersection_area(&b), 25.0);

        let c = PixelRect::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.intersection_area(&c), 0.0);
    }

    #[test]
    fn test_scale_from_dimensions() {
        // 612x792pt page rendered at 200dpi -> 1700x2200px
        let d = PageDimensions::new(612.0, 792.0, 1700.0, 2200.0);
        let s = Scale::from_dimensions(&d);
        assert!((s.x - 0.36).abs() < 1e-6);
        assert!((s.y - 0.36).abs() < 1e-6);

        let r = s.rect_to_points(PixelRect::new(100.0, 200.0, 300.0, 400.0));
        assert!((r.x0 - 36.0).abs() < 1e-3);
        assert!((r.y1 - 144.0).abs() < 1e-3);
    }

    #[test]
    fn test_column_fallback_uses_height() {
        let c = ColumnBounds::fallback(2200.0);
        assert_eq!(c.left_x0, 30.0);
        assert_eq!(c.left_x1, 1095.0);
        assert_eq!(c.right_x0, 1105.0);
        assert_eq!(c.right_x1, 2170.0);
        assert_eq!(c.split_x, 1100.0);
    }

    #[test]
    fn test_column_bounds_array_round_trip() {
        let json = "[30.0,820.0,880.0,1670.0,850.0]";
        let c: ColumnBounds = serde_json::from_str(json).unwrap();
        assert_eq!(c.x_bounds(true), (30.0, 820.0));
        assert_eq!(c.x_bounds(false), (880.0, 1670.0));
        assert_eq!(c.split_x, 850.0);
    }

    #[test]
    fn test_expanded() {
        let r = PointRect::new(10.0, 10.0, 20.0, 20.0).expanded(1.5, 0.5);
        assert_eq!(r, PointRect::new(8.5, 9.5, 21.5, 20.5));
    }
}
