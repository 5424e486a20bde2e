//! Split geometry
//!
//! Pure arithmetic deciding how a page is cut in two. Coordinates follow PDF
//! conventions: origin bottom-left, units in points. All offsets and clip
//! boxes are written as explicit fractions of the source dimension so two
//! implementations produce identical numbers.

use serde::{Deserialize, Serialize};

/// Size of a source page in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The axis a page of this size is split along.
    pub fn split_axis(&self) -> SplitAxis {
        if self.width > self.height {
            SplitAxis::Vertical
        } else {
            SplitAxis::Horizontal
        }
    }
}

/// Axis-aligned rectangle, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Move by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Cut direction, derived from the page's longer side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitAxis {
    /// Landscape page cut into left then right.
    Vertical,
    /// Portrait or square page cut into bottom then top.
    Horizontal,
}

/// Whether halves meet exactly or overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SplitMode {
    /// Each half is exactly 1/2 of the split dimension.
    #[default]
    Normal,
    /// Each half is 11/20 of the split dimension; halves share 10% of the
    /// source so content survives trimming after print and cut.
    Extended,
}

impl SplitMode {
    /// Length of each half along the split axis.
    pub fn half_length(&self, dimension: f64) -> f64 {
        match self {
            SplitMode::Normal => dimension / 2.0,
            SplitMode::Extended => dimension * 11.0 / 20.0,
        }
    }

    /// Distance from the source origin to the start of the half lying away
    /// from it.
    pub fn second_start(&self, dimension: f64) -> f64 {
        match self {
            SplitMode::Normal => dimension / 2.0,
            SplitMode::Extended => dimension * 9.0 / 20.0,
        }
    }
}

impl From<bool> for SplitMode {
    fn from(extended: bool) -> Self {
        if extended {
            SplitMode::Extended
        } else {
            SplitMode::Normal
        }
    }
}

/// One output page produced from a split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalfPage {
    /// Size of the new page.
    pub size: PageGeometry,
    /// Translation applied when drawing the full source page onto this page.
    pub offset_x: f64,
    pub offset_y: f64,
    /// Visible region in destination space; always the new page's own bounds.
    pub clip: Rect,
}

impl HalfPage {
    fn new(size: PageGeometry, offset_x: f64, offset_y: f64) -> Self {
        Self {
            size,
            offset_x,
            offset_y,
            clip: Rect::new(0.0, 0.0, size.width, size.height),
        }
    }

    /// The part of the source page that shows through the clip.
    pub fn source_region(&self) -> Rect {
        self.clip.translate(-self.offset_x, -self.offset_y)
    }
}

/// Geometry of a split page: `first` is emitted before `second`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitResult {
    pub axis: SplitAxis,
    pub first: HalfPage,
    pub second: HalfPage,
}

impl SplitResult {
    /// Length of source content shown on both halves.
    pub fn overlap(&self) -> f64 {
        let (a, b) = (self.first.source_region(), self.second.source_region());
        match self.axis {
            SplitAxis::Vertical => a.right() - b.x,
            SplitAxis::Horizontal => b.top() - a.y,
        }
    }
}

/// Compute the two halves of a page.
///
/// Landscape pages (`width > height`) become left and right halves, every
/// other page becomes bottom and top halves, in that order. Halves follow
/// reading order: the left half and the first (bottom) page of a portrait
/// split show the start of the source, which for a portrait page is its
/// upper part since PDF space grows upward. A half shifts the source back by
/// the start of its region so the clip at its own bounds shows that area.
pub fn split_geometry(page: PageGeometry, mode: SplitMode) -> SplitResult {
    let axis = page.split_axis();
    match axis {
        SplitAxis::Vertical => {
            let size = PageGeometry::new(mode.half_length(page.width), page.height);
            let shift = mode.second_start(page.width);
            SplitResult {
                axis,
                first: HalfPage::new(size, 0.0, 0.0),
                second: HalfPage::new(size, -shift, 0.0),
            }
        }
        SplitAxis::Horizontal => {
            let size = PageGeometry::new(page.width, mode.half_length(page.height));
            let shift = mode.second_start(page.height);
            SplitResult {
                axis,
                first: HalfPage::new(size, 0.0, -shift),
                second: HalfPage::new(size, 0.0, 0.0),
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimension() -> impl Strategy<Value = f64> {
        1.0f64..5000.0
    }

    proptest! {
        /// Normal halves tile the source along the split axis without gap or overlap.
        #[test]
        fn normal_halves_partition_source(w in dimension(), h in dimension()) {
            let result = split_geometry(PageGeometry::new(w, h), SplitMode::Normal);
            let (a, b) = (result.first.source_region(), result.second.source_region());
            match result.axis {
                SplitAxis::Vertical => {
                    prop_assert!(w > h);
                    prop_assert_eq!(a.x, 0.0);
                    prop_assert_eq!(a.right(), b.x);
                    prop_assert!((b.right() - w).abs() < 1e-9 * w);
                    prop_assert_eq!(result.first.size.width, w / 2.0);
                    prop_assert_eq!(result.first.size.height, h);
                }
                SplitAxis::Horizontal => {
                    prop_assert!(w <= h);
                    // First page carries the upper half of the source.
                    prop_assert_eq!(b.y, 0.0);
                    prop_assert_eq!(b.top(), a.y);
                    prop_assert!((a.top() - h).abs() < 1e-9 * h);
                    prop_assert_eq!(result.first.size.height, h / 2.0);
                }
            }
        }

        /// Extended halves overlap by a tenth of the split dimension.
        #[test]
        fn extended_halves_overlap_by_tenth(w in dimension(), h in dimension()) {
            let result = split_geometry(PageGeometry::new(w, h), SplitMode::Extended);
            let dim = match result.axis {
                SplitAxis::Vertical => w,
                SplitAxis::Horizontal => h,
            };
            prop_assert!((result.overlap() - dim / 10.0).abs() < 1e-9 * dim);
            let half = match result.axis {
                SplitAxis::Vertical => result.first.size.width,
                SplitAxis::Horizontal => result.first.size.height,
            };
            prop_assert_eq!(half, dim * 11.0 / 20.0);
        }
    }
}
