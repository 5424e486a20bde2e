//! Crop rectangle in canvas pixel space
//!
//! The on-screen rectangle the user drags and resizes over a rendered page.
//! Canvas coordinates have their origin top-left. The rectangle always stays
//! fully inside the canvas and converts to and from [`CropMargins`].

use crate::crop::CropMargins;
use crate::error::PdfSplitError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Smallest width or height a resize may produce, in pixels.
pub const MIN_RECT_SIZE: f64 = 10.0;

/// Pixel size of the canvas the page is rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Resize handle: four corners and four edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    MiddleTop,
    MiddleBottom,
    MiddleLeft,
    MiddleRight,
}

/// How a handle maps pointer deltas onto the rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HandleEffect {
    /// Multiplier applied to `dx` for the width.
    width: f64,
    /// Multiplier applied to `dy` for the height.
    height: f64,
    /// Whether `left` follows `dx`.
    left: bool,
    /// Whether `top` follows `dy`.
    top: bool,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
        Handle::MiddleTop,
        Handle::MiddleBottom,
        Handle::MiddleLeft,
        Handle::MiddleRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Handle::TopLeft => "top-left",
            Handle::TopRight => "top-right",
            Handle::BottomLeft => "bottom-left",
            Handle::BottomRight => "bottom-right",
            Handle::MiddleTop => "middle-top",
            Handle::MiddleBottom => "middle-bottom",
            Handle::MiddleLeft => "middle-left",
            Handle::MiddleRight => "middle-right",
        }
    }

    fn effect(&self) -> HandleEffect {
        let (width, height, left, top) = match self {
            Handle::TopLeft => (-1.0, -1.0, true, true),
            Handle::TopRight => (1.0, -1.0, false, true),
            Handle::BottomLeft => (-1.0, 1.0, true, false),
            Handle::BottomRight => (1.0, 1.0, false, false),
            Handle::MiddleTop => (0.0, -1.0, false, true),
            Handle::MiddleBottom => (0.0, 1.0, false, false),
            Handle::MiddleLeft => (-1.0, 0.0, true, false),
            Handle::MiddleRight => (1.0, 0.0, false, false),
        };
        HandleEffect {
            width,
            height,
            left,
            top,
        }
    }
}

impl FromStr for Handle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Handle::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| format!("Unknown resize handle: {}", s))
    }
}

/// Crop rectangle in canvas pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRectangle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRectangle {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle covering the whole canvas.
    pub fn full(canvas: CanvasSize) -> Self {
        Self::new(0.0, 0.0, canvas.width, canvas.height)
    }

    /// Shrink and shift so the rectangle lies inside the canvas.
    pub fn clamped_to(&self, canvas: CanvasSize) -> Self {
        let width = self.width.min(canvas.width).max(0.0);
        let height = self.height.min(canvas.height).max(0.0);
        let left = self.left.min(canvas.width - width).max(0.0);
        let top = self.top.min(canvas.height - height).max(0.0);
        Self::new(left, top, width, height)
    }

    pub fn contained_in(&self, canvas: CanvasSize) -> bool {
        self.left >= 0.0
            && self.top >= 0.0
            && self.left + self.width <= canvas.width
            && self.top + self.height <= canvas.height
    }

    /// Translate by the pointer delta, clamping each axis into the canvas.
    pub fn dragged(&self, dx: f64, dy: f64, canvas: CanvasSize) -> Self {
        Self::new(
            (self.left + dx).min(canvas.width - self.width).max(0.0),
            (self.top + dy).min(canvas.height - self.height).max(0.0),
            self.width,
            self.height,
        )
    }

    /// Apply a handle drag to this rectangle, taken as the gesture-start state.
    ///
    /// Each axis is resolved on its own: an axis whose result would fall
    /// under [`MIN_RECT_SIZE`] keeps its starting position and size while the
    /// other axis still moves.
    pub fn resized(&self, handle: Handle, dx: f64, dy: f64, canvas: CanvasSize) -> Self {
        let effect = handle.effect();

        let (left, width) = resize_axis(
            self.left,
            self.width,
            effect.width * dx,
            if effect.left { dx } else { 0.0 },
            canvas.width,
        );
        let (top, height) = resize_axis(
            self.top,
            self.height,
            effect.height * dy,
            if effect.top { dy } else { 0.0 },
            canvas.height,
        );

        Self::new(left, top, width, height)
    }

    /// Margins in percent, clamped at zero.
    pub fn to_margins(&self, canvas: CanvasSize) -> CropMargins {
        CropMargins::new(
            self.top / canvas.height * 100.0,
            (1.0 - (self.top + self.height) / canvas.height) * 100.0,
            self.left / canvas.width * 100.0,
            (1.0 - (self.left + self.width) / canvas.width) * 100.0,
        )
        .clamped()
    }

    /// Rectangle for typed-in margins; negative margins count as zero.
    pub fn from_margins(margins: &CropMargins, canvas: CanvasSize) -> Result<Self, PdfSplitError> {
        margins.validate()?;
        let m = margins.clamped();

        Ok(Self::new(
            canvas.width * (m.left / 100.0),
            canvas.height * (m.top / 100.0),
            canvas.width * margins.visible_width_fraction(),
            canvas.height * margins.visible_height_fraction(),
        )
        .clamped_to(canvas))
    }
}

/// Resolve one axis of a resize. Returns `(start, length)`.
fn resize_axis(start: f64, length: f64, grow: f64, shift: f64, limit: f64) -> (f64, f64) {
    let mut new_start = start + shift;
    let mut new_length = length + grow;

    if new_start < 0.0 {
        // Pin to the far edge the rectangle had when the gesture began.
        new_length = start + length;
        new_start = 0.0;
    }
    if new_start + new_length > limit {
        new_length = limit - new_start;
    }

    if new_length < MIN_RECT_SIZE {
        (start, length)
    } else {
        (new_start, new_length)
    }
}
