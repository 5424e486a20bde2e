//! Pointer gesture state machine for the crop rectangle
//!
//! A gesture starts on pointer-down over the rectangle body or one of its
//! handles and records a snapshot of the pointer and rectangle. Every move
//! is applied to that snapshot, not to the previous frame, so rounding and
//! clamping never accumulate. Pointer-up returns to [`Gesture::Idle`].

use crate::crop::CropMargins;
use crate::crop_rect::{CanvasSize, CropRectangle, Handle};
use crate::error::PdfSplitError;

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Body,
    Handle(Handle),
}

/// Pointer position and rectangle when the gesture began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureStart {
    pub pointer_x: f64,
    pub pointer_y: f64,
    pub rect: CropRectangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(GestureStart),
    Resizing(Handle, GestureStart),
}

/// Crop rectangle plus the gesture currently acting on it.
#[derive(Debug, Clone)]
pub struct Cropper {
    canvas: CanvasSize,
    rect: CropRectangle,
    gesture: Gesture,
}

impl Cropper {
    /// Start with the rectangle covering the whole canvas.
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            rect: CropRectangle::full(canvas),
            gesture: Gesture::Idle,
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn rect(&self) -> CropRectangle {
        self.rect
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Margins as shown in the percentage fields.
    pub fn margins(&self) -> CropMargins {
        self.rect.to_margins(self.canvas).rounded()
    }

    /// Begin a drag or resize. Ignored while another gesture is active.
    pub fn pointer_down(&mut self, target: PointerTarget, x: f64, y: f64) -> bool {
        if self.is_active() {
            return false;
        }

        let start = GestureStart {
            pointer_x: x,
            pointer_y: y,
            rect: self.rect,
        };
        self.gesture = match target {
            PointerTarget::Body => Gesture::Dragging(start),
            PointerTarget::Handle(handle) => Gesture::Resizing(handle, start),
        };
        true
    }

    /// Apply the pointer position to the active gesture.
    ///
    /// Returns the new margins when the rectangle changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<CropMargins> {
        let next = match self.gesture {
            Gesture::Idle => return None,
            Gesture::Dragging(start) => {
                let (dx, dy) = (x - start.pointer_x, y - start.pointer_y);
                start.rect.dragged(dx, dy, self.canvas)
            }
            Gesture::Resizing(handle, start) => {
                let (dx, dy) = (x - start.pointer_x, y - start.pointer_y);
                start.rect.resized(handle, dx, dy, self.canvas)
            }
        };

        if next == self.rect {
            return None;
        }
        self.rect = next;
        Some(self.margins())
    }

    /// End the active gesture. Returns whether one was active.
    pub fn pointer_up(&mut self) -> bool {
        let was_active = self.is_active();
        self.gesture = Gesture::Idle;
        was_active
    }

    /// Replace the rectangle from typed-in margins.
    ///
    /// Degenerate margins leave the rectangle untouched.
    pub fn set_margins(&mut self, margins: &CropMargins) -> Result<CropMargins, PdfSplitError> {
        self.rect = CropRectangle::from_margins(margins, self.canvas)?;
        Ok(self.margins())
    }

    /// Start over on a freshly rendered page: full rectangle, no gesture.
    pub fn reset(&mut self, canvas: CanvasSize) {
        *self = Self::new(canvas);
    }

    /// Adopt a new canvas size, keeping the same margins.
    pub fn resize_canvas(&mut self, canvas: CanvasSize) {
        let margins = self.rect.to_margins(self.canvas);
        self.canvas = canvas;
        self.gesture = Gesture::Idle;
        self.rect = CropRectangle::from_margins(&margins, canvas)
            .unwrap_or_else(|_| CropRectangle::full(canvas));
    }
}
