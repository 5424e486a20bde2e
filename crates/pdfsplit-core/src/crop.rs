//! Crop margins
//!
//! Margins are percentages of the page dimension (`12.5` means 12.5%).
//! The resulting crop box uses PDF conventions: origin bottom-left, so the
//! bottom margin sets the box's `y`.

use crate::error::PdfSplitError;
use crate::geometry::{PageGeometry, Rect};
use serde::{Deserialize, Serialize};

/// Decimal places kept when margins are shown in the UI.
pub const DISPLAY_DECIMALS: i32 = 2;

/// Four margins in percent of the page size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CropMargins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl CropMargins {
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Clamp every negative margin to zero.
    pub fn clamped(&self) -> Self {
        Self::new(
            self.top.max(0.0),
            self.bottom.max(0.0),
            self.left.max(0.0),
            self.right.max(0.0),
        )
    }

    /// Round every margin to [`DISPLAY_DECIMALS`] places.
    pub fn rounded(&self) -> Self {
        let factor = 10f64.powi(DISPLAY_DECIMALS);
        let round = |v: f64| (v * factor).round() / factor;
        Self::new(
            round(self.top),
            round(self.bottom),
            round(self.left),
            round(self.right),
        )
    }

    /// Reject margins that would leave no visible area.
    ///
    /// Negative values are tolerated here since every consumer clamps them.
    pub fn validate(&self) -> Result<(), PdfSplitError> {
        let values = [self.top, self.bottom, self.left, self.right];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PdfSplitError::InvalidMargins(
                "margins must be finite numbers".into(),
            ));
        }

        let m = self.clamped();
        if m.left + m.right >= 100.0 {
            return Err(PdfSplitError::InvalidMargins(format!(
                "left + right must be below 100% (got {}% + {}%)",
                m.left, m.right
            )));
        }
        if m.top + m.bottom >= 100.0 {
            return Err(PdfSplitError::InvalidMargins(format!(
                "top + bottom must be below 100% (got {}% + {}%)",
                m.top, m.bottom
            )));
        }
        Ok(())
    }

    /// Re-express margins given for the displayed page in the page's own
    /// unrotated space. `rotation` is the clockwise `/Rotate` angle; anything
    /// other than a quarter turn leaves the margins as they are.
    pub fn unrotated(&self, rotation: i64) -> Self {
        let (top, right, bottom, left) = (self.top, self.right, self.bottom, self.left);
        match rotation.rem_euclid(360) {
            90 => Self::new(right, left, top, bottom),
            180 => Self::new(bottom, top, right, left),
            270 => Self::new(left, right, bottom, top),
            _ => *self,
        }
    }

    /// Fraction of the width that stays visible.
    pub fn visible_width_fraction(&self) -> f64 {
        let m = self.clamped();
        1.0 - m.left / 100.0 - m.right / 100.0
    }

    /// Fraction of the height that stays visible.
    pub fn visible_height_fraction(&self) -> f64 {
        let m = self.clamped();
        1.0 - m.top / 100.0 - m.bottom / 100.0
    }
}

/// Crop box for a page of the given size, relative to the page origin.
///
/// `width·(1 − left − right)` by `height·(1 − top − bottom)`, placed at
/// `(width·left, height·bottom)`.
pub fn crop_box(page: PageGeometry, margins: &CropMargins) -> Result<Rect, PdfSplitError> {
    margins.validate()?;
    let m = margins.clamped();

    Ok(Rect::new(
        page.width * (m.left / 100.0),
        page.height * (m.bottom / 100.0),
        page.width * margins.visible_width_fraction(),
        page.height * margins.visible_height_fraction(),
    ))
}
