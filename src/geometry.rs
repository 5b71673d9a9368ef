//! View Geometry
//!
//! Preview surface dimensions and the optional square recognition region
//! derived from them.

use serde::{Deserialize, Serialize};

/// Size and scan-area layout of the hosted preview view
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewGeometry {
    pub width: f64,
    pub height: f64,
    /// Side of the square recognition area, `0.0` for full frame
    pub scan_area_size: f64,
    /// Distance the recognition area is lifted above the vertical center
    pub vertical_offset: f64,
}

impl ViewGeometry {
    pub fn new(width: f64, height: f64, scan_area_size: f64, vertical_offset: f64) -> Self {
        Self {
            width,
            height,
            scan_area_size,
            vertical_offset,
        }
    }

    /// Preview surface matching this geometry
    #[inline]
    pub fn surface(&self) -> PreviewSurface {
        PreviewSurface {
            width: self.width,
            height: self.height,
        }
    }

    /// Recognition region, or `None` when the whole frame is scanned
    pub fn scan_rect(&self) -> Option<ScanRect> {
        if self.scan_area_size == 0.0 {
            return None;
        }

        let side = self.scan_area_size;
        let mid_x = self.width / 2.0;
        let mid_y = self.height / 2.0;

        Some(ScanRect {
            x: mid_x - side / 2.0,
            y: mid_y - side / 2.0 - self.vertical_offset,
            width: side,
            height: side,
        })
    }
}

/// Preview surface the provider renders into, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PreviewSurface {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned rectangle in preview surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScanRect {
    /// Center point of the rectangle
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}
