use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Window identifier (HWND on Windows, CGWindowID on macOS)
pub type WindowId = u64;

/// Sub-region for partial capture (relative to window origin)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRect {
    pub l: i32,
    pub t: i32,
    pub w: i32,
    pub h: i32,
}

/// Raw screenshot pixel data (BGRA)
#[derive(Debug)]
pub struct Capture {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub bytes_per_row: u32,
}

impl Capture {
    /// Copy out a sub-rectangle as a tightly packed capture. The rect is
    /// clamped to the frame; an empty intersection is an error.
    pub fn crop(&self, rect: CaptureRect) -> Result<Capture> {
        let x0 = rect.l.clamp(0, self.width as i32) as u32;
        let y0 = rect.t.clamp(0, self.height as i32) as u32;
        let x1 = (rect.l + rect.w).clamp(0, self.width as i32) as u32;
        let y1 = (rect.t + rect.h).clamp(0, self.height as i32) as u32;
        if x1 <= x0 || y1 <= y0 {
            bail!(
                "crop rect {:?} does not intersect a {}x{} frame",
                rect,
                self.width,
                self.height
            );
        }

        let w = x1 - x0;
        let h = y1 - y0;
        let mut data = Vec::with_capacity((w * h * 4) as usize);
        for y in y0..y1 {
            let start = (y * self.bytes_per_row + x0 * 4) as usize;
            data.extend_from_slice(&self.data[start..start + (w * 4) as usize]);
        }
        Ok(Capture {
            data,
            width: w,
            height: h,
            bytes_per_row: w * 4,
        })
    }
}

/// Fractional crop bounds applied to a frame before recognition.
/// All four values are fractions of the frame's width/height.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegionOfInterest {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for RegionOfInterest {
    fn default() -> Self {
        Self {
            left: 0.15,
            right: 0.80,
            top: 0.10,
            bottom: 0.90,
        }
    }
}

impl RegionOfInterest {
    /// Invariants: every fraction in [0, 1], left < right, top < bottom.
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("left", self.left),
            ("right", self.right),
            ("top", self.top),
            ("bottom", self.bottom),
        ] {
            if !(0.0..=1.0).contains(&v) {
                bail!("crop fraction {} = {} lies outside [0, 1]", name, v);
            }
        }
        if self.left >= self.right {
            bail!("crop left {} must be below right {}", self.left, self.right);
        }
        if self.top >= self.bottom {
            bail!("crop top {} must be below bottom {}", self.top, self.bottom);
        }
        Ok(())
    }

    /// Pixel-space crop rect for a frame of the given size.
    pub fn capture_rect(&self, width: u32, height: u32) -> CaptureRect {
        let l = (width as f64 * self.left) as i32;
        let r = (width as f64 * self.right) as i32;
        let t = (height as f64 * self.top) as i32;
        let b = (height as f64 * self.bottom) as i32;
        CaptureRect {
            l,
            t,
            w: r - l,
            h: b - t,
        }
    }

    /// Horizontal pixel bounds of the chat column in full-frame coordinates.
    pub fn horizontal_bounds(&self, width: u32) -> (f64, f64) {
        (width as f64 * self.left, width as f64 * self.right)
    }
}

/// Axis-aligned bounding box in pixels. `x_min <= x_max`, `y_min <= y_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl BBox {
    /// Reduce a recognition quadrilateral to its axis-aligned bounding box.
    pub fn from_quad(quad: &[[f64; 2]; 4]) -> BBox {
        let mut x_min = f64::MAX;
        let mut y_min = f64::MAX;
        let mut x_max = f64::MIN;
        let mut y_max = f64::MIN;
        for p in quad {
            x_min = x_min.min(p[0]);
            y_min = y_min.min(p[1]);
            x_max = x_max.max(p[0]);
            y_max = y_max.max(p[1]);
        }
        BBox {
            x_min: x_min.floor() as i32,
            y_min: y_min.floor() as i32,
            x_max: x_max.ceil() as i32,
            y_max: y_max.ceil() as i32,
        }
    }

    pub fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> i32 {
        self.y_max - self.y_min
    }

    pub fn x_center(&self) -> f64 {
        (self.x_min + self.x_max) as f64 / 2.0
    }

    pub fn y_center(&self) -> f64 {
        (self.y_min + self.y_max) as f64 / 2.0
    }

    pub fn translate(&self, dx: i32, dy: i32) -> BBox {
        BBox {
            x_min: self.x_min + dx,
            y_min: self.y_min + dy,
            x_max: self.x_max + dx,
            y_max: self.y_max + dy,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x_min <= x && x <= self.x_max && self.y_min <= y && y <= self.y_max
    }
}

/// One recognized fragment as the recognition engine reports it:
/// crop-relative quadrilateral plus a confidence score.
#[derive(Debug, Clone)]
pub struct RawText {
    pub text: String,
    pub quad: [[f64; 2]; 4],
    pub confidence: f32,
}

/// One recognized fragment after normalization, in full-frame coordinates.
/// Immutable once produced for a cycle.
#[derive(Debug, Clone)]
pub struct TextElement {
    pub text: String,
    pub bbox: BBox,
}

/// Pixel to click, relative to the captured window's client area.
/// Produced fresh per successful match, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickPoint {
    pub x: i32,
    pub y: i32,
}

/// What one detection pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Button found and clicked at the given point.
    Clicked(ClickPoint),
    /// Recognition produced no text at all.
    NoText,
    /// Text present but no name/button pair matched.
    NoMatch,
    /// A match was found but stop was requested before injection.
    InjectionSkipped,
}
