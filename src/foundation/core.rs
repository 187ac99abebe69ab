use crate::foundation::error::{OverlayerError, OverlayerResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Integer pixel dimensions of a raster (native/source space).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> OverlayerResult<Self> {
        if width == 0 || height == 0 {
            return Err(OverlayerError::validation(
                "pixel size width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn to_size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Height over width.
    pub fn aspect(self) -> f64 {
        f64::from(self.height) / f64::from(self.width)
    }

    pub fn byte_len_rgba8(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// `true` when `s` is finite and strictly positive.
pub(crate) fn is_positive_extent(s: Size) -> bool {
    s.width.is_finite() && s.height.is_finite() && s.width > 0.0 && s.height > 0.0
}
