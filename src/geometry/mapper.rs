use crate::{
    foundation::core::{PixelSize, Rect, Size, is_positive_extent},
    foundation::error::{OverlayerError, OverlayerResult},
    geometry::transform::OverlayTransform,
};

/// Independent per-axis scale factors between two pixel spaces.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AxisScale {
    pub x: f64,
    pub y: f64,
}

impl AxisScale {
    /// Scale that takes coordinates in `from` onto `to`.
    pub fn between(from: Size, to: Size) -> OverlayerResult<Self> {
        if !is_positive_extent(from) {
            return Err(OverlayerError::validation(
                "display extent must be > 0 before mapping (container not laid out?)",
            ));
        }
        if !is_positive_extent(to) {
            return Err(OverlayerError::validation("target extent must be > 0"));
        }
        Ok(Self {
            x: to.width / from.width,
            y: to.height / from.height,
        })
    }

    pub fn inverse(self) -> Self {
        Self {
            x: 1.0 / self.x,
            y: 1.0 / self.y,
        }
    }

    pub fn apply(self, t: &OverlayTransform) -> OverlayTransform {
        t.scale_axes(self.x, self.y)
    }
}

/// Map a display-space transform into the background's native pixel grid.
///
/// Rotation is scale-invariant and passes through unchanged. Fails when the
/// display extent is zero.
pub fn to_source_space(
    display: &OverlayTransform,
    display_size: Size,
    source_size: PixelSize,
) -> OverlayerResult<OverlayTransform> {
    let scale = AxisScale::between(display_size, source_size.to_size())?;
    Ok(scale.apply(display))
}

/// Reciprocal of [`to_source_space`].
pub fn to_display_space(
    source: &OverlayTransform,
    display_size: Size,
    source_size: PixelSize,
) -> OverlayerResult<OverlayTransform> {
    let scale = AxisScale::between(display_size, source_size.to_size())?;
    Ok(scale.inverse().apply(source))
}

/// Space available for the background inside its container.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContainerBounds {
    pub max_width: f64,
    /// `None` lets the height follow the image.
    #[serde(default)]
    pub max_height: Option<f64>,
}

impl ContainerBounds {
    pub fn width(max_width: f64) -> Self {
        Self {
            max_width,
            max_height: None,
        }
    }

    pub fn new(max_width: f64, max_height: f64) -> Self {
        Self {
            max_width,
            max_height: Some(max_height),
        }
    }

    pub fn validate(&self) -> OverlayerResult<()> {
        if !self.max_width.is_finite() || self.max_width <= 0.0 {
            return Err(OverlayerError::validation(
                "container max_width must be finite and > 0",
            ));
        }
        if let Some(h) = self.max_height
            && (!h.is_finite() || h <= 0.0)
        {
            return Err(OverlayerError::validation(
                "container max_height must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Result of fitting a background into its container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FittedBackground {
    pub scale: f64,
    /// Where the background is drawn; the container adopts `display.size()`,
    /// so the origin is always `(0, 0)`.
    pub display: Rect,
}

impl FittedBackground {
    pub fn display_size(&self) -> Size {
        self.display.size()
    }
}

/// Uniform "contain" fit that preserves the native aspect ratio.
pub fn fit_to_container(
    native: PixelSize,
    bounds: ContainerBounds,
) -> OverlayerResult<FittedBackground> {
    bounds.validate()?;
    if native.width == 0 || native.height == 0 {
        return Err(OverlayerError::validation("background has a zero extent"));
    }

    let native = native.to_size();
    let mut scale = bounds.max_width / native.width;
    if let Some(h) = bounds.max_height {
        scale = scale.min(h / native.height);
    }

    Ok(FittedBackground {
        scale,
        display: Rect::new(0.0, 0.0, native.width * scale, native.height * scale),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/mapper.rs"]
mod tests;
