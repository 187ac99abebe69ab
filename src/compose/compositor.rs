use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::{
    assets::raster::PreparedImage,
    foundation::{
        core::{Affine, PixelSize, Rect, Size},
        error::{OverlayerError, OverlayerResult},
        math::unpremultiply_rgba8_in_place,
    },
    geometry::{
        mapper::{ContainerBounds, FittedBackground, fit_to_container, to_source_space},
        transform::OverlayTransform,
    },
};

/// Decoded background plus where it is shown inside its container.
#[derive(Clone, Debug)]
pub struct BackgroundRaster {
    pub image: PreparedImage,
    pub fitted: FittedBackground,
    /// File name the background was loaded from.
    pub name: String,
}

impl BackgroundRaster {
    /// Fit `image` into `bounds`, preserving its aspect ratio.
    pub fn fit(
        image: PreparedImage,
        bounds: ContainerBounds,
        name: impl Into<String>,
    ) -> OverlayerResult<Self> {
        let fitted = fit_to_container(image.size(), bounds)?;
        Ok(Self {
            image,
            fitted,
            name: name.into(),
        })
    }

    pub fn native_size(&self) -> PixelSize {
        self.image.size()
    }

    /// Size the container adopts once the background is shown.
    pub fn display_size(&self) -> Size {
        self.fitted.display_size()
    }

    pub fn display_rect(&self) -> Rect {
        self.fitted.display
    }
}

/// What to do at export when an overlay is selected but its raster is
/// missing (decode pending or failed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayFailurePolicy {
    /// Warn and export the background alone.
    #[default]
    FallbackToBackground,
    /// Abort the export.
    Fail,
}

/// Flattened output raster (premultiplied RGBA8, row-major).
#[derive(Clone, Debug)]
pub struct CompositeResult {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl CompositeResult {
    pub fn size(&self) -> PixelSize {
        PixelSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy for encoders.
    pub fn to_rgba_image(&self) -> OverlayerResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| OverlayerError::validation("composite buffer length mismatch"))
    }

    /// Serialize to PNG bytes.
    pub fn encode_png(&self) -> OverlayerResult<Vec<u8>> {
        let img = self.to_rgba_image()?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode composite as png")?;
        Ok(buf)
    }
}

/// Flatten background + overlay at the background's native resolution.
///
/// The overlay transform is read in display space, using the background's
/// current display size as the reference extent.
pub fn compose(
    background: Option<&BackgroundRaster>,
    overlay: Option<&PreparedImage>,
    transform: &OverlayTransform,
) -> OverlayerResult<CompositeResult> {
    let Some(bg) = background else {
        return Err(OverlayerError::NoBackground);
    };
    compose_with_display(Some(bg), overlay, transform, bg.display_size())
}

/// [`compose`] with an explicit display reference size.
#[tracing::instrument(skip_all, fields(has_overlay = overlay.is_some()))]
pub fn compose_with_display(
    background: Option<&BackgroundRaster>,
    overlay: Option<&PreparedImage>,
    transform: &OverlayTransform,
    display_size: Size,
) -> OverlayerResult<CompositeResult> {
    let Some(bg) = background else {
        tracing::debug!("compose skipped: no background");
        return Err(OverlayerError::NoBackground);
    };
    let native = bg.native_size();

    let placed = match overlay {
        Some(img) => Some((img, to_source_space(transform, display_size, native)?)),
        None => None,
    };
    if let Some((_, t)) = &placed {
        tracing::debug!(
            x = t.x,
            y = t.y,
            width = t.width,
            height = t.height,
            rotation_deg = t.rotation_deg,
            "overlay mapped to source space"
        );
    }

    render_layers(
        native,
        &bg.image,
        native.to_size().to_rect(),
        placed.as_ref().map(|(img, t)| (*img, t)),
    )
}

/// Render what the user sees: the background at its fitted display size and
/// the overlay at its display-space transform.
pub fn render_preview(
    background: &BackgroundRaster,
    overlay: Option<(&PreparedImage, &OverlayTransform)>,
) -> OverlayerResult<CompositeResult> {
    let display = background.display_size();
    let target = PixelSize::new(
        display.width.round().max(1.0) as u32,
        display.height.round().max(1.0) as u32,
    )?;
    render_layers(target, &background.image, background.display_rect(), overlay)
}

fn render_layers(
    target: PixelSize,
    background: &PreparedImage,
    background_rect: Rect,
    overlay: Option<(&PreparedImage, &OverlayTransform)>,
) -> OverlayerResult<CompositeResult> {
    let w = raster_extent("output width", target.width)?;
    let h = raster_extent("output height", target.height)?;

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    let bg_to_rect = Affine::translate(background_rect.origin().to_vec2())
        * Affine::scale_non_uniform(
            background_rect.width() / f64::from(background.width),
            background_rect.height() / f64::from(background.height),
        );
    draw_image(&mut ctx, background, bg_to_rect)?;

    if let Some((img, t)) = overlay {
        // unit square -> rotated rect, pre-scaled from image pixels
        let placement = t.to_affine()
            * Affine::scale_non_uniform(1.0 / f64::from(img.width), 1.0 / f64::from(img.height));
        draw_image(&mut ctx, img, placement)?;
    }

    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(CompositeResult {
        width: target.width,
        height: target.height,
        data: pixmap.data_as_u8_slice().to_vec(),
    })
}

fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    img: &PreparedImage,
    transform: Affine,
) -> OverlayerResult<()> {
    let pixmap = image_premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(img.width),
        f64::from(img.height),
    ));
    Ok(())
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

/// Largest raster edge the CPU rasterizer can address (its surfaces are
/// `u16`-sized).
pub const MAX_RASTER_EXTENT: u32 = u16::MAX as u32;

fn raster_extent(what: &str, px: u32) -> OverlayerResult<u16> {
    u16::try_from(px).map_err(|_| {
        OverlayerError::validation(format!(
            "{what} of {px} px exceeds the rasterizer limit of {MAX_RASTER_EXTENT} px"
        ))
    })
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> OverlayerResult<vello_cpu::Pixmap> {
    let w = raster_extent("image width", width)?;
    let h = raster_extent("image height", height)?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(OverlayerError::validation(
            "prepared image byte length mismatch",
        ));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
