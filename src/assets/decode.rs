use std::sync::Arc;

use crate::{
    OverlayerResult,
    assets::raster::PreparedImage,
    foundation::{error::OverlayerError, math::premultiply_rgba8_in_place},
};

/// Reject anything whose MIME type is not `image/*`.
pub fn check_image_mime(mime: &str) -> OverlayerResult<()> {
    if mime.trim().to_ascii_lowercase().starts_with("image/") {
        return Ok(());
    }
    Err(OverlayerError::invalid_input(
        "Please select a valid image file.",
    ))
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_image(bytes: &[u8]) -> OverlayerResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| OverlayerError::decode(format!("Error loading the image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(OverlayerError::decode(
            "Error loading the image: empty raster",
        ));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
