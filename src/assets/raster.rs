use std::sync::Arc;

use crate::foundation::{
    core::PixelSize,
    error::{OverlayerError, OverlayerResult},
};

#[derive(Clone, Debug)]
/// Decoded raster in premultiplied RGBA8 form, ready to draw.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap premultiplied bytes, checking the length against the extent.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> OverlayerResult<Self> {
        let size = PixelSize::new(width, height)?;
        if rgba8_premul.len() != size.byte_len_rgba8() {
            return Err(OverlayerError::validation(
                "prepared image byte length mismatch",
            ));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Single-color raster; handy for placeholders and tests.
    pub fn solid(width: u32, height: u32, premul: [u8; 4]) -> OverlayerResult<Self> {
        let size = PixelSize::new(width, height)?;
        let mut bytes = Vec::with_capacity(size.byte_len_rgba8());
        for _ in 0..(width as usize * height as usize) {
            bytes.extend_from_slice(&premul);
        }
        Self::from_premul(width, height, bytes)
    }

    pub fn size(&self) -> PixelSize {
        PixelSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Height over width.
    pub fn aspect(&self) -> f64 {
        self.size().aspect()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba8_premul.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// An uploaded file as the browser hands it over.
#[derive(Clone, Debug)]
pub struct ImageFile {
    pub name: String,
    pub mime: String,
    pub bytes: Arc<Vec<u8>>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: Arc::new(bytes),
        }
    }

    /// Build from a path on disk, guessing the MIME type from the extension.
    pub fn read(path: &std::path::Path) -> OverlayerResult<Self> {
        use anyhow::Context as _;

        let bytes =
            std::fs::read(path).with_context(|| format!("read image file '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, mime_for_path(path), bytes))
    }
}

/// Best-effort MIME type from a file extension, `application/octet-stream`
/// when the extension is not a known image format.
pub fn mime_for_path(path: &std::path::Path) -> String {
    image::ImageFormat::from_path(path)
        .map(|f| f.to_mime_type().to_string())
        .unwrap_or_else(|_| "application/octet-stream".to_string())
}
