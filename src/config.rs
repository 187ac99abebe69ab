use std::path::Path;

use anyhow::Context;

use crate::{
    assets::gallery::{CheatCode, GalleryEntry},
    compose::compositor::OverlayFailurePolicy,
    foundation::error::{OverlayerError, OverlayerResult},
    geometry::{mapper::ContainerBounds, transform::ResizeMode},
    interaction::controller::ControllerSettings,
};

/// Editor configuration, usually loaded from JSON. Every field has a default,
/// so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Space the background is fitted into.
    pub container: ContainerBounds,
    /// Width of a freshly selected overlay, in display pixels.
    pub default_overlay_width_px: f64,
    /// Floor for overlay width/height during resize.
    pub min_overlay_extent_px: f64,
    /// Size of the bottom-right corner zone that turns a body press into a resize.
    pub resize_hit_zone_px: f64,
    pub resize_mode: ResizeMode,
    pub overlay_failure: OverlayFailurePolicy,
    /// Name handed to the save collaborator.
    pub export_file_name: String,
    pub gallery: Vec<GalleryEntry>,
    pub cheat_code: Option<CheatCode>,
    /// Dedicated decode threads; `None` uses rayon's global pool.
    pub decode_threads: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            container: ContainerBounds::width(800.0),
            default_overlay_width_px: 100.0,
            min_overlay_extent_px: 1.0,
            resize_hit_zone_px: 10.0,
            resize_mode: ResizeMode::Free,
            overlay_failure: OverlayFailurePolicy::FallbackToBackground,
            export_file_name: "image.png".to_string(),
            gallery: vec![
                GalleryEntry::new("Overlay 1", "images/overlay1.png"),
                GalleryEntry::new("Overlay 2", "images/overlay2.png"),
                GalleryEntry::new("Overlay 3", "images/overlay3.png"),
            ],
            cheat_code: None,
            decode_threads: None,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(s: &str) -> OverlayerResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> OverlayerResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> OverlayerResult<()> {
        self.container.validate()?;
        for (name, v) in [
            ("default_overlay_width_px", self.default_overlay_width_px),
            ("min_overlay_extent_px", self.min_overlay_extent_px),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(OverlayerError::validation(format!("{name} must be finite and > 0")));
            }
        }
        if self.default_overlay_width_px < self.min_overlay_extent_px {
            return Err(OverlayerError::validation(
                "default_overlay_width_px must be >= min_overlay_extent_px",
            ));
        }
        if !self.resize_hit_zone_px.is_finite() || self.resize_hit_zone_px < 0.0 {
            return Err(OverlayerError::validation(
                "resize_hit_zone_px must be finite and >= 0",
            ));
        }
        let name = self.export_file_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(OverlayerError::validation(
                "export_file_name must be a bare, non-empty file name",
            ));
        }
        if self.decode_threads == Some(0) {
            return Err(OverlayerError::validation(
                "decode_threads must be >= 1 when set",
            ));
        }
        for (i, entry) in self.gallery.iter().enumerate() {
            crate::assets::source::normalize_rel_path(&entry.path).map_err(|e| {
                OverlayerError::validation(format!("gallery[{i}].path: {e}"))
            })?;
        }
        if let Some(cheat) = &self.cheat_code {
            if cheat.code.trim().is_empty() {
                return Err(OverlayerError::validation(
                    "cheat_code.code must be non-empty",
                ));
            }
            if cheat.slot >= self.gallery.len() {
                return Err(OverlayerError::validation(
                    "cheat_code.slot must index a gallery entry",
                ));
            }
            crate::assets::source::normalize_rel_path(&cheat.alternate_path)?;
        }
        Ok(())
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            resize_mode: self.resize_mode,
            min_extent_px: self.min_overlay_extent_px,
            resize_hit_zone_px: self.resize_hit_zone_px,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
