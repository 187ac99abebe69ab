use crate::{
    assets::{
        decode::check_image_mime,
        gallery::{Gallery, SlotStatus},
        loader::{LoadCompletion, LoadTarget},
        raster::{ImageFile, PreparedImage},
    },
    compose::{
        compositor::{
            BackgroundRaster, CompositeResult, OverlayFailurePolicy, compose, render_preview,
        },
        save::SaveSink,
    },
    config::EditorConfig,
    foundation::{
        core::Point,
        error::{OverlayerError, OverlayerResult},
    },
    geometry::{mapper::ContainerBounds, transform::OverlayTransform},
    interaction::{
        controller::{ControllerState, InteractionController},
        gesture::{Affordance, CursorHint, GestureKind, PointerInput},
        view::{OverlayStyle, OverlayView},
    },
};

/// The overlay currently placed on the background.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveOverlay {
    /// Gallery slot it was chosen from.
    pub slot: usize,
    /// Asset path at selection time.
    pub path: String,
    pub transform: OverlayTransform,
    /// Height still follows the asset's aspect once it decodes.
    auto_height: bool,
}

/// What an export handed to the save collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReceipt {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub byte_len: usize,
    pub overlay_included: bool,
}

/// Everything one editing session owns: background, gallery, active overlay
/// and the gesture controller.
///
/// All mutation goes through `&mut self`; decodes finish elsewhere and come
/// back through [`EditorSession::apply_completion`].
#[derive(Clone, Debug)]
pub struct EditorSession {
    config: EditorConfig,
    background: Option<BackgroundRaster>,
    gallery: Gallery,
    overlay: Option<ActiveOverlay>,
    controller: InteractionController,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> OverlayerResult<Self> {
        config.validate()?;
        let gallery = Gallery::new(config.gallery.clone(), config.cheat_code.clone());
        let controller = InteractionController::new(config.controller_settings());
        Ok(Self {
            config,
            background: None,
            gallery,
            overlay: None,
            controller,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn background(&self) -> Option<&BackgroundRaster> {
        self.background.as_ref()
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub(crate) fn gallery_mut(&mut self) -> &mut Gallery {
        &mut self.gallery
    }

    pub fn overlay(&self) -> Option<&ActiveOverlay> {
        self.overlay.as_ref()
    }

    pub fn transform(&self) -> Option<&OverlayTransform> {
        self.overlay.as_ref().map(|o| &o.transform)
    }

    pub fn controller_state(&self) -> ControllerState {
        self.controller.state()
    }

    /// Raster of the active overlay, when its slot has decoded.
    pub fn overlay_raster(&self) -> Option<&PreparedImage> {
        let overlay = self.overlay.as_ref()?;
        self.gallery.slot(overlay.slot).ok()?.image()
    }

    /// Gate for uploads: only `image/*` files are decoded.
    pub fn accept_background_file(&self, file: &ImageFile) -> OverlayerResult<()> {
        check_image_mime(&file.mime).inspect_err(|_| {
            tracing::debug!(name = %file.name, mime = %file.mime, "rejected non-image upload");
        })
    }

    /// Apply a finished decode. Background failures are returned and leave
    /// the previous background in place; gallery failures only mark the slot
    /// inert.
    #[tracing::instrument(
        skip(self, completion),
        fields(ticket = completion.ticket.0, target = ?completion.target)
    )]
    pub fn apply_completion(&mut self, completion: LoadCompletion) -> OverlayerResult<()> {
        let LoadCompletion {
            ticket,
            target,
            label,
            result,
        } = completion;

        match target {
            LoadTarget::Background => {
                let image = result?;
                let bg = BackgroundRaster::fit(image, self.config.container, label)?;
                tracing::debug!(
                    native_w = bg.image.width,
                    native_h = bg.image.height,
                    display_w = bg.display_size().width,
                    display_h = bg.display_size().height,
                    "background replaced"
                );
                self.background = Some(bg);
                Ok(())
            }
            LoadTarget::GallerySlot(index) => {
                let aspect = match self.gallery.apply_completion(index, ticket, result)? {
                    SlotStatus::Ready(img) => Some(img.aspect()),
                    SlotStatus::Pending | SlotStatus::Inert(_) => None,
                };
                if let (Some(aspect), Some(overlay)) = (aspect, self.overlay.as_mut())
                    && overlay.slot == index
                    && overlay.auto_height
                {
                    overlay.transform.height = overlay.transform.width * aspect;
                    overlay.auto_height = false;
                }
                Ok(())
            }
        }
    }

    /// Make gallery slot `index` the active overlay with a fresh default
    /// transform. Returns `false` (and changes nothing) for inert slots.
    pub fn select_overlay(&mut self, index: usize) -> OverlayerResult<bool> {
        let slot = self.gallery.slot(index)?;
        if slot.is_inert() {
            tracing::warn!(
                index,
                path = %slot.entry.path,
                "ignoring selection of inert gallery slot"
            );
            return Ok(false);
        }

        let aspect = slot.image().map(PreparedImage::aspect);
        let transform =
            OverlayTransform::reset_with_aspect(self.config.default_overlay_width_px, aspect);
        let path = slot.entry.path.clone();

        self.controller.reset();
        tracing::debug!(index, %path, "overlay selected");
        self.overlay = Some(ActiveOverlay {
            slot: index,
            path,
            transform,
            auto_height: aspect.is_none(),
        });
        Ok(true)
    }

    /// Remove the overlay (the element is hidden again). Any gesture in
    /// flight is dropped.
    pub fn clear_overlay(&mut self) {
        self.controller.reset();
        self.overlay = None;
    }

    /// Refit the background to new container bounds. The overlay keeps its
    /// display-space transform.
    pub fn resize_container(&mut self, bounds: ContainerBounds) -> OverlayerResult<()> {
        bounds.validate()?;
        if let Some(bg) = self.background.take() {
            let name = bg.name.clone();
            match BackgroundRaster::fit(bg.image.clone(), bounds, name) {
                Ok(refit) => self.background = Some(refit),
                Err(e) => {
                    self.background = Some(bg);
                    return Err(e);
                }
            }
        }
        self.config.container = bounds;
        Ok(())
    }

    pub fn pointer_down(&mut self, affordance: Affordance, input: PointerInput) -> ControllerState {
        match self.overlay.as_ref() {
            Some(o) => self.controller.pointer_down(affordance, input, &o.transform),
            None => self.controller.state(),
        }
    }

    pub fn pointer_move(&mut self, input: PointerInput, view: &mut dyn OverlayView) -> bool {
        let Some(overlay) = self.overlay.as_mut() else {
            return false;
        };
        let changed = self
            .controller
            .pointer_move(input, &mut overlay.transform, view);
        if changed && self.controller.state() == ControllerState::Resizing {
            overlay.auto_height = false;
        }
        changed
    }

    pub fn pointer_up(&mut self) -> Option<GestureKind> {
        self.controller.pointer_up()
    }

    pub fn cursor_hint(&self, p: Point) -> CursorHint {
        match self.overlay.as_ref() {
            Some(o) => self.controller.cursor_hint(p, &o.transform),
            None => CursorHint::Default,
        }
    }

    /// Current inline style of the overlay element, if one is shown.
    pub fn overlay_style(&self) -> Option<OverlayStyle> {
        self.transform().map(OverlayStyle::from)
    }

    /// Flatten at native resolution, applying the overlay failure policy.
    pub fn compose(&self) -> OverlayerResult<CompositeResult> {
        let (result, _) = self.compose_inner()?;
        Ok(result)
    }

    fn compose_inner(&self) -> OverlayerResult<(CompositeResult, bool)> {
        let Some(bg) = self.background.as_ref() else {
            tracing::debug!("export refused: no background");
            return Err(OverlayerError::NoBackground);
        };

        let Some(overlay) = self.overlay.as_ref() else {
            return Ok((compose(Some(bg), None, &OverlayTransform::default())?, false));
        };

        match self.overlay_raster() {
            Some(img) => Ok((compose(Some(bg), Some(img), &overlay.transform)?, true)),
            None => match self.config.overlay_failure {
                OverlayFailurePolicy::FallbackToBackground => {
                    tracing::warn!(
                        slot = overlay.slot,
                        path = %overlay.path,
                        "overlay raster unavailable, exporting background only"
                    );
                    Ok((compose(Some(bg), None, &overlay.transform)?, false))
                }
                OverlayFailurePolicy::Fail => Err(OverlayerError::overlay_unavailable(format!(
                    "'{}' (slot {}) is not decoded",
                    overlay.path, overlay.slot
                ))),
            },
        }
    }

    /// What the display surface shows right now.
    pub fn preview(&self) -> OverlayerResult<CompositeResult> {
        let bg = self.background.as_ref().ok_or(OverlayerError::NoBackground)?;
        let overlay = self
            .overlay
            .as_ref()
            .and_then(|o| self.overlay_raster().map(|img| (img, &o.transform)));
        render_preview(bg, overlay)
    }

    /// Compose, encode as PNG and hand the bytes to `sink` under the
    /// configured file name.
    #[tracing::instrument(skip_all)]
    pub fn export(&self, sink: &mut dyn SaveSink) -> OverlayerResult<ExportReceipt> {
        let (result, overlay_included) = self.compose_inner()?;
        let png = result.encode_png()?;
        sink.save(&self.config.export_file_name, &png)?;
        Ok(ExportReceipt {
            file_name: self.config.export_file_name.clone(),
            width: result.width,
            height: result.height,
            byte_len: png.len(),
            overlay_included,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
