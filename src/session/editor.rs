use crate::{
    assets::{
        gallery::SlotStatus,
        loader::{AssetLoader, LoadTarget, LoadTicket},
        raster::ImageFile,
        source::AssetSource,
    },
    compose::save::SaveSink,
    config::EditorConfig,
    foundation::{core::Point, error::OverlayerError, error::OverlayerResult},
    interaction::{
        controller::ControllerState,
        gesture::{Affordance, CursorHint, GestureKind, PointerInput},
        view::OverlayView,
    },
    session::state::{EditorSession, ExportReceipt},
};

/// Drives an [`EditorSession`]: reads assets, submits decodes and applies
/// their completions when pumped.
pub struct Editor<S: AssetSource> {
    session: EditorSession,
    loader: AssetLoader,
    source: S,
}

impl<S: AssetSource> std::fmt::Debug for Editor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("session", &self.session)
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}

impl<S: AssetSource> Editor<S> {
    pub fn new(config: EditorConfig, source: S) -> OverlayerResult<Self> {
        let loader = AssetLoader::with_threads(config.decode_threads)?;
        let session = EditorSession::new(config)?;
        Ok(Self {
            session,
            loader,
            source,
        })
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Decodes submitted but not yet applied.
    pub fn pending(&self) -> usize {
        self.loader.pending()
    }

    /// Check the file type and queue its decode. Non-images are refused
    /// before any decode work.
    #[tracing::instrument(skip_all, fields(name = %file.name, mime = %file.mime))]
    pub fn upload_background(&mut self, file: ImageFile) -> OverlayerResult<LoadTicket> {
        self.session.accept_background_file(&file)?;
        Ok(self
            .loader
            .submit(LoadTarget::Background, file.name, file.bytes))
    }

    /// Queue a decode for every gallery slot. Slots whose bytes cannot be read
    /// go inert right away.
    pub fn preload_gallery(&mut self) -> Vec<LoadTicket> {
        (0..self.session.gallery().len())
            .filter_map(|index| self.load_slot(index))
            .collect()
    }

    fn load_slot(&mut self, index: usize) -> Option<LoadTicket> {
        let path = self.session.gallery().slot(index).ok()?.entry.path.clone();
        match self.source.read(&path) {
            Ok(bytes) => {
                let ticket = self
                    .loader
                    .submit(LoadTarget::GallerySlot(index), path, bytes);
                self.session.gallery_mut().mark_pending(index, ticket).ok()?;
                Some(ticket)
            }
            Err(e) => {
                let _ = self.session.gallery_mut().mark_inert(index, &e);
                None
            }
        }
    }

    pub fn choose_overlay(&mut self, index: usize) -> OverlayerResult<bool> {
        self.session.select_overlay(index)
    }

    /// Hide the overlay; later exports contain the background only.
    pub fn clear_overlay(&mut self) {
        self.session.clear_overlay();
    }

    /// Feed typed text to the cheat code. On a match the swapped slot is
    /// reloaded and its ticket returned.
    pub fn type_cheat_code(&mut self, input: &str) -> Option<LoadTicket> {
        let index = self.session.gallery_mut().apply_cheat_code(input)?;
        self.load_slot(index)
    }

    /// Apply every completion that has already arrived. Returns the errors a
    /// user should see (background decode failures).
    pub fn pump(&mut self) -> Vec<OverlayerError> {
        let mut errors = Vec::new();
        while let Some(completion) = self.loader.try_next() {
            if let Err(e) = self.session.apply_completion(completion) {
                errors.push(e);
            }
        }
        errors
    }

    /// Wait for every submitted decode and apply it.
    pub fn pump_blocking(&mut self) -> Vec<OverlayerError> {
        let mut errors = Vec::new();
        while let Some(completion) = self.loader.wait_next() {
            if let Err(e) = self.session.apply_completion(completion) {
                errors.push(e);
            }
        }
        errors
    }

    pub fn slot_status(&self, index: usize) -> OverlayerResult<&SlotStatus> {
        Ok(self.session.gallery().slot(index)?.status())
    }

    pub fn pointer_down(&mut self, affordance: Affordance, input: PointerInput) -> ControllerState {
        self.session.pointer_down(affordance, input)
    }

    pub fn pointer_move(&mut self, input: PointerInput, view: &mut dyn OverlayView) -> bool {
        self.session.pointer_move(input, view)
    }

    pub fn pointer_up(&mut self) -> Option<GestureKind> {
        self.session.pointer_up()
    }

    pub fn cursor_hint(&self, p: Point) -> CursorHint {
        self.session.cursor_hint(p)
    }

    pub fn export(&self, sink: &mut dyn SaveSink) -> OverlayerResult<ExportReceipt> {
        self.session.export(sink)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
