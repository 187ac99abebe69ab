use crate::{
    assets::{loader::LoadTicket, raster::PreparedImage},
    foundation::error::{OverlayerError, OverlayerResult},
};

/// One preset overlay offered to the user.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GalleryEntry {
    pub label: String,
    /// Relative path resolved by an [`AssetSource`](crate::AssetSource).
    pub path: String,
}

impl GalleryEntry {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// Typed phrase that swaps one gallery slot for an alternate asset.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CheatCode {
    pub code: String,
    pub slot: usize,
    pub alternate_path: String,
}

#[derive(Clone, Debug)]
pub enum SlotStatus {
    /// Decode not finished (or never requested).
    Pending,
    Ready(PreparedImage),
    /// Decode failed; the slot ignores selection.
    Inert(String),
}

#[derive(Clone, Debug)]
pub struct GallerySlot {
    pub entry: GalleryEntry,
    status: SlotStatus,
    last_ticket: Option<LoadTicket>,
}

impl GallerySlot {
    pub fn status(&self) -> &SlotStatus {
        &self.status
    }

    pub fn image(&self) -> Option<&PreparedImage> {
        match &self.status {
            SlotStatus::Ready(img) => Some(img),
            _ => None,
        }
    }

    pub fn is_inert(&self) -> bool {
        matches!(self.status, SlotStatus::Inert(_))
    }
}

/// Fixed list of overlay presets and their load status.
#[derive(Clone, Debug)]
pub struct Gallery {
    slots: Vec<GallerySlot>,
    cheat: Option<CheatCode>,
}

impl Gallery {
    pub fn new(entries: Vec<GalleryEntry>, cheat: Option<CheatCode>) -> Self {
        let slots = entries
            .into_iter()
            .map(|entry| GallerySlot {
                entry,
                status: SlotStatus::Pending,
                last_ticket: None,
            })
            .collect();
        Self { slots, cheat }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[GallerySlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> OverlayerResult<&GallerySlot> {
        self.slots.get(index).ok_or_else(|| {
            OverlayerError::validation(format!(
                "gallery slot {index} out of range (have {})",
                self.slots.len()
            ))
        })
    }

    fn slot_mut(&mut self, index: usize) -> OverlayerResult<&mut GallerySlot> {
        let len = self.slots.len();
        self.slots.get_mut(index).ok_or_else(|| {
            OverlayerError::validation(format!("gallery slot {index} out of range (have {len})"))
        })
    }

    /// Record that a decode for `index` was submitted.
    pub fn mark_pending(&mut self, index: usize, ticket: LoadTicket) -> OverlayerResult<()> {
        let slot = self.slot_mut(index)?;
        slot.status = SlotStatus::Pending;
        slot.last_ticket = Some(ticket);
        Ok(())
    }

    /// Give up on a slot whose bytes could not be fetched.
    pub fn mark_inert(&mut self, index: usize, error: &OverlayerError) -> OverlayerResult<()> {
        let slot = self.slot_mut(index)?;
        tracing::warn!(index, path = %slot.entry.path, %error, "gallery asset failed to load");
        slot.status = SlotStatus::Inert(error.to_string());
        Ok(())
    }

    /// Apply a finished decode. Completions are applied even when a newer
    /// decode for the same slot was submitted since; the last one to finish
    /// wins. Failures are logged and leave the slot inert.
    pub fn apply_completion(
        &mut self,
        index: usize,
        ticket: LoadTicket,
        result: OverlayerResult<PreparedImage>,
    ) -> OverlayerResult<&SlotStatus> {
        let slot = self.slot_mut(index)?;
        if slot.last_ticket.is_some_and(|latest| ticket < latest) {
            tracing::debug!(index, ?ticket, "applying stale gallery decode");
        }
        slot.status = match result {
            Ok(img) => SlotStatus::Ready(img),
            Err(e) => {
                tracing::warn!(
                    index,
                    path = %slot.entry.path,
                    error = %e,
                    "gallery asset failed to load"
                );
                SlotStatus::Inert(e.to_string())
            }
        };
        Ok(&slot.status)
    }

    /// Exact, case-insensitive match (no trimming) against the configured cheat code. On a
    /// match the slot's path is swapped and the slot index returned so the
    /// caller can reload it.
    pub fn apply_cheat_code(&mut self, input: &str) -> Option<usize> {
        let cheat = self.cheat.as_ref()?;
        if !input.eq_ignore_ascii_case(&cheat.code) {
            return None;
        }
        let index = cheat.slot;
        let alternate = cheat.alternate_path.clone();
        let slot = self.slots.get_mut(index)?;
        if slot.entry.path == alternate {
            return None;
        }
        tracing::debug!(index, from = %slot.entry.path, to = %alternate, "cheat code accepted");
        slot.entry.path = alternate;
        slot.status = SlotStatus::Pending;
        Some(index)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/gallery.rs"]
mod tests;
