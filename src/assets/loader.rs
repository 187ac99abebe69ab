use std::sync::{
    Arc,
    mpsc::{self, Receiver, Sender, TryRecvError},
};

use crate::{
    assets::{decode::decode_image, raster::PreparedImage},
    foundation::error::{OverlayerError, OverlayerResult},
};

/// Identifier of one submitted decode, increasing in submission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(pub u64);

/// What a decoded raster is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadTarget {
    Background,
    GallerySlot(usize),
}

/// A finished decode, delivered on the owner's thread.
#[derive(Debug)]
pub struct LoadCompletion {
    pub ticket: LoadTicket,
    pub target: LoadTarget,
    /// File name or gallery path the bytes came from.
    pub label: String,
    pub result: OverlayerResult<PreparedImage>,
}

/// Decodes images off the UI thread and queues completions in the order the
/// decodes finish.
///
/// There is no cancellation: every submitted decode eventually produces a
/// completion, and whoever drains the queue applies them in arrival order.
pub struct AssetLoader {
    pool: Option<rayon::ThreadPool>,
    tx: Sender<LoadCompletion>,
    rx: Receiver<LoadCompletion>,
    next_ticket: u64,
    in_flight: usize,
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("dedicated_pool", &self.pool.is_some())
            .field("next_ticket", &self.next_ticket)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader {
    /// Loader that decodes on rayon's global pool.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            pool: None,
            tx,
            rx,
            next_ticket: 0,
            in_flight: 0,
        }
    }

    /// Loader with a dedicated pool of `threads` decode workers.
    pub fn with_threads(threads: Option<usize>) -> OverlayerResult<Self> {
        let Some(n) = threads else {
            return Ok(Self::new());
        };
        if n == 0 {
            return Err(OverlayerError::validation(
                "decode threads must be >= 1 when set",
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .thread_name(|i| format!("overlayer-decode-{i}"))
            .build()
            .map_err(|e| OverlayerError::validation(format!("failed to build decode pool: {e}")))?;
        Ok(Self {
            pool: Some(pool),
            ..Self::new()
        })
    }

    /// Queue `bytes` for decoding. Returns immediately.
    pub fn submit(
        &mut self,
        target: LoadTarget,
        label: impl Into<String>,
        bytes: Arc<Vec<u8>>,
    ) -> LoadTicket {
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight += 1;

        let label = label.into();
        tracing::debug!(?ticket, ?target, %label, "decode submitted");

        let tx = self.tx.clone();
        let job = move || {
            let result = decode_image(&bytes);
            // The receiver only disappears with the loader itself.
            let _ = tx.send(LoadCompletion {
                ticket,
                target,
                label,
                result,
            });
        };
        match &self.pool {
            Some(pool) => pool.spawn(job),
            None => rayon::spawn(job),
        }
        ticket
    }

    /// Number of decodes whose completion has not been taken yet.
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Next finished decode, if any, without blocking.
    pub fn try_next(&mut self) -> Option<LoadCompletion> {
        match self.rx.try_recv() {
            Ok(c) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(c)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the next decode finishes; `None` when nothing is pending.
    pub fn wait_next(&mut self) -> Option<LoadCompletion> {
        if self.in_flight == 0 {
            return None;
        }
        let c = self.rx.recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(c)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
