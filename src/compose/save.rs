use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::OverlayerResult;

/// Receives the encoded export (the browser's download link).
pub trait SaveSink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> OverlayerResult<()>;
}

/// Writes exports into a directory, creating it when needed.
#[derive(Clone, Debug)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(Path::new(file_name))
    }
}

impl SaveSink for DirSink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> OverlayerResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let path = self.path_for(file_name);
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "export saved");
        Ok(())
    }
}

/// Keeps every export in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub saved: Vec<(String, Vec<u8>)>,
}

impl SaveSink for MemorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> OverlayerResult<()> {
        self.saved.push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}
