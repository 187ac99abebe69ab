use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::foundation::error::{OverlayerError, OverlayerResult};

/// Where gallery assets are fetched from, addressed by relative path.
pub trait AssetSource {
    fn read(&self, rel_path: &str) -> OverlayerResult<Arc<Vec<u8>>>;
}

/// Reads gallery assets below a root directory.
#[derive(Clone, Debug)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssetSource {
    fn read(&self, rel_path: &str) -> OverlayerResult<Arc<Vec<u8>>> {
        let norm = normalize_rel_path(rel_path)?;
        let path = self.root.join(Path::new(&norm));
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))?;
        Ok(Arc::new(bytes))
    }
}

/// In-memory assets keyed by normalized relative path.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    files: HashMap<String, Arc<Vec<u8>>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rel_path: &str, bytes: Vec<u8>) -> OverlayerResult<()> {
        let norm = normalize_rel_path(rel_path)?;
        self.files.insert(norm, Arc::new(bytes));
        Ok(())
    }
}

impl AssetSource for MemoryAssetSource {
    fn read(&self, rel_path: &str) -> OverlayerResult<Arc<Vec<u8>>> {
        let norm = normalize_rel_path(rel_path)?;
        self.files.get(&norm).cloned().ok_or_else(|| {
            OverlayerError::Other(anyhow::anyhow!("asset '{norm}' not found"))
        })
    }
}

/// Normalize a relative asset path: `/` separators, no `.` segments, no
/// absolute paths and no `..`.
pub fn normalize_rel_path(source: &str) -> OverlayerResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(OverlayerError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(OverlayerError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(OverlayerError::validation(
                "asset paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(OverlayerError::validation(
            "asset path must contain a file name",
        ));
    }
    Ok(out.join("/"))
}
