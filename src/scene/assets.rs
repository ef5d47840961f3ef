//! Named mesh assets.
//!
//! An [`AssetSource`] maps a name (e.g. `"cube.obj"`) to mesh text. Loading
//! parses that text and tags any failure with the asset name.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::geom::{parse_mesh, Triangle};
use crate::util::{Error, Result};

/// Resolves asset names to mesh text.
pub trait AssetSource: Send + Sync {
    fn fetch(&self, name: &str) -> Result<String>;
}

/// Assets read from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsAssets {
    root: PathBuf,
}

impl FsAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FsAssets {
    fn fetch(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::AssetNotFound(path.display().to_string()),
            _ => Error::Io(e),
        })
    }
}

/// In-memory assets, mostly for tests and embedded scenes.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    entries: HashMap<String, String>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(name.into(), text.into());
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }
}

impl AssetSource for MemoryAssets {
    fn fetch(&self, name: &str) -> Result<String> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| Error::AssetNotFound(name.to_string()))
    }
}

/// Fetch and parse one asset into object-space triangles.
pub fn load_asset(source: &dyn AssetSource, name: &str) -> Result<Vec<Triangle>> {
    let text = source.fetch(name).map_err(|e| e.in_asset(name))?;
    let triangles = parse_mesh(&text).map_err(|e| e.in_asset(name))?;
    tracing::debug!(asset = name, triangles = triangles.len(), "loaded asset");
    Ok(triangles)
}

/// Load distinct assets in parallel.
///
/// Either every asset loads or the first failure (in input order) is
/// returned; the result map is keyed by asset name.
pub fn load_assets<'n>(
    source: &dyn AssetSource,
    names: impl IntoIterator<Item = &'n str>,
) -> Result<HashMap<String, Vec<Triangle>>> {
    let mut unique: Vec<&str> = Vec::new();
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }

    let loaded: Vec<Result<Vec<Triangle>>> =
        unique.par_iter().map(|name| load_asset(source, name)).collect();

    unique
        .into_iter()
        .zip(loaded)
        .map(|(name, tris)| Ok((name.to_string(), tris?)))
        .collect()
}
