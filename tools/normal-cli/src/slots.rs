//! File-backed persistent property slots
//!
//! A JSON sidecar next to the mesh holds `{ object_id: { key: value } }`.

use anyhow::{Context, Result};
use normal_core::PropertySlots;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Sidecar extension appended to the mesh file stem
pub const SLOTS_EXTENSION: &str = "normals.json";

/// Default sidecar path for a mesh, e.g. `robot.obj` -> `robot.normals.json`
pub fn default_slots_path(mesh: &Path) -> PathBuf {
    mesh.with_extension(SLOTS_EXTENSION)
}

/// [`PropertySlots`] stored in a JSON file
#[derive(Debug, Clone)]
pub struct FileSlots {
    path: PathBuf,
    objects: BTreeMap<String, BTreeMap<String, String>>,
}

impl FileSlots {
    /// Open a sidecar; a missing or unreadable file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let objects = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unparsable slots file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, objects }
    }

    /// Write every slot back to the sidecar
    pub fn save(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.objects)?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("Failed to write slots: {}", self.path.display()))?;
        tracing::debug!("Saved slots to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PropertySlots for FileSlots {
    fn read(&self, object_id: &str, key: &str) -> Option<String> {
        self.objects.get(object_id)?.get(key).cloned()
    }

    fn write(&mut self, object_id: &str, key: &str, value: String) {
        self.objects
            .entry(object_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }
}
