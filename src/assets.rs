//! Asset handles
//!
//! The simulation never touches image or audio data. It asks an
//! [`AssetProvider`] for opaque handles keyed by logical path
//! ("Tiles/Ground3", "Sounds/enemyDie") and passes them back to the
//! draw and audio sinks. Load failures are the provider's business.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Opaque texture reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// Opaque sound effect reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundHandle(pub u32);

/// Opaque font reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontHandle(pub u32);

/// Resolves logical asset paths to handles
pub trait AssetProvider {
    fn texture(&mut self, path: &str) -> TextureHandle;
    fn sound(&mut self, path: &str) -> SoundHandle;
    fn font(&mut self, path: &str) -> FontHandle;
}

/// Interning provider: each distinct path gets the next id.
///
/// Used by the headless runner and tests; a real host maps the same paths
/// to loaded GPU/audio resources.
#[derive(Debug, Default)]
pub struct HandleTable {
    ids: HashMap<String, u32>,
    paths: Vec<String>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, path: &str) -> u32 {
        if let Some(&id) = self.ids.get(path) {
            return id;
        }
        let id = self.paths.len() as u32;
        self.paths.push(path.to_string());
        self.ids.insert(path.to_string(), id);
        id
    }

    /// Path registered for an id
    pub fn path(&self, id: u32) -> Option<&str> {
        self.paths.get(id as usize).map(String::as_str)
    }

    /// Number of distinct paths requested so far
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl AssetProvider for HandleTable {
    fn texture(&mut self, path: &str) -> TextureHandle {
        TextureHandle(self.intern(path))
    }

    fn sound(&mut self, path: &str) -> SoundHandle {
        SoundHandle(self.intern(path))
    }

    fn font(&mut self, path: &str) -> FontHandle {
        FontHandle(self.intern(path))
    }
}
