//! Persistent list of favorite cities.
//!
//! Names are compared trimmed and case-insensitively, so `"warsaw "` matches a
//! stored `"Warsaw"`. Every change is written straight back to disk as
//! `{"favorites": [...]}`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct FavoritesFile {
    favorites: Vec<String>,
}

#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    favorites: Vec<String>,
}

impl FavoritesStore {
    /// Open the store backed by `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let favorites = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read favorites file: {}", path.display()))?;
            let file: FavoritesFile = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse favorites file: {}", path.display()))?;
            file.favorites
        } else {
            Vec::new()
        };

        Ok(Self { path, favorites })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add `city` unless it is blank or already present. Returns whether the
    /// list changed.
    pub fn add(&mut self, city: &str) -> Result<bool> {
        let city = city.trim();
        if city.is_empty() || self.is_favorite(city) {
            return Ok(false);
        }

        let mut updated = self.favorites.clone();
        updated.push(city.to_string());
        self.commit(updated)?;
        Ok(true)
    }

    /// Remove every entry matching `city`. Returns whether anything was removed.
    pub fn remove(&mut self, city: &str) -> Result<bool> {
        let before = self.favorites.len();
        let updated: Vec<String> = self
            .favorites
            .iter()
            .filter(|f| !same_city(f, city))
            .cloned()
            .collect();
        self.commit(updated)?;
        Ok(self.favorites.len() != before)
    }

    pub fn is_favorite(&self, city: &str) -> bool {
        self.favorites.iter().any(|f| same_city(f, city))
    }

    /// Favorites in the order they were added.
    pub fn list(&self) -> &[String] {
        &self.favorites
    }

    pub fn clear(&mut self) -> Result<()> {
        self.commit(Vec::new())
    }

    /// Write `favorites` to disk and only then replace the in-memory list.
    fn commit(&mut self, favorites: Vec<String>) -> Result<()> {
        self.write(&favorites)?;
        self.favorites = favorites;
        Ok(())
    }

    fn write(&self, favorites: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create favorites directory: {}", parent.display())
            })?;
        }

        let file = FavoritesFile {
            favorites: favorites.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file).context("Failed to serialize favorites")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write favorites file: {}", self.path.display()))?;

        tracing::debug!("Saved {} favorites to {}", favorites.len(), self.path.display());
        Ok(())
    }
}

fn same_city(stored: &str, city: &str) -> bool {
    stored.trim().to_lowercase() == city.trim().to_lowercase()
}
