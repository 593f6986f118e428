// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Client-wide display toggles consulted by entities every frame.
//!
//! The toggles are atomics so a settings UI can flip them while entities are
//! being ticked elsewhere. They can be seeded from a RON file:
//!
//! ```ron
//! (
//!     show_gob_paths: true,
//!     show_gob_info: false,
//! )
//! ```

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error raised while loading [`GobSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings: {0}")]
    Io(#[from] io::Error),
    /// The settings file is not valid RON or names an unknown toggle.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// The on-disk shape of [`GobSettings`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    /// Draw the path of moving entities.
    pub show_gob_paths: bool,
    /// Draw the info label above entities.
    pub show_gob_info: bool,
    /// Use user-configured icons where one is configured.
    pub show_custom_icons: bool,
}

/// Display toggles shared by every entity.
#[derive(Debug, Default)]
pub struct GobSettings {
    show_gob_paths: AtomicBool,
    show_gob_info: AtomicBool,
    show_custom_icons: AtomicBool,
}

impl GobSettings {
    /// Creates settings with every toggle off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses settings from a RON document.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = ron::from_str(text)?;
        Ok(Self::from(file))
    }

    /// Loads settings from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_ron_str(&text)?;
        log::info!("Loaded entity settings from {}.", path.display());
        Ok(settings)
    }

    /// Captures the current toggle values.
    pub fn snapshot(&self) -> SettingsFile {
        SettingsFile {
            show_gob_paths: self.show_gob_paths(),
            show_gob_info: self.show_gob_info(),
            show_custom_icons: self.show_custom_icons(),
        }
    }

    /// Whether moving entities draw their path.
    pub fn show_gob_paths(&self) -> bool {
        self.show_gob_paths.load(Ordering::Relaxed)
    }

    /// Toggles path drawing.
    pub fn set_show_gob_paths(&self, on: bool) {
        self.show_gob_paths.store(on, Ordering::Relaxed);
    }

    /// Whether entities draw their info label.
    pub fn show_gob_info(&self) -> bool {
        self.show_gob_info.load(Ordering::Relaxed)
    }

    /// Toggles info labels.
    pub fn set_show_gob_info(&self, on: bool) {
        self.show_gob_info.store(on, Ordering::Relaxed);
    }

    /// Whether user-configured icons replace the built-in ones.
    pub fn show_custom_icons(&self) -> bool {
        self.show_custom_icons.load(Ordering::Relaxed)
    }

    /// Toggles custom icons.
    pub fn set_show_custom_icons(&self, on: bool) {
        self.show_custom_icons.store(on, Ordering::Relaxed);
    }
}

impl From<SettingsFile> for GobSettings {
    fn from(file: SettingsFile) -> Self {
        Self {
            show_gob_paths: AtomicBool::new(file.show_gob_paths),
            show_gob_info: AtomicBool::new(file.show_gob_info),
            show_custom_icons: AtomicBool::new(file.show_custom_icons),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_fields_default_to_off() {
        let settings = GobSettings::from_ron_str("(show_gob_info: true)").unwrap();
        assert!(settings.show_gob_info());
        assert!(!settings.show_gob_paths());
        assert!(!settings.show_custom_icons());
    }

    #[test]
    fn test_unknown_toggle_is_rejected() {
        let result = GobSettings::from_ron_str("(show_everything: true)");
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        // --- 1. SETUP ---
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(show_gob_paths: true, show_custom_icons: true)").unwrap();

        // --- 2. ACT ---
        let settings = GobSettings::load(file.path()).unwrap();

        // --- 3. ASSERT ---
        assert_eq!(
            settings.snapshot(),
            SettingsFile {
                show_gob_paths: true,
                show_gob_info: false,
                show_custom_icons: true,
            }
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = GobSettings::load(dir.path().join("nope.ron"));
        assert!(matches!(result, Err(SettingsError::Io(_))));
    }

    #[test]
    fn test_toggles_flip_through_shared_reference() {
        let settings = GobSettings::new();
        settings.set_show_gob_paths(true);
        assert!(settings.show_gob_paths());
        settings.set_show_gob_paths(false);
        assert!(!settings.show_gob_paths());
    }
}
