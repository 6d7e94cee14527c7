//! Configuration persistence for shotmark settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{PenColor, ShapeKind, Toolshape};
use crate::save::{SaveOption, SaveTarget};

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotmarkConfig {
    /// What happens with a finished capture
    pub save_option: SaveOption,
    /// Folder chosen the last time the user was asked
    pub last_folder: Option<PathBuf>,
    /// Prefix of generated file names
    pub file_prefix: String,
    /// Color for new shapes
    pub pen_color: PenColor,
    /// Stroke width for new shapes
    pub line_width: i32,
    /// Font size for new text shapes
    pub font_size: i32,
}

impl Default for ShotmarkConfig {
    fn default() -> Self {
        Self {
            save_option: SaveOption::Pictures,
            last_folder: None,
            file_prefix: "Screenshot".to_string(),
            // Default red, matching the toolbar swatch
            pen_color: PenColor::rgb(230, 26, 26),
            line_width: 2,
            font_size: 12,
        }
    }
}

impl ShotmarkConfig {
    /// Directory and file name under the user config dir
    pub const DIR_NAME: &'static str = "shotmark";
    pub const FILE_NAME: &'static str = "config.json";

    /// Get the path to the config file
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Cannot determine config directory")?;
        Ok(dir.join(Self::DIR_NAME).join(Self::FILE_NAME))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        match Self::default_path() {
            Ok(path) => Self::load_from(&path),
            Err(err) => {
                log::warn!("Could not locate config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Load from a specific file, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save configuration to disk, logging any failure before returning it
    pub fn save(&self) -> Result<()> {
        let result = Self::default_path().and_then(|path| self.save_to(&path));
        if let Err(err) = &result {
            log::error!("Failed to save config: {:?}", err);
        }
        result
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Remember the folder of a file the user picked in a dialog
    pub fn remember_folder(&mut self, chosen: &Path) {
        if let Some(parent) = chosen.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.last_folder = Some(parent.to_path_buf());
        }
    }

    /// Apply a file dialog answer to a prompt target and remember the chosen folder
    ///
    /// `Ok(None)` means the user cancelled; the config is left untouched then.
    pub fn accept_save_prompt(
        &mut self,
        target: SaveTarget,
        choice: &str,
    ) -> Result<Option<SaveTarget>> {
        let accepted = target.accept_prompt(choice)?;
        if let Some(path) = accepted.as_ref().and_then(SaveTarget::path) {
            self.remember_folder(path);
        }
        Ok(accepted)
    }

    /// New shape styled with the configured pen
    pub fn new_shape(&self, kind: ShapeKind) -> Toolshape {
        Toolshape {
            line_width: self.line_width,
            pen_color: self.pen_color,
            font_size: self.font_size,
            ..Toolshape::new(kind)
        }
    }
}
