//! Where a finished screenshot goes
//!
//! Resolves the destination of a capture from an explicit path (given on the
//! command line) or from the configured save option.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image file extensions accepted as-is; anything else gets `.png` appended
pub const IMAGE_FORMATS: [&str; 9] = [
    ".bmp", ".jpg", ".jpeg", ".png", ".pbm", ".pgm", ".ppm", ".xbm", ".xpm",
];

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Cannot determine the {0} directory")]
    NoUserDir(&'static str),

    #[error("Cannot determine current directory: {0}")]
    CurrentDir(#[from] std::io::Error),
}

/// Configured save behavior
///
/// Serialized by snake_case name; `From<u8>` maps the legacy numeric option index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOption {
    /// Save to the desktop folder
    Desktop,
    /// Save to the pictures folder without asking
    #[default]
    Pictures,
    /// Ask for a file name, starting in the last used folder
    AskFolder,
    /// Copy to clipboard only
    ClipboardOnly,
    /// Save to the pictures folder and copy to clipboard
    PicturesAndClipboard,
}

impl From<u8> for SaveOption {
    fn from(index: u8) -> Self {
        match index {
            0 => SaveOption::Desktop,
            1 => SaveOption::Pictures,
            2 => SaveOption::AskFolder,
            4 => SaveOption::PicturesAndClipboard,
            _ => SaveOption::ClipboardOnly,
        }
    }
}

impl From<SaveOption> for u8 {
    fn from(option: SaveOption) -> Self {
        match option {
            SaveOption::Desktop => 0,
            SaveOption::Pictures => 1,
            SaveOption::AskFolder => 2,
            SaveOption::ClipboardOnly => 3,
            SaveOption::PicturesAndClipboard => 4,
        }
    }
}

/// Resolved destination of a capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    File(PathBuf),
    Clipboard,
    FileAndClipboard(PathBuf),
    /// A file dialog must ask the user, starting from `suggested`
    Prompt { suggested: PathBuf },
}

impl SaveTarget {
    /// File the capture is written to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            SaveTarget::File(path) | SaveTarget::FileAndClipboard(path) => Some(path.as_path()),
            SaveTarget::Clipboard | SaveTarget::Prompt { .. } => None,
        }
    }

    pub fn copies_to_clipboard(&self) -> bool {
        matches!(self, SaveTarget::Clipboard | SaveTarget::FileAndClipboard(_))
    }

    /// Apply the answer of a file dialog to a prompt
    ///
    /// An empty answer means the user cancelled. Non-prompt targets are returned unchanged.
    pub fn accept_prompt(self, choice: &str) -> Result<Option<SaveTarget>, SaveError> {
        match self {
            SaveTarget::Prompt { suggested } => {
                if choice.is_empty() {
                    return Ok(None);
                }
                let default_name = suggested
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Ok(Some(SaveTarget::File(normalize_path(choice, &default_name)?)))
            }
            other => Ok(Some(other)),
        }
    }
}

/// Inputs for destination resolution
#[derive(Debug, Clone)]
pub struct SaveRequest<'a> {
    /// Path given explicitly, empty when none
    pub explicit_path: &'a str,
    pub option: SaveOption,
    /// Folder used the last time the user was asked
    pub last_folder: Option<&'a Path>,
    /// Prefix of generated file names
    pub file_prefix: &'a str,
    pub time: DateTime<Local>,
}

/// Check whether an extension (dot included) is a supported image format
pub fn valid_format(extension: &str) -> bool {
    IMAGE_FORMATS.contains(&extension)
}

/// Timestamped default file name, e.g. `Screenshot20240131235959.png`
pub fn default_file_name(prefix: &str, time: DateTime<Local>) -> String {
    format!("{}{}.png", prefix, time.format("%Y%m%d%H%M%S"))
}

/// Extension of a file name including the dot, empty when there is none
fn extension_of(name: &str) -> &str {
    let stem_start = name.len() - name.trim_start_matches('.').len();
    match name[stem_start..].rfind('.') {
        Some(pos) => &name[stem_start + pos..],
        None => "",
    }
}

/// Fill in a missing file name, force a known image extension and make the path absolute
pub fn normalize_path(path: &str, default_name: &str) -> Result<PathBuf, SaveError> {
    let (dir, name) = match path.rfind('/') {
        Some(pos) => (&path[..=pos], &path[pos + 1..]),
        None => ("", path),
    };
    let name = if name.is_empty() {
        default_name.to_string()
    } else if valid_format(extension_of(name)) {
        name.to_string()
    } else {
        format!("{name}.png")
    };
    let joined = PathBuf::from(format!("{dir}{name}"));
    if joined.is_absolute() {
        Ok(joined)
    } else {
        Ok(std::env::current_dir()?.join(joined))
    }
}

fn desktop_dir() -> Result<PathBuf, SaveError> {
    dirs::desktop_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Desktop")))
        .ok_or(SaveError::NoUserDir("desktop"))
}

fn picture_dir() -> Result<PathBuf, SaveError> {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
        .ok_or(SaveError::NoUserDir("pictures"))
}

/// Resolve the destination of a capture
pub fn resolve(request: &SaveRequest<'_>) -> Result<SaveTarget, SaveError> {
    let file_name = default_file_name(request.file_prefix, request.time);

    if !request.explicit_path.is_empty() {
        return Ok(SaveTarget::File(normalize_path(
            request.explicit_path,
            &file_name,
        )?));
    }

    let target = match request.option {
        SaveOption::Desktop => SaveTarget::File(desktop_dir()?.join(&file_name)),
        SaveOption::Pictures => SaveTarget::File(picture_dir()?.join(&file_name)),
        SaveOption::AskFolder => {
            let folder = match request.last_folder {
                Some(folder) => folder.to_path_buf(),
                None => picture_dir()?,
            };
            SaveTarget::Prompt {
                suggested: folder.join(&file_name),
            }
        }
        SaveOption::PicturesAndClipboard => {
            SaveTarget::FileAndClipboard(picture_dir()?.join(&file_name))
        }
        SaveOption::ClipboardOnly => SaveTarget::Clipboard,
    };
    log::debug!("Resolved save target {:?}", target);
    Ok(target)
}
