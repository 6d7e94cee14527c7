//! Shape serialization
//!
//! This module contains:
//! - A big-endian data stream compatible with Qt 5 `QDataStream`
//! - The binary shape file built on that stream
//! - JSON shape documents

pub mod binary;
pub mod error;
pub mod json;
pub mod stream;

pub use error::{CodecError, CodecResult};
pub use json::ShapeDocument;
pub use stream::{StreamRead, StreamReader, StreamWrite, StreamWriter};

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{Toolshape, Toolshapes};

/// Whether a path names a JSON shape document rather than a binary shape file
pub fn is_json_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load shapes from either format, detected by the file's leading bytes
pub fn load_any(path: &Path) -> Result<Toolshapes> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read shape file: {}", path.display()))?;
    if binary::has_magic(&bytes) {
        binary::read_shapes(bytes.as_slice())
            .with_context(|| format!("Failed to decode shape file: {}", path.display()))
    } else {
        let json = String::from_utf8(bytes)
            .with_context(|| format!("Not a shape file: {}", path.display()))?;
        let doc = ShapeDocument::from_json(&json)
            .with_context(|| format!("In {}", path.display()))?;
        Ok(doc.shapes)
    }
}

/// Save shapes in the format implied by the path's extension
pub fn save_any(path: &Path, shapes: &[Toolshape]) -> Result<()> {
    if is_json_path(path) {
        ShapeDocument::new(shapes.to_vec()).save(path)
    } else {
        binary::save(path, shapes)
            .with_context(|| format!("Failed to write shape file: {}", path.display()))
    }
}
