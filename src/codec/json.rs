//! JSON shape documents
//!
//! Human-editable persistence for a session's annotations.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::Toolshapes;

/// Current JSON document version
pub const DOCUMENT_VERSION: u32 = 1;

/// A saved set of annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDocument {
    pub version: u32,
    #[serde(default)]
    pub shapes: Toolshapes,
}

impl Default for ShapeDocument {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ShapeDocument {
    pub fn new(shapes: Toolshapes) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            shapes,
        }
    }

    /// Parse a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: ShapeDocument = serde_json::from_str(json).context("Malformed shape document")?;
        if doc.version > DOCUMENT_VERSION {
            bail!("Unsupported shape document version: {}", doc.version);
        }
        Ok(doc)
    }

    /// Serialize as pretty JSON
    ///
    /// JSON has no NaN or infinity, so shapes with such coordinates are rejected
    /// instead of being written as `null`.
    pub fn to_json(&self) -> Result<String> {
        if let Some(index) = self.shapes.iter().position(|shape| !shape.is_finite()) {
            bail!("Shape {} has a non-finite coordinate", index);
        }
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save document to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write shape document: {}", path.display()))?;
        Ok(())
    }

    /// Load document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read shape document: {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("In {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PenColor, PointF, ShapeKind, Toolshape};

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shapes.json");

        let mut line = Toolshape::new(ShapeKind::Line);
        line.pen_color = PenColor::rgba(0, 128, 255, 200);
        line.points = vec![PointF::new(0.0, 0.0), PointF::new(3.5, 9.0)];
        let doc = ShapeDocument::new(vec![line, Toolshape::new(ShapeKind::Arrow)]);

        doc.save(&path).unwrap();
        assert_eq!(ShapeDocument::load(&path).unwrap(), doc);
    }

    #[test]
    fn test_non_finite_coordinate_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shapes.json");

        let mut line = Toolshape::new(ShapeKind::Line);
        line.points = vec![PointF::new(f64::NAN, 1.0)];
        let doc = ShapeDocument::new(vec![Toolshape::new(ShapeKind::Arrow), line]);

        let err = doc.save(&path).unwrap_err();
        assert!(err.to_string().contains("Shape 1 has a non-finite coordinate"));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_shapes_defaults_to_empty() {
        let doc = ShapeDocument::from_json(r#"{"version":1}"#).unwrap();
        assert!(doc.shapes.is_empty());
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = ShapeDocument::from_json(r#"{"version":7,"shapes":[]}"#).unwrap_err();
        assert!(err.to_string().contains("version: 7"));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(ShapeDocument::from_json(r#"{"version":1,"shapes":[{"kind":"star"}]}"#).is_err());
    }

    #[test]
    fn test_load_missing_file_has_path_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = ShapeDocument::load(&path).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }
}
