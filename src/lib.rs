//! Annotation shapes for screenshot tools
//!
//! Value types for user-drawn overlays, their stream and JSON encodings, a
//! name-keyed type registry, and resolution of where a capture is saved.

pub mod codec;
pub mod config;
pub mod domain;
pub mod registry;
pub mod save;

pub use config::ShotmarkConfig;
pub use domain::*;
