//! Pure domain types with minimal dependencies
//!
//! This module contains the annotation value types used throughout the crate.
//! Nothing here knows about streams, files or configuration.

pub mod geometry;
pub mod shape;

pub use geometry::*;
pub use shape::*;
