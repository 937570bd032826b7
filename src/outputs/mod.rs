//! Output generation for the presentation layer.
//!
//! # Submodules
//!
//! - [`json`]: Writes the snapshot and the ranked news feed as JSON files

pub mod json;
