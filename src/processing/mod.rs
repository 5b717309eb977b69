//! # Image Generation
//!
//! Random rectangles, fills and tag subsets used to seed the catalog and to tag
//! submitted images.

pub mod generator;

// Re-export main functions for convenience
pub use generator::{random_image, random_rectangle, random_tags};
