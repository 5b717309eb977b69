//! # Catalog Data Model
//!
//! Defines the JSON shapes exchanged between the catalog server and its clients:
//! - [`Rectangle`] and [`Image`]: image content, sent and received as-is
//! - [`ImageInfo`]: per-image metadata returned by the listing and add endpoints
//! - [`ImageRecord`]: what the store keeps for every id
//!
//! All wire types are plain `serde` structs serialized with `serde_json`.

use serde::{Deserialize, Serialize};

// ============================================================================
// WIRE TYPES
// ============================================================================

/// A filled, axis-aligned rectangle inside an image.
///
/// Coordinates are signed because submitted images are stored exactly as the
/// client sent them, without any bounds checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    /// Fill color, e.g. `#1a2b3c`
    pub fill: String,
}

impl Rectangle {
    /// Whether the rectangle lies fully inside a `width` × `height` area.
    ///
    /// Edges that overflow `i64` count as outside.
    pub fn fits_within(&self, width: i64, height: i64) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);

        self.x >= 0
            && self.y >= 0
            && right.is_some_and(|right| right <= width)
            && bottom.is_some_and(|bottom| bottom <= height)
    }
}

/// Image content: the drawing area and the rectangles painted on it, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub width: i64,
    pub height: i64,
    pub rectangles: Vec<Rectangle>,
}

/// Metadata for a stored image (no content).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub id: u64,
    pub tags: Vec<String>,
    /// Unix timestamp (seconds) at which the record was created
    pub time_of_creation: i64,
}

// ============================================================================
// STORE TYPES
// ============================================================================

/// Stored unit: image content plus the tags and creation time assigned to it.
///
/// Fields are set once at creation and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub image: Image,
    pub tags: Vec<String>,
    pub time_of_creation: i64,
}

impl ImageRecord {
    /// Build the metadata view of this record under `id`.
    pub fn info(&self, id: u64) -> ImageInfo {
        ImageInfo {
            id,
            tags: self.tags.clone(),
            time_of_creation: self.time_of_creation,
        }
    }
}
